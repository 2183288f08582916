//! Network packet model.
//!
//! One inspectable unit of traffic. Headers are pre-parsed into plain fields;
//! a packet whose transport header could not be parsed simply carries
//! `ports: None`, which downstream rules treat as a non-match rather than an
//! error.

use std::net::Ipv4Addr;

use bytes::Bytes;

use crate::proto;

/// UDP source/destination port pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UdpPorts {
    pub src: u16,
    pub dst: u16,
}

impl UdpPorts {
    /// True if either side of the flow uses `port`.
    #[inline]
    pub fn either(&self, port: u16) -> bool {
        self.src == port || self.dst == port
    }
}

/// Protocol-agnostic network packet with metadata.
///
/// Created by the traffic source, consumed exactly once by the enforcement
/// engine, then either dropped (blocked) or handed downstream unchanged.
#[derive(Clone, Debug)]
pub struct Packet {
    /// Unique identifier for audit correlation.
    pub id: u64,

    /// Network-layer source address.
    pub src: Ipv4Addr,

    /// Network-layer destination address.
    pub dst: Ipv4Addr,

    /// IANA transport/encapsulation protocol number.
    pub protocol: u8,

    /// Transport ports, present only when the protocol carries them (UDP).
    pub ports: Option<UdpPorts>,

    /// Immutable payload buffer using zero-copy semantics.
    pub payload: Bytes,
}

impl Packet {
    /// Creates a portless packet (ESP, AH, TCP without parsed transport, ...).
    pub fn new(id: u64, src: Ipv4Addr, dst: Ipv4Addr, protocol: u8, payload: Bytes) -> Self {
        Self {
            id,
            src,
            dst,
            protocol,
            ports: None,
            payload,
        }
    }

    /// Creates a UDP packet with the given port pair.
    pub fn udp(id: u64, src: Ipv4Addr, dst: Ipv4Addr, ports: UdpPorts, payload: Bytes) -> Self {
        Self {
            id,
            src,
            dst,
            protocol: proto::UDP,
            ports: Some(ports),
            payload,
        }
    }

    /// Payload size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// Source port, `0` when not applicable.
    #[inline]
    pub fn src_port(&self) -> u16 {
        self.ports.map_or(0, |p| p.src)
    }

    /// Destination port, `0` when not applicable.
    #[inline]
    pub fn dst_port(&self) -> u16 {
        self.ports.map_or(0, |p| p.dst)
    }
}
