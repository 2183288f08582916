//! Synthetic traffic source.
//!
//! Generates the packet mix the enforcement engine is exercised with: a
//! configured share of tunnel-signature packets drawn from the enabled
//! profiles, the rest plain UDP/TCP. Fully deterministic for a fixed seed.

use std::net::Ipv4Addr;

use bytes::Bytes;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use tunnelvakt_config::{TrafficConfig, TunnelProfile};
use tunnelvakt_core::{proto, Packet, UdpPorts};

// Ephemeral range for generated flows; starts above every well-known tunnel
// port so plain traffic can never collide with a rule.
const EPHEMERAL_LOW: u16 = 10_000;
const EPHEMERAL_HIGH: u16 = 60_000;

// Benign destination ports for plain UDP traffic.
const PLAIN_UDP_PORTS: [u16; 3] = [53, 123, 8125];

/// Seeded packet generator.
pub struct TrafficSource {
    config: TrafficConfig,
    rng: SmallRng,
    next_id: u64,
}

impl TrafficSource {
    /// Creates a source over `config`. Validated configs never carry an
    /// out-of-range `vpn_ratio` or an empty profile list, but the constructor
    /// accepts any `TrafficConfig`: the ratio is clamped to [0, 1] (NaN
    /// counts as 0) and an empty profile list degrades to plain traffic.
    pub fn new(mut config: TrafficConfig, seed: u64) -> Self {
        config.vpn_ratio = if config.vpn_ratio.is_nan() {
            0.0
        } else {
            config.vpn_ratio.clamp(0.0, 1.0)
        };
        Self {
            config,
            rng: SmallRng::seed_from_u64(seed),
            next_id: 0,
        }
    }

    /// Produces the next packet in the stream.
    pub fn next_packet(&mut self) -> Packet {
        let id = self.next_id;
        self.next_id += 1;

        let src = Ipv4Addr::new(192, 168, 1, self.rng.random_range(2..250));
        let dst = Ipv4Addr::new(10, 0, 0, self.rng.random_range(2..250));
        let payload = Bytes::from(vec![0u8; self.config.packet_length]);

        if !self.config.profiles.is_empty() && self.rng.random_bool(self.config.vpn_ratio) {
            let profile = self.config.profiles[self.rng.random_range(0..self.config.profiles.len())];
            self.tunnel_packet(id, src, dst, profile, payload)
        } else {
            self.plain_packet(id, src, dst, payload)
        }
    }

    fn tunnel_packet(
        &mut self,
        id: u64,
        src: Ipv4Addr,
        dst: Ipv4Addr,
        profile: TunnelProfile,
        payload: Bytes,
    ) -> Packet {
        let ephemeral = self.rng.random_range(EPHEMERAL_LOW..EPHEMERAL_HIGH);
        match profile {
            TunnelProfile::Esp => Packet::new(id, src, dst, proto::ESP, payload),
            TunnelProfile::Ah => Packet::new(id, src, dst, proto::AH, payload),
            TunnelProfile::Ike => Packet::udp(
                id,
                src,
                dst,
                UdpPorts {
                    src: ephemeral,
                    dst: proto::PORT_IKE,
                },
                payload,
            ),
            TunnelProfile::NatT => Packet::udp(
                id,
                src,
                dst,
                UdpPorts {
                    src: ephemeral,
                    dst: proto::PORT_NAT_T,
                },
                payload,
            ),
            TunnelProfile::OpenVpn => Packet::udp(
                id,
                src,
                dst,
                UdpPorts {
                    src: ephemeral,
                    dst: proto::PORT_OPENVPN,
                },
                payload,
            ),
        }
    }

    fn plain_packet(&mut self, id: u64, src: Ipv4Addr, dst: Ipv4Addr, payload: Bytes) -> Packet {
        if self.rng.random_bool(0.5) {
            let dst_port = PLAIN_UDP_PORTS[self.rng.random_range(0..PLAIN_UDP_PORTS.len())];
            Packet::udp(
                id,
                src,
                dst,
                UdpPorts {
                    src: self.rng.random_range(EPHEMERAL_LOW..EPHEMERAL_HIGH),
                    dst: dst_port,
                },
                payload,
            )
        } else {
            Packet::new(id, src, dst, proto::TCP, payload)
        }
    }
}
