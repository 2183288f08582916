//! # tunnelvakt-core
//!
//! Foundation layer for the tunnelvakt enforcement pipeline: the packet model
//! shared by every component, the protocol/port constants the classifier keys
//! on, and the deterministic virtual clock that supplies logical timestamps.
//!
//! ### Key Submodules:
//! - `packet`: Immutable network packet with optional transport ports
//! - `proto`: IANA protocol numbers and well-known tunnel ports
//! - `time`: `VirtualClock` using atomic counters

pub mod packet;
pub mod proto;
pub mod time;

pub use packet::{Packet, UdpPorts};
pub use time::VirtualClock;
