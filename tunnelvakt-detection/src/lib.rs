//! # Tunnelvakt Detection Engine
//!
//! Rule-based recognition of VPN-tunnel signatures from transport-layer
//! metadata. Classification is a pure function of one packet and the active
//! policy; it owns no state and performs no I/O.

pub mod rules;

pub use rules::{classify, Rule, Verdict};
