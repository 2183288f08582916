//! Synthetic traffic source configuration.
//!
//! Parameters for the seeded packet generator used to exercise the
//! enforcement engine in simulation.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

/// Tunnel profile a generated VPN packet can take.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TunnelProfile {
    /// IPsec ESP (protocol 50).
    Esp,
    /// IPsec AH (protocol 51).
    Ah,
    /// IKE key exchange (UDP 500).
    Ike,
    /// IPsec NAT-traversal (UDP 4500).
    NatT,
    /// OpenVPN (UDP 1194).
    OpenVpn,
}

/// Traffic generation parameters.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct TrafficConfig {
    /// Payload length per packet in bytes.
    #[validate(range(min = 20, max = 65535))]
    #[serde(default = "default_packet_length")]
    pub packet_length: usize,

    /// Fraction of generated packets carrying a tunnel signature.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_vpn_ratio")]
    pub vpn_ratio: f64,

    /// Tunnel profiles to draw VPN packets from.
    #[validate(length(min = 1))]
    #[serde(default = "default_profiles")]
    pub profiles: Vec<TunnelProfile>,
}

fn default_packet_length() -> usize {
    512
}

fn default_vpn_ratio() -> f64 {
    0.3
}

fn default_profiles() -> Vec<TunnelProfile> {
    vec![
        TunnelProfile::Esp,
        TunnelProfile::Ah,
        TunnelProfile::Ike,
        TunnelProfile::NatT,
        TunnelProfile::OpenVpn,
    ]
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            packet_length: default_packet_length(),
            vpn_ratio: default_vpn_ratio(),
            profiles: default_profiles(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_traffic_validates() {
        TrafficConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_empty_profile_list() {
        let config = TrafficConfig {
            profiles: Vec::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
