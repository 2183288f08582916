//! Enforcement policy configuration.
//!
//! The static rule toggles the classifier consults and the audit log location.
//! Read-only after load; runtime reconfiguration means constructing a fresh
//! engine with a new config between packets.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Enforcement policy parameters.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct EnforcementConfig {
    /// Block IPsec traffic (ESP/AH protocols and IKE/NAT-T ports).
    #[serde(default = "default_true")]
    pub block_ipsec: bool,

    /// Block OpenVPN-style traffic (UDP 1194).
    #[serde(default = "default_true")]
    pub block_openvpn: bool,

    /// Block other tunnel protocols. Reserved: no rule consumes this yet,
    /// the knob is loaded and validated so existing deployments keep working
    /// when a ruleset update starts honoring it.
    #[serde(default)]
    pub block_other_tunnels: bool,

    /// Confidence threshold for a future scoring ruleset. The current ruleset
    /// is binary and does not consume it; out-of-range values are still a hard
    /// load failure so policy files stay well-defined.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_threshold")]
    pub detection_threshold: f64,

    /// Audit log destination (CSV).
    #[validate(custom(function = validation::validate_audit_path))]
    #[serde(default = "default_audit_log")]
    pub audit_log: PathBuf,
}

fn default_true() -> bool {
    true
}

fn default_threshold() -> f64 {
    0.5
}

fn default_audit_log() -> PathBuf {
    "vpn_detection_log.csv".into()
}

impl Default for EnforcementConfig {
    fn default() -> Self {
        Self {
            block_ipsec: true,
            block_openvpn: true,
            block_other_tunnels: false,
            detection_threshold: default_threshold(),
            audit_log: default_audit_log(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_validates() {
        EnforcementConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let config = EnforcementConfig {
            detection_threshold: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_audit_path() {
        let config = EnforcementConfig {
            audit_log: PathBuf::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
