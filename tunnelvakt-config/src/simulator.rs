//! Simulation driver configuration.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Simulation driver parameters.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct SimulatorConfig {
    /// Seed for the synthetic traffic generator. The virtual clock always
    /// starts at zero; only the packet stream is seed-dependent.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Number of packets to push through the engine.
    #[validate(range(min = 1, max = 10_000_000))]
    #[serde(default = "default_packet_count")]
    pub packet_count: usize,

    /// Inter-arrival interval between packets in nanoseconds.
    #[validate(custom(function = validation::validate_interval))]
    #[serde(default = "default_interval_ns")]
    pub interval_ns: u64,
}

fn default_seed() -> u64 {
    42
}

fn default_packet_count() -> usize {
    100
}

fn default_interval_ns() -> u64 {
    10_000_000 // 10ms
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            packet_count: default_packet_count(),
            interval_ns: default_interval_ns(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_interval() {
        let config = SimulatorConfig {
            interval_ns: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
