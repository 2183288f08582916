//! Simulation driver.
//!
//! Re-expresses the host environment's callback-based delivery as an explicit
//! sequential loop: advance the virtual clock by the inter-arrival interval,
//! generate the next packet, hand it to the engine, fold the decision into the
//! state hash. The engine never sees two packets in flight.

use blake3::Hasher;
use thiserror::Error;
use tracing::info;

use tunnelvakt_config::TunnelvaktConfig;
use tunnelvakt_core::VirtualClock;
use tunnelvakt_enforce::{CountingSink, EnforcementEngine, EnforcementReport, EngineError};

use crate::traffic::TrafficSource;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("Engine initialization failed: {0}")]
    Engine(#[from] EngineError),
}

/// Result of one simulation run.
#[derive(Clone, Debug)]
pub struct SimulationOutcome {
    pub report: EnforcementReport,
    /// Hex BLAKE3 over every (packet id, protocol, decision) triple, in order.
    /// Identical seeds and configs produce identical hashes.
    pub state_hash: String,
}

/// One configured simulation run over a fresh engine.
pub struct Simulation {
    clock: VirtualClock,
    source: TrafficSource,
    engine: EnforcementEngine<CountingSink>,
    packet_count: usize,
    interval_ns: u64,
    state_hasher: Hasher,
}

impl Simulation {
    /// Builds a simulation writing the audit trail to the configured path.
    pub fn new(config: &TunnelvaktConfig) -> Result<Self, SimulationError> {
        let clock = VirtualClock::new(0);
        let engine = EnforcementEngine::new(
            config.enforcement.clone(),
            clock.clone(),
            CountingSink::default(),
        )?;
        Ok(Self::assemble(config, clock, engine))
    }

    /// Builds a simulation with the audit trail discarded; used by tests that
    /// only care about decisions and counters.
    pub fn in_memory(config: &TunnelvaktConfig) -> Result<Self, SimulationError> {
        let clock = VirtualClock::new(0);
        let engine = EnforcementEngine::with_audit_writer(
            config.enforcement.clone(),
            clock.clone(),
            CountingSink::default(),
            std::io::sink(),
        )?;
        Ok(Self::assemble(config, clock, engine))
    }

    fn assemble(
        config: &TunnelvaktConfig,
        clock: VirtualClock,
        engine: EnforcementEngine<CountingSink>,
    ) -> Self {
        Self {
            clock,
            source: TrafficSource::new(config.traffic.clone(), config.simulator.seed),
            engine,
            packet_count: config.simulator.packet_count,
            interval_ns: config.simulator.interval_ns,
            state_hasher: Hasher::new(),
        }
    }

    /// Runs the configured number of packets through the engine and stops it.
    pub fn run(mut self) -> SimulationOutcome {
        info!(
            packets = self.packet_count,
            interval_ns = self.interval_ns,
            "simulation starting"
        );

        for _ in 0..self.packet_count {
            self.clock.advance(self.interval_ns);
            let packet = self.source.next_packet();

            let blocked_before = self.engine.blocked();
            let (id, protocol) = (packet.id, packet.protocol);
            self.engine.handle(packet);
            let was_blocked = self.engine.blocked() > blocked_before;

            self.state_hasher.update(&id.to_le_bytes());
            self.state_hasher.update(&[protocol, was_blocked as u8]);
        }

        let report = self.engine.finish();
        let state_hash = hex::encode(self.state_hasher.finalize().as_bytes());
        info!(%report, state_hash = %state_hash, "simulation complete");

        SimulationOutcome { report, state_hash }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tunnelvakt_config::{EnforcementConfig, SimulatorConfig, TrafficConfig};

    fn config(vpn_ratio: f64, packet_count: usize, seed: u64) -> TunnelvaktConfig {
        TunnelvaktConfig {
            enforcement: EnforcementConfig::default(),
            traffic: TrafficConfig {
                vpn_ratio,
                ..Default::default()
            },
            simulator: SimulatorConfig {
                seed,
                packet_count,
                ..Default::default()
            },
        }
    }

    #[test]
    fn counters_balance_after_a_run() {
        let outcome = Simulation::in_memory(&config(0.3, 200, 42)).unwrap().run();
        let r = outcome.report;
        assert_eq!(r.received, 200);
        assert_eq!(r.received, r.blocked + r.forwarded);
    }

    #[test]
    fn same_seed_reproduces_hash_and_report() {
        let a = Simulation::in_memory(&config(0.5, 100, 7)).unwrap().run();
        let b = Simulation::in_memory(&config(0.5, 100, 7)).unwrap().run();
        assert_eq!(a.state_hash, b.state_hash);
        assert_eq!(a.report, b.report);
    }

    #[test]
    fn different_seeds_diverge() {
        let a = Simulation::in_memory(&config(0.5, 100, 1)).unwrap().run();
        let b = Simulation::in_memory(&config(0.5, 100, 2)).unwrap().run();
        assert_ne!(a.state_hash, b.state_hash);
    }

    #[test]
    fn all_tunnel_traffic_is_blocked() {
        let outcome = Simulation::in_memory(&config(1.0, 150, 9)).unwrap().run();
        assert_eq!(outcome.report.blocked, 150);
        assert_eq!(outcome.report.forwarded, 0);
        assert!((outcome.report.block_rate - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn plain_traffic_is_never_blocked() {
        let outcome = Simulation::in_memory(&config(0.0, 150, 9)).unwrap().run();
        assert_eq!(outcome.report.blocked, 0);
        assert_eq!(outcome.report.block_rate, 0.0);
    }

    #[test]
    fn disabled_rules_forward_everything() {
        let mut cfg = config(1.0, 80, 5);
        cfg.enforcement.block_ipsec = false;
        cfg.enforcement.block_openvpn = false;
        let outcome = Simulation::in_memory(&cfg).unwrap().run();
        assert_eq!(outcome.report.blocked, 0);
        assert_eq!(outcome.report.forwarded, 80);
    }
}
