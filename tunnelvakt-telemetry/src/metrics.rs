//! Prometheus metrics for the enforcement engine.
//!
//! Three monotonic counters mirroring the engine-owned totals plus a derived
//! block-rate gauge. The registry is engine-local: no process-wide default
//! registry, so two engines never share counters.

use prometheus::{Gauge, IntCounter, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub packets_received: IntCounter,
    pub packets_blocked: IntCounter,
    pub packets_forwarded: IntCounter,
    pub block_rate: Gauge,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        let registry = Registry::new();
        let packets_received =
            IntCounter::new("tunnelvakt_packets_received_total", "Packets handled").unwrap();
        let packets_blocked =
            IntCounter::new("tunnelvakt_packets_blocked_total", "Packets blocked as VPN").unwrap();
        let packets_forwarded = IntCounter::new(
            "tunnelvakt_packets_forwarded_total",
            "Packets forwarded downstream",
        )
        .unwrap();
        let block_rate = Gauge::new(
            "tunnelvakt_block_rate_percent",
            "Blocked share of received packets",
        )
        .unwrap();

        registry.register(Box::new(packets_received.clone())).unwrap();
        registry.register(Box::new(packets_blocked.clone())).unwrap();
        registry
            .register(Box::new(packets_forwarded.clone()))
            .unwrap();
        registry.register(Box::new(block_rate.clone())).unwrap();

        Self {
            registry,
            packets_received,
            packets_blocked,
            packets_forwarded,
            block_rate,
        }
    }

    /// Renders the registry in the Prometheus text exposition format.
    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let metrics = MetricsRecorder::new();
        assert_eq!(metrics.packets_received.get(), 0);
        assert_eq!(metrics.packets_blocked.get(), 0);
        assert_eq!(metrics.packets_forwarded.get(), 0);
    }

    #[test]
    fn gather_includes_all_series() {
        let metrics = MetricsRecorder::new();
        metrics.packets_received.inc();
        let text = metrics.gather_metrics().unwrap();
        assert!(text.contains("tunnelvakt_packets_received_total 1"));
        assert!(text.contains("tunnelvakt_block_rate_percent"));
    }
}
