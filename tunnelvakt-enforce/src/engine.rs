//! Enforcement engine: classification dispatch, counters, audit.
//!
//! Single logical thread of control. The engine owns every piece of mutable
//! state (counters, audit log, sink), so `handle` takes `&mut self` and no
//! locking exists anywhere on the packet path. Shutdown is the consuming
//! `finish`, which makes "handle after stop" unrepresentable.

use std::io::Write;

use thiserror::Error;
use tracing::{debug, info, warn};

use tunnelvakt_config::EnforcementConfig;
use tunnelvakt_core::{Packet, VirtualClock};
use tunnelvakt_detection::classify;
use tunnelvakt_telemetry::MetricsRecorder;

use crate::audit::{AuditLog, AuditRecord};
use crate::sink::PacketSink;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Audit log creation failed. Write failures after construction are
    /// swallowed; only startup refuses to proceed without a log.
    #[error("Failed to open audit log: {0}")]
    Io(#[from] std::io::Error),
}

/// Final totals reported at the Running→Stopped transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnforcementReport {
    pub received: u64,
    pub blocked: u64,
    pub forwarded: u64,
    pub block_rate: f64,
}

impl std::fmt::Display for EnforcementReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "received={} blocked={} forwarded={} block_rate={:.1}%",
            self.received, self.blocked, self.forwarded, self.block_rate
        )
    }
}

/// Sequential block/forward engine over a downstream sink.
pub struct EnforcementEngine<S: PacketSink> {
    policy: EnforcementConfig,
    clock: VirtualClock,
    audit: AuditLog,
    metrics: MetricsRecorder,
    sink: S,
    received: u64,
    blocked: u64,
    forwarded: u64,
}

impl<S: PacketSink> EnforcementEngine<S> {
    /// Creates an engine writing its audit trail to `policy.audit_log`.
    ///
    /// The policy is immutable for the engine's lifetime; reconfiguration
    /// means constructing a fresh engine between packets.
    pub fn new(policy: EnforcementConfig, clock: VirtualClock, sink: S) -> Result<Self, EngineError> {
        let audit = AuditLog::create(&policy.audit_log)?;
        Ok(Self::with_audit(policy, clock, sink, audit))
    }

    /// Creates an engine over an arbitrary audit writer (tests, in-memory runs).
    pub fn with_audit_writer<W: Write + Send + 'static>(
        policy: EnforcementConfig,
        clock: VirtualClock,
        sink: S,
        writer: W,
    ) -> Result<Self, EngineError> {
        let audit = AuditLog::from_writer(writer)?;
        Ok(Self::with_audit(policy, clock, sink, audit))
    }

    fn with_audit(policy: EnforcementConfig, clock: VirtualClock, sink: S, audit: AuditLog) -> Self {
        info!(
            block_ipsec = policy.block_ipsec,
            block_openvpn = policy.block_openvpn,
            "enforcement engine initialized"
        );
        Self {
            policy,
            clock,
            audit,
            metrics: MetricsRecorder::new(),
            sink,
            received: 0,
            blocked: 0,
            forwarded: 0,
        }
    }

    /// Processes one inbound packet to completion.
    pub fn handle(&mut self, packet: Packet) {
        // Counted before classification: every delivered packet is received.
        self.received += 1;
        self.metrics.packets_received.inc();

        let verdict = classify(&packet, &self.policy);
        let record = AuditRecord::for_packet(self.clock.now_secs(), &packet, verdict.is_vpn);

        if verdict.is_vpn {
            self.blocked += 1;
            self.metrics.packets_blocked.inc();
            self.append_audit(&record);
            if let Some(rule) = verdict.rule {
                info!(
                    packet_id = packet.id,
                    rule = rule.name(),
                    "VPN traffic detected, packet blocked"
                );
            }
            // Blocked packets are dropped here and never reach the sink.
        } else {
            self.forwarded += 1;
            self.metrics.packets_forwarded.inc();
            self.append_audit(&record);
            debug!(packet_id = packet.id, "forwarding packet");
            self.sink.deliver(packet);
        }
    }

    /// The decision is committed before the write is attempted; audit failure
    /// must never change enforcement semantics.
    fn append_audit(&mut self, record: &AuditRecord) {
        if let Err(e) = self.audit.append(record) {
            warn!(packet_id = record.packet_id, error = %e, "audit append failed");
        }
    }

    pub fn received(&self) -> u64 {
        self.received
    }

    pub fn blocked(&self) -> u64 {
        self.blocked
    }

    pub fn forwarded(&self) -> u64 {
        self.forwarded
    }

    /// Blocked share of received packets, in percent. 0.0 before any traffic.
    pub fn block_rate(&self) -> f64 {
        if self.received == 0 {
            0.0
        } else {
            self.blocked as f64 / self.received as f64 * 100.0
        }
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Running→Stopped: flushes and closes the audit log, freezes the counters,
    /// and reports the final totals.
    pub fn finish(self) -> EnforcementReport {
        let report = EnforcementReport {
            received: self.received,
            blocked: self.blocked,
            forwarded: self.forwarded,
            block_rate: self.block_rate(),
        };
        self.metrics.block_rate.set(report.block_rate);

        if let Err(e) = self.audit.close() {
            warn!(error = %e, "audit log close failed");
        }
        info!(%report, "enforcement engine stopped");
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::io;
    use std::net::Ipv4Addr;
    use std::sync::{Arc, Mutex};
    use tunnelvakt_core::{proto, UdpPorts};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Writer that fails every write after the header, to prove audit
    /// failures never change enforcement semantics.
    struct FailingWriter {
        writes: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes += 1;
            if self.writes > 1 {
                Err(io::Error::new(io::ErrorKind::Other, "disk full"))
            } else {
                Ok(buf.len())
            }
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn engine(policy: EnforcementConfig) -> EnforcementEngine<Vec<Packet>> {
        EnforcementEngine::with_audit_writer(policy, VirtualClock::new(0), Vec::new(), Vec::new())
            .unwrap()
    }

    fn esp_packet(id: u64) -> Packet {
        Packet::new(
            id,
            Ipv4Addr::new(192, 168, 1, 10),
            Ipv4Addr::new(10, 0, 0, 1),
            proto::ESP,
            Bytes::from(vec![0u8; 256]),
        )
    }

    fn udp_packet(id: u64, dst_port: u16) -> Packet {
        Packet::udp(
            id,
            Ipv4Addr::new(192, 168, 1, 10),
            Ipv4Addr::new(10, 0, 0, 1),
            UdpPorts {
                src: 33000,
                dst: dst_port,
            },
            Bytes::from(vec![0u8; 256]),
        )
    }

    fn tcp_packet(id: u64) -> Packet {
        Packet::new(
            id,
            Ipv4Addr::new(192, 168, 1, 10),
            Ipv4Addr::new(10, 0, 0, 1),
            proto::TCP,
            Bytes::from(vec![0u8; 256]),
        )
    }

    #[test]
    fn esp_is_blocked_and_counted() {
        let mut engine = engine(EnforcementConfig::default());
        engine.handle(esp_packet(1));
        assert_eq!(engine.received(), 1);
        assert_eq!(engine.blocked(), 1);
        assert_eq!(engine.forwarded(), 0);
        assert!(engine.sink().is_empty());
    }

    #[test]
    fn nat_t_is_blocked() {
        let mut engine = engine(EnforcementConfig::default());
        engine.handle(udp_packet(1, 4500));
        assert_eq!(engine.blocked(), 1);
        assert!(engine.sink().is_empty());
    }

    #[test]
    fn openvpn_blocked_with_ipsec_disabled() {
        let policy = EnforcementConfig {
            block_ipsec: false,
            block_openvpn: true,
            ..Default::default()
        };
        let mut engine = engine(policy);
        engine.handle(udp_packet(1, 1194));
        assert_eq!(engine.blocked(), 1);
    }

    #[test]
    fn tcp_is_forwarded_unchanged() {
        let mut engine = engine(EnforcementConfig::default());
        engine.handle(tcp_packet(9));
        assert_eq!(engine.forwarded(), 1);
        assert_eq!(engine.block_rate(), 0.0);
        let forwarded = engine.sink();
        assert_eq!(forwarded.len(), 1);
        assert_eq!(forwarded[0].id, 9);
        assert_eq!(forwarded[0].len(), 256);
    }

    #[test]
    fn counters_always_balance() {
        let mut engine = engine(EnforcementConfig::default());
        for id in 0..20 {
            if id % 3 == 0 {
                engine.handle(esp_packet(id));
            } else {
                engine.handle(tcp_packet(id));
            }
            assert_eq!(engine.received(), engine.blocked() + engine.forwarded());
        }
        assert_eq!(engine.received(), 20);
    }

    #[test]
    fn ten_packets_three_ipsec_yield_thirty_percent() {
        let mut engine = engine(EnforcementConfig::default());
        for id in 0..3 {
            engine.handle(esp_packet(id));
        }
        for id in 3..10 {
            engine.handle(tcp_packet(id));
        }
        let report = engine.finish();
        assert_eq!(report.received, 10);
        assert_eq!(report.blocked, 3);
        assert_eq!(report.forwarded, 7);
        assert!((report.block_rate - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_engine_reports_zero_rate() {
        let engine = engine(EnforcementConfig::default());
        let report = engine.finish();
        assert_eq!(report.received, 0);
        assert_eq!(report.block_rate, 0.0);
    }

    #[test]
    fn audit_records_one_line_per_packet() {
        let buf = SharedBuf::default();
        let clock = VirtualClock::new(2_000_000_000); // 2s logical time
        let mut engine = EnforcementEngine::with_audit_writer(
            EnforcementConfig::default(),
            clock,
            Vec::new(),
            buf.clone(),
        )
        .unwrap();

        engine.handle(esp_packet(1));
        engine.handle(tcp_packet(2));
        engine.finish();

        let contents = buf.contents();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3); // header + 2 records
        assert_eq!(
            lines[0],
            "timestamp,packet_id,src_ip,dst_ip,protocol,src_port,dst_port,packet_size,vpn_detected,blocked"
        );
        assert_eq!(lines[1], "2,1,192.168.1.10,10.0.0.1,50,0,0,256,yes,yes");
        assert_eq!(lines[2], "2,2,192.168.1.10,10.0.0.1,6,0,0,256,no,no");
    }

    #[test]
    fn audit_failure_does_not_change_enforcement() {
        let mut engine = EnforcementEngine::with_audit_writer(
            EnforcementConfig::default(),
            VirtualClock::new(0),
            Vec::new(),
            FailingWriter { writes: 0 },
        )
        .unwrap();

        engine.handle(esp_packet(1));
        engine.handle(tcp_packet(2));
        assert_eq!(engine.blocked(), 1);
        assert_eq!(engine.forwarded(), 1);
        assert_eq!(engine.sink().len(), 1);
    }

    #[test]
    fn metrics_mirror_engine_counters() {
        let mut engine = engine(EnforcementConfig::default());
        engine.handle(esp_packet(1));
        engine.handle(tcp_packet(2));
        assert_eq!(engine.metrics().packets_received.get(), 2);
        assert_eq!(engine.metrics().packets_blocked.get(), 1);
        assert_eq!(engine.metrics().packets_forwarded.get(), 1);
    }
}
