//! Append-only CSV audit trail.
//!
//! One header line at open, then exactly one line per processed packet in
//! processing order. Flushed after every record: the audit trail is a
//! diagnostic/enforcement log, crash-safety of written decisions matters more
//! than throughput.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::net::Ipv4Addr;
use std::path::Path;

use tunnelvakt_core::Packet;

const HEADER: &str =
    "timestamp,packet_id,src_ip,dst_ip,protocol,src_port,dst_port,packet_size,vpn_detected,blocked\n";

/// One enforcement decision, ready for serialization.
///
/// `vpn_detected` and `blocked` are currently always equal because blocking is
/// unconditional on detection; the record keeps them separate so a
/// logging-only threshold policy can diverge them without a schema change.
#[derive(Clone, Debug, PartialEq)]
pub struct AuditRecord {
    pub timestamp: f64,
    pub packet_id: u64,
    pub src: Ipv4Addr,
    pub dst: Ipv4Addr,
    pub protocol: u8,
    pub src_port: u16,
    pub dst_port: u16,
    pub packet_size: usize,
    pub vpn_detected: bool,
    pub blocked: bool,
}

impl AuditRecord {
    /// Builds the record for one packet decision at the given logical time.
    pub fn for_packet(timestamp: f64, packet: &Packet, blocked: bool) -> Self {
        Self {
            timestamp,
            packet_id: packet.id,
            src: packet.src,
            dst: packet.dst,
            protocol: packet.protocol,
            src_port: packet.src_port(),
            dst_port: packet.dst_port(),
            packet_size: packet.len(),
            vpn_detected: blocked,
            blocked,
        }
    }

    fn csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{}\n",
            self.timestamp,
            self.packet_id,
            self.src,
            self.dst,
            self.protocol,
            self.src_port,
            self.dst_port,
            self.packet_size,
            yes_no(self.vpn_detected),
            yes_no(self.blocked),
        )
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Append-only audit log over any writer.
pub struct AuditLog {
    writer: Box<dyn Write + Send>,
}

impl AuditLog {
    /// Creates (truncating) the audit file at `path` and writes the header.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::create(path)?;
        Self::from_writer(BufWriter::new(file))
    }

    /// Wraps an arbitrary writer; used by tests and in-memory simulation.
    pub fn from_writer<W: Write + Send + 'static>(mut writer: W) -> io::Result<Self> {
        writer.write_all(HEADER.as_bytes())?;
        writer.flush()?;
        Ok(Self {
            writer: Box::new(writer),
        })
    }

    /// Appends one record and flushes it to stable storage.
    pub fn append(&mut self, record: &AuditRecord) -> io::Result<()> {
        self.writer.write_all(record.csv_line().as_bytes())?;
        self.writer.flush()
    }

    /// Final flush at shutdown.
    pub fn close(mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
