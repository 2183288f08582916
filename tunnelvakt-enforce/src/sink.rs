//! Downstream hand-off for forwarded packets.

use tunnelvakt_core::Packet;

/// Receives forwarded packets unchanged, one at a time.
///
/// The engine makes no assumption about whether delivery is synchronous or
/// buffered; implementors may queue, transmit, or discard.
pub trait PacketSink {
    fn deliver(&mut self, packet: Packet);
}

/// Sink that only tallies what passed through. Default downstream in
/// simulation, where forwarded traffic has nowhere further to go.
#[derive(Debug, Default)]
pub struct CountingSink {
    pub delivered: u64,
    pub bytes: u64,
}

impl PacketSink for CountingSink {
    fn deliver(&mut self, packet: Packet) {
        self.delivered += 1;
        self.bytes += packet.len() as u64;
    }
}

/// Collecting sink for tests that assert on the forwarded packets themselves.
impl PacketSink for Vec<Packet> {
    fn deliver(&mut self, packet: Packet) {
        self.push(packet);
    }
}
