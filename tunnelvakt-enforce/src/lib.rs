//! # Tunnelvakt Enforcement Engine
//!
//! Consumes one packet at a time, classifies it against the active policy,
//! applies the block/forward decision, and records an audit line plus counter
//! updates for every decision. Strictly sequential: the engine owns its
//! mutable state and processes each packet to completion before the next.

pub mod audit;
pub mod engine;
pub mod sink;

pub use audit::{AuditLog, AuditRecord};
pub use engine::{EnforcementEngine, EnforcementReport, EngineError};
pub use sink::{CountingSink, PacketSink};
