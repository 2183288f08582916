/*!
# Tunnelvakt Simulator

Deterministic discrete-event harness for the enforcement engine. A seeded
traffic source emits a configured mix of tunnel and plain packets, the driver
advances a virtual clock between arrivals and delivers each packet to the
engine sequentially, and every decision is folded into a BLAKE3 state hash so
two runs with the same seed can be compared byte-for-byte.

## Key Components:
- **Traffic Source:** Seeded `SmallRng` packet generator over tunnel profiles.
- **Driver:** Virtual-clock advance + sequential delivery + state hashing.
*/

pub mod driver;
pub mod traffic;

pub use driver::{Simulation, SimulationError, SimulationOutcome};
pub use traffic::TrafficSource;
