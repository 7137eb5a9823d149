//! Simulation driver and its inputs.
//!
//! Provides the memory trace reader, the demand address history that feeds
//! prefetch policies, and the simulator that replays addresses through the
//! cache hierarchy.

/// Compacting buffer of demand addresses.
pub mod history;

/// Replay driver.
pub mod simulator;

/// Memory trace parsing and read chunking.
pub mod trace;

pub use self::history::AddressHistory;
pub use self::simulator::Simulator;
pub use self::trace::{ReadRecord, TraceReader};
