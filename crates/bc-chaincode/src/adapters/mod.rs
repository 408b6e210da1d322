//! # Adapters
//!
//! - `memory_ledger`: in-memory [`Ledger`](crate::ports::outbound::Ledger)
//!   with proposal write sets
//! - `host`: proposal-per-invocation runner over the in-memory ledger

pub mod host;
pub mod memory_ledger;

pub use host::{ChaincodeHost, HostStats};
pub use memory_ledger::InMemoryLedger;
