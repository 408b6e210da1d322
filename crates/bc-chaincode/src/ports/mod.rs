//! # Ports Layer (Middle Hexagon)
//!
//! - **Driving Port (Inbound)**: `BlacklistApi`
//! - **Driven Port (Outbound)**: `Ledger`, `StateQueryIterator`
//!
//! No concrete implementations in this module.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
