//! # Domain Layer (Inner Hexagon)
//!
//! Entity model, key codec, validated arguments and credit invariants.
//! NO I/O, NO ledger access.

pub mod entities;
pub mod invariants;
pub mod keys;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use invariants::*;
pub use keys::*;
pub use services::*;
pub use value_objects::*;
