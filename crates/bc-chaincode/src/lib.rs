//! # bc-chaincode
//!
//! Blacklist registry chaincode: a shared ledger of negative client records
//! submitted by member organizations, plus a credit token the agency mints
//! and transfers to members.
//!
//! ## Role in System
//!
//! - **Contract**: the only writer of `Agency`, `Org:*`, `BlackRecord:*`
//!   and `Transaction:*` state
//! - **Dispatcher**: routes `invoke` calls by action name with fixed arity
//! - **Host**: runs each invocation as one proposal over an in-memory ledger
//!
//! ## Invocation Flow
//!
//! ```text
//! (function, args) ──→ [Invocation::parse] ──→ [ChaincodeService]
//!                                                    │
//!                              ┌─────────────────────┼──────────────┐
//!                              ↓                     ↓              ↓
//!                        [Repository<E>]    [collect_json_array]  invariants
//!                              │                     │
//!                              └────────→ [Ledger] ←─┘
//! ```
//!
//! ## Credit Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | agency `credit <= issueCredit` | `ensure_agency_supply` after every mutation |
//! | transfers conserve the pair total | `ensure_transfer_conserved` before writing |
//! | no negative balances | `Account::debit` rejects overdrafts |
//! | ledger total == `issueCredit` | `check_ledger_conservation_invariant` |

#![warn(clippy::all)]

pub mod adapters;
pub mod codec;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod query;
pub mod repository;
pub mod response;
pub mod service;

pub use adapters::{ChaincodeHost, HostStats, InMemoryLedger};
pub use config::{ChaincodeConfig, ConfigError};
pub use dispatch::{Action, Invocation, INVOKE_FUNCTION};
pub use errors::{ChaincodeError, LedgerError, RepositoryError};
pub use ports::{BlacklistApi, Ledger};
pub use response::Response;
pub use service::ChaincodeService;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name the chaincode is installed under.
pub const CHAINCODE_NAME: &str = "blacklist";

/// Common imports for hosts and tests.
pub mod prelude {
    pub use crate::adapters::{ChaincodeHost, InMemoryLedger};
    pub use crate::config::ChaincodeConfig;
    pub use crate::dispatch::{Action, Invocation};
    pub use crate::domain::entities::{Account, Agency, BlackRecord, Org, Transaction};
    pub use crate::domain::value_objects::{CreditAmount, QueryMode, RecordQuery};
    pub use crate::errors::ChaincodeError;
    pub use crate::ports::{BlacklistApi, Ledger};
    pub use crate::response::Response;
    pub use crate::service::ChaincodeService;
}
