//! # Error Types
//!
//! All error types for the blacklist chaincode, from the ledger port up to
//! the contract operations.
//!
//! | Layer | Type | Raised by |
//! |-------|------|-----------|
//! | Ledger port | `LedgerError` | `Ledger` implementations |
//! | Repositories | `RepositoryError` | `Repository`, `query` |
//! | Contract | `ChaincodeError` | `ChaincodeService`, `dispatch` |

use crate::domain::invariants::InvariantViolation;
use crate::domain::keys::EntityKind;
use thiserror::Error;

// =============================================================================
// LEDGER ERRORS
// =============================================================================

/// Errors reported by the external state store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Internal lock was poisoned by a panicking writer.
    #[error("ledger lock poisoned")]
    LockPoisoned,

    /// The store refused a write or delete.
    #[error("write rejected for key '{key}': {reason}")]
    WriteRejected { key: String, reason: String },

    /// The rich-query selector could not be parsed.
    #[error("malformed query selector: {0}")]
    MalformedSelector(String),

    /// A rich-query cursor failed mid-iteration.
    #[error("query cursor failed: {0}")]
    QueryFailed(String),

    /// Other store error.
    #[error("ledger error: {0}")]
    Other(String),
}

// =============================================================================
// REPOSITORY ERRORS
// =============================================================================

/// Errors from entity repositories and rich-query collection.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// `get` found nothing under the key.
    #[error("no state stored under '{key}'")]
    Missing { key: String },

    /// The ledger failed while reading.
    #[error("failed to read '{key}': {source}")]
    StorageRead {
        key: String,
        #[source]
        source: LedgerError,
    },

    /// The ledger failed while writing or deleting.
    #[error("failed to write '{key}': {source}")]
    StorageWrite {
        key: String,
        #[source]
        source: LedgerError,
    },

    /// The entity could not be encoded or the stored bytes could not be decoded.
    #[error("{entity} serialization failed: {reason}")]
    Serialization { entity: &'static str, reason: String },
}

// =============================================================================
// CHAINCODE ERRORS
// =============================================================================

/// Errors surfaced by contract operations.
///
/// Caller faults (`InvalidArgument`, `NotFound`, `DuplicateKey`,
/// `InsufficientCredit`) are expected and recoverable by resubmitting with
/// corrected input. Everything else is an environment fault.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChaincodeError {
    /// Malformed or missing parameters.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Referenced entity is absent.
    #[error("{entity} '{id}' not found")]
    NotFound { entity: EntityKind, id: String },

    /// Attempted creation over an existing key.
    #[error("{entity} '{id}' already exists")]
    DuplicateKey { entity: EntityKind, id: String },

    /// Transfer source balance is too low.
    #[error("insufficient credit in '{account}': required {required}, available {available}")]
    InsufficientCredit {
        account: String,
        required: u64,
        available: u64,
    },

    /// Underlying ledger I/O failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// Encoding or decoding a document failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// `init` could not create the agency.
    #[error("initialization failed: {0}")]
    Initialization(String),

    /// A credit invariant would be broken by the pending writes.
    #[error("invariant violated: {0}")]
    InvariantViolated(InvariantViolation),
}

impl ChaincodeError {
    /// Returns true if the caller can fix this by changing its input.
    #[must_use]
    pub fn is_caller_fault(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument(_)
                | Self::NotFound { .. }
                | Self::DuplicateKey { .. }
                | Self::InsufficientCredit { .. }
        )
    }

    /// Stable machine-readable code, used as the response message prefix.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::DuplicateKey { .. } => "DUPLICATE_KEY",
            Self::InsufficientCredit { .. } => "INSUFFICIENT_CREDIT",
            Self::Storage(_) => "STORAGE",
            Self::Serialization(_) => "SERIALIZATION",
            Self::Initialization(_) => "INITIALIZATION",
            Self::InvariantViolated(_) => "INVARIANT_VIOLATED",
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl From<RepositoryError> for ChaincodeError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Serialization { .. } => Self::Serialization(err.to_string()),
            _ => Self::Storage(err.to_string()),
        }
    }
}

impl From<InvariantViolation> for ChaincodeError {
    fn from(violation: InvariantViolation) -> Self {
        Self::InvariantViolated(violation)
    }
}

// =============================================================================
// TESTS
// =============================================================================
