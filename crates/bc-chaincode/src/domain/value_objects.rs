//! # Value Objects
//!
//! Validated argument types. Construction fails with
//! `ChaincodeError::InvalidArgument` so that operations only ever see
//! well-formed input.

use crate::errors::ChaincodeError;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// CREDIT AMOUNT
// =============================================================================

/// A strictly positive credit amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CreditAmount(u64);

impl CreditAmount {
    /// Creates an amount, rejecting zero.
    pub fn new(value: u64) -> Result<Self, ChaincodeError> {
        if value == 0 {
            return Err(ChaincodeError::invalid("credit amount must be positive"));
        }
        Ok(Self(value))
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl FromStr for CreditAmount {
    type Err = ChaincodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| {
                ChaincodeError::invalid(format!("credit amount '{s}' is not an integer"))
            })?;
        if value <= 0 {
            return Err(ChaincodeError::invalid(format!(
                "credit amount must be positive, got {value}"
            )));
        }
        // Positive i64 always fits in u64.
        Self::new(value.unsigned_abs())
    }
}

impl fmt::Display for CreditAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// RECORD QUERY
// =============================================================================

/// Field a blacklist record query matches on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryMode {
    /// Match `clientId`.
    ByClientId,
    /// Match `clientName`.
    ByClientName,
}

impl QueryMode {
    /// Wire name of the mode.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ByClientId => "byClientId",
            Self::ByClientName => "byClientName",
        }
    }

    /// Document field matched by this mode.
    #[must_use]
    pub const fn field(self) -> &'static str {
        match self {
            Self::ByClientId => "clientId",
            Self::ByClientName => "clientName",
        }
    }
}

impl FromStr for QueryMode {
    type Err = ChaincodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "byClientId" => Ok(Self::ByClientId),
            "byClientName" => Ok(Self::ByClientName),
            other => Err(ChaincodeError::invalid(format!(
                "unknown query mode '{other}', expected byClientId or byClientName"
            ))),
        }
    }
}

/// A validated blacklist record query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordQuery {
    /// Field to match.
    pub mode: QueryMode,
    /// Exact value to match.
    pub value: String,
}

impl RecordQuery {
    /// Creates a query, rejecting an empty value.
    pub fn new(mode: QueryMode, value: impl Into<String>) -> Result<Self, ChaincodeError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ChaincodeError::invalid(format!(
                "{} query value must not be empty",
                mode.name()
            )));
        }
        Ok(Self { mode, value })
    }
}

// =============================================================================
// RECORD SUBMISSION
// =============================================================================

/// Arguments of `submitRecord`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordSubmission {
    /// Submitting organization.
    pub org_id: String,
    /// New record id.
    pub record_id: String,
    /// Client the record is about.
    pub client_id: String,
    /// Client display name.
    pub client_name: String,
    /// Category code of the negative event.
    pub negative_type: i64,
    /// Severity code of the negative event.
    pub negative_severity: i64,
    /// Free-form description.
    pub negative_info: String,
}

/// Parses an integer code argument such as `negativeType`.
pub fn parse_code(field: &str, raw: &str) -> Result<i64, ChaincodeError> {
    raw.trim()
        .parse()
        .map_err(|_| ChaincodeError::invalid(format!("{field} '{raw}' is not an integer")))
}

/// Rejects empty identifier arguments.
pub fn require_non_empty(field: &str, value: &str) -> Result<(), ChaincodeError> {
    if value.is_empty() {
        return Err(ChaincodeError::invalid(format!("{field} must not be empty")));
    }
    Ok(())
}
