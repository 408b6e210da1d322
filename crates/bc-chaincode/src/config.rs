//! # Chaincode Configuration
//!
//! Values injected into [`crate::service::ChaincodeService`] at construction.
//! Nothing here is read from process-global state.

use chrono::FixedOffset;
use thiserror::Error;

/// Credit pool the agency starts with.
pub const DEFAULT_INITIAL_CREDIT: u64 = 100_000_000;

/// UTC+08:00, the zone timestamps are rendered in by default.
pub const DEFAULT_UTC_OFFSET_SECS: i32 = 8 * 3600;

/// `from` of transactions minting new credit.
pub const DEFAULT_ISSUE_SENTINEL: &str = "SYSTEM";

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Offset outside ±24h.
    #[error("invalid UTC offset: {0} seconds")]
    InvalidUtcOffset(i32),

    /// A name field was empty.
    #[error("{0} must not be empty")]
    EmptyName(&'static str),

    /// Sentinel collides with the agency name.
    #[error("issue sentinel '{0}' must differ from the agency name")]
    SentinelCollision(String),
}

/// Chaincode configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChaincodeConfig {
    /// Credit the agency holds after `init`.
    pub initial_credit: u64,
    /// Zone offset applied when formatting timestamps.
    pub utc_offset_secs: i32,
    /// Name and transfer id of the agency.
    pub agency_name: String,
    /// `from` value of issuance transactions.
    pub issue_sentinel: String,
}

impl Default for ChaincodeConfig {
    fn default() -> Self {
        Self {
            initial_credit: DEFAULT_INITIAL_CREDIT,
            utc_offset_secs: DEFAULT_UTC_OFFSET_SECS,
            agency_name: crate::domain::keys::AGENCY_KEY.to_string(),
            issue_sentinel: DEFAULT_ISSUE_SENTINEL.to_string(),
        }
    }
}

impl ChaincodeConfig {
    /// Checks every field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.offset()?;
        if self.agency_name.is_empty() {
            return Err(ConfigError::EmptyName("agency_name"));
        }
        if self.issue_sentinel.is_empty() {
            return Err(ConfigError::EmptyName("issue_sentinel"));
        }
        if self.issue_sentinel == self.agency_name {
            return Err(ConfigError::SentinelCollision(self.issue_sentinel.clone()));
        }
        Ok(())
    }

    /// The configured zone as a chrono offset.
    pub fn offset(&self) -> Result<FixedOffset, ConfigError> {
        FixedOffset::east_opt(self.utc_offset_secs)
            .ok_or(ConfigError::InvalidUtcOffset(self.utc_offset_secs))
    }

    /// Same configuration with a different offset.
    #[must_use]
    pub fn with_utc_offset_secs(mut self, secs: i32) -> Self {
        self.utc_offset_secs = secs;
        self
    }

    /// Same configuration with a different initial pool.
    #[must_use]
    pub fn with_initial_credit(mut self, credit: u64) -> Self {
        self.initial_credit = credit;
        self
    }
}
