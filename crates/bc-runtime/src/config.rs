//! # Runtime Configuration
//!
//! Chaincode parameters read from the environment, layered over
//! [`ChaincodeConfig::default`].
//!
//! | Variable | Default |
//! |----------|---------|
//! | `BC_INITIAL_CREDIT` | `100000000` |
//! | `BC_UTC_OFFSET_SECS` | `28800` |
//! | `BC_AGENCY_NAME` | `Agency` |

use bc_chaincode::config::{ChaincodeConfig, ConfigError as ChaincodeConfigError};
use bc_telemetry::TelemetryConfig;
use std::env;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable is set but does not parse.
    #[error("{name}: cannot parse '{value}': {reason}")]
    Unparsable {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// Parsed values fail chaincode validation.
    #[error(transparent)]
    Chaincode(#[from] ChaincodeConfigError),
}

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub chaincode: ChaincodeConfig,
    pub telemetry: TelemetryConfig,
}

impl RuntimeConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut chaincode = ChaincodeConfig::default();

        if let Some(value) = lookup("BC_INITIAL_CREDIT") {
            chaincode.initial_credit = parse_var("BC_INITIAL_CREDIT", value)?;
        }
        if let Some(value) = lookup("BC_UTC_OFFSET_SECS") {
            chaincode.utc_offset_secs = parse_var("BC_UTC_OFFSET_SECS", value)?;
        }
        if let Some(value) = lookup("BC_AGENCY_NAME") {
            chaincode.agency_name = value;
        }
        chaincode.validate()?;

        Ok(Self {
            chaincode,
            telemetry: TelemetryConfig::from_lookup(lookup),
        })
    }
}

fn parse_var<T>(name: &'static str, value: String) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let parsed = value.trim().parse::<T>();
    match parsed {
        Ok(parsed) => Ok(parsed),
        Err(e) => Err(ConfigError::Unparsable {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}
