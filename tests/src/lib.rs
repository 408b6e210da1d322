//! # Blacklist-Chain Test Suite
//!
//! Cross-module tests driving the chaincode through its wire entry point.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── scenario.rs      # End-to-end registry and credit flow
//!     ├── conservation.rs  # Seeded random credit-conservation runs
//!     ├── dispatch.rs      # Wire-level routing and error rendering
//!     └── runtime.rs       # Script replay through bc-runtime
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p bc-tests
//!
//! # By area
//! cargo test -p bc-tests integration::conservation::
//!
//! # Benchmarks
//! cargo bench -p bc-tests
//! ```

pub mod integration;

use bc_chaincode::prelude::*;
use chrono::{DateTime, TimeZone, Utc};

/// Host with the agency instantiated.
pub fn instantiated_host() -> ChaincodeHost {
    instantiated_host_with(ChaincodeConfig::default())
}

/// Same as [`instantiated_host`] with a custom configuration.
pub fn instantiated_host_with(config: ChaincodeConfig) -> ChaincodeHost {
    let mut host = match ChaincodeHost::new(config) {
        Ok(host) => host,
        Err(err) => panic!("invalid test configuration: {err}"),
    };
    assert!(host.instantiate().is_ok());
    host
}

/// 2018-06-01 00:00:00 UTC plus `minutes`.
pub fn fixed_time(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2018, 6, 1, 0, 0, 0).unwrap() + chrono::Duration::minutes(minutes)
}

/// Decodes a successful response payload.
pub fn payload<T: serde::de::DeserializeOwned>(response: &Response) -> T {
    assert!(response.is_ok(), "unexpected failure: {}", response.message);
    match serde_json::from_slice(&response.payload) {
        Ok(value) => value,
        Err(err) => panic!("undecodable payload: {err}"),
    }
}
