//! # Invocation Response
//!
//! What the host shim hands back to the transaction submitter: a status,
//! a payload on success, a message on failure.

use crate::errors::ChaincodeError;
use serde::{Deserialize, Serialize};

/// Status of a successful invocation.
pub const OK: u16 = 200;
/// Status of a rejected invocation caused by the caller's input.
pub const BAD_REQUEST: u16 = 400;
/// Status of a failed invocation caused by the environment.
pub const ERROR: u16 = 500;

/// Outcome of one invocation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    /// Empty for write operations, a JSON document or array for queries.
    #[serde(with = "payload_text")]
    pub payload: Vec<u8>,
    /// `CODE: description` on failure, empty on success.
    pub message: String,
}

impl Response {
    /// Successful response carrying `payload`.
    #[must_use]
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: OK,
            payload,
            message: String::new(),
        }
    }

    /// Failed response with a free-form message.
    #[must_use]
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            payload: Vec::new(),
            message: message.into(),
        }
    }

    /// Failed response describing `err`.
    #[must_use]
    pub fn from_error(err: &ChaincodeError) -> Self {
        let status = if err.is_caller_fault() { BAD_REQUEST } else { ERROR };
        Self::error(status, format!("{}: {err}", err.code()))
    }

    /// True for status 200.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == OK
    }

    /// Error code prefix of a failed response.
    #[must_use]
    pub fn error_code(&self) -> Option<&str> {
        if self.is_ok() {
            return None;
        }
        self.message.split_once(": ").map(|(code, _)| code)
    }
}

/// Renders the payload as UTF-8 text when serialized, so JSON payloads
/// read naturally in the runtime's output.
mod payload_text {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(payload: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(payload))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        Ok(String::deserialize(deserializer)?.into_bytes())
    }
}
