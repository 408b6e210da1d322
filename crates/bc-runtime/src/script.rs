//! # Invocation Scripts
//!
//! One JSON object per line:
//!
//! ```text
//! {"function":"invoke","args":["createOrg","org1","OrgOne"]}
//! {"function":"invoke","args":["issueCoin","5000"],"txId":"tx-1","timestamp":"2018-06-01T02:00:00Z"}
//! ```
//!
//! `txId` and `timestamp` pin the proposal context; both or neither.
//! Blank lines and lines starting with `#` are skipped.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

/// Script parsing errors.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

/// Fixed proposal id and time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedProposal {
    pub tx_id: String,
    pub timestamp: DateTime<Utc>,
}

/// One scripted invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStep {
    /// 1-based line number in the script.
    pub line: usize,
    pub function: String,
    pub args: Vec<String>,
    pub proposal: Option<PinnedProposal>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawStep {
    function: String,
    #[serde(default)]
    args: Vec<String>,
    tx_id: Option<String>,
    timestamp: Option<DateTime<Utc>>,
}

/// Parses one script line. `Ok(None)` for blank and comment lines.
pub fn parse_line(line: usize, text: &str) -> Result<Option<ScriptStep>, ScriptError> {
    let text = text.trim();
    if text.is_empty() || text.starts_with('#') {
        return Ok(None);
    }

    let raw: RawStep = serde_json::from_str(text).map_err(|e| ScriptError::Malformed {
        line,
        reason: e.to_string(),
    })?;

    let proposal = match (raw.tx_id, raw.timestamp) {
        (Some(tx_id), Some(timestamp)) => Some(PinnedProposal { tx_id, timestamp }),
        (None, None) => None,
        _ => {
            return Err(ScriptError::Malformed {
                line,
                reason: "txId and timestamp must be given together".to_string(),
            })
        }
    };

    Ok(Some(ScriptStep {
        line,
        function: raw.function,
        args: raw.args,
        proposal,
    }))
}
