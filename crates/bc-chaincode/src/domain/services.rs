//! # Domain Services
//!
//! Pure functions used by the contract operations. Deterministic, no I/O.

use crate::domain::entities::DOC_TYPE_BLACK_RECORD;
use crate::domain::value_objects::RecordQuery;
use chrono::{DateTime, FixedOffset, Utc};
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};

/// Layout of every `createTime` / `updateTime` field.
pub const TIMESTAMP_LAYOUT: &str = "%Y-%m-%d %H:%M:%S";

// =============================================================================
// ORG ADDRESS
// =============================================================================

/// Derives an organization's address from its id.
///
/// Lowercase hex of `sha256(org_id)`.
#[must_use]
pub fn org_address(org_id: &str) -> String {
    hex::encode(Sha256::digest(org_id.as_bytes()))
}

// =============================================================================
// TIMESTAMPS
// =============================================================================

/// Formats a proposal timestamp in the configured zone.
#[must_use]
pub fn format_timestamp(timestamp: DateTime<Utc>, offset: FixedOffset) -> String {
    timestamp
        .with_timezone(&offset)
        .format(TIMESTAMP_LAYOUT)
        .to_string()
}

// =============================================================================
// RICH QUERY SELECTORS
// =============================================================================

/// Builds the rich-query document selecting blacklist records.
///
/// The value is placed as a JSON string, so quotes or braces in client
/// input cannot alter the selector structure.
#[must_use]
pub fn record_selector(query: &RecordQuery) -> Value {
    let mut selector = Map::new();
    selector.insert("docType".to_string(), json!(DOC_TYPE_BLACK_RECORD));
    selector.insert(query.mode.field().to_string(), json!(query.value));
    json!({ "selector": selector })
}
