//! # Driven Ports (SPI - Outbound)
//!
//! The chaincode's only dependency: the ledger state store of the peer
//! simulating the current transaction proposal.

use crate::errors::LedgerError;
use chrono::{DateTime, Utc};

// =============================================================================
// KEY / VALUE
// =============================================================================

/// One rich-query result.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValue {
    /// State key.
    pub key: String,
    /// Stored document bytes.
    pub value: Vec<u8>,
}

// =============================================================================
// QUERY ITERATOR
// =============================================================================

/// Cursor over a rich-query result set.
///
/// The cursor holds ledger-side resources until `close` is called.
/// Callers must close it on every exit path.
pub trait StateQueryIterator {
    /// Next result, or `None` when exhausted.
    fn next_entry(&mut self) -> Option<Result<KeyValue, LedgerError>>;

    /// Releases the cursor. Closing twice is a no-op.
    fn close(&mut self) -> Result<(), LedgerError>;
}

// =============================================================================
// LEDGER
// =============================================================================

/// Key-value state and rich-query access for one proposal.
///
/// ## Implementation Notes
///
/// - `get_state` returns `Ok(None)` for absent keys.
/// - `tx_id` and `tx_timestamp` come from the proposal so every endorsing
///   peer computes identical writes.
pub trait Ledger: Send + Sync {
    /// Reads the value stored under `key`.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Writes `value` under `key`.
    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Removes `key`.
    fn delete_state(&self, key: &str) -> Result<(), LedgerError>;

    /// Runs a rich query against the document index.
    fn execute_rich_query(
        &self,
        selector_json: &str,
    ) -> Result<Box<dyn StateQueryIterator + '_>, LedgerError>;

    /// Id of the proposal being simulated.
    fn tx_id(&self) -> String;

    /// Timestamp of the proposal being simulated.
    fn tx_timestamp(&self) -> DateTime<Utc>;

    /// Convenience existence check.
    fn has_state(&self, key: &str) -> Result<bool, LedgerError> {
        Ok(self.get_state(key)?.is_some())
    }
}
