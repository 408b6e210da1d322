//! # Rich Query Execution
//!
//! Runs a selector against the ledger's document index and concatenates
//! every matching document into one JSON array.
//!
//! The ledger cursor is wrapped in [`Cursor`], which closes it on drop, so
//! it is released on success, on a mid-iteration error, and on early return.

use crate::errors::{LedgerError, RepositoryError};
use crate::ports::outbound::{KeyValue, Ledger, StateQueryIterator};
use serde_json::Value;
use tracing::{debug, warn};

/// Owning guard around a ledger query cursor.
pub struct Cursor<'a> {
    inner: Box<dyn StateQueryIterator + 'a>,
    closed: bool,
}

impl<'a> Cursor<'a> {
    /// Takes ownership of an open cursor.
    #[must_use]
    pub fn new(inner: Box<dyn StateQueryIterator + 'a>) -> Self {
        Self {
            inner,
            closed: false,
        }
    }

    /// Closes the cursor, reporting any release failure.
    pub fn close(mut self) -> Result<(), LedgerError> {
        self.closed = true;
        self.inner.close()
    }
}

impl Iterator for Cursor<'_> {
    type Item = Result<KeyValue, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.closed {
            return None;
        }
        self.inner.next_entry()
    }
}

impl Drop for Cursor<'_> {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            if let Err(e) = self.inner.close() {
                warn!(error = %e, "failed to release query cursor");
            }
        }
    }
}

/// Executes `selector` and returns the matches as a JSON array.
pub fn collect_json_array<L: Ledger + ?Sized>(
    ledger: &L,
    selector: &Value,
) -> Result<Vec<u8>, RepositoryError> {
    let selector_json =
        serde_json::to_string(selector).map_err(|e| RepositoryError::Serialization {
            entity: "selector",
            reason: e.to_string(),
        })?;
    debug!(selector = %selector_json, "executing rich query");

    let mut cursor = Cursor::new(ledger.execute_rich_query(&selector_json).map_err(
        |source| RepositoryError::StorageRead {
            key: selector_json.clone(),
            source,
        },
    )?);

    let mut buffer = vec![b'['];
    let mut written = 0usize;
    for entry in cursor.by_ref() {
        let entry = entry.map_err(|source| RepositoryError::StorageRead {
            key: selector_json.clone(),
            source,
        })?;
        if written > 0 {
            buffer.push(b',');
        }
        buffer.extend_from_slice(&entry.value);
        written += 1;
    }
    buffer.push(b']');

    cursor
        .close()
        .map_err(|source| RepositoryError::StorageRead {
            key: selector_json.clone(),
            source,
        })?;

    debug!(matches = written, "rich query complete");
    Ok(buffer)
}
