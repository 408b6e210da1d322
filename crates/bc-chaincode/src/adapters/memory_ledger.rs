//! # In-Memory Ledger
//!
//! Test-grade `Ledger` implementation modelled on a peer's simulate/commit
//! cycle:
//!
//! - committed world state in an ordered map
//! - a per-proposal write set, visible to reads of the same proposal
//! - `commit` applies the write set, `rollback` discards it
//! - equality-only rich queries over top-level document fields
//!
//! Fault injection hooks (`fail_writes`, `fail_iteration_after`) exercise
//! the chaincode's error paths.

use crate::errors::LedgerError;
use crate::ports::outbound::{KeyValue, Ledger, StateQueryIterator};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

/// Pending state of the proposal being simulated.
#[derive(Debug)]
struct Proposal {
    tx_id: String,
    timestamp: DateTime<Utc>,
    /// `None` marks a delete.
    writes: BTreeMap<String, Option<Vec<u8>>>,
}

impl Proposal {
    fn new(tx_id: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            tx_id,
            timestamp,
            writes: BTreeMap::new(),
        }
    }

    fn fresh() -> Self {
        Self::new(Uuid::new_v4().simple().to_string(), Utc::now())
    }
}

/// In-memory ledger for tests and the local runtime.
#[derive(Debug)]
pub struct InMemoryLedger {
    world: RwLock<BTreeMap<String, Vec<u8>>>,
    proposal: RwLock<Proposal>,
    open_cursors: AtomicUsize,
    fail_writes: AtomicBool,
    fail_iteration_after: RwLock<Option<usize>>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLedger {
    /// Creates an empty ledger with an open proposal.
    #[must_use]
    pub fn new() -> Self {
        Self {
            world: RwLock::new(BTreeMap::new()),
            proposal: RwLock::new(Proposal::fresh()),
            open_cursors: AtomicUsize::new(0),
            fail_writes: AtomicBool::new(false),
            fail_iteration_after: RwLock::new(None),
        }
    }

    // =========================================================================
    // PROPOSAL LIFECYCLE
    // =========================================================================

    /// Starts a new proposal with a random id and the current time.
    ///
    /// Returns the proposal id. Uncommitted writes are discarded.
    pub fn begin_proposal(&self) -> Result<String, LedgerError> {
        let proposal = Proposal::fresh();
        let tx_id = proposal.tx_id.clone();
        self.replace_proposal(proposal)?;
        Ok(tx_id)
    }

    /// Starts a new proposal with a fixed id and timestamp.
    pub fn begin_proposal_with(
        &self,
        tx_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        self.replace_proposal(Proposal::new(tx_id.into(), timestamp))
    }

    fn replace_proposal(&self, next: Proposal) -> Result<(), LedgerError> {
        let mut proposal = self.proposal.write().map_err(|_| LedgerError::LockPoisoned)?;
        if !proposal.writes.is_empty() {
            warn!(
                tx_id = %proposal.tx_id,
                writes = proposal.writes.len(),
                "discarding uncommitted writes"
            );
        }
        debug!(tx_id = %next.tx_id, "proposal started");
        *proposal = next;
        Ok(())
    }

    /// Applies the current write set to the world state.
    ///
    /// Returns the number of keys written or deleted.
    pub fn commit(&self) -> Result<usize, LedgerError> {
        let mut proposal = self.proposal.write().map_err(|_| LedgerError::LockPoisoned)?;
        let mut world = self.world.write().map_err(|_| LedgerError::LockPoisoned)?;
        let writes = std::mem::take(&mut proposal.writes);
        let applied = writes.len();
        for (key, value) in writes {
            match value {
                Some(bytes) => {
                    world.insert(key, bytes);
                }
                None => {
                    world.remove(&key);
                }
            }
        }
        debug!(tx_id = %proposal.tx_id, applied, "proposal committed");
        Ok(applied)
    }

    /// Discards the current write set.
    pub fn rollback(&self) -> Result<usize, LedgerError> {
        let mut proposal = self.proposal.write().map_err(|_| LedgerError::LockPoisoned)?;
        let discarded = proposal.writes.len();
        proposal.writes.clear();
        debug!(tx_id = %proposal.tx_id, discarded, "proposal rolled back");
        Ok(discarded)
    }

    // =========================================================================
    // INSPECTION
    // =========================================================================

    /// Number of uncommitted writes in the current proposal.
    #[must_use]
    pub fn pending_writes(&self) -> usize {
        self.proposal
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .writes
            .len()
    }

    /// Committed value under `key`, ignoring the current write set.
    pub fn committed_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let world = self.world.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(world.get(key).cloned())
    }

    /// Committed keys starting with `prefix`, in order.
    pub fn committed_keys(&self, prefix: &str) -> Result<Vec<String>, LedgerError> {
        let world = self.world.read().map_err(|_| LedgerError::LockPoisoned)?;
        Ok(world
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect())
    }

    /// Number of query cursors not yet closed.
    #[must_use]
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    // =========================================================================
    // FAULT INJECTION
    // =========================================================================

    /// Makes every `put_state` / `delete_state` fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes query cursors fail after yielding `limit` entries.
    pub fn fail_iteration_after(&self, limit: Option<usize>) {
        *self
            .fail_iteration_after
            .write()
            .unwrap_or_else(PoisonError::into_inner) = limit;
    }

    fn check_writable(&self, key: &str) -> Result<(), LedgerError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(LedgerError::WriteRejected {
                key: key.to_string(),
                reason: "write fault injected".to_string(),
            });
        }
        Ok(())
    }

    /// World state overlaid with the current write set.
    fn merged_view(&self) -> Result<BTreeMap<String, Vec<u8>>, LedgerError> {
        let proposal = self.proposal.read().map_err(|_| LedgerError::LockPoisoned)?;
        let mut view = self
            .world
            .read()
            .map_err(|_| LedgerError::LockPoisoned)?
            .clone();
        for (key, value) in &proposal.writes {
            match value {
                Some(bytes) => {
                    view.insert(key.clone(), bytes.clone());
                }
                None => {
                    view.remove(key);
                }
            }
        }
        Ok(view)
    }
}

// =============================================================================
// SELECTOR MATCHING
// =============================================================================

fn parse_selector(selector_json: &str) -> Result<Map<String, Value>, LedgerError> {
    let query: Value = serde_json::from_str(selector_json)
        .map_err(|e| LedgerError::MalformedSelector(e.to_string()))?;
    let Some(Value::Object(selector)) = query.get("selector") else {
        return Err(LedgerError::MalformedSelector(
            "missing \"selector\" object".to_string(),
        ));
    };
    for (field, expected) in selector {
        if field.starts_with('$') {
            return Err(LedgerError::MalformedSelector(format!(
                "unsupported operator '{field}'"
            )));
        }
        if let Value::Object(inner) = expected {
            if inner.keys().any(|k| k.starts_with('$')) {
                return Err(LedgerError::MalformedSelector(format!(
                    "unsupported operator on field '{field}'"
                )));
            }
        }
    }
    Ok(selector.clone())
}

fn document_matches(selector: &Map<String, Value>, bytes: &[u8]) -> bool {
    let Ok(Value::Object(document)) = serde_json::from_slice::<Value>(bytes) else {
        return false;
    };
    selector
        .iter()
        .all(|(field, expected)| document.get(field) == Some(expected))
}

// =============================================================================
// QUERY ITERATOR
// =============================================================================

struct InMemoryQueryIterator<'a> {
    results: VecDeque<KeyValue>,
    yielded: usize,
    fail_after: Option<usize>,
    open_cursors: &'a AtomicUsize,
    closed: bool,
}

impl StateQueryIterator for InMemoryQueryIterator<'_> {
    fn next_entry(&mut self) -> Option<Result<KeyValue, LedgerError>> {
        if self.closed {
            return None;
        }
        match self.fail_after {
            Some(limit) if self.yielded >= limit && !self.results.is_empty() => {
                Some(Err(LedgerError::QueryFailed(format!(
                    "cursor fault injected after {limit} entries"
                ))))
            }
            _ => {
                let entry = self.results.pop_front()?;
                self.yielded += 1;
                Some(Ok(entry))
            }
        }
    }

    fn close(&mut self) -> Result<(), LedgerError> {
        if !self.closed {
            self.closed = true;
            self.open_cursors.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

// =============================================================================
// LEDGER PORT
// =============================================================================

impl Ledger for InMemoryLedger {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        let proposal = self.proposal.read().map_err(|_| LedgerError::LockPoisoned)?;
        if let Some(pending) = proposal.writes.get(key) {
            return Ok(pending.clone());
        }
        drop(proposal);
        self.committed_state(key)
    }

    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        self.check_writable(key)?;
        let mut proposal = self.proposal.write().map_err(|_| LedgerError::LockPoisoned)?;
        proposal.writes.insert(key.to_string(), Some(value));
        Ok(())
    }

    fn delete_state(&self, key: &str) -> Result<(), LedgerError> {
        self.check_writable(key)?;
        let mut proposal = self.proposal.write().map_err(|_| LedgerError::LockPoisoned)?;
        proposal.writes.insert(key.to_string(), None);
        Ok(())
    }

    fn execute_rich_query(
        &self,
        selector_json: &str,
    ) -> Result<Box<dyn StateQueryIterator + '_>, LedgerError> {
        let selector = parse_selector(selector_json)?;
        let results: VecDeque<KeyValue> = self
            .merged_view()?
            .into_iter()
            .filter(|(_, value)| document_matches(&selector, value))
            .map(|(key, value)| KeyValue { key, value })
            .collect();
        let fail_after = *self
            .fail_iteration_after
            .read()
            .map_err(|_| LedgerError::LockPoisoned)?;

        self.open_cursors.fetch_add(1, Ordering::SeqCst);
        debug!(matches = results.len(), "rich query opened");
        Ok(Box::new(InMemoryQueryIterator {
            results,
            yielded: 0,
            fail_after,
            open_cursors: &self.open_cursors,
            closed: false,
        }))
    }

    fn tx_id(&self) -> String {
        self.proposal
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .tx_id
            .clone()
    }

    fn tx_timestamp(&self) -> DateTime<Utc> {
        self.proposal
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .timestamp
    }
}

// =============================================================================
// TESTS
// =============================================================================
