//! # Chaincode Host
//!
//! Local stand-in for the peer shim: wraps every invocation in a proposal
//! of the [`InMemoryLedger`], committing the write set when the contract
//! succeeds and discarding it otherwise. A failed invocation therefore
//! never leaves partial state behind, even when the failure is a write
//! error halfway through a multi-key update. Read-only actions release
//! their proposal without committing.

use super::memory_ledger::InMemoryLedger;
use crate::config::{ChaincodeConfig, ConfigError};
use crate::dispatch::Action;
use crate::errors::{ChaincodeError, LedgerError};
use crate::response::Response;
use crate::service::ChaincodeService;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, error};

/// Counters over the host's lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HostStats {
    pub committed: u64,
    pub rolled_back: u64,
    /// Successful read-only invocations, released without a commit.
    pub queries: u64,
}

/// Runs invocations against an in-memory ledger, one proposal each.
pub struct ChaincodeHost {
    ledger: Arc<InMemoryLedger>,
    service: ChaincodeService<InMemoryLedger>,
    stats: HostStats,
}

impl ChaincodeHost {
    /// Creates a host over a fresh ledger.
    pub fn new(config: ChaincodeConfig) -> Result<Self, ConfigError> {
        Self::with_ledger(Arc::new(InMemoryLedger::new()), config)
    }

    /// Creates a host over an existing ledger.
    pub fn with_ledger(
        ledger: Arc<InMemoryLedger>,
        config: ChaincodeConfig,
    ) -> Result<Self, ConfigError> {
        let service = ChaincodeService::new(ledger.clone(), config)?;
        Ok(Self {
            ledger,
            service,
            stats: HostStats::default(),
        })
    }

    /// Runs `init` in its own proposal.
    pub fn instantiate(&mut self) -> Response {
        match self.ledger.begin_proposal() {
            Ok(_) => self.settle(false, |service| service.instantiate()),
            Err(err) => self.begin_failed(err),
        }
    }

    /// Runs an invocation in a proposal with a random id and the current time.
    pub fn invoke<S: AsRef<str>>(&mut self, function: &str, args: &[S]) -> Response {
        match self.ledger.begin_proposal() {
            Ok(_) => self.settle(read_only(args), |service| service.invoke(function, args)),
            Err(err) => self.begin_failed(err),
        }
    }

    /// Runs an invocation in a proposal with a fixed id and timestamp.
    pub fn invoke_with<S: AsRef<str>>(
        &mut self,
        tx_id: &str,
        timestamp: DateTime<Utc>,
        function: &str,
        args: &[S],
    ) -> Response {
        match self.ledger.begin_proposal_with(tx_id, timestamp) {
            Ok(()) => self.settle(read_only(args), |service| service.invoke(function, args)),
            Err(err) => self.begin_failed(err),
        }
    }

    /// Ledger backing the host.
    #[must_use]
    pub fn ledger(&self) -> &Arc<InMemoryLedger> {
        &self.ledger
    }

    /// Contract service bound to the ledger.
    #[must_use]
    pub fn service(&self) -> &ChaincodeService<InMemoryLedger> {
        &self.service
    }

    #[must_use]
    pub fn stats(&self) -> HostStats {
        self.stats
    }

    fn settle<F>(&mut self, read_only: bool, run: F) -> Response
    where
        F: FnOnce(&ChaincodeService<InMemoryLedger>) -> Response,
    {
        let response = run(&self.service);
        if response.is_ok() && read_only {
            self.stats.queries += 1;
            if let Err(err) = self.ledger.rollback() {
                error!(error = %err, "releasing read-only proposal failed");
            }
            response
        } else if response.is_ok() {
            match self.ledger.commit() {
                Ok(applied) => {
                    self.stats.committed += 1;
                    debug!(applied, "invocation committed");
                    response
                }
                Err(err) => {
                    error!(error = %err, "commit failed");
                    self.discard();
                    Response::from_error(&ChaincodeError::Storage(err.to_string()))
                }
            }
        } else {
            self.discard();
            response
        }
    }

    fn discard(&mut self) {
        self.stats.rolled_back += 1;
        if let Err(err) = self.ledger.rollback() {
            error!(error = %err, "rollback failed");
        }
    }

    fn begin_failed(&self, err: LedgerError) -> Response {
        error!(error = %err, "could not start proposal");
        Response::from_error(&ChaincodeError::Storage(err.to_string()))
    }
}

/// True when the first argument names an action that never writes.
fn read_only<S: AsRef<str>>(args: &[S]) -> bool {
    args.first()
        .and_then(|name| name.as_ref().parse::<Action>().ok())
        .is_some_and(Action::is_read_only)
}
