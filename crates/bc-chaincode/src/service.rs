//! # Chaincode Service
//!
//! The contract operations. Each call is one atomic step: it reads and
//! validates everything it needs, checks the credit invariants against the
//! mutated entities, and only then writes. A returned error therefore
//! means the contract logic wrote nothing; ledger-level rollback of a
//! failed write sequence is the host's job (see
//! [`crate::adapters::ChaincodeHost`]).

use crate::config::{ChaincodeConfig, ConfigError};
use crate::dispatch::Invocation;
use crate::domain::entities::{Account, Agency, BlackRecord, Org, Transaction};
use crate::domain::invariants::{ensure_agency_supply, ensure_transfer_conserved, pair_total};
use crate::domain::keys::{EntityKind, AGENCY_KEY};
use crate::domain::services::{format_timestamp, org_address, record_selector};
use crate::domain::value_objects::{
    require_non_empty, CreditAmount, RecordQuery, RecordSubmission,
};
use crate::errors::ChaincodeError;
use crate::ports::inbound::BlacklistApi;
use crate::ports::outbound::Ledger;
use crate::query::collect_json_array;
use crate::repository::{
    AgencyRepository, BlackRecordRepository, OrgRepository, TransactionRepository,
};
use crate::response::Response;
use chrono::FixedOffset;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// The blacklist registry contract bound to one ledger.
pub struct ChaincodeService<L: Ledger + ?Sized> {
    ledger: Arc<L>,
    config: ChaincodeConfig,
    offset: FixedOffset,
}

impl<L: Ledger + ?Sized> ChaincodeService<L> {
    /// Creates the service, validating the configuration.
    pub fn new(ledger: Arc<L>, config: ChaincodeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let offset = config.offset()?;
        Ok(Self {
            ledger,
            config,
            offset,
        })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &ChaincodeConfig {
        &self.config
    }

    /// Ledger the service reads and writes.
    #[must_use]
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    // =========================================================================
    // ENTRY POINTS
    // =========================================================================

    /// Handles a wire invocation and renders the outcome.
    pub fn invoke<S: AsRef<str>>(&self, function: &str, args: &[S]) -> Response {
        match Invocation::parse(function, args).and_then(|invocation| self.execute(invocation)) {
            Ok(payload) => Response::success(payload),
            Err(err) => {
                if err.is_caller_fault() {
                    warn!(code = err.code(), error = %err, "invocation rejected");
                } else {
                    error!(code = err.code(), error = %err, "invocation failed");
                }
                Response::from_error(&err)
            }
        }
    }

    /// Handles instantiation and renders the outcome.
    pub fn instantiate(&self) -> Response {
        match self.init() {
            Ok(()) => Response::success(Vec::new()),
            Err(err) => {
                error!(error = %err, "instantiation failed");
                Response::from_error(&err)
            }
        }
    }

    /// Runs a parsed invocation.
    ///
    /// Write operations return an empty payload.
    pub fn execute(&self, invocation: Invocation) -> Result<Vec<u8>, ChaincodeError> {
        debug!(action = %invocation.action(), tx_id = %self.ledger.tx_id(), "executing");
        match invocation {
            Invocation::CreateOrg { org_id, org_name } => {
                self.create_org(&org_id, &org_name).map(|()| Vec::new())
            }
            Invocation::SubmitRecord(submission) => {
                self.submit_record(&submission).map(|()| Vec::new())
            }
            Invocation::DeleteRecord { record_id } => {
                self.delete_record(&record_id).map(|()| Vec::new())
            }
            Invocation::QueryRecord(query) => self.query_record(&query),
            Invocation::QueryOrg { org_id } => self.query_org(&org_id),
            Invocation::QueryAgency => self.query_agency(),
            Invocation::IssueCoin { amount } => self.issue_coin(amount).map(|()| Vec::new()),
            Invocation::Transfer {
                from_id,
                to_id,
                amount,
            } => self
                .transfer(&from_id, &to_id, amount)
                .map(|()| Vec::new()),
            Invocation::QueryTransaction { tx_id } => self.query_transaction(&tx_id),
        }
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    fn now(&self) -> String {
        format_timestamp(self.ledger.tx_timestamp(), self.offset)
    }

    fn agencies(&self) -> AgencyRepository<'_, L> {
        AgencyRepository::new(self.ledger.as_ref())
    }

    fn orgs(&self) -> OrgRepository<'_, L> {
        OrgRepository::new(self.ledger.as_ref())
    }

    fn records(&self) -> BlackRecordRepository<'_, L> {
        BlackRecordRepository::new(self.ledger.as_ref())
    }

    fn transactions(&self) -> TransactionRepository<'_, L> {
        TransactionRepository::new(self.ledger.as_ref())
    }

    fn load_agency(&self) -> Result<Agency, ChaincodeError> {
        let agency = self
            .agencies()
            .find(AGENCY_KEY)?
            .ok_or_else(|| ChaincodeError::NotFound {
                entity: EntityKind::Agency,
                id: self.config.agency_name.clone(),
            })?;
        self.check_agency_name(&agency)?;
        Ok(agency)
    }

    /// The stored agency must carry the configured name, which is the id
    /// callers use for it in transfers.
    fn check_agency_name(&self, agency: &Agency) -> Result<(), ChaincodeError> {
        if agency.name != self.config.agency_name {
            return Err(ChaincodeError::Initialization(format!(
                "ledger agency is '{}' but '{}' is configured",
                agency.name, self.config.agency_name
            )));
        }
        Ok(())
    }

    /// Resolves a transfer party: the agency name, or an org id.
    fn resolve_account(&self, id: &str) -> Result<Account, ChaincodeError> {
        if id == self.config.agency_name {
            return self.load_agency().map(Account::Agency);
        }
        self.orgs()
            .find(id)?
            .map(Account::Org)
            .ok_or_else(|| ChaincodeError::NotFound {
                entity: EntityKind::Org,
                id: id.to_string(),
            })
    }

    fn store_account(&self, account: &Account) -> Result<(), ChaincodeError> {
        match account {
            Account::Agency(agency) => self.agencies().put(agency)?,
            Account::Org(org) => self.orgs().put(org)?,
        }
        Ok(())
    }

    /// The proposal id, which must not already name a transaction.
    fn fresh_tx_id(&self) -> Result<String, ChaincodeError> {
        let tx_id = self.ledger.tx_id();
        if self.transactions().exists(&tx_id)? {
            return Err(ChaincodeError::DuplicateKey {
                entity: EntityKind::Transaction,
                id: tx_id,
            });
        }
        Ok(tx_id)
    }
}

// =============================================================================
// CONTRACT OPERATIONS
// =============================================================================

impl<L: Ledger + ?Sized> BlacklistApi for ChaincodeService<L> {
    #[instrument(skip(self))]
    fn init(&self) -> Result<(), ChaincodeError> {
        let agencies = self.agencies();
        if let Some(existing) = agencies
            .find(AGENCY_KEY)
            .map_err(|e| ChaincodeError::Initialization(e.to_string()))?
        {
            self.check_agency_name(&existing)?;
            warn!(
                credit = existing.credit,
                issue_credit = existing.issue_credit,
                "agency already initialized, keeping existing state"
            );
            return Ok(());
        }

        let now = self.now();
        let agency = Agency::new(&self.config.agency_name, self.config.initial_credit, &now);
        agencies
            .put(&agency)
            .map_err(|e| ChaincodeError::Initialization(e.to_string()))?;

        info!(credit = agency.credit, "agency initialized");
        Ok(())
    }

    #[instrument(skip(self))]
    fn create_org(&self, org_id: &str, org_name: &str) -> Result<(), ChaincodeError> {
        require_non_empty("orgId", org_id)?;
        require_non_empty("orgName", org_name)?;
        if org_id == self.config.agency_name || org_id == self.config.issue_sentinel {
            return Err(ChaincodeError::invalid(format!(
                "orgId '{org_id}' is reserved"
            )));
        }

        let orgs = self.orgs();
        if orgs.exists(org_id)? {
            return Err(ChaincodeError::DuplicateKey {
                entity: EntityKind::Org,
                id: org_id.to_string(),
            });
        }

        let org = Org::new(org_id, org_name, org_address(org_id), &self.now());
        orgs.put(&org)?;

        info!(org_addr = %org.org_addr, "org created");
        Ok(())
    }

    #[instrument(
        skip(self, submission),
        fields(org_id = %submission.org_id, record_id = %submission.record_id)
    )]
    fn submit_record(&self, submission: &RecordSubmission) -> Result<(), ChaincodeError> {
        require_non_empty("orgId", &submission.org_id)?;
        require_non_empty("recordId", &submission.record_id)?;
        require_non_empty("clientId", &submission.client_id)?;
        require_non_empty("clientName", &submission.client_name)?;

        let org = self
            .orgs()
            .find(&submission.org_id)?
            .ok_or_else(|| ChaincodeError::NotFound {
                entity: EntityKind::Org,
                id: submission.org_id.clone(),
            })?;

        let records = self.records();
        if records.exists(&submission.record_id)? {
            return Err(ChaincodeError::DuplicateKey {
                entity: EntityKind::BlackRecord,
                id: submission.record_id.clone(),
            });
        }

        let record = BlackRecord::from_submission(submission, &org.org_addr, &self.now());
        records.put(&record)?;

        info!(client_id = %record.client_id, "record submitted");
        Ok(())
    }

    #[instrument(skip(self))]
    fn delete_record(&self, record_id: &str) -> Result<(), ChaincodeError> {
        require_non_empty("recordId", record_id)?;

        let records = self.records();
        if !records.exists(record_id)? {
            return Err(ChaincodeError::NotFound {
                entity: EntityKind::BlackRecord,
                id: record_id.to_string(),
            });
        }
        records.delete(record_id)?;

        info!("record deleted");
        Ok(())
    }

    #[instrument(skip(self, query), fields(mode = query.mode.name()))]
    fn query_record(&self, query: &RecordQuery) -> Result<Vec<u8>, ChaincodeError> {
        require_non_empty(query.mode.field(), &query.value)?;
        let payload = collect_json_array(self.ledger.as_ref(), &record_selector(query))?;
        debug!(bytes = payload.len(), "records queried");
        Ok(payload)
    }

    #[instrument(skip(self))]
    fn query_org(&self, org_id: &str) -> Result<Vec<u8>, ChaincodeError> {
        require_non_empty("orgId", org_id)?;
        self.orgs()
            .fetch(org_id)?
            .map(|doc| doc.bytes)
            .ok_or_else(|| ChaincodeError::NotFound {
                entity: EntityKind::Org,
                id: org_id.to_string(),
            })
    }

    #[instrument(skip(self))]
    fn query_agency(&self) -> Result<Vec<u8>, ChaincodeError> {
        self.agencies()
            .fetch(AGENCY_KEY)?
            .map(|doc| doc.bytes)
            .ok_or_else(|| ChaincodeError::NotFound {
                entity: EntityKind::Agency,
                id: self.config.agency_name.clone(),
            })
    }

    #[instrument(skip(self, amount), fields(amount = amount.get()))]
    fn issue_coin(&self, amount: CreditAmount) -> Result<(), ChaincodeError> {
        let mut agency = self.load_agency()?;
        let tx_id = self.fresh_tx_id()?;
        let now = self.now();

        agency.issue(amount, &now)?;
        ensure_agency_supply(&agency)?;
        let tx = Transaction::new(tx_id, &self.config.issue_sentinel, &agency.name, amount, &now);

        self.agencies().put(&agency)?;
        self.transactions().put(&tx)?;

        info!(
            tx_id = %tx.tx_id,
            credit = agency.credit,
            issue_credit = agency.issue_credit,
            "credit issued"
        );
        Ok(())
    }

    #[instrument(skip(self, amount), fields(amount = amount.get()))]
    fn transfer(
        &self,
        from_id: &str,
        to_id: &str,
        amount: CreditAmount,
    ) -> Result<(), ChaincodeError> {
        require_non_empty("from", from_id)?;
        require_non_empty("to", to_id)?;
        if from_id == to_id {
            return Err(ChaincodeError::invalid(format!(
                "cannot transfer from '{from_id}' to itself"
            )));
        }

        let mut source = self.resolve_account(from_id)?;
        let mut destination = self.resolve_account(to_id)?;
        let tx_id = self.fresh_tx_id()?;
        let now = self.now();

        let before = pair_total(&source, &destination);
        source.debit(amount, &now)?;
        destination.credit(amount, &now)?;
        ensure_transfer_conserved(before, &source, &destination)?;
        if let Account::Agency(agency) = &source {
            ensure_agency_supply(agency)?;
        }
        if let Account::Agency(agency) = &destination {
            ensure_agency_supply(agency)?;
        }

        let tx = Transaction::new(tx_id, source.id(), destination.id(), amount, &now);
        self.store_account(&source)?;
        self.store_account(&destination)?;
        self.transactions().put(&tx)?;

        info!(
            tx_id = %tx.tx_id,
            from_balance = source.balance(),
            to_balance = destination.balance(),
            "credit transferred"
        );
        Ok(())
    }

    #[instrument(skip(self))]
    fn query_transaction(&self, tx_id: &str) -> Result<Vec<u8>, ChaincodeError> {
        require_non_empty("txId", tx_id)?;
        self.transactions()
            .fetch(tx_id)?
            .map(|doc| doc.bytes)
            .ok_or_else(|| ChaincodeError::NotFound {
                entity: EntityKind::Transaction,
                id: tx_id.to_string(),
            })
    }
}

// =============================================================================
// TESTS
// =============================================================================
