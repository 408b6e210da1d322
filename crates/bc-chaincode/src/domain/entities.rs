//! # Core Domain Entities
//!
//! Documents persisted in the ledger. Field names on the wire are the
//! camelCase names rich queries match against (`docType`, `clientId`, ...).

use crate::domain::keys::{key_for, EntityKind};
use crate::domain::value_objects::{CreditAmount, RecordSubmission};
use crate::errors::ChaincodeError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// `docType` of blacklist record documents.
pub const DOC_TYPE_BLACK_RECORD: &str = "BlackRecord";

/// `docType` of transaction documents.
pub const DOC_TYPE_TRANSACTION: &str = "Transaction";

// =============================================================================
// LEDGER ENTITY
// =============================================================================

/// An entity stored as one JSON document under one composite key.
pub trait LedgerEntity: Serialize + DeserializeOwned {
    /// Entity type, which fixes the key prefix.
    const KIND: EntityKind;

    /// Identifier within the entity type.
    fn id(&self) -> &str;

    /// Full state key.
    fn key(&self) -> String {
        key_for(Self::KIND, self.id())
    }
}

// =============================================================================
// AGENCY
// =============================================================================

/// The central credit issuing authority.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agency {
    pub name: String,
    /// Total credit ever issued.
    pub issue_credit: u64,
    /// Current balance.
    pub credit: u64,
    pub create_time: String,
    pub update_time: String,
}

impl Agency {
    /// Creates the agency with its whole initial pool in hand.
    #[must_use]
    pub fn new(name: impl Into<String>, initial_credit: u64, now: &str) -> Self {
        Self {
            name: name.into(),
            issue_credit: initial_credit,
            credit: initial_credit,
            create_time: now.to_string(),
            update_time: now.to_string(),
        }
    }

    /// Mints new credit into the agency balance.
    pub fn issue(&mut self, amount: CreditAmount, now: &str) -> Result<(), ChaincodeError> {
        let issue_credit = self
            .issue_credit
            .checked_add(amount.get())
            .ok_or_else(|| {
                ChaincodeError::invalid(format!("issuing {amount} overflows the supply"))
            })?;
        let credit = self
            .credit
            .checked_add(amount.get())
            .ok_or_else(|| {
                ChaincodeError::invalid(format!("issuing {amount} overflows the balance"))
            })?;
        self.issue_credit = issue_credit;
        self.credit = credit;
        self.update_time = now.to_string();
        Ok(())
    }

    /// Credit held by organizations.
    #[must_use]
    pub fn in_circulation(&self) -> u64 {
        self.issue_credit.saturating_sub(self.credit)
    }
}

impl LedgerEntity for Agency {
    const KIND: EntityKind = EntityKind::Agency;

    fn id(&self) -> &str {
        &self.name
    }
}

// =============================================================================
// ORG
// =============================================================================

/// A member organization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Org {
    pub org_id: String,
    pub org_name: String,
    /// Deterministic address derived from `org_id`.
    pub org_addr: String,
    pub org_credit: u64,
    pub create_time: String,
    pub update_time: String,
}

impl Org {
    /// Creates an organization with a zero balance.
    #[must_use]
    pub fn new(org_id: &str, org_name: &str, org_addr: String, now: &str) -> Self {
        Self {
            org_id: org_id.to_string(),
            org_name: org_name.to_string(),
            org_addr,
            org_credit: 0,
            create_time: now.to_string(),
            update_time: now.to_string(),
        }
    }
}

impl LedgerEntity for Org {
    const KIND: EntityKind = EntityKind::Org;

    fn id(&self) -> &str {
        &self.org_id
    }
}

// =============================================================================
// BLACK RECORD
// =============================================================================

/// A derogatory event recorded against a client by an organization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlackRecord {
    pub doc_type: String,
    pub record_id: String,
    pub client_id: String,
    pub client_name: String,
    pub negative_type: i64,
    pub negative_severity: i64,
    pub negative_info: String,
    /// Address of the submitting organization.
    pub org_addr: String,
    pub create_time: String,
    pub update_time: String,
}

impl BlackRecord {
    /// Builds a record from a submission, stamped with the submitter's address.
    #[must_use]
    pub fn from_submission(submission: &RecordSubmission, org_addr: &str, now: &str) -> Self {
        Self {
            doc_type: DOC_TYPE_BLACK_RECORD.to_string(),
            record_id: submission.record_id.clone(),
            client_id: submission.client_id.clone(),
            client_name: submission.client_name.clone(),
            negative_type: submission.negative_type,
            negative_severity: submission.negative_severity,
            negative_info: submission.negative_info.clone(),
            org_addr: org_addr.to_string(),
            create_time: now.to_string(),
            update_time: now.to_string(),
        }
    }
}

impl LedgerEntity for BlackRecord {
    const KIND: EntityKind = EntityKind::BlackRecord;

    fn id(&self) -> &str {
        &self.record_id
    }
}

// =============================================================================
// TRANSACTION
// =============================================================================

/// A recorded credit movement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub doc_type: String,
    pub tx_id: String,
    pub from: String,
    pub to: String,
    pub credit: u64,
    pub create_time: String,
    pub update_time: String,
}

impl Transaction {
    #[must_use]
    pub fn new(tx_id: String, from: &str, to: &str, amount: CreditAmount, now: &str) -> Self {
        Self {
            doc_type: DOC_TYPE_TRANSACTION.to_string(),
            tx_id,
            from: from.to_string(),
            to: to.to_string(),
            credit: amount.get(),
            create_time: now.to_string(),
            update_time: now.to_string(),
        }
    }
}

impl LedgerEntity for Transaction {
    const KIND: EntityKind = EntityKind::Transaction;

    fn id(&self) -> &str {
        &self.tx_id
    }
}

// =============================================================================
// ACCOUNT
// =============================================================================

/// A credit-holding party of a transfer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Account {
    Agency(Agency),
    Org(Org),
}

impl Account {
    /// Identifier used in `Transaction.from` / `Transaction.to`.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Agency(agency) => &agency.name,
            Self::Org(org) => &org.org_id,
        }
    }

    /// Current balance.
    #[must_use]
    pub fn balance(&self) -> u64 {
        match self {
            Self::Agency(agency) => agency.credit,
            Self::Org(org) => org.org_credit,
        }
    }

    fn balance_mut(&mut self) -> (&mut u64, &mut String) {
        match self {
            Self::Agency(agency) => (&mut agency.credit, &mut agency.update_time),
            Self::Org(org) => (&mut org.org_credit, &mut org.update_time),
        }
    }

    /// Removes `amount` from the balance.
    pub fn debit(&mut self, amount: CreditAmount, now: &str) -> Result<(), ChaincodeError> {
        let available = self.balance();
        if available < amount.get() {
            return Err(ChaincodeError::InsufficientCredit {
                account: self.id().to_string(),
                required: amount.get(),
                available,
            });
        }
        let (balance, update_time) = self.balance_mut();
        *balance = available - amount.get();
        *update_time = now.to_string();
        Ok(())
    }

    /// Adds `amount` to the balance.
    pub fn credit(&mut self, amount: CreditAmount, now: &str) -> Result<(), ChaincodeError> {
        let id = self.id().to_string();
        let (balance, update_time) = self.balance_mut();
        *balance = balance.checked_add(amount.get()).ok_or_else(|| {
            ChaincodeError::invalid(format!("crediting {amount} overflows the balance of '{id}'"))
        })?;
        *update_time = now.to_string();
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
