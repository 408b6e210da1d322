//! # Driving Ports (API - Inbound)
//!
//! The contract operations exposed by the chaincode. The dispatcher maps
//! wire invocations onto this trait; tests and embedders may call it
//! directly with typed arguments.

use crate::domain::value_objects::{CreditAmount, RecordQuery, RecordSubmission};
use crate::errors::ChaincodeError;

/// Primary API of the blacklist registry.
///
/// Every method is one atomic step: all validation and reads happen before
/// the first write, so a returned error means nothing was written by the
/// contract logic.
pub trait BlacklistApi {
    /// Creates the singleton agency with the configured initial pool.
    fn init(&self) -> Result<(), ChaincodeError>;

    /// Registers a member organization with a zero balance.
    fn create_org(&self, org_id: &str, org_name: &str) -> Result<(), ChaincodeError>;

    /// Records a derogatory event on behalf of an existing organization.
    fn submit_record(&self, submission: &RecordSubmission) -> Result<(), ChaincodeError>;

    /// Removes a blacklist record.
    fn delete_record(&self, record_id: &str) -> Result<(), ChaincodeError>;

    /// Returns a JSON array of matching blacklist records.
    fn query_record(&self, query: &RecordQuery) -> Result<Vec<u8>, ChaincodeError>;

    /// Returns the stored organization document.
    fn query_org(&self, org_id: &str) -> Result<Vec<u8>, ChaincodeError>;

    /// Returns the stored agency document.
    fn query_agency(&self) -> Result<Vec<u8>, ChaincodeError>;

    /// Mints `amount` new credit into the agency.
    fn issue_coin(&self, amount: CreditAmount) -> Result<(), ChaincodeError>;

    /// Moves `amount` credit between the agency and/or organizations.
    fn transfer(
        &self,
        from_id: &str,
        to_id: &str,
        amount: CreditAmount,
    ) -> Result<(), ChaincodeError>;

    /// Returns the stored transaction document.
    fn query_transaction(&self, tx_id: &str) -> Result<Vec<u8>, ChaincodeError>;
}
