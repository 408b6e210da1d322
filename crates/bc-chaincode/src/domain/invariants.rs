//! # Domain Invariants
//!
//! Credit invariants that must hold after every write-performing operation.
//!
//! - Agency supply: `agency.credit <= agency.issue_credit`
//! - Transfer conservation: the two balances of a transfer sum to the same
//!   total before and after
//! - Ledger conservation: `sum(org credit) + agency.credit == agency.issue_credit`

use crate::domain::entities::{Account, Agency, Org};
use std::fmt;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// The agency never holds more than it ever issued.
#[must_use]
pub fn check_agency_supply_invariant(agency: &Agency) -> bool {
    agency.credit <= agency.issue_credit
}

/// A transfer neither creates nor destroys credit.
#[must_use]
pub fn check_transfer_conservation_invariant(
    before: u128,
    source: &Account,
    destination: &Account,
) -> bool {
    before == pair_total(source, destination)
}

/// Everything issued is held by the agency or an org.
#[must_use]
pub fn check_ledger_conservation_invariant<'a>(
    agency: &Agency,
    orgs: impl IntoIterator<Item = &'a Org>,
) -> bool {
    let held: u128 = orgs.into_iter().map(|org| u128::from(org.org_credit)).sum();
    held + u128::from(agency.credit) == u128::from(agency.issue_credit)
}

/// Combined balance of two accounts, without overflow.
#[must_use]
pub fn pair_total(a: &Account, b: &Account) -> u128 {
    u128::from(a.balance()) + u128::from(b.balance())
}

/// Checks the agency supply invariant, returning the violation if any.
pub fn ensure_agency_supply(agency: &Agency) -> Result<(), InvariantViolation> {
    if check_agency_supply_invariant(agency) {
        Ok(())
    } else {
        Err(InvariantViolation::AgencyOverSupply {
            credit: agency.credit,
            issued: agency.issue_credit,
        })
    }
}

/// Checks transfer conservation, returning the violation if any.
pub fn ensure_transfer_conserved(
    before: u128,
    source: &Account,
    destination: &Account,
) -> Result<(), InvariantViolation> {
    if check_transfer_conservation_invariant(before, source, destination) {
        Ok(())
    } else {
        Err(InvariantViolation::CreditNotConserved {
            before,
            after: pair_total(source, destination),
        })
    }
}

// =============================================================================
// VIOLATIONS
// =============================================================================

/// A broken credit invariant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// Agency balance exceeds total issuance.
    AgencyOverSupply { credit: u64, issued: u64 },
    /// A transfer changed the combined balance.
    CreditNotConserved { before: u128, after: u128 },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AgencyOverSupply { credit, issued } => {
                write!(f, "agency credit {credit} exceeds issued {issued}")
            }
            Self::CreditNotConserved { before, after } => {
                write!(f, "transfer changed total credit from {before} to {after}")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}

// =============================================================================
// TESTS
// =============================================================================
