//! # Key Codec
//!
//! Composite state-store keys of the form `<TypeTag>:<id>`.
//! The agency is a singleton stored under the bare tag `Agency`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal key of the singleton agency document.
pub const AGENCY_KEY: &str = "Agency";

/// Entity types addressable in the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Central issuing authority (singleton).
    Agency,
    /// Member organization.
    Org,
    /// Derogatory record against a client.
    BlackRecord,
    /// Credit movement.
    Transaction,
}

impl EntityKind {
    /// Type tag used as the key prefix.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Agency => "Agency",
            Self::Org => "Org",
            Self::BlackRecord => "BlackRecord",
            Self::Transaction => "Transaction",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Builds the state key for an entity.
///
/// The id is ignored for [`EntityKind::Agency`].
#[must_use]
pub fn key_for(kind: EntityKind, id: &str) -> String {
    match kind {
        EntityKind::Agency => AGENCY_KEY.to_string(),
        _ => format!("{}:{id}", kind.tag()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format() {
        assert_eq!(key_for(EntityKind::Org, "org1"), "Org:org1");
        assert_eq!(key_for(EntityKind::BlackRecord, "rec1"), "BlackRecord:rec1");
        assert_eq!(key_for(EntityKind::Transaction, "tx-9"), "Transaction:tx-9");
    }

    #[test]
    fn test_agency_key_is_singleton() {
        assert_eq!(key_for(EntityKind::Agency, "anything"), "Agency");
        assert_eq!(key_for(EntityKind::Agency, ""), AGENCY_KEY);
    }

    #[test]
    fn test_keys_do_not_collide_across_kinds() {
        let org = key_for(EntityKind::Org, "x");
        let record = key_for(EntityKind::BlackRecord, "x");
        let tx = key_for(EntityKind::Transaction, "x");
        assert_ne!(org, record);
        assert_ne!(record, tx);
        assert_ne!(org, tx);
    }

    #[test]
    fn test_ids_with_separator_stay_distinct() {
        assert_ne!(
            key_for(EntityKind::Org, "a:b"),
            key_for(EntityKind::Org, "a")
        );
    }
}
