//! # Entity Serializer
//!
//! Canonical JSON encoding of ledger documents. Struct field order is the
//! declaration order, so equal entities always encode to equal bytes.

use crate::domain::entities::LedgerEntity;
use crate::errors::RepositoryError;

/// Encodes an entity into its stored document bytes.
pub fn encode<E: LedgerEntity>(entity: &E) -> Result<Vec<u8>, RepositoryError> {
    serde_json::to_vec(entity).map_err(|e| RepositoryError::Serialization {
        entity: E::KIND.tag(),
        reason: e.to_string(),
    })
}

/// Decodes stored document bytes into an entity.
pub fn decode<E: LedgerEntity>(bytes: &[u8]) -> Result<E, RepositoryError> {
    serde_json::from_slice(bytes).map_err(|e| RepositoryError::Serialization {
        entity: E::KIND.tag(),
        reason: e.to_string(),
    })
}
