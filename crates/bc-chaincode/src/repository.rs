//! # Entity Repositories
//!
//! Typed read/write access to one entity type, built from the key codec,
//! the serializer and the ledger port. Side effects are confined to the
//! ledger.

use crate::codec;
use crate::domain::entities::{Agency, BlackRecord, LedgerEntity, Org, Transaction};
use crate::domain::keys::key_for;
use crate::errors::RepositoryError;
use crate::ports::outbound::Ledger;
use std::marker::PhantomData;
use tracing::trace;

/// Agency repository.
pub type AgencyRepository<'l, L> = Repository<'l, L, Agency>;
/// Org repository.
pub type OrgRepository<'l, L> = Repository<'l, L, Org>;
/// BlackRecord repository.
pub type BlackRecordRepository<'l, L> = Repository<'l, L, BlackRecord>;
/// Transaction repository.
pub type TransactionRepository<'l, L> = Repository<'l, L, Transaction>;

/// A decoded entity together with the exact bytes it was stored as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredDocument<E> {
    pub entity: E,
    pub bytes: Vec<u8>,
}

/// Read/write operations for entities of type `E`.
pub struct Repository<'l, L: Ledger + ?Sized, E: LedgerEntity> {
    ledger: &'l L,
    _entity: PhantomData<fn() -> E>,
}

impl<'l, L: Ledger + ?Sized, E: LedgerEntity> Repository<'l, L, E> {
    /// Binds a repository to a ledger.
    #[must_use]
    pub fn new(ledger: &'l L) -> Self {
        Self {
            ledger,
            _entity: PhantomData,
        }
    }

    /// Serializes and writes the entity under its key.
    pub fn put(&self, entity: &E) -> Result<(), RepositoryError> {
        let bytes = codec::encode(entity)?;
        let key = entity.key();
        trace!(key = %key, bytes = bytes.len(), "put state");
        self.ledger
            .put_state(&key, bytes)
            .map_err(|source| RepositoryError::StorageWrite { key, source })
    }

    /// Reads and decodes the entity; a missing key is a read error.
    pub fn get(&self, id: &str) -> Result<E, RepositoryError> {
        self.find(id)?.ok_or_else(|| RepositoryError::Missing {
            key: key_for(E::KIND, id),
        })
    }

    /// Reads and decodes the entity if present.
    pub fn find(&self, id: &str) -> Result<Option<E>, RepositoryError> {
        Ok(self.fetch(id)?.map(|doc| doc.entity))
    }

    /// Reads the entity together with its raw stored bytes.
    ///
    /// The bytes are validated by decoding before being handed out.
    pub fn fetch(&self, id: &str) -> Result<Option<StoredDocument<E>>, RepositoryError> {
        let key = key_for(E::KIND, id);
        let Some(bytes) = self
            .ledger
            .get_state(&key)
            .map_err(|source| RepositoryError::StorageRead {
                key: key.clone(),
                source,
            })?
        else {
            trace!(key = %key, "state absent");
            return Ok(None);
        };
        let entity = codec::decode(&bytes)?;
        Ok(Some(StoredDocument { entity, bytes }))
    }

    /// Returns true if a document exists under the entity's key.
    pub fn exists(&self, id: &str) -> Result<bool, RepositoryError> {
        let key = key_for(E::KIND, id);
        self.ledger
            .has_state(&key)
            .map_err(|source| RepositoryError::StorageRead { key, source })
    }

    /// Removes the entity's key.
    pub fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        let key = key_for(E::KIND, id);
        trace!(key = %key, "delete state");
        self.ledger
            .delete_state(&key)
            .map_err(|source| RepositoryError::StorageWrite { key, source })
    }
}

// =============================================================================
// TESTS
// =============================================================================
