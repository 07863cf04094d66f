//! Entity store over an [`ItemBackend`].
//!
//! Every operation is a single backend round trip with no retries. Writes are
//! unconditional, so a second create with the same ID replaces the item.

use singletable_core::entity::{Entity, Tier, User};
use singletable_core::keys;
use singletable_core::record::{self, RecordError, StoredRecord};
use tracing::debug;

use super::conversions::{item_to_record, key_to_item, record_to_item};
use super::error::{Result, StoreError};
use crate::backend::{Item, ItemBackend};

/// Point reads and writes of entities in one table.
#[derive(Debug, Clone)]
pub struct EntityStore<B> {
    backend: B,
    table_name: String,
}

impl<B: ItemBackend> EntityStore<B> {
    /// Creates a store bound to `table_name`.
    pub fn new(backend: B, table_name: impl Into<String>) -> Self {
        Self {
            backend,
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Writes an entity, replacing any item stored under the same key.
    ///
    /// Returns the entity built from the input; nothing is read back.
    pub async fn create<E: Entity>(
        &self,
        id: impl Into<String>,
        attributes: E::Attributes,
    ) -> Result<E> {
        let id = id.into();
        keys::validate_id(&id).map_err(StoreError::InvalidId)?;

        let entity = E::from_parts(id, attributes);
        let record = StoredRecord::from_entity(&entity);
        debug!(table = %self.table_name, pk = %record.pk, "Putting item");

        self.backend
            .put_item(&self.table_name, record_to_item(&record))
            .await
            .map_err(|source| StoreError::Write {
                entity_type: E::KIND,
                id: entity.id().to_string(),
                source,
            })?;

        Ok(entity)
    }

    /// Reads an entity by ID.
    ///
    /// A successful call with no payload is [`StoreError::NotFound`]; a failed
    /// call is [`StoreError::Read`].
    pub async fn get<E: Entity>(&self, id: &str) -> Result<E> {
        keys::validate_id(id).map_err(StoreError::InvalidId)?;

        let key = keys::encode(E::KIND, id);
        let projection = record::projection::<E>();
        debug!(table = %self.table_name, pk = %key.partition_key, "Getting item");

        let item = self
            .backend
            .get_item(&self.table_name, key_to_item(&key), &projection)
            .await
            .map_err(|source| StoreError::Read {
                entity_type: E::KIND,
                id: id.to_string(),
                source,
            })?;

        match item {
            Some(item) if !item.is_empty() => decode_item(&item, id),
            _ => Err(StoreError::NotFound {
                entity_type: E::KIND,
                id: id.to_string(),
            }),
        }
    }

    /// Reads every entity stored in the partition of `id`.
    ///
    /// With one item per partition this yields zero or one entity.
    pub async fn partition<E: Entity>(&self, id: &str) -> Result<Vec<E>> {
        keys::validate_id(id).map_err(StoreError::InvalidId)?;

        let key = keys::encode(E::KIND, id);
        debug!(table = %self.table_name, pk = %key.partition_key, "Querying partition");

        let items = self
            .backend
            .query(&self.table_name, &key.partition_key)
            .await
            .map_err(|source| StoreError::Read {
                entity_type: E::KIND,
                id: id.to_string(),
                source,
            })?;

        items.iter().map(|item| decode_item(item, id)).collect()
    }

    /// Creates a user with the given tier.
    pub async fn create_user(&self, id: impl Into<String>, tier: Tier) -> Result<User> {
        self.create::<User>(id, tier).await
    }

    /// Reads a user by ID.
    pub async fn get_user(&self, id: &str) -> Result<User> {
        self.get::<User>(id).await
    }
}

fn decode_item<E: Entity>(item: &Item, id: &str) -> Result<E> {
    let decode_error = |source| StoreError::Decode {
        entity_type: E::KIND,
        id: id.to_string(),
        source,
    };

    let record = item_to_record(item, E::ATTRIBUTE_FIELDS).map_err(decode_error)?;
    record.into_entity::<E>().map_err(|e| match e {
        RecordError::Key(key_error) => StoreError::MalformedKey(key_error),
        RecordError::Decode(source) => decode_error(source),
    })
}
