//! Stored record shape.
//!
//! A record is the flat physical representation of an entity: the composite
//! keys, the discriminator and the kind-specific string fields. Conversion to
//! and from the backend's attribute maps happens in the shell crate.

use thiserror::Error;

use crate::entity::{DecodeError, Entity, Fields};
use crate::keys::{self, DecodedKey, KeyError};

/// Partition key field name.
pub const PK_FIELD: &str = "pk";

/// Sort key field name.
pub const SK_FIELD: &str = "sk";

/// Discriminator field name.
pub const TYPE_NAME_FIELD: &str = "typeName";

/// Errors raised when turning a record back into an entity.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Physical representation of a single item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    pub pk: String,
    pub sk: String,
    pub type_name: String,
    pub fields: Fields,
}

impl StoredRecord {
    /// Builds the record for an entity.
    pub fn from_entity<E: Entity>(entity: &E) -> Self {
        let key = keys::encode(E::KIND, entity.id());
        Self {
            pk: key.partition_key,
            sk: key.sort_key,
            type_name: E::TYPE_NAME.to_string(),
            fields: entity.to_fields(),
        }
    }

    /// Splits the partition key into kind and ID.
    pub fn decode_key(&self) -> Result<DecodedKey, KeyError> {
        keys::decode(&self.pk)
    }

    /// Rebuilds the entity, checking the discriminator and key prefix.
    pub fn into_entity<E: Entity>(self) -> Result<E, RecordError> {
        if self.type_name != E::TYPE_NAME {
            return Err(DecodeError::DiscriminatorMismatch {
                expected: E::TYPE_NAME,
                found: self.type_name,
            }
            .into());
        }

        let decoded = self.decode_key()?;
        if decoded.kind != E::KIND {
            return Err(DecodeError::KindMismatch {
                expected: E::KIND,
                found: decoded.kind,
            }
            .into());
        }

        Ok(E::from_fields(decoded.id, &self.fields)?)
    }
}

/// Field names a point read must project to rebuild an entity of kind `E`.
pub fn projection<E: Entity>() -> Vec<&'static str> {
    let mut fields = vec![PK_FIELD, SK_FIELD];
    fields.extend_from_slice(E::ATTRIBUTE_FIELDS);
    fields.push(TYPE_NAME_FIELD);
    fields
}
