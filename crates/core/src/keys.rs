//! Single-table key encoding.
//!
//! Pure functions for building and splitting the composite `pk`/`sk` keys.
//! All functions are sync and have no side effects.

use thiserror::Error;

/// Separator between the kind prefix and the entity ID.
pub const KEY_SEPARATOR: char = '#';

/// Key prefix for user items.
pub const USER_PREFIX: &str = "USER";

/// Errors produced while encoding or decoding keys.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Malformed key '{key}': missing '#' separator")]
    Malformed { key: String },
    #[error("Invalid entity ID '{id}': must not contain '#'")]
    InvalidId { id: String },
}

/// Partition and sort key of a stored item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeKey {
    pub partition_key: String,
    pub sort_key: String,
}

/// Kind and ID recovered from a partition key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedKey {
    pub kind: String,
    pub id: String,
}

/// Generate the composite key for an entity.
///
/// Pattern: `<KIND>#<id>` for both keys. The sort key mirrors the partition
/// key so every entity is a single-item collection.
pub fn encode(kind: &str, id: &str) -> CompositeKey {
    let key = format!("{kind}{KEY_SEPARATOR}{id}");
    CompositeKey {
        partition_key: key.clone(),
        sort_key: key,
    }
}

/// Split a partition key back into kind and ID.
///
/// The ID is everything after the first separator. The kind is not checked
/// against any discriminator here.
pub fn decode(partition_key: &str) -> Result<DecodedKey, KeyError> {
    let (kind, id) =
        partition_key
            .split_once(KEY_SEPARATOR)
            .ok_or_else(|| KeyError::Malformed {
                key: partition_key.to_string(),
            })?;

    Ok(DecodedKey {
        kind: kind.to_string(),
        id: id.to_string(),
    })
}

/// Reject IDs that would make key decoding ambiguous.
pub fn validate_id(id: &str) -> Result<(), KeyError> {
    if id.contains(KEY_SEPARATOR) {
        return Err(KeyError::InvalidId { id: id.to_string() });
    }
    Ok(())
}

/// Generate the partition key for a user.
///
/// Pattern: `USER#<user_id>`
pub fn user_pk(user_id: &str) -> String {
    encode(USER_PREFIX, user_id).partition_key
}
