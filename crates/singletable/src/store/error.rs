use singletable_core::entity::DecodeError;
use singletable_core::keys::KeyError;
use thiserror::Error;

use crate::backend::BackendError;

/// Errors that can occur during store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error(transparent)]
    InvalidId(KeyError),
    #[error("Failed to write {entity_type} {id}: {source}")]
    Write {
        entity_type: &'static str,
        id: String,
        #[source]
        source: BackendError,
    },
    #[error("Failed to read {entity_type} {id}: {source}")]
    Read {
        entity_type: &'static str,
        id: String,
        #[source]
        source: BackendError,
    },
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Failed to decode {entity_type} {id}: {source}")]
    Decode {
        entity_type: &'static str,
        id: String,
        #[source]
        source: DecodeError,
    },
    #[error(transparent)]
    MalformedKey(KeyError),
}

impl StoreError {
    /// True when the read succeeded but no item exists.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// The backend failure behind a write or read error, if any.
    pub fn backend_error(&self) -> Option<&BackendError> {
        match self {
            StoreError::Write { source, .. } | StoreError::Read { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
