use std::time::Duration;

use singletable_core::table::TableStatus;
use thiserror::Error;

use crate::backend::BackendError;

/// Errors that abort provisioning.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Failed to create table {table_name}: {source}")]
    CreateFailed {
        table_name: String,
        #[source]
        source: BackendError,
    },
    #[error("Failed to describe table {table_name}: {source}")]
    DescribeFailed {
        table_name: String,
        #[source]
        source: BackendError,
    },
    #[error(
        "Table {table_name} not active after {elapsed:?} (last status: {last_status})"
    )]
    ProvisioningTimeout {
        table_name: String,
        elapsed: Duration,
        last_status: TableStatus,
    },
}

impl LifecycleError {
    pub fn table_name(&self) -> &str {
        match self {
            LifecycleError::CreateFailed { table_name, .. }
            | LifecycleError::DescribeFailed { table_name, .. }
            | LifecycleError::ProvisioningTimeout { table_name, .. } => table_name,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, LifecycleError::ProvisioningTimeout { .. })
    }
}

/// Result type for provisioning.
pub type Result<T> = std::result::Result<T, LifecycleError>;

/// Result of a best-effort teardown. Never raised as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeardownOutcome {
    /// The delete request was accepted.
    Deleted,
    /// The delete request failed; the table may still exist.
    Failed(BackendError),
}

impl TeardownOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, TeardownOutcome::Deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let error = LifecycleError::ProvisioningTimeout {
            table_name: "t1".to_string(),
            elapsed: Duration::from_secs(61),
            last_status: TableStatus::Creating,
        };
        assert_eq!(
            error.to_string(),
            "Table t1 not active after 61s (last status: CREATING)"
        );
        assert!(error.is_timeout());
        assert_eq!(error.table_name(), "t1");
    }

    #[test]
    fn test_create_failed_keeps_cause() {
        let error = LifecycleError::CreateFailed {
            table_name: "t1".to_string(),
            source: BackendError::TableInUse("t1".to_string()),
        };
        assert!(!error.is_timeout());
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_teardown_outcome() {
        assert!(TeardownOutcome::Deleted.is_deleted());
        assert!(!TeardownOutcome::Failed(BackendError::Throttled).is_deleted());
    }
}
