//! Error types for table commands.

use singletable::backend::BackendError;
use singletable::lifecycle::LifecycleError;
use thiserror::Error;

/// Result type alias for table module.
pub type Result<T> = std::result::Result<T, TableError>;

/// Errors that can occur during table commands.
#[derive(Error, Debug)]
pub enum TableError {
    #[error(transparent)]
    Provision(#[from] LifecycleError),

    #[error("Teardown of '{table_name}' failed: {source}")]
    TeardownFailed {
        table_name: String,
        #[source]
        source: BackendError,
    },

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("Operation cancelled by user")]
    UserCancelled,
}
