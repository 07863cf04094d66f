//! Table lifecycle: create, wait until active, tear down.

mod error;
mod manager;
mod naming;

pub use error::{LifecycleError, Result, TeardownOutcome};
pub use manager::{ProvisionedTable, TableManager};
pub use naming::generate_table_name;
