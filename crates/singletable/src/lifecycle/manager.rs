//! Provisioning and teardown of single-table schemas (Imperative Shell).
//!
//! The poll decision itself lives in `singletable_core::table::next_poll_action`;
//! this module only performs the I/O and the sleeps around it.

use singletable_core::table::{
    next_poll_action, single_table_schema, PollAction, ProvisionPolicy,
};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use super::error::{LifecycleError, Result, TeardownOutcome};
use crate::backend::TableAdmin;

/// A table that reached `ACTIVE` and is owned by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedTable {
    name: String,
}

impl ProvisionedTable {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Creates tables, waits for them, and deletes them.
#[derive(Debug, Clone)]
pub struct TableManager<A> {
    admin: A,
    policy: ProvisionPolicy,
}

impl<A: TableAdmin> TableManager<A> {
    /// Creates a manager with the default provisioning policy.
    pub fn new(admin: A) -> Self {
        Self {
            admin,
            policy: ProvisionPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: ProvisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &ProvisionPolicy {
        &self.policy
    }

    pub fn admin(&self) -> &A {
        &self.admin
    }

    /// Creates `table_name` with the single-table schema and waits until it is
    /// active.
    ///
    /// Sleeps `initial_delay` once, then polls every `poll_interval`. Fails
    /// with [`LifecycleError::ProvisioningTimeout`] once more than `timeout`
    /// has passed since the create request.
    pub async fn provision(&self, table_name: &str) -> Result<ProvisionedTable> {
        let schema = single_table_schema(table_name);
        for line in schema.summary_lines() {
            debug!(table = %table_name, "{}", line);
        }

        info!(table = %table_name, "Creating table");
        let started = Instant::now();
        self.admin
            .create_table(&schema)
            .await
            .map_err(|source| LifecycleError::CreateFailed {
                table_name: table_name.to_string(),
                source,
            })?;

        sleep(self.policy.initial_delay).await;

        loop {
            let status = self.admin.describe_table(table_name).await.map_err(|source| {
                LifecycleError::DescribeFailed {
                    table_name: table_name.to_string(),
                    source,
                }
            })?;
            let elapsed = started.elapsed();
            debug!(table = %table_name, status = %status, ?elapsed, "Polled table status");

            match next_poll_action(&status, elapsed, &self.policy) {
                PollAction::Ready => {
                    info!(table = %table_name, ?elapsed, "Table is active");
                    return Ok(ProvisionedTable {
                        name: table_name.to_string(),
                    });
                }
                PollAction::Wait(interval) => sleep(interval).await,
                PollAction::TimedOut => {
                    return Err(LifecycleError::ProvisioningTimeout {
                        table_name: table_name.to_string(),
                        elapsed,
                        last_status: status,
                    });
                }
            }
        }
    }

    /// Deletes a provisioned table. Consumes it so the delete runs once.
    pub async fn teardown(&self, table: ProvisionedTable) -> TeardownOutcome {
        self.teardown_table(&table.name).await
    }

    /// Issues a single delete request without waiting for completion.
    ///
    /// A failure is logged and returned as [`TeardownOutcome::Failed`], never
    /// as an error.
    pub async fn teardown_table(&self, table_name: &str) -> TeardownOutcome {
        info!(table = %table_name, "Deleting table");
        match self.admin.delete_table(table_name).await {
            Ok(()) => {
                info!(table = %table_name, "Delete requested");
                TeardownOutcome::Deleted
            }
            Err(e) => {
                warn!(
                    table = %table_name,
                    error = %e,
                    "Failed to delete table; it may keep incurring charges"
                );
                TeardownOutcome::Failed(e)
            }
        }
    }
}
