//! Ephemeral table fixture for test runs.
//!
//! A [`TestTable`] owns a freshly named table for its whole life: setup
//! provisions it, [`TestTable::store`] hands out an [`EntityStore`] bound to
//! it, and [`TestTable::cleanup`] deletes it exactly once.

use std::future::Future;
use std::panic::{resume_unwind, AssertUnwindSafe};

use futures_util::FutureExt;
use singletable_core::table::{LifecycleState, ProvisionPolicy};
use tracing::warn;

use crate::backend::{ItemBackend, TableAdmin};
use crate::lifecycle::{generate_table_name, LifecycleError, TableManager, TeardownOutcome};
use crate::store::EntityStore;

/// A provisioned table plus a store bound to it.
pub struct TestTable<B>
where
    B: ItemBackend + TableAdmin + Clone,
{
    manager: TableManager<B>,
    store: EntityStore<B>,
    state: LifecycleState,
}

impl<B> TestTable<B>
where
    B: ItemBackend + TableAdmin + Clone,
{
    /// Provisions a table with a generated name.
    pub async fn setup(backend: B, policy: ProvisionPolicy) -> Result<Self, LifecycleError> {
        Self::setup_named(backend, policy, &generate_table_name()).await
    }

    /// Provisions a table with the given name.
    ///
    /// If the table was created but never became usable, a single delete is
    /// requested before the provisioning error is returned.
    pub async fn setup_named(
        backend: B,
        policy: ProvisionPolicy,
        table_name: &str,
    ) -> Result<Self, LifecycleError> {
        let manager = TableManager::new(backend.clone()).with_policy(policy);
        let table = match manager.provision(table_name).await {
            Ok(table) => table,
            Err(
                e @ (LifecycleError::DescribeFailed { .. }
                | LifecycleError::ProvisioningTimeout { .. }),
            ) => {
                let outcome = manager.teardown_table(table_name).await;
                warn!(
                    table = %table_name,
                    error = %e,
                    deleted = outcome.is_deleted(),
                    "Provisioning failed after create; requested delete"
                );
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            store: EntityStore::new(backend, table.name()),
            state: LifecycleState::Active,
            manager,
        })
    }

    /// Provisions a table, runs `body` against it, then tears it down.
    ///
    /// Cleanup runs even if `body` panics; the panic is resumed afterwards.
    pub async fn run<F, Fut, T>(
        backend: B,
        policy: ProvisionPolicy,
        body: F,
    ) -> Result<T, LifecycleError>
    where
        F: FnOnce(EntityStore<B>) -> Fut,
        Fut: Future<Output = T>,
    {
        let table = Self::setup(backend, policy).await?;
        let result = AssertUnwindSafe(body(table.store().clone()))
            .catch_unwind()
            .await;
        table.cleanup().await;

        match result {
            Ok(value) => Ok(value),
            Err(panic) => resume_unwind(panic),
        }
    }

    pub fn table_name(&self) -> &str {
        self.store.table_name()
    }

    pub fn store(&self) -> &EntityStore<B> {
        &self.store
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Deletes the table. Failures are logged and reported, never raised.
    pub async fn cleanup(mut self) -> TeardownOutcome {
        self.advance(LifecycleState::Deleting);
        let outcome = self.manager.teardown_table(self.store.table_name()).await;
        self.advance(LifecycleState::Gone);
        outcome
    }

    fn advance(&mut self, next: LifecycleState) {
        debug_assert!(self.state.can_transition_to(next), "{:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

impl<B> Drop for TestTable<B>
where
    B: ItemBackend + TableAdmin + Clone,
{
    fn drop(&mut self) {
        match self.state {
            LifecycleState::Active => warn!(
                table = %self.table_name(),
                "Test table dropped without cleanup; it may keep incurring charges"
            ),
            LifecycleState::Deleting => warn!(
                table = %self.table_name(),
                "Test table cleanup was interrupted; the delete may not have been sent"
            ),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use singletable_core::entity::{Tier, User};

    use super::*;
    use crate::backend::{Activation, BackendError, InMemoryBackend, Operation};

    fn fast_policy() -> ProvisionPolicy {
        ProvisionPolicy::default()
            .with_initial_delay(Duration::from_millis(10))
            .with_poll_interval(Duration::from_millis(10))
            .with_timeout(Duration::from_secs(1))
    }

    #[tokio::test]
    async fn test_setup_and_cleanup() {
        let backend = InMemoryBackend::new();

        let table = TestTable::setup(backend.clone(), fast_policy())
            .await
            .unwrap();
        let name = table.table_name().to_string();
        assert_eq!(table.state(), LifecycleState::Active);
        assert!(backend.table_exists(&name).await);

        let outcome = table.cleanup().await;
        assert!(outcome.is_deleted());
        assert!(!backend.table_exists(&name).await);
    }

    #[tokio::test]
    async fn test_scenario_in_fresh_table() {
        let backend = InMemoryBackend::new();
        let table = TestTable::setup(backend.clone(), fast_policy())
            .await
            .unwrap();
        let store = table.store();

        store.create_user("first-id", Tier::Free).await.unwrap();
        store.create_user("second-id", Tier::Free).await.unwrap();
        store.create_user("third-id", Tier::Premium).await.unwrap();

        assert_eq!(
            store.get_user("first-id").await.unwrap(),
            User::new("first-id", Tier::Free)
        );
        assert_eq!(
            store.get_user("second-id").await.unwrap(),
            User::new("second-id", Tier::Free)
        );
        assert_eq!(
            store.get_user("third-id").await.unwrap(),
            User::new("third-id", Tier::Premium)
        );

        assert!(table.cleanup().await.is_deleted());
    }

    #[tokio::test]
    async fn test_setup_names_are_unique() {
        let backend = InMemoryBackend::new();
        let a = TestTable::setup(backend.clone(), fast_policy())
            .await
            .unwrap();
        let b = TestTable::setup(backend.clone(), fast_policy())
            .await
            .unwrap();

        assert_ne!(a.table_name(), b.table_name());

        a.cleanup().await;
        b.cleanup().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_setup_timeout_deletes_created_table() {
        let backend = InMemoryBackend::new().with_activation(Activation::Never);

        let result = TestTable::setup_named(backend.clone(), fast_policy(), "slow").await;

        assert!(matches!(
            result,
            Err(LifecycleError::ProvisioningTimeout { .. })
        ));
        assert!(!backend.table_exists("slow").await);
        assert_eq!(backend.call_count(Operation::DeleteTable).await, 1);
    }

    #[tokio::test]
    async fn test_setup_describe_failure_deletes_created_table() {
        let backend = InMemoryBackend::new();
        backend
            .fail_on(
                Operation::DescribeTable,
                BackendError::Connection("reset".to_string()),
            )
            .await;

        let result = TestTable::setup_named(backend.clone(), fast_policy(), "t1").await;

        assert!(matches!(result, Err(LifecycleError::DescribeFailed { .. })));
        assert!(!backend.table_exists("t1").await);
        assert_eq!(backend.call_count(Operation::DeleteTable).await, 1);
    }

    #[tokio::test]
    async fn test_setup_create_failure_skips_delete() {
        let backend = InMemoryBackend::new();
        backend
            .fail_on(Operation::CreateTable, BackendError::Throttled)
            .await;

        let result = TestTable::setup_named(backend.clone(), fast_policy(), "t1").await;

        assert!(matches!(result, Err(LifecycleError::CreateFailed { .. })));
        assert_eq!(backend.call_count(Operation::DeleteTable).await, 0);
    }

    #[tokio::test]
    async fn test_cleanup_failure_is_reported_once() {
        let backend = InMemoryBackend::new();
        let table = TestTable::setup_named(backend.clone(), fast_policy(), "t1")
            .await
            .unwrap();
        backend
            .fail_on(Operation::DeleteTable, BackendError::Throttled)
            .await;

        let outcome = table.cleanup().await;

        assert_eq!(outcome, TeardownOutcome::Failed(BackendError::Throttled));
        assert_eq!(backend.call_count(Operation::DeleteTable).await, 1);
    }

    #[tokio::test]
    async fn test_run_cleans_up_after_body() {
        let backend = InMemoryBackend::new();

        let tier = TestTable::run(backend.clone(), fast_policy(), |store| async move {
            store.create_user("first-id", Tier::Premium).await.unwrap();
            store.get_user("first-id").await.unwrap().tier
        })
        .await
        .unwrap();

        assert_eq!(tier, Tier::Premium);
        assert_eq!(backend.call_count(Operation::DeleteTable).await, 1);
    }

    #[tokio::test]
    async fn test_run_cleans_up_after_panic() {
        let backend = InMemoryBackend::new();
        let task_backend = backend.clone();

        let joined = tokio::spawn(async move {
            TestTable::run(task_backend, fast_policy(), |store| async move {
                store.create_user("first-id", Tier::Free).await.unwrap();
                store.get_user("not#valid").await.unwrap();
            })
            .await
        })
        .await;

        assert!(joined.unwrap_err().is_panic());
        assert_eq!(backend.call_count(Operation::DeleteTable).await, 1);
    }
}
