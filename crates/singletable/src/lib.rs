//! Single-table DynamoDB access layer with ephemeral test tables.
//!
//! The crate is the imperative shell around `singletable_core`:
//!
//! - [`backend`]: the narrow capability traits the rest of the crate talks to,
//!   a DynamoDB implementation and an in-memory fake.
//! - [`store`]: point writes and point reads of entities keyed by `pk`/`sk`.
//! - [`lifecycle`]: create a table, wait for it to become active, tear it down.
//! - [`testing`]: a fixture that ties the above together for test runs.
//!
//! ```no_run
//! use singletable::backend::DynamoDbBackend;
//! use singletable::config::Config;
//! use singletable::testing::TestTable;
//! use singletable::{Tier, User};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env();
//! let backend = DynamoDbBackend::from_config(&config).await;
//! let table = TestTable::setup(backend, config.provision).await?;
//!
//! let store = table.store();
//! store.create::<User>("first-id", Tier::Free).await?;
//! let user: User = store.get("first-id").await?;
//! assert_eq!(user.tier, Tier::Free);
//!
//! table.cleanup().await;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod client;
pub mod config;
pub mod lifecycle;
pub mod store;
pub mod testing;

pub use singletable_core::entity::{DecodeError, Entity, Tier, User};
pub use singletable_core::keys::KeyError;
pub use singletable_core::table::{LifecycleState, ProvisionPolicy, TableStatus};
