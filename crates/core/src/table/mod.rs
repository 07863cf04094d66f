//! Table schema and provisioning rules (Functional Core - pure data).

mod config;
mod policy;
mod status;

pub use config::{
    single_table_schema, AttributeType, BillingMode, KeyAttribute, TableSchema,
};
pub use policy::{next_poll_action, PollAction, ProvisionPolicy};
pub use status::{LifecycleState, TableStatus};
