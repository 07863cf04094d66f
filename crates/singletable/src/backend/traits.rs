use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use singletable_core::table::{TableSchema, TableStatus};

use super::BackendError;

/// A raw item: attribute name to attribute value.
pub type Item = HashMap<String, AttributeValue>;

/// Result type for backend calls.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Item-level operations used by the entity store.
#[async_trait]
pub trait ItemBackend: Send + Sync {
    /// Writes an item, replacing any item with the same key.
    async fn put_item(&self, table_name: &str, item: Item) -> Result<()>;

    /// Reads one item by its full key, returning only `projection` fields
    /// (all fields when empty). `Ok(None)` means the item does not exist.
    async fn get_item(
        &self,
        table_name: &str,
        key: Item,
        projection: &[&str],
    ) -> Result<Option<Item>>;

    /// Reads every item in one partition, ordered by sort key.
    async fn query(&self, table_name: &str, partition_key: &str) -> Result<Vec<Item>>;
}

/// Table-level operations used by the lifecycle manager.
#[async_trait]
pub trait TableAdmin: Send + Sync {
    /// Issues the create request; does not wait for the table to be usable.
    async fn create_table(&self, schema: &TableSchema) -> Result<()>;

    /// Returns the table's current status.
    async fn describe_table(&self, table_name: &str) -> Result<TableStatus>;

    /// Issues the delete request; does not wait for the table to be gone.
    async fn delete_table(&self, table_name: &str) -> Result<()>;
}
