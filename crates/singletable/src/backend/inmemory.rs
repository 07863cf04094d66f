//! In-memory backend implementation.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use singletable_core::record::{PK_FIELD, SK_FIELD};
use singletable_core::table::{TableSchema, TableStatus};
use tokio::sync::{RwLock, RwLockWriteGuard};

use super::{BackendError, Item, ItemBackend, Result, TableAdmin};

/// Backend operations, used for fault injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    PutItem,
    GetItem,
    Query,
    CreateTable,
    DescribeTable,
    DeleteTable,
}

/// When a newly created table reports `ACTIVE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activation {
    /// The first describe already reports `ACTIVE`.
    #[default]
    Immediate,
    /// The first `n` describes report `CREATING`.
    AfterPolls(usize),
    /// The table stays `CREATING` forever.
    Never,
}

#[derive(Debug)]
struct Table {
    schema: TableSchema,
    polls: usize,
    items: BTreeMap<(String, String), Item>,
}

#[derive(Debug, Default)]
struct State {
    tables: HashMap<String, Table>,
    failures: HashMap<Operation, BackendError>,
    calls: HashMap<Operation, usize>,
}

/// In-memory storage backend for testing.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access; clones
/// share the same data. Data is lost when the last clone is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBackend {
    state: Arc<RwLock<State>>,
    activation: Activation,
}

impl InMemoryBackend {
    /// Creates an empty backend whose tables become active immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets when newly created tables report `ACTIVE`.
    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    /// Makes every subsequent call to `operation` fail with `error`.
    pub async fn fail_on(&self, operation: Operation, error: BackendError) {
        self.state.write().await.failures.insert(operation, error);
    }

    /// Removes all injected failures.
    pub async fn clear_failures(&self) {
        self.state.write().await.failures.clear();
    }

    /// Number of times `operation` was attempted, including failed attempts.
    pub async fn call_count(&self, operation: Operation) -> usize {
        self.state
            .read()
            .await
            .calls
            .get(&operation)
            .copied()
            .unwrap_or(0)
    }

    /// Whether a table with this name currently exists.
    pub async fn table_exists(&self, table_name: &str) -> bool {
        self.state.read().await.tables.contains_key(table_name)
    }

    /// Schema the table was created with.
    pub async fn table_schema(&self, table_name: &str) -> Option<TableSchema> {
        self.state
            .read()
            .await
            .tables
            .get(table_name)
            .map(|table| table.schema.clone())
    }

    /// Number of items stored in a table (0 if it does not exist).
    pub async fn item_count(&self, table_name: &str) -> usize {
        self.state
            .read()
            .await
            .tables
            .get(table_name)
            .map(|table| table.items.len())
            .unwrap_or(0)
    }

    /// Counts the call and returns the injected failure, if any.
    async fn begin(&self, operation: Operation) -> Result<RwLockWriteGuard<'_, State>> {
        let mut state = self.state.write().await;
        *state.calls.entry(operation).or_insert(0) += 1;
        if let Some(error) = state.failures.get(&operation) {
            return Err(error.clone());
        }
        Ok(state)
    }

    fn status_after(&self, polls: usize) -> TableStatus {
        match self.activation {
            Activation::Immediate => TableStatus::Active,
            Activation::AfterPolls(n) if polls > n => TableStatus::Active,
            Activation::AfterPolls(_) | Activation::Never => TableStatus::Creating,
        }
    }
}

fn item_key(item: &Item) -> Result<(String, String)> {
    let field = |name: &str| {
        item.get(name)
            .and_then(|v| v.as_s().ok())
            .cloned()
            .ok_or_else(|| BackendError::InvalidRequest(format!("missing string key field: {name}")))
    };
    Ok((field(PK_FIELD)?, field(SK_FIELD)?))
}

fn table_mut<'a>(state: &'a mut State, table_name: &str) -> Result<&'a mut Table> {
    state
        .tables
        .get_mut(table_name)
        .ok_or_else(|| BackendError::TableNotFound(table_name.to_string()))
}

#[async_trait]
impl ItemBackend for InMemoryBackend {
    async fn put_item(&self, table_name: &str, item: Item) -> Result<()> {
        let mut state = self.begin(Operation::PutItem).await?;
        let key = item_key(&item)?;
        table_mut(&mut state, table_name)?.items.insert(key, item);
        Ok(())
    }

    async fn get_item(
        &self,
        table_name: &str,
        key: Item,
        projection: &[&str],
    ) -> Result<Option<Item>> {
        let mut state = self.begin(Operation::GetItem).await?;
        let key = item_key(&key)?;
        let table = table_mut(&mut state, table_name)?;

        Ok(table.items.get(&key).map(|item| {
            if projection.is_empty() {
                item.clone()
            } else {
                item.iter()
                    .filter(|(name, _)| projection.contains(&name.as_str()))
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect()
            }
        }))
    }

    async fn query(&self, table_name: &str, partition_key: &str) -> Result<Vec<Item>> {
        let mut state = self.begin(Operation::Query).await?;
        let table = table_mut(&mut state, table_name)?;

        Ok(table
            .items
            .iter()
            .filter(|((pk, _), _)| pk == partition_key)
            .map(|(_, item)| item.clone())
            .collect())
    }
}

#[async_trait]
impl TableAdmin for InMemoryBackend {
    async fn create_table(&self, schema: &TableSchema) -> Result<()> {
        let mut state = self.begin(Operation::CreateTable).await?;
        if state.tables.contains_key(&schema.table_name) {
            return Err(BackendError::TableInUse(schema.table_name.clone()));
        }
        state.tables.insert(
            schema.table_name.clone(),
            Table {
                schema: schema.clone(),
                polls: 0,
                items: BTreeMap::new(),
            },
        );
        Ok(())
    }

    async fn describe_table(&self, table_name: &str) -> Result<TableStatus> {
        let mut state = self.begin(Operation::DescribeTable).await?;
        let table = table_mut(&mut state, table_name)?;
        table.polls += 1;
        let polls = table.polls;
        Ok(self.status_after(polls))
    }

    async fn delete_table(&self, table_name: &str) -> Result<()> {
        let mut state = self.begin(Operation::DeleteTable).await?;
        state
            .tables
            .remove(table_name)
            .map(|_| ())
            .ok_or_else(|| BackendError::TableNotFound(table_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_dynamodb::types::AttributeValue;
    use singletable_core::table::single_table_schema;

    fn item(pk: &str, sk: &str, tier: &str) -> Item {
        HashMap::from([
            ("pk".to_string(), AttributeValue::S(pk.to_string())),
            ("sk".to_string(), AttributeValue::S(sk.to_string())),
            ("userTier".to_string(), AttributeValue::S(tier.to_string())),
        ])
    }

    fn key(pk: &str, sk: &str) -> Item {
        HashMap::from([
            ("pk".to_string(), AttributeValue::S(pk.to_string())),
            ("sk".to_string(), AttributeValue::S(sk.to_string())),
        ])
    }

    async fn backend_with_table(name: &str) -> InMemoryBackend {
        let backend = InMemoryBackend::new();
        backend
            .create_table(&single_table_schema(name))
            .await
            .unwrap();
        backend
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let backend = backend_with_table("t").await;
        backend
            .put_item("t", item("USER#a", "USER#a", "FREE"))
            .await
            .unwrap();

        let found = backend
            .get_item("t", key("USER#a", "USER#a"), &[])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get("userTier").unwrap().as_s().unwrap(), "FREE");
    }

    #[tokio::test]
    async fn test_get_missing_item_is_none() {
        let backend = backend_with_table("t").await;
        let found = backend
            .get_item("t", key("USER#a", "USER#a"), &[])
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_get_applies_projection() {
        let backend = backend_with_table("t").await;
        backend
            .put_item("t", item("USER#a", "USER#a", "FREE"))
            .await
            .unwrap();

        let found = backend
            .get_item("t", key("USER#a", "USER#a"), &["pk", "sk"])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.len(), 2);
        assert!(!found.contains_key("userTier"));
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let backend = backend_with_table("t").await;
        backend
            .put_item("t", item("USER#a", "USER#a", "FREE"))
            .await
            .unwrap();
        backend
            .put_item("t", item("USER#a", "USER#a", "PREMIUM"))
            .await
            .unwrap();

        assert_eq!(backend.item_count("t").await, 1);
        let found = backend
            .get_item("t", key("USER#a", "USER#a"), &[])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.get("userTier").unwrap().as_s().unwrap(), "PREMIUM");
    }

    #[tokio::test]
    async fn test_put_without_key_is_rejected() {
        let backend = backend_with_table("t").await;
        let mut bad = item("USER#a", "USER#a", "FREE");
        bad.remove("sk");

        let err = backend.put_item("t", bad).await.unwrap_err();
        assert!(matches!(err, BackendError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_query_returns_partition_in_sort_order() {
        let backend = backend_with_table("t").await;
        backend
            .put_item("t", item("USER#a", "ORDER#2", "x"))
            .await
            .unwrap();
        backend
            .put_item("t", item("USER#a", "ORDER#1", "x"))
            .await
            .unwrap();
        backend
            .put_item("t", item("USER#b", "USER#b", "x"))
            .await
            .unwrap();

        let items = backend.query("t", "USER#a").await.unwrap();
        let sort_keys: Vec<&str> = items
            .iter()
            .map(|i| i.get("sk").unwrap().as_s().unwrap().as_str())
            .collect();
        assert_eq!(sort_keys, vec!["ORDER#1", "ORDER#2"]);
    }

    #[tokio::test]
    async fn test_item_operations_on_missing_table() {
        let backend = InMemoryBackend::new();
        let err = backend
            .put_item("missing", item("USER#a", "USER#a", "FREE"))
            .await
            .unwrap_err();
        assert_eq!(err, BackendError::TableNotFound("missing".to_string()));
    }

    #[tokio::test]
    async fn test_create_existing_table_is_in_use() {
        let backend = backend_with_table("t").await;
        let err = backend
            .create_table(&single_table_schema("t"))
            .await
            .unwrap_err();
        assert_eq!(err, BackendError::TableInUse("t".to_string()));
    }

    #[tokio::test]
    async fn test_activation_after_polls() {
        let backend = InMemoryBackend::new().with_activation(Activation::AfterPolls(2));
        backend
            .create_table(&single_table_schema("t"))
            .await
            .unwrap();

        assert_eq!(backend.describe_table("t").await.unwrap(), TableStatus::Creating);
        assert_eq!(backend.describe_table("t").await.unwrap(), TableStatus::Creating);
        assert_eq!(backend.describe_table("t").await.unwrap(), TableStatus::Active);
    }

    #[tokio::test]
    async fn test_delete_table() {
        let backend = backend_with_table("t").await;
        backend.delete_table("t").await.unwrap();

        assert!(!backend.table_exists("t").await);
        assert_eq!(
            backend.describe_table("t").await.unwrap_err(),
            BackendError::TableNotFound("t".to_string())
        );
    }

    #[tokio::test]
    async fn test_injected_failure_is_counted() {
        let backend = backend_with_table("t").await;
        backend
            .fail_on(Operation::DeleteTable, BackendError::Throttled)
            .await;

        assert_eq!(
            backend.delete_table("t").await.unwrap_err(),
            BackendError::Throttled
        );
        assert_eq!(backend.call_count(Operation::DeleteTable).await, 1);
        assert!(backend.table_exists("t").await);

        backend.clear_failures().await;
        backend.delete_table("t").await.unwrap();
        assert_eq!(backend.call_count(Operation::DeleteTable).await, 2);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let backend = backend_with_table("t").await;
        let clone = backend.clone();
        clone
            .put_item("t", item("USER#a", "USER#a", "FREE"))
            .await
            .unwrap();
        assert_eq!(backend.item_count("t").await, 1);
    }
}
