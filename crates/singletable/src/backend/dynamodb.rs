//! DynamoDB backend (Imperative Shell).

use async_trait::async_trait;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, BillingMode as AwsBillingMode, KeySchemaElement, KeyType,
    ScalarAttributeType, TableStatus as AwsTableStatus,
};
use aws_sdk_dynamodb::Client;
use singletable_core::record::PK_FIELD;
use singletable_core::table::{AttributeType, BillingMode, KeyAttribute, TableSchema, TableStatus};

use super::error::{
    map_build_error, map_create_table_error, map_delete_table_error, map_describe_table_error,
    map_get_item_error, map_put_item_error, map_query_error,
};
use super::{BackendError, Item, ItemBackend, Result, TableAdmin};
use crate::client::create_client;
use crate::config::Config;

/// Backend talking to DynamoDB through `aws-sdk-dynamodb`.
#[derive(Debug, Clone)]
pub struct DynamoDbBackend {
    client: Client,
}

impl DynamoDbBackend {
    /// Wraps an existing DynamoDB client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a client from the given configuration.
    pub async fn from_config(config: &Config) -> Self {
        Self::new(create_client(config).await)
    }

    /// Builds a client from environment configuration.
    pub async fn from_env() -> Self {
        Self::from_config(&Config::from_env()).await
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl ItemBackend for DynamoDbBackend {
    async fn put_item(&self, table_name: &str, item: Item) -> Result<()> {
        self.client
            .put_item()
            .table_name(table_name)
            .set_item(Some(item))
            .send()
            .await
            .map_err(|e| map_put_item_error(e, table_name))?;

        Ok(())
    }

    async fn get_item(
        &self,
        table_name: &str,
        key: Item,
        projection: &[&str],
    ) -> Result<Option<Item>> {
        let mut request = self
            .client
            .get_item()
            .table_name(table_name)
            .set_key(Some(key));

        // Placeholders keep projected names clear of DynamoDB reserved words.
        if !projection.is_empty() {
            let placeholders: Vec<String> =
                (0..projection.len()).map(|i| format!("#p{i}")).collect();
            request = request.projection_expression(placeholders.join(", "));
            for (placeholder, field) in placeholders.iter().zip(projection) {
                request = request.expression_attribute_names(placeholder, *field);
            }
        }

        let result = request
            .send()
            .await
            .map_err(|e| map_get_item_error(e, table_name))?;

        Ok(result.item.filter(|item| !item.is_empty()))
    }

    async fn query(&self, table_name: &str, partition_key: &str) -> Result<Vec<Item>> {
        let mut items = Vec::new();
        let mut start_key = None;

        loop {
            let result = self
                .client
                .query()
                .table_name(table_name)
                .key_condition_expression("#pk = :pk")
                .expression_attribute_names("#pk", PK_FIELD)
                .expression_attribute_values(":pk", AttributeValue::S(partition_key.to_string()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| map_query_error(e, table_name))?;

            items.extend(result.items.unwrap_or_default());

            match result.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(items)
    }
}

#[async_trait]
impl TableAdmin for DynamoDbBackend {
    async fn create_table(&self, schema: &TableSchema) -> Result<()> {
        let key_schema = vec![
            key_schema_element(&schema.partition_key, KeyType::Hash)?,
            key_schema_element(&schema.sort_key, KeyType::Range)?,
        ];
        let attribute_definitions = vec![
            attribute_definition(&schema.partition_key)?,
            attribute_definition(&schema.sort_key)?,
        ];

        self.client
            .create_table()
            .table_name(&schema.table_name)
            .set_key_schema(Some(key_schema))
            .set_attribute_definitions(Some(attribute_definitions))
            .billing_mode(to_billing_mode(schema.billing_mode))
            .send()
            .await
            .map_err(|e| map_create_table_error(e, &schema.table_name))?;

        Ok(())
    }

    async fn describe_table(&self, table_name: &str) -> Result<TableStatus> {
        let response = self
            .client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|e| map_describe_table_error(e, table_name))?;

        let status = response
            .table()
            .and_then(|table| table.table_status())
            .ok_or_else(|| BackendError::Service {
                operation: "DescribeTable",
                message: format!("no status reported for table {table_name}"),
            })?;

        Ok(from_aws_status(status))
    }

    async fn delete_table(&self, table_name: &str) -> Result<()> {
        self.client
            .delete_table()
            .table_name(table_name)
            .send()
            .await
            .map_err(|e| map_delete_table_error(e, table_name))?;

        Ok(())
    }
}

fn key_schema_element(key: &KeyAttribute, key_type: KeyType) -> Result<KeySchemaElement> {
    KeySchemaElement::builder()
        .attribute_name(&key.name)
        .key_type(key_type)
        .build()
        .map_err(map_build_error)
}

fn attribute_definition(key: &KeyAttribute) -> Result<AttributeDefinition> {
    AttributeDefinition::builder()
        .attribute_name(&key.name)
        .attribute_type(to_scalar_type(&key.attribute_type))
        .build()
        .map_err(map_build_error)
}

fn to_scalar_type(attr_type: &AttributeType) -> ScalarAttributeType {
    match attr_type {
        AttributeType::String => ScalarAttributeType::S,
    }
}

fn to_billing_mode(mode: BillingMode) -> AwsBillingMode {
    match mode {
        BillingMode::PayPerRequest => AwsBillingMode::PayPerRequest,
    }
}

fn from_aws_status(status: &AwsTableStatus) -> TableStatus {
    match status {
        AwsTableStatus::Active => TableStatus::Active,
        AwsTableStatus::Creating => TableStatus::Creating,
        AwsTableStatus::Updating => TableStatus::Updating,
        AwsTableStatus::Deleting => TableStatus::Deleting,
        other => TableStatus::Other(other.as_str().to_string()),
    }
}
