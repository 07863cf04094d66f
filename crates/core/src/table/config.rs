use crate::record::{PK_FIELD, SK_FIELD};

/// Table schema configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table_name: String,
    pub partition_key: KeyAttribute,
    pub sort_key: KeyAttribute,
    pub billing_mode: BillingMode,
}

/// A key attribute definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    pub name: String,
    pub attribute_type: AttributeType,
}

/// DynamoDB attribute types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    String,
}

impl AttributeType {
    /// Short type code as shown by DynamoDB (`S`).
    pub fn code(&self) -> &'static str {
        match self {
            AttributeType::String => "S",
        }
    }
}

/// Billing mode for the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BillingMode {
    PayPerRequest,
}

impl BillingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingMode::PayPerRequest => "PAY_PER_REQUEST",
        }
    }
}

impl TableSchema {
    /// Sets the table name.
    pub fn with_table_name(mut self, name: &str) -> Self {
        self.table_name = name.to_string();
        self
    }

    /// Human-readable summary of the table that will be created.
    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("+ Create table: {}", self.table_name),
            format!(
                "  Partition key: {} ({})",
                self.partition_key.name,
                self.partition_key.attribute_type.code()
            ),
            format!(
                "  Sort key: {} ({})",
                self.sort_key.name,
                self.sort_key.attribute_type.code()
            ),
            format!("  Billing: {}", self.billing_mode.as_str()),
        ]
    }
}

/// Returns the fixed single-table schema: `pk` (HASH, S), `sk` (RANGE, S),
/// on-demand billing. This is a pure function - no I/O.
pub fn single_table_schema(table_name: &str) -> TableSchema {
    TableSchema {
        table_name: table_name.to_string(),
        partition_key: KeyAttribute {
            name: PK_FIELD.to_string(),
            attribute_type: AttributeType::String,
        },
        sort_key: KeyAttribute {
            name: SK_FIELD.to_string(),
            attribute_type: AttributeType::String,
        },
        billing_mode: BillingMode::PayPerRequest,
    }
}
