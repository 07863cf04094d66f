//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between attribute maps and stored records.
//! These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use singletable_core::entity::{DecodeError, Fields};
use singletable_core::keys::CompositeKey;
use singletable_core::record::{StoredRecord, PK_FIELD, SK_FIELD, TYPE_NAME_FIELD};

use crate::backend::Item;

/// Convert a StoredRecord to a DynamoDB item.
pub fn record_to_item(record: &StoredRecord) -> Item {
    let mut item = HashMap::new();

    // Keys
    item.insert(PK_FIELD.to_string(), AttributeValue::S(record.pk.clone()));
    item.insert(SK_FIELD.to_string(), AttributeValue::S(record.sk.clone()));

    // Entity type
    item.insert(
        TYPE_NAME_FIELD.to_string(),
        AttributeValue::S(record.type_name.clone()),
    );

    // Data
    for (name, value) in &record.fields {
        item.insert(name.clone(), AttributeValue::S(value.clone()));
    }

    item
}

/// Convert a composite key to the key map of a point read.
pub fn key_to_item(key: &CompositeKey) -> Item {
    HashMap::from([
        (
            PK_FIELD.to_string(),
            AttributeValue::S(key.partition_key.clone()),
        ),
        (SK_FIELD.to_string(), AttributeValue::S(key.sort_key.clone())),
    ])
}

/// Convert a DynamoDB item to a StoredRecord.
///
/// Every name in `attribute_fields` must be present as a string, as must the
/// keys and the discriminator. Extra attributes are ignored.
pub fn item_to_record(item: &Item, attribute_fields: &[&str]) -> Result<StoredRecord, DecodeError> {
    let mut fields = Fields::new();
    for name in attribute_fields {
        fields.insert(name.to_string(), get_string(item, name)?);
    }

    Ok(StoredRecord {
        pk: get_string(item, PK_FIELD)?,
        sk: get_string(item, SK_FIELD)?,
        type_name: get_string(item, TYPE_NAME_FIELD)?,
        fields,
    })
}

/// Get a required string attribute.
fn get_string(item: &Item, key: &str) -> Result<String, DecodeError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| DecodeError::MissingField(key.to_string()))
}
