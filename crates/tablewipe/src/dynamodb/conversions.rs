//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB attribute maps and
//! `ItemKey`. These are testable in isolation without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::{AttributeValue, DeleteRequest, WriteRequest};
use tablewipe_core::store::{Result, ScanPage};
use tablewipe_core::{ItemKey, KeySchema, KeyValue, StoreError};

// ============================================================================
// Expression placeholders
// ============================================================================

pub const PARTITION_KEY_NAME: &str = "#pk";
pub const SORT_KEY_NAME: &str = "#sk";
pub const PARTITION_KEY_VALUE: &str = ":pk";

/// Projection over the key attributes only.
///
/// Attribute names go through placeholders because key names like `name`
/// or `date` are reserved words.
pub fn projection_expression(schema: &KeySchema) -> String {
    match schema.sort_key {
        Some(_) => format!("{PARTITION_KEY_NAME}, {SORT_KEY_NAME}"),
        None => PARTITION_KEY_NAME.to_string(),
    }
}

/// Placeholder map for `projection_expression`.
pub fn key_attribute_names(schema: &KeySchema) -> HashMap<String, String> {
    let mut names = HashMap::new();
    names.insert(
        PARTITION_KEY_NAME.to_string(),
        schema.partition_key.clone(),
    );
    if let Some(sk) = &schema.sort_key {
        names.insert(SORT_KEY_NAME.to_string(), sk.clone());
    }
    names
}

/// Key condition selecting a single partition.
pub fn partition_key_condition() -> String {
    format!("{PARTITION_KEY_NAME} = {PARTITION_KEY_VALUE}")
}

// ============================================================================
// Key value conversions
// ============================================================================

/// Convert a key value to an attribute value.
pub fn value_to_attribute(value: &KeyValue) -> AttributeValue {
    match value {
        KeyValue::String(s) => AttributeValue::S(s.clone()),
        KeyValue::Number(n) => AttributeValue::N(n.clone()),
        KeyValue::Binary(b) => AttributeValue::B(Blob::new(b.clone())),
    }
}

/// Convert an attribute value to a key value.
pub fn attribute_to_value(attribute: &AttributeValue, name: &str) -> Result<KeyValue> {
    match attribute {
        AttributeValue::S(s) => Ok(KeyValue::String(s.clone())),
        AttributeValue::N(n) => Ok(KeyValue::Number(n.clone())),
        AttributeValue::B(b) => Ok(KeyValue::Binary(b.as_ref().to_vec())),
        other => Err(StoreError::InvalidKey(format!(
            "attribute '{}' has a non-key type: {:?}",
            name, other
        ))),
    }
}

// ============================================================================
// Item key conversions
// ============================================================================

/// Convert an item key to the attribute map DynamoDB expects.
pub fn key_to_item(key: &ItemKey, schema: &KeySchema) -> Result<HashMap<String, AttributeValue>> {
    let mut item = HashMap::new();
    item.insert(
        schema.partition_key.clone(),
        value_to_attribute(&key.partition),
    );

    match (&schema.sort_key, &key.sort) {
        (Some(name), Some(value)) => {
            item.insert(name.clone(), value_to_attribute(value));
        }
        (None, None) => {}
        (Some(name), None) => {
            return Err(StoreError::InvalidKey(format!(
                "key {} is missing sort key '{}'",
                key, name
            )));
        }
        (None, Some(_)) => {
            return Err(StoreError::InvalidKey(format!(
                "key {} has a sort key but the table has none",
                key
            )));
        }
    }

    Ok(item)
}

/// Extract the item key from an item or `LastEvaluatedKey` map.
pub fn item_to_key(item: &HashMap<String, AttributeValue>, schema: &KeySchema) -> Result<ItemKey> {
    let partition = required_value(item, &schema.partition_key)?;
    let sort = match &schema.sort_key {
        Some(name) => Some(required_value(item, name)?),
        None => None,
    };
    Ok(ItemKey { partition, sort })
}

fn required_value(item: &HashMap<String, AttributeValue>, name: &str) -> Result<KeyValue> {
    let attribute = item
        .get(name)
        .ok_or_else(|| StoreError::InvalidKey(format!("missing key attribute '{}'", name)))?;
    attribute_to_value(attribute, name)
}

// ============================================================================
// Request and response conversions
// ============================================================================

/// Build a page from a Scan or Query response.
///
/// An absent or empty `LastEvaluatedKey` means the last page was read.
pub fn page_from_output(
    items: &[HashMap<String, AttributeValue>],
    last_evaluated_key: Option<&HashMap<String, AttributeValue>>,
    schema: &KeySchema,
) -> Result<ScanPage> {
    let keys = items
        .iter()
        .map(|item| item_to_key(item, schema))
        .collect::<Result<Vec<_>>>()?;

    let cursor = match last_evaluated_key {
        Some(key) if !key.is_empty() => Some(item_to_key(key, schema)?),
        _ => None,
    };

    Ok(ScanPage { keys, cursor })
}

/// One `DeleteRequest` per key, in order.
pub fn delete_requests(keys: &[ItemKey], schema: &KeySchema) -> Result<Vec<WriteRequest>> {
    keys.iter()
        .map(|key| -> Result<WriteRequest> {
            let delete = DeleteRequest::builder()
                .set_key(Some(key_to_item(key, schema)?))
                .build()
                .map_err(|e| StoreError::InvalidKey(e.to_string()))?;
            Ok(WriteRequest::builder().delete_request(delete).build())
        })
        .collect()
}

/// Keys of this table's deletes left in a BatchWriteItem `UnprocessedItems` map.
pub fn unprocessed_keys(
    unprocessed: Option<&HashMap<String, Vec<WriteRequest>>>,
    table_name: &str,
    schema: &KeySchema,
) -> Result<Vec<ItemKey>> {
    let Some(requests) = unprocessed.and_then(|tables| tables.get(table_name)) else {
        return Ok(Vec::new());
    };

    requests
        .iter()
        .filter_map(WriteRequest::delete_request)
        .map(|delete| item_to_key(delete.key(), schema))
        .collect()
}
