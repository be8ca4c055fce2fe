//! Primary key types.
//!
//! Pure data describing the key attributes of a table row. The purge loop
//! never looks at anything but these.

use std::fmt;

/// Default partition key attribute name.
pub const DEFAULT_PARTITION_KEY: &str = "pk";

/// Default sort key attribute name.
pub const DEFAULT_SORT_KEY: &str = "sk";

/// A single key attribute value.
///
/// DynamoDB only allows String, Number and Binary scalars as key attributes.
/// Numbers keep their wire representation so they round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyValue {
    String(String),
    Number(String),
    Binary(Vec<u8>),
}

impl KeyValue {
    /// Shorthand for a string key value.
    pub fn s(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Shorthand for a number key value.
    pub fn n(value: impl ToString) -> Self {
        Self::Number(value.to_string())
    }
}

impl fmt::Display for KeyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyValue::String(s) => write!(f, "{s}"),
            KeyValue::Number(n) => write!(f, "{n}"),
            KeyValue::Binary(b) => write!(f, "<{} bytes>", b.len()),
        }
    }
}

/// The composite primary key of a row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    pub partition: KeyValue,
    pub sort: Option<KeyValue>,
}

impl ItemKey {
    /// Creates a key with both partition and sort components.
    pub fn new(partition: KeyValue, sort: KeyValue) -> Self {
        Self {
            partition,
            sort: Some(sort),
        }
    }

    /// Creates a key for a table without a sort key.
    pub fn partition_only(partition: KeyValue) -> Self {
        Self {
            partition,
            sort: None,
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sort {
            Some(sort) => write!(f, "{} / {}", self.partition, sort),
            None => write!(f, "{}", self.partition),
        }
    }
}

/// Names of the key attributes of a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySchema {
    pub partition_key: String,
    pub sort_key: Option<String>,
}

impl Default for KeySchema {
    fn default() -> Self {
        Self {
            partition_key: DEFAULT_PARTITION_KEY.to_string(),
            sort_key: Some(DEFAULT_SORT_KEY.to_string()),
        }
    }
}

impl KeySchema {
    /// Creates a schema with a partition and a sort key.
    pub fn new(partition_key: impl Into<String>, sort_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: Some(sort_key.into()),
        }
    }

    /// Creates a schema for a hash-only table.
    pub fn partition_only(partition_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: None,
        }
    }

    /// Attribute names that make up the key, partition first.
    pub fn attribute_names(&self) -> Vec<&str> {
        let mut names = vec![self.partition_key.as_str()];
        if let Some(sk) = &self.sort_key {
            names.push(sk.as_str());
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_uses_pk_and_sk() {
        let schema = KeySchema::default();
        assert_eq!(schema.attribute_names(), vec!["pk", "sk"]);
    }

    #[test]
    fn test_partition_only_schema() {
        let schema = KeySchema::partition_only("id");
        assert_eq!(schema.attribute_names(), vec!["id"]);
    }

    #[test]
    fn test_item_key_display() {
        let key = ItemKey::new(KeyValue::s("RES#1"), KeyValue::n(42));
        assert_eq!(key.to_string(), "RES#1 / 42");

        let key = ItemKey::partition_only(KeyValue::Binary(vec![1, 2, 3]));
        assert_eq!(key.to_string(), "<3 bytes>");
    }

    #[test]
    fn test_keys_order_by_partition_then_sort() {
        let a = ItemKey::new(KeyValue::s("a"), KeyValue::s("2"));
        let b = ItemKey::new(KeyValue::s("a"), KeyValue::s("10"));
        let c = ItemKey::new(KeyValue::s("b"), KeyValue::s("0"));
        let mut keys = vec![c.clone(), a.clone(), b.clone()];
        keys.sort();
        assert_eq!(keys, vec![b, a, c]);
    }
}
