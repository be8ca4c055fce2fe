//! `TableStore` backed by DynamoDB.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use tablewipe_core::store::{PageRequest, Result, ScanPage};
use tablewipe_core::{ItemKey, KeySchema, KeyValue, PurgeScope, TableStore};

use super::conversions::{
    delete_requests, key_attribute_names, key_to_item, page_from_output,
    partition_key_condition, projection_expression, unprocessed_keys, value_to_attribute,
    PARTITION_KEY_VALUE,
};
use super::error::{map_batch_write_error, map_query_error, map_scan_error};

/// Reads keys with Scan (or Query, for a single partition) and deletes them
/// with BatchWriteItem.
pub struct DynamoDbStore {
    client: Client,
    table_name: String,
    schema: KeySchema,
}

impl DynamoDbStore {
    /// Creates a store for one table.
    pub fn new(client: Client, table_name: impl Into<String>, schema: KeySchema) -> Self {
        Self {
            client,
            table_name: table_name.into(),
            schema,
        }
    }

    async fn scan_page(&self, request: &PageRequest) -> Result<ScanPage> {
        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .projection_expression(projection_expression(&self.schema))
            .set_expression_attribute_names(Some(key_attribute_names(&self.schema)))
            .set_exclusive_start_key(self.start_key(request)?)
            .set_limit(request.limit.map(limit_to_i32))
            .send()
            .await
            .map_err(|e| map_scan_error(e, &self.table_name))?;

        page_from_output(output.items(), output.last_evaluated_key(), &self.schema)
    }

    async fn query_page(&self, partition: &KeyValue, request: &PageRequest) -> Result<ScanPage> {
        let output = self
            .client
            .query()
            .table_name(&self.table_name)
            .key_condition_expression(partition_key_condition())
            .expression_attribute_values(PARTITION_KEY_VALUE, value_to_attribute(partition))
            .projection_expression(projection_expression(&self.schema))
            .set_expression_attribute_names(Some(key_attribute_names(&self.schema)))
            .set_exclusive_start_key(self.start_key(request)?)
            .set_limit(request.limit.map(limit_to_i32))
            .send()
            .await
            .map_err(|e| map_query_error(e, &self.table_name))?;

        page_from_output(output.items(), output.last_evaluated_key(), &self.schema)
    }

    fn start_key(&self, request: &PageRequest) -> Result<Option<HashMap<String, AttributeValue>>> {
        request
            .start_after
            .as_ref()
            .map(|key| key_to_item(key, &self.schema))
            .transpose()
    }
}

fn limit_to_i32(limit: u32) -> i32 {
    i32::try_from(limit).unwrap_or(i32::MAX)
}

#[async_trait]
impl TableStore for DynamoDbStore {
    async fn fetch_keys(&self, request: &PageRequest) -> Result<ScanPage> {
        match &request.scope {
            PurgeScope::Table => self.scan_page(request).await,
            PurgeScope::Partition(partition) => self.query_page(partition, request).await,
        }
    }

    async fn delete_batch(&self, keys: &[ItemKey]) -> Result<Vec<ItemKey>> {
        let write_requests = delete_requests(keys, &self.schema)?;

        let output = self
            .client
            .batch_write_item()
            .request_items(&self.table_name, write_requests)
            .send()
            .await
            .map_err(|e| map_batch_write_error(e, &self.table_name))?;

        unprocessed_keys(output.unprocessed_items(), &self.table_name, &self.schema)
    }
}
