//! AWS SDK client setup (Imperative Shell).

use aws_sdk_dynamodb::types::KeyType;
use aws_sdk_dynamodb::Client;
use tablewipe_core::KeySchema;

use super::error::{map_describe_table_error, DynamodbError, Result};
use crate::config::AwsSettings;

/// Creates a DynamoDB client for the configured region, profile and endpoint.
pub async fn create_client(settings: &AwsSettings) -> Client {
    let mut sdk_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(settings.region.clone()))
        .profile_name(&settings.profile);

    if let Some(endpoint) = &settings.endpoint_url {
        sdk_config_loader = sdk_config_loader.endpoint_url(endpoint);
    }

    let sdk_config = sdk_config_loader.load().await;
    Client::new(&sdk_config)
}

/// Reads the key schema of a table.
pub async fn describe_key_schema(client: &Client, table_name: &str) -> Result<KeySchema> {
    let response = client
        .describe_table()
        .table_name(table_name)
        .send()
        .await
        .map_err(|e| map_describe_table_error(e, table_name))?;

    let table = response.table().ok_or_else(|| DynamodbError::TableNotFound {
        table_name: table_name.to_string(),
    })?;

    let mut partition_key = None;
    let mut sort_key = None;
    for element in table.key_schema() {
        match element.key_type() {
            KeyType::Hash => partition_key = Some(element.attribute_name().to_string()),
            KeyType::Range => sort_key = Some(element.attribute_name().to_string()),
            _ => {}
        }
    }

    let partition_key = partition_key.ok_or_else(|| DynamodbError::TableNotFound {
        table_name: table_name.to_string(),
    })?;

    Ok(KeySchema {
        partition_key,
        sort_key,
    })
}

/// Fails if the configured key schema differs from the table's.
pub fn check_key_schema(table_name: &str, configured: &KeySchema, actual: &KeySchema) -> Result<()> {
    if configured == actual {
        return Ok(());
    }

    Err(DynamodbError::KeySchemaMismatch {
        table_name: table_name.to_string(),
        configured: configured.attribute_names().join(", "),
        actual: actual.attribute_names().join(", "),
    })
}
