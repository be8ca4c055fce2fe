//! Error types for DynamoDB operations.
//!
//! Maps AWS SDK errors to `StoreError` from `tablewipe_core::store`.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::batch_write_item::BatchWriteItemError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use tablewipe_core::StoreError;
use thiserror::Error;

/// Result type alias for dynamodb module.
pub type Result<T> = std::result::Result<T, DynamodbError>;

/// Errors that can occur while preparing or running a purge.
#[derive(Error, Debug)]
pub enum DynamodbError {
    #[error("Table '{table_name}' not found")]
    TableNotFound { table_name: String },

    #[error("Key schema of table '{table_name}' is {actual}, but the configured key is {configured}")]
    KeySchemaMismatch {
        table_name: String,
        configured: String,
        actual: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Map a DescribeTable SDK error.
pub fn map_describe_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DescribeTableError, R>,
    table_name: &str,
) -> DynamodbError {
    match err.into_service_error() {
        DescribeTableError::ResourceNotFoundException(_) => DynamodbError::TableNotFound {
            table_name: table_name.to_string(),
        },
        DescribeTableError::InternalServerError(_) => {
            StoreError::Provider("DynamoDB internal server error".to_string()).into()
        }
        err => unhandled("DescribeTable", err).into(),
    }
}

/// Map a Scan SDK error.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ScanError, R>,
    table_name: &str,
) -> StoreError {
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => StoreError::TableNotFound {
            table_name: table_name.to_string(),
        },
        ScanError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled("Throughput exceeded".to_string())
        }
        ScanError::RequestLimitExceeded(_) => {
            StoreError::Throttled("Request limit exceeded".to_string())
        }
        ScanError::InternalServerError(_) => {
            StoreError::Provider("DynamoDB internal server error".to_string())
        }
        err => unhandled("Scan", err),
    }
}

/// Map a Query SDK error.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
    table_name: &str,
) -> StoreError {
    match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => StoreError::TableNotFound {
            table_name: table_name.to_string(),
        },
        QueryError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled("Throughput exceeded".to_string())
        }
        QueryError::RequestLimitExceeded(_) => {
            StoreError::Throttled("Request limit exceeded".to_string())
        }
        QueryError::InternalServerError(_) => {
            StoreError::Provider("DynamoDB internal server error".to_string())
        }
        err => unhandled("Query", err),
    }
}

/// Map a BatchWriteItem SDK error.
pub fn map_batch_write_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<BatchWriteItemError, R>,
    table_name: &str,
) -> StoreError {
    match err.into_service_error() {
        BatchWriteItemError::ResourceNotFoundException(_) => StoreError::TableNotFound {
            table_name: table_name.to_string(),
        },
        BatchWriteItemError::ProvisionedThroughputExceededException(_) => {
            StoreError::Throttled("Throughput exceeded".to_string())
        }
        BatchWriteItemError::RequestLimitExceeded(_) => {
            StoreError::Throttled("Request limit exceeded".to_string())
        }
        BatchWriteItemError::ItemCollectionSizeLimitExceededException(_) => {
            StoreError::Provider("Item collection size limit exceeded".to_string())
        }
        BatchWriteItemError::InternalServerError(_) => {
            StoreError::Provider("DynamoDB internal server error".to_string())
        }
        err => unhandled("BatchWriteItem", err),
    }
}

/// Classifies errors the operation enum does not model, such as
/// authorization failures and dispatch errors.
fn unhandled<E: ProvideErrorMetadata + Debug>(operation: &str, err: E) -> StoreError {
    classify(operation, err.code(), err.message(), &format!("{:?}", err))
}

fn classify(operation: &str, code: Option<&str>, message: Option<&str>, debug: &str) -> StoreError {
    let detail = message.unwrap_or(debug).to_string();
    match code {
        Some("AccessDeniedException")
        | Some("UnrecognizedClientException")
        | Some("ExpiredTokenException") => StoreError::AccessDenied(detail),
        Some("ThrottlingException") => StoreError::Throttled(detail),
        _ => StoreError::Provider(format!("{} failed: {}", operation, detail)),
    }
}
