//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to [`BackendError`]. Transport failures (dispatch,
//! timeout) are reported as [`BackendError::Connection`] for every operation.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::create_table::CreateTableError;
use aws_sdk_dynamodb::operation::delete_table::DeleteTableError;
use aws_sdk_dynamodb::operation::describe_table::DescribeTableError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use thiserror::Error;

/// Errors reported by a backend call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Table not found: {0}")]
    TableNotFound(String),
    #[error("Table already exists or is in use: {0}")]
    TableInUse(String),
    #[error("Throughput exceeded, please retry")]
    Throttled,
    #[error("Connection failed: {0}")]
    Connection(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("{operation} failed: {message}")]
    Service {
        operation: &'static str,
        message: String,
    },
}

fn transport_error<E, R>(err: &SdkError<E, R>) -> Option<BackendError>
where
    E: std::error::Error + 'static,
    R: Debug,
{
    match err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => Some(BackendError::Connection(
            DisplayErrorContext(err).to_string(),
        )),
        _ => None,
    }
}

/// Map a PutItem SDK error to BackendError.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    table_name: &str,
) -> BackendError {
    if let Some(transport) = transport_error(&err) {
        return transport;
    }
    let message = DisplayErrorContext(&err).to_string();
    match err.into_service_error() {
        PutItemError::ResourceNotFoundException(_) => {
            BackendError::TableNotFound(table_name.to_string())
        }
        PutItemError::ProvisionedThroughputExceededException(_)
        | PutItemError::RequestLimitExceeded(_) => BackendError::Throttled,
        _ => BackendError::Service {
            operation: "PutItem",
            message,
        },
    }
}

/// Map a GetItem SDK error to BackendError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
    table_name: &str,
) -> BackendError {
    if let Some(transport) = transport_error(&err) {
        return transport;
    }
    let message = DisplayErrorContext(&err).to_string();
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => {
            BackendError::TableNotFound(table_name.to_string())
        }
        GetItemError::ProvisionedThroughputExceededException(_)
        | GetItemError::RequestLimitExceeded(_) => BackendError::Throttled,
        _ => BackendError::Service {
            operation: "GetItem",
            message,
        },
    }
}

/// Map a Query SDK error to BackendError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
    table_name: &str,
) -> BackendError {
    if let Some(transport) = transport_error(&err) {
        return transport;
    }
    let message = DisplayErrorContext(&err).to_string();
    match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => {
            BackendError::TableNotFound(table_name.to_string())
        }
        QueryError::ProvisionedThroughputExceededException(_)
        | QueryError::RequestLimitExceeded(_) => BackendError::Throttled,
        _ => BackendError::Service {
            operation: "Query",
            message,
        },
    }
}

/// Map a CreateTable SDK error to BackendError.
pub fn map_create_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<CreateTableError, R>,
    table_name: &str,
) -> BackendError {
    if let Some(transport) = transport_error(&err) {
        return transport;
    }
    let message = DisplayErrorContext(&err).to_string();
    match err.into_service_error() {
        CreateTableError::ResourceInUseException(_) => {
            BackendError::TableInUse(table_name.to_string())
        }
        CreateTableError::LimitExceededException(_) => BackendError::Throttled,
        _ => BackendError::Service {
            operation: "CreateTable",
            message,
        },
    }
}

/// Map a DescribeTable SDK error to BackendError.
pub fn map_describe_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DescribeTableError, R>,
    table_name: &str,
) -> BackendError {
    if let Some(transport) = transport_error(&err) {
        return transport;
    }
    let message = DisplayErrorContext(&err).to_string();
    match err.into_service_error() {
        DescribeTableError::ResourceNotFoundException(_) => {
            BackendError::TableNotFound(table_name.to_string())
        }
        _ => BackendError::Service {
            operation: "DescribeTable",
            message,
        },
    }
}

/// Map a DeleteTable SDK error to BackendError.
pub fn map_delete_table_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteTableError, R>,
    table_name: &str,
) -> BackendError {
    if let Some(transport) = transport_error(&err) {
        return transport;
    }
    let message = DisplayErrorContext(&err).to_string();
    match err.into_service_error() {
        DeleteTableError::ResourceNotFoundException(_) => {
            BackendError::TableNotFound(table_name.to_string())
        }
        DeleteTableError::ResourceInUseException(_) => {
            BackendError::TableInUse(table_name.to_string())
        }
        DeleteTableError::LimitExceededException(_) => BackendError::Throttled,
        _ => BackendError::Service {
            operation: "DeleteTable",
            message,
        },
    }
}

/// Map an SDK builder error (missing required field) to BackendError.
pub fn map_build_error(err: impl std::fmt::Display) -> BackendError {
    BackendError::InvalidRequest(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_display() {
        assert_eq!(
            BackendError::TableNotFound("t1".to_string()).to_string(),
            "Table not found: t1"
        );
        assert_eq!(
            BackendError::Throttled.to_string(),
            "Throughput exceeded, please retry"
        );
        assert_eq!(
            BackendError::Service {
                operation: "PutItem",
                message: "boom".to_string()
            }
            .to_string(),
            "PutItem failed: boom"
        );
    }

    #[test]
    fn test_map_build_error() {
        assert_eq!(
            map_build_error("attribute_name was not specified"),
            BackendError::InvalidRequest("attribute_name was not specified".to_string())
        );
    }
}
