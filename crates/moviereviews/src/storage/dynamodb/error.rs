//! DynamoDB error mapping.
//!
//! Maps AWS SDK errors to `RepositoryError` from `moviereviews_core::storage`.
//! Failed conditional writes become `AlreadyExists` or `NotFound`; everything
//! else is a store fault.

use std::fmt::Debug;

use aws_sdk_dynamodb::error::SdkError;
use aws_sdk_dynamodb::operation::delete_item::DeleteItemError;
use aws_sdk_dynamodb::operation::get_item::GetItemError;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::query::QueryError;
use aws_sdk_dynamodb::operation::scan::ScanError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use moviereviews_core::storage::RepositoryError;

const THROTTLED: &str = "Throughput exceeded, please retry";
const REQUEST_LIMIT: &str = "Request limit exceeded, please retry";
const INTERNAL: &str = "DynamoDB internal server error";

fn failed(message: &str) -> RepositoryError {
    RepositoryError::QueryFailed(message.to_string())
}

fn table_not_found(table: &str) -> RepositoryError {
    RepositoryError::QueryFailed(format!("Table not found: {table}"))
}

/// Timeouts and dispatch failures never reached the service.
fn transport_failure<E, R>(err: &SdkError<E, R>) -> Option<RepositoryError> {
    match err {
        SdkError::TimeoutError(_) => Some(RepositoryError::ConnectionFailed(
            "DynamoDB request timed out".to_string(),
        )),
        SdkError::DispatchFailure(failure) => Some(RepositoryError::ConnectionFailed(format!(
            "DynamoDB request could not be dispatched: {failure:?}"
        ))),
        _ => None,
    }
}

/// Map a GetItem SDK error to RepositoryError.
pub fn map_get_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<GetItemError, R>,
    table: &str,
) -> RepositoryError {
    if let Some(e) = transport_failure(&err) {
        return e;
    }
    match err.into_service_error() {
        GetItemError::ResourceNotFoundException(_) => table_not_found(table),
        GetItemError::ProvisionedThroughputExceededException(_) => failed(THROTTLED),
        GetItemError::RequestLimitExceeded(_) => failed(REQUEST_LIMIT),
        GetItemError::InternalServerError(_) => failed(INTERNAL),
        err => RepositoryError::QueryFailed(format!("GetItem failed: {err:?}")),
    }
}

/// Map a Query SDK error to RepositoryError.
pub fn map_query_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<QueryError, R>,
    table: &str,
) -> RepositoryError {
    if let Some(e) = transport_failure(&err) {
        return e;
    }
    match err.into_service_error() {
        QueryError::ResourceNotFoundException(_) => table_not_found(table),
        QueryError::ProvisionedThroughputExceededException(_) => failed(THROTTLED),
        QueryError::RequestLimitExceeded(_) => failed(REQUEST_LIMIT),
        QueryError::InternalServerError(_) => failed(INTERNAL),
        err => RepositoryError::QueryFailed(format!("Query failed: {err:?}")),
    }
}

/// Map a Scan SDK error to RepositoryError.
pub fn map_scan_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<ScanError, R>,
    table: &str,
) -> RepositoryError {
    if let Some(e) = transport_failure(&err) {
        return e;
    }
    match err.into_service_error() {
        ScanError::ResourceNotFoundException(_) => table_not_found(table),
        ScanError::ProvisionedThroughputExceededException(_) => failed(THROTTLED),
        ScanError::RequestLimitExceeded(_) => failed(REQUEST_LIMIT),
        ScanError::InternalServerError(_) => failed(INTERNAL),
        err => RepositoryError::QueryFailed(format!("Scan failed: {err:?}")),
    }
}

/// Map a PutItem SDK error to RepositoryError.
///
/// Puts are guarded by `attribute_not_exists`, so a failed condition means
/// the item already exists.
pub fn map_put_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<PutItemError, R>,
    table: &str,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    if let Some(e) = transport_failure(&err) {
        return e;
    }
    match err.into_service_error() {
        PutItemError::ConditionalCheckFailedException(_) => RepositoryError::AlreadyExists {
            entity_type,
            id: id.into(),
        },
        PutItemError::ResourceNotFoundException(_) => table_not_found(table),
        PutItemError::ProvisionedThroughputExceededException(_) => failed(THROTTLED),
        PutItemError::RequestLimitExceeded(_) => failed(REQUEST_LIMIT),
        PutItemError::TransactionConflictException(_) => {
            failed("Transaction conflict, please retry")
        }
        PutItemError::InternalServerError(_) => failed(INTERNAL),
        err => RepositoryError::QueryFailed(format!("PutItem failed: {err:?}")),
    }
}

/// Map an UpdateItem SDK error to RepositoryError.
///
/// Updates are guarded by `attribute_exists`, so a failed condition means
/// there is nothing to update.
pub fn map_update_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<UpdateItemError, R>,
    table: &str,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    if let Some(e) = transport_failure(&err) {
        return e;
    }
    match err.into_service_error() {
        UpdateItemError::ConditionalCheckFailedException(_) => RepositoryError::NotFound {
            entity_type,
            id: id.into(),
        },
        UpdateItemError::ResourceNotFoundException(_) => table_not_found(table),
        UpdateItemError::ProvisionedThroughputExceededException(_) => failed(THROTTLED),
        UpdateItemError::RequestLimitExceeded(_) => failed(REQUEST_LIMIT),
        UpdateItemError::TransactionConflictException(_) => {
            failed("Transaction conflict, please retry")
        }
        UpdateItemError::InternalServerError(_) => failed(INTERNAL),
        err => RepositoryError::QueryFailed(format!("UpdateItem failed: {err:?}")),
    }
}

/// Map a DeleteItem SDK error to RepositoryError.
pub fn map_delete_item_error<R: Debug + Send + Sync + 'static>(
    err: SdkError<DeleteItemError, R>,
    table: &str,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    if let Some(e) = transport_failure(&err) {
        return e;
    }
    match err.into_service_error() {
        DeleteItemError::ConditionalCheckFailedException(_) => RepositoryError::NotFound {
            entity_type,
            id: id.into(),
        },
        DeleteItemError::ResourceNotFoundException(_) => table_not_found(table),
        DeleteItemError::ProvisionedThroughputExceededException(_) => failed(THROTTLED),
        DeleteItemError::RequestLimitExceeded(_) => failed(REQUEST_LIMIT),
        DeleteItemError::InternalServerError(_) => failed(INTERNAL),
        err => RepositoryError::QueryFailed(format!("DeleteItem failed: {err:?}")),
    }
}
