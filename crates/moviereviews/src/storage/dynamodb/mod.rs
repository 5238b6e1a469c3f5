//! DynamoDB storage backend implementation.
//!
//! Provides a DynamoDB-based implementation of the repository traits using
//! `aws-sdk-dynamodb`. Queries are rendered from the same `QuerySpec` values
//! the in-memory backend evaluates.

mod client;
mod conversions;
mod error;
mod repository;

pub use repository::DynamoDbRepository;
