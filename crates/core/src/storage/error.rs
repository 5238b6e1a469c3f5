use thiserror::Error;

/// Errors raised while building a query or update expression.
///
/// A failed build never yields a partial expression.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExpressionError {
    #[error("Query requires a partition key equality condition")]
    MissingPartitionKey,
    #[error("Partition key condition on {0} must be an equality")]
    PartitionKeyNotEquality(&'static str),
    #[error("Key condition allows at most a partition and a sort key clause, got {0}")]
    TooManyKeyConditions(usize),
    #[error("Attribute {0} appears twice in the key condition")]
    DuplicateKeyAttribute(&'static str),
    #[error("Key attribute {0} cannot be used in a filter")]
    KeyAttributeInFilter(&'static str),
    #[error("A scan cannot carry a key condition")]
    KeyConditionOnScan,
    #[error("Placeholder {0} is not bound to a value")]
    UnboundPlaceholder(&'static str),
    #[error("Placeholder {0} is bound but never referenced")]
    UnusedPlaceholder(&'static str),
    #[error("Placeholder {0} is bound to two different values")]
    ConflictingBinding(&'static str),
    #[error("Update expression has no assignments")]
    EmptyUpdate,
}

/// Errors that can occur during repository operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expression_error_display() {
        assert_eq!(
            ExpressionError::UnboundPlaceholder(":movieId").to_string(),
            "Placeholder :movieId is not bound to a value"
        );
        assert_eq!(
            ExpressionError::KeyAttributeInFilter("rating").to_string(),
            "Key attribute rating cannot be used in a filter"
        );
    }

    #[test]
    fn test_repository_error_not_found_display() {
        let error = RepositoryError::NotFound {
            entity_type: "Review",
            id: "42/alice".to_string(),
        };
        assert_eq!(error.to_string(), "Review not found: 42/alice");
    }

    #[test]
    fn test_repository_error_already_exists_display() {
        let error = RepositoryError::AlreadyExists {
            entity_type: "Movie",
            id: "1234".to_string(),
        };
        assert_eq!(error.to_string(), "Movie already exists: 1234");
    }

    #[test]
    fn test_repository_error_query_failed_display() {
        let error = RepositoryError::QueryFailed("Throughput exceeded, please retry".to_string());
        assert_eq!(
            error.to_string(),
            "Query failed: Throughput exceeded, please retry"
        );
    }
}
