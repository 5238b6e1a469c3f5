//! Pure functions for mapping repository errors to HTTP status codes.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
///
/// - `NotFound` -> 404 (Not Found)
/// - `AlreadyExists` -> 409 (Conflict)
/// - every store fault -> 500 (Internal Server Error)
///
/// `InvalidData` is raised when a stored item cannot be decoded, so it is a
/// store fault here rather than a client error.
///
/// # Examples
///
/// ```
/// use moviereviews_core::storage::{RepositoryError, repository_error_to_status_code};
///
/// let error = RepositoryError::NotFound {
///     entity_type: "Review",
///     id: "42/alice".to_string(),
/// };
/// assert_eq!(repository_error_to_status_code(&error), 404);
/// ```
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::AlreadyExists { .. } => 409,
        RepositoryError::ConnectionFailed(_)
        | RepositoryError::QueryFailed(_)
        | RepositoryError::Serialization(_)
        | RepositoryError::InvalidData(_) => 500,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let error = RepositoryError::NotFound {
            entity_type: "Review",
            id: "1/bob".to_string(),
        };
        assert_eq!(repository_error_to_status_code(&error), 404);
    }

    #[test]
    fn test_already_exists_maps_to_409() {
        let error = RepositoryError::AlreadyExists {
            entity_type: "Review",
            id: "1/bob".to_string(),
        };
        assert_eq!(repository_error_to_status_code(&error), 409);
    }

    #[test]
    fn test_store_faults_map_to_500() {
        let faults = [
            RepositoryError::ConnectionFailed("timeout after 10s".to_string()),
            RepositoryError::QueryFailed("Throughput exceeded, please retry".to_string()),
            RepositoryError::Serialization("bad number".to_string()),
            RepositoryError::InvalidData("Missing or invalid field: rating".to_string()),
        ];
        for fault in &faults {
            assert_eq!(repository_error_to_status_code(fault), 500, "{fault}");
        }
    }
}
