use thiserror::Error;

use super::types::MovieId;

/// Errors caused by client input. Detected before any store call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for {name}: {value}")]
    MalformedParameter { name: &'static str, value: String },
    #[error("Reviewer name cannot be empty")]
    EmptyReviewerName,
    #[error("Reviewer name too long (max 100 characters)")]
    ReviewerNameTooLong,
    #[error("Review content cannot be empty")]
    EmptyContent,
    #[error("Rating must be a finite number")]
    InvalidRating,
    #[error("Rating must be 0 or have a magnitude between 1e-9 and 1e9")]
    RatingOutOfRange,
    #[error("Movie title cannot be empty")]
    EmptyTitle,
    #[error("movieId {body} in body does not match movieId {path} in path")]
    MovieIdMismatch { path: MovieId, body: MovieId },
    #[error("Update must change at least one field")]
    EmptyUpdate,
    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}
