use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use moviereviews_core::movies::ValidationError;
use moviereviews_core::storage::{repository_error_to_status_code, RepositoryError};

/// Body of every 500 response. The underlying fault is only logged.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// A lookup that matched nothing. Not a store fault.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct NotFound(pub String);

/// Application error type that wraps `anyhow::Error`.
///
/// The status is chosen by downcasting: `ValidationError` is a 400,
/// `NotFound` a 404, `RepositoryError` follows
/// [`repository_error_to_status_code`], anything else is a 500.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        if self.0.is::<ValidationError>() {
            StatusCode::BAD_REQUEST
        } else if self.0.is::<NotFound>() {
            StatusCode::NOT_FOUND
        } else if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            let code = repository_error_to_status_code(repo_error);
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status.is_server_error() {
            tracing::error!(status = %status, error = ?self.0, "Request failed");
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            let message = self.0.to_string();
            tracing::warn!(status = %status, message = %message, "API error");
            message
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Converts a JSON body rejection into a client error.
pub fn invalid_body(rejection: JsonRejection) -> AppError {
    ValidationError::InvalidBody(rejection.body_text()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_is_bad_request() {
        let response =
            AppError::from(ValidationError::MissingParameter("movieId")).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Missing required parameter: movieId" })
        );
    }

    #[tokio::test]
    async fn test_not_found_is_404() {
        let response = AppError::from(NotFound("No reviews found".to_string())).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "No reviews found" })
        );
    }

    #[tokio::test]
    async fn test_conflict_is_409() {
        let error = RepositoryError::AlreadyExists {
            entity_type: "Review",
            id: "1/amy".to_string(),
        };
        let response = AppError::from(error).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_store_fault_hides_details() {
        let error = RepositoryError::QueryFailed("ValidationException: bad key".to_string());
        let response = AppError::from(error).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "message": INTERNAL_ERROR_MESSAGE })
        );
    }

    #[tokio::test]
    async fn test_unknown_error_is_500() {
        let response = AppError(anyhow::anyhow!("boom")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
