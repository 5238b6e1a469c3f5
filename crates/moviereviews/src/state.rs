//! Application state with repository-based storage.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. It holds repository trait objects so handlers never see
//! which backend the binary was built with.

use std::sync::Arc;

use moviereviews_core::storage::{CastRepository, MovieRepository, ReviewRepository};

use crate::config::Config;

/// Shared application state.
///
/// Cloned for each request handler. The repositories are read-only handles;
/// all coordination happens in the store.
#[derive(Clone)]
pub struct AppState {
    pub review_repo: Arc<dyn ReviewRepository>,
    pub movie_repo: Arc<dyn MovieRepository>,
    pub cast_repo: Arc<dyn CastRepository>,
}

impl AppState {
    /// Creates the state for the backend selected at compile time.
    pub async fn from_config(config: &Config) -> Self {
        #[cfg(feature = "inmemory")]
        {
            Self::in_memory(config)
        }

        #[cfg(feature = "dynamodb")]
        {
            Self::dynamodb(config).await
        }
    }

    /// Uses one repository for every table.
    pub fn with_repository<R>(repo: Arc<R>) -> Self
    where
        R: ReviewRepository + MovieRepository + CastRepository + 'static,
    {
        Self {
            review_repo: repo.clone(),
            movie_repo: repo.clone(),
            cast_repo: repo,
        }
    }

    #[cfg(feature = "inmemory")]
    fn in_memory(config: &Config) -> Self {
        use moviereviews_core::storage::ReviewTableLayout;

        use crate::storage::InMemoryRepository;

        tracing::info!("Using in-memory storage");
        let repo = InMemoryRepository::new().with_layout(ReviewTableLayout {
            rating_index: config.rating_index.clone(),
            reviewer_index: config.reviewer_index.clone(),
        });
        Self::with_repository(Arc::new(repo))
    }

    #[cfg(feature = "dynamodb")]
    async fn dynamodb(config: &Config) -> Self {
        use crate::storage::DynamoDbRepository;

        tracing::info!(
            reviews_table = %config.reviews_table,
            movies_table = %config.movies_table,
            cast_table = %config.cast_table,
            rating_index = ?config.rating_index,
            reviewer_index = ?config.reviewer_index,
            "Using DynamoDB storage"
        );
        let repo = DynamoDbRepository::from_config(config).await;
        Self::with_repository(Arc::new(repo))
    }
}

#[cfg(test)]
impl Default for AppState {
    fn default() -> Self {
        Self::with_repository(Arc::new(crate::storage::inmemory::InMemoryRepository::new()))
    }
}
