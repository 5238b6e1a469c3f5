use async_trait::async_trait;

use crate::movies::{CastMember, Movie, MovieId, Review, UpdateReviewRequest};

use super::expression::QuerySpec;
use super::queries::ReviewTableLayout;
use super::Result;

/// Repository for movie reviews.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Describes the indexes backing the review table.
    fn layout(&self) -> &ReviewTableLayout;

    /// Executes a query or scan over the review table.
    async fn query_reviews(&self, query: &QuerySpec) -> Result<Vec<Review>>;

    /// Gets the review a reviewer wrote for a movie.
    async fn get_review(&self, movie_id: MovieId, reviewer_name: &str) -> Result<Option<Review>>;

    /// Creates a review. Fails with `AlreadyExists` if the reviewer already
    /// reviewed the movie.
    async fn create_review(&self, review: &Review) -> Result<()>;

    /// Applies an update to an existing review in a single conditional write
    /// and returns the stored result. Fails with `NotFound` if there is no
    /// such review.
    async fn update_review(
        &self,
        movie_id: MovieId,
        reviewer_name: &str,
        update: &UpdateReviewRequest,
    ) -> Result<Review>;
}

/// Repository for the movie catalog.
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Gets a movie by its ID.
    async fn get_movie(&self, id: MovieId) -> Result<Option<Movie>>;

    /// Lists every movie.
    async fn list_movies(&self) -> Result<Vec<Movie>>;

    /// Creates a new movie.
    async fn create_movie(&self, movie: &Movie) -> Result<()>;

    /// Deletes a movie by its ID.
    async fn delete_movie(&self, id: MovieId) -> Result<()>;
}

/// Repository for cast members.
#[async_trait]
pub trait CastRepository: Send + Sync {
    /// Executes a query over the cast table or its role index.
    async fn query_cast(&self, query: &QuerySpec) -> Result<Vec<CastMember>>;
}
