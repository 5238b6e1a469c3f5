//! Repository wrappers for handler tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use moviereviews_core::movies::{CastMember, Movie, MovieId, Review, UpdateReviewRequest};
use moviereviews_core::storage::{
    CastRepository, MovieRepository, QuerySpec, RepositoryError, Result, ReviewRepository,
    ReviewTableLayout,
};

use super::inmemory::InMemoryRepository;

/// Counts every store call made through it, then delegates.
///
/// `layout()` is metadata, not a store call, and is not counted.
#[derive(Debug, Default)]
pub struct CountingRepository {
    inner: InMemoryRepository,
    calls: AtomicUsize,
}

impl CountingRepository {
    pub fn new(inner: InMemoryRepository) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ReviewRepository for CountingRepository {
    fn layout(&self) -> &ReviewTableLayout {
        self.inner.layout()
    }

    async fn query_reviews(&self, query: &QuerySpec) -> Result<Vec<Review>> {
        self.record();
        self.inner.query_reviews(query).await
    }

    async fn get_review(&self, movie_id: MovieId, reviewer_name: &str) -> Result<Option<Review>> {
        self.record();
        self.inner.get_review(movie_id, reviewer_name).await
    }

    async fn create_review(&self, review: &Review) -> Result<()> {
        self.record();
        self.inner.create_review(review).await
    }

    async fn update_review(
        &self,
        movie_id: MovieId,
        reviewer_name: &str,
        update: &UpdateReviewRequest,
    ) -> Result<Review> {
        self.record();
        self.inner
            .update_review(movie_id, reviewer_name, update)
            .await
    }
}

#[async_trait]
impl MovieRepository for CountingRepository {
    async fn get_movie(&self, id: MovieId) -> Result<Option<Movie>> {
        self.record();
        self.inner.get_movie(id).await
    }

    async fn list_movies(&self) -> Result<Vec<Movie>> {
        self.record();
        self.inner.list_movies().await
    }

    async fn create_movie(&self, movie: &Movie) -> Result<()> {
        self.record();
        self.inner.create_movie(movie).await
    }

    async fn delete_movie(&self, id: MovieId) -> Result<()> {
        self.record();
        self.inner.delete_movie(id).await
    }
}

#[async_trait]
impl CastRepository for CountingRepository {
    async fn query_cast(&self, query: &QuerySpec) -> Result<Vec<CastMember>> {
        self.record();
        self.inner.query_cast(query).await
    }
}

/// Fails every store call, as a throttled or unreachable table would.
#[derive(Debug, Default)]
pub struct FailingRepository {
    layout: ReviewTableLayout,
}

impl FailingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn fault<T>(&self) -> Result<T> {
        Err(RepositoryError::QueryFailed(
            "Throughput exceeded, please retry".to_string(),
        ))
    }
}

#[async_trait]
impl ReviewRepository for FailingRepository {
    fn layout(&self) -> &ReviewTableLayout {
        &self.layout
    }

    async fn query_reviews(&self, _query: &QuerySpec) -> Result<Vec<Review>> {
        self.fault()
    }

    async fn get_review(&self, _movie_id: MovieId, _reviewer_name: &str) -> Result<Option<Review>> {
        self.fault()
    }

    async fn create_review(&self, _review: &Review) -> Result<()> {
        self.fault()
    }

    async fn update_review(
        &self,
        _movie_id: MovieId,
        _reviewer_name: &str,
        _update: &UpdateReviewRequest,
    ) -> Result<Review> {
        self.fault()
    }
}

#[async_trait]
impl MovieRepository for FailingRepository {
    async fn get_movie(&self, _id: MovieId) -> Result<Option<Movie>> {
        self.fault()
    }

    async fn list_movies(&self) -> Result<Vec<Movie>> {
        self.fault()
    }

    async fn create_movie(&self, _movie: &Movie) -> Result<()> {
        self.fault()
    }

    async fn delete_movie(&self, _id: MovieId) -> Result<()> {
        self.fault()
    }
}

#[async_trait]
impl CastRepository for FailingRepository {
    async fn query_cast(&self, _query: &QuerySpec) -> Result<Vec<CastMember>> {
        self.fault()
    }
}

/// Delays every store call, then delegates.
#[derive(Debug, Default)]
pub struct SlowRepository {
    inner: InMemoryRepository,
    delay: Duration,
}

impl SlowRepository {
    pub fn new(inner: InMemoryRepository, delay: Duration) -> Self {
        Self { inner, delay }
    }

    async fn pause(&self) {
        tokio::time::sleep(self.delay).await;
    }
}

#[async_trait]
impl ReviewRepository for SlowRepository {
    fn layout(&self) -> &ReviewTableLayout {
        self.inner.layout()
    }

    async fn query_reviews(&self, query: &QuerySpec) -> Result<Vec<Review>> {
        self.pause().await;
        self.inner.query_reviews(query).await
    }

    async fn get_review(&self, movie_id: MovieId, reviewer_name: &str) -> Result<Option<Review>> {
        self.pause().await;
        self.inner.get_review(movie_id, reviewer_name).await
    }

    async fn create_review(&self, review: &Review) -> Result<()> {
        self.pause().await;
        self.inner.create_review(review).await
    }

    async fn update_review(
        &self,
        movie_id: MovieId,
        reviewer_name: &str,
        update: &UpdateReviewRequest,
    ) -> Result<Review> {
        self.pause().await;
        self.inner
            .update_review(movie_id, reviewer_name, update)
            .await
    }
}

#[async_trait]
impl MovieRepository for SlowRepository {
    async fn get_movie(&self, id: MovieId) -> Result<Option<Movie>> {
        self.pause().await;
        self.inner.get_movie(id).await
    }

    async fn list_movies(&self) -> Result<Vec<Movie>> {
        self.pause().await;
        self.inner.list_movies().await
    }

    async fn create_movie(&self, movie: &Movie) -> Result<()> {
        self.pause().await;
        self.inner.create_movie(movie).await
    }

    async fn delete_movie(&self, id: MovieId) -> Result<()> {
        self.pause().await;
        self.inner.delete_movie(id).await
    }
}

#[async_trait]
impl CastRepository for SlowRepository {
    async fn query_cast(&self, query: &QuerySpec) -> Result<Vec<CastMember>> {
        self.pause().await;
        self.inner.query_cast(query).await
    }
}
