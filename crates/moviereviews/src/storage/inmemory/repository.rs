//! In-memory repository implementation.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use moviereviews_core::movies::{CastMember, Movie, MovieId, Review, UpdateReviewRequest};
use moviereviews_core::storage::{
    attributes::cast, CastRepository, MovieRepository, QuerySpec, RepositoryError, Result,
    ReviewRepository, ReviewTableLayout, ReviewUpdateSpec,
};

/// In-memory storage backend.
///
/// Uses BTreeMaps wrapped in `Arc<RwLock<_>>` for thread-safe access. Map
/// keys mirror the table keys, so iteration order matches the order DynamoDB
/// returns items within a partition. Data is not persisted.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    reviews: Arc<RwLock<BTreeMap<(MovieId, String), Review>>>,
    movies: Arc<RwLock<BTreeMap<MovieId, Movie>>>,
    cast: Arc<RwLock<BTreeMap<(MovieId, String), CastMember>>>,
    layout: ReviewTableLayout,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository without review indexes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advertises the given review table indexes.
    pub fn with_layout(mut self, layout: ReviewTableLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Stores a cast member. The cast table is read-only through the API.
    #[cfg(test)]
    pub async fn insert_cast_member(&self, member: CastMember) {
        let mut cast = self.cast.write().await;
        cast.insert((member.movie_id, member.actor_name.clone()), member);
    }

    fn check_review_index(&self, query: &QuerySpec) -> Result<()> {
        match query.index_name() {
            None => Ok(()),
            Some(index)
                if self.layout.rating_index.as_deref() == Some(index)
                    || self.layout.reviewer_index.as_deref() == Some(index) =>
            {
                Ok(())
            }
            Some(index) => Err(RepositoryError::QueryFailed(format!(
                "Index {index} not found on review table"
            ))),
        }
    }
}

fn review_id(movie_id: MovieId, reviewer_name: &str) -> String {
    format!("{movie_id}/{reviewer_name}")
}

#[async_trait]
impl ReviewRepository for InMemoryRepository {
    fn layout(&self) -> &ReviewTableLayout {
        &self.layout
    }

    async fn query_reviews(&self, query: &QuerySpec) -> Result<Vec<Review>> {
        self.check_review_index(query)?;

        let reviews = self.reviews.read().await;
        let mut matched: Vec<Review> = reviews
            .values()
            .filter(|r| query.matches(*r))
            .cloned()
            .collect();

        // The rating index orders each partition by rating.
        if query.index_name().is_some() && query.index_name() == self.layout.rating_index.as_deref()
        {
            matched.sort_by(|a, b| {
                a.movie_id
                    .cmp(&b.movie_id)
                    .then(a.rating.partial_cmp(&b.rating).unwrap_or(Ordering::Equal))
            });
        }

        Ok(matched)
    }

    async fn get_review(&self, movie_id: MovieId, reviewer_name: &str) -> Result<Option<Review>> {
        let reviews = self.reviews.read().await;
        Ok(reviews
            .get(&(movie_id, reviewer_name.to_string()))
            .cloned())
    }

    async fn create_review(&self, review: &Review) -> Result<()> {
        let mut reviews = self.reviews.write().await;
        let key = (review.movie_id, review.reviewer_name.clone());
        if reviews.contains_key(&key) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Review",
                id: review_id(review.movie_id, &review.reviewer_name),
            });
        }
        reviews.insert(key, review.clone());
        Ok(())
    }

    async fn update_review(
        &self,
        movie_id: MovieId,
        reviewer_name: &str,
        update: &UpdateReviewRequest,
    ) -> Result<Review> {
        // Same rejection the DynamoDB backend hits before sending anything.
        ReviewUpdateSpec::new(update).map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        let mut reviews = self.reviews.write().await;
        let review = reviews
            .get_mut(&(movie_id, reviewer_name.to_string()))
            .ok_or_else(|| RepositoryError::NotFound {
                entity_type: "Review",
                id: review_id(movie_id, reviewer_name),
            })?;

        update.apply_to(review);
        Ok(review.clone())
    }
}

#[async_trait]
impl MovieRepository for InMemoryRepository {
    async fn get_movie(&self, id: MovieId) -> Result<Option<Movie>> {
        let movies = self.movies.read().await;
        Ok(movies.get(&id).cloned())
    }

    async fn list_movies(&self) -> Result<Vec<Movie>> {
        let movies = self.movies.read().await;
        Ok(movies.values().cloned().collect())
    }

    async fn create_movie(&self, movie: &Movie) -> Result<()> {
        let mut movies = self.movies.write().await;
        if movies.contains_key(&movie.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Movie",
                id: movie.id.to_string(),
            });
        }
        movies.insert(movie.id, movie.clone());
        Ok(())
    }

    async fn delete_movie(&self, id: MovieId) -> Result<()> {
        let mut movies = self.movies.write().await;
        if movies.remove(&id).is_none() {
            return Err(RepositoryError::NotFound {
                entity_type: "Movie",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CastRepository for InMemoryRepository {
    async fn query_cast(&self, query: &QuerySpec) -> Result<Vec<CastMember>> {
        let by_role = match query.index_name() {
            None => false,
            Some(cast::ROLE_INDEX) => true,
            Some(index) => {
                return Err(RepositoryError::QueryFailed(format!(
                    "Index {index} not found on cast table"
                )))
            }
        };

        let cast = self.cast.read().await;
        let mut matched: Vec<CastMember> = cast
            .values()
            .filter(|c| query.matches(*c))
            .cloned()
            .collect();

        if by_role {
            matched.sort_by(|a, b| {
                a.movie_id
                    .cmp(&b.movie_id)
                    .then_with(|| a.role_name.cmp(&b.role_name))
            });
        }

        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use moviereviews_core::movies::RatingBounds;
    use moviereviews_core::storage::{
        all_reviews_query, CastQuery, MovieReviewsQuery, ReviewerReviewsQuery,
    };

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn review(movie_id: i64, reviewer: &str, rating: f64) -> Review {
        Review::new(
            MovieId::new(movie_id),
            reviewer,
            rating,
            format!("{reviewer} on {movie_id}"),
            date(2024, 2, 1),
        )
    }

    async fn seeded(repo: &InMemoryRepository, reviews: &[Review]) {
        for r in reviews {
            repo.create_review(r).await.unwrap();
        }
    }

    fn names(reviews: &[Review]) -> Vec<&str> {
        reviews.iter().map(|r| r.reviewer_name.as_str()).collect()
    }

    // ==================== Review Tests ====================

    #[tokio::test]
    async fn test_review_create_and_get() {
        let repo = InMemoryRepository::new();
        let r = review(1, "bob", 7.0);

        repo.create_review(&r).await.unwrap();

        let retrieved = repo.get_review(MovieId::new(1), "bob").await.unwrap();
        assert_eq!(retrieved, Some(r));
        assert!(repo
            .get_review(MovieId::new(1), "amy")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_review_duplicate_reviewer_rejected() {
        let repo = InMemoryRepository::new();
        repo.create_review(&review(1, "bob", 7.0)).await.unwrap();

        let result = repo.create_review(&review(1, "bob", 2.0)).await;
        assert!(matches!(
            result,
            Err(RepositoryError::AlreadyExists { entity_type: "Review", .. })
        ));

        // Same reviewer, different movie, is a different review.
        repo.create_review(&review(2, "bob", 2.0)).await.unwrap();
    }

    #[tokio::test]
    async fn test_review_update_changes_only_target() {
        let repo = InMemoryRepository::new();
        seeded(
            &repo,
            &[review(42, "alice", 3.0), review(42, "bob", 6.0), review(7, "alice", 3.0)],
        )
        .await;

        let updated = repo
            .update_review(
                MovieId::new(42),
                "alice",
                &UpdateReviewRequest::new().with_rating(5.0),
            )
            .await
            .unwrap();
        assert_eq!(updated.rating, 5.0);
        assert_eq!(updated.content, "alice on 42");

        let spec = MovieReviewsQuery::new(MovieId::new(42)).build().unwrap();
        let reviews = repo.query_reviews(&spec).await.unwrap();
        let alice: Vec<&Review> = reviews.iter().filter(|r| r.reviewer_name == "alice").collect();
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].rating, 5.0);

        let bob = repo.get_review(MovieId::new(42), "bob").await.unwrap().unwrap();
        assert_eq!(bob.rating, 6.0);
        let other = repo.get_review(MovieId::new(7), "alice").await.unwrap().unwrap();
        assert_eq!(other.rating, 3.0);
    }

    #[tokio::test]
    async fn test_review_update_nonexistent() {
        let repo = InMemoryRepository::new();
        let result = repo
            .update_review(
                MovieId::new(42),
                "alice",
                &UpdateReviewRequest::new().with_rating(5.0),
            )
            .await;

        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_review_empty_update_is_store_error() {
        let repo = InMemoryRepository::new();
        seeded(&repo, &[review(42, "alice", 3.0)]).await;

        let result = repo
            .update_review(MovieId::new(42), "alice", &UpdateReviewRequest::new())
            .await;
        assert!(matches!(result, Err(RepositoryError::QueryFailed(_))));
    }

    #[tokio::test]
    async fn test_query_min_rating_scenario() {
        let repo = InMemoryRepository::new();
        seeded(&repo, &[review(1, "bob", 7.0), review(1, "amy", 9.0)]).await;

        let spec = MovieReviewsQuery::new(MovieId::new(1))
            .bounds(RatingBounds::new(Some(8.0), None))
            .strategy(repo.layout().rating_strategy())
            .build()
            .unwrap();

        let reviews = repo.query_reviews(&spec).await.unwrap();
        assert_eq!(names(&reviews), vec!["amy"]);
    }

    #[tokio::test]
    async fn test_query_rating_index_orders_by_rating() {
        let repo = InMemoryRepository::new().with_layout(ReviewTableLayout {
            rating_index: Some("ratingIx".to_string()),
            reviewer_index: None,
        });
        seeded(
            &repo,
            &[
                review(1, "amy", 9.0),
                review(1, "bob", 7.0),
                review(1, "cat", 3.0),
                review(2, "dan", 8.0),
            ],
        )
        .await;

        let spec = MovieReviewsQuery::new(MovieId::new(1))
            .bounds(RatingBounds::new(Some(3.0), Some(8.0)))
            .strategy(repo.layout().rating_strategy())
            .build()
            .unwrap();
        assert_eq!(spec.index_name(), Some("ratingIx"));

        let reviews = repo.query_reviews(&spec).await.unwrap();
        assert_eq!(names(&reviews), vec!["cat", "bob"]);
    }

    #[tokio::test]
    async fn test_query_unknown_index_fails() {
        let repo = InMemoryRepository::new();
        let spec = MovieReviewsQuery::new(MovieId::new(1))
            .bounds(RatingBounds::new(Some(1.0), None))
            .strategy(moviereviews_core::storage::RatingStrategy::KeyRange {
                index: "missingIx".to_string(),
            })
            .build()
            .unwrap();

        let result = repo.query_reviews(&spec).await;
        assert!(matches!(result, Err(RepositoryError::QueryFailed(_))));
    }

    #[tokio::test]
    async fn test_reviewer_scan_across_movies() {
        let repo = InMemoryRepository::new();
        seeded(
            &repo,
            &[review(1, "amy", 9.0), review(1, "bob", 7.0), review(3, "amy", 4.0)],
        )
        .await;

        let spec = ReviewerReviewsQuery::new("amy")
            .layout(repo.layout())
            .build()
            .unwrap();
        let reviews = repo.query_reviews(&spec).await.unwrap();

        let movies: Vec<i64> = reviews.iter().map(|r| r.movie_id.get()).collect();
        assert_eq!(movies, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_all_reviews() {
        let repo = InMemoryRepository::new();
        seeded(&repo, &[review(2, "amy", 9.0), review(1, "bob", 7.0)]).await;

        let reviews = repo.query_reviews(&all_reviews_query().unwrap()).await.unwrap();
        assert_eq!(names(&reviews), vec!["bob", "amy"]);
    }

    // ==================== Movie Tests ====================

    #[tokio::test]
    async fn test_movie_crud() {
        let repo = InMemoryRepository::new();
        let movie = Movie::new(MovieId::new(1234), "Alien").with_overview("In space.");

        repo.create_movie(&movie).await.unwrap();
        assert_eq!(
            repo.get_movie(MovieId::new(1234)).await.unwrap(),
            Some(movie.clone())
        );
        assert!(matches!(
            repo.create_movie(&movie).await,
            Err(RepositoryError::AlreadyExists { .. })
        ));
        assert_eq!(repo.list_movies().await.unwrap().len(), 1);

        repo.delete_movie(MovieId::new(1234)).await.unwrap();
        assert!(repo.get_movie(MovieId::new(1234)).await.unwrap().is_none());
        assert!(matches!(
            repo.delete_movie(MovieId::new(1234)).await,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    // ==================== Cast Tests ====================

    #[tokio::test]
    async fn test_cast_query_by_role_orders_by_role() {
        let repo = InMemoryRepository::new();
        repo.insert_cast_member(CastMember::new(MovieId::new(7), "Anna", "Zed"))
            .await;
        repo.insert_cast_member(CastMember::new(MovieId::new(7), "Bert", "Zack"))
            .await;
        repo.insert_cast_member(CastMember::new(MovieId::new(7), "Cleo", "Amy"))
            .await;

        let all = CastQuery::new(MovieId::new(7)).build().unwrap();
        let actors: Vec<String> = repo
            .query_cast(&all)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.actor_name)
            .collect();
        assert_eq!(actors, vec!["Anna", "Bert", "Cleo"]);

        let by_role = CastQuery::new(MovieId::new(7))
            .role_name(Some("Z".to_string()))
            .build()
            .unwrap();
        let roles: Vec<String> = repo
            .query_cast(&by_role)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.role_name)
            .collect();
        assert_eq!(roles, vec!["Zack", "Zed"]);
    }
}
