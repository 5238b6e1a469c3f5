//! Query builders for the review and cast access patterns.
//!
//! Each builder turns typed, optional inputs into a validated [`QuerySpec`].
//! Clauses are always appended in the same order (partition key, lower
//! bound, upper bound) so the rendered expressions are deterministic.

use std::collections::BTreeMap;

use crate::movies::{MovieId, RatingBounds, UpdateReviewRequest};

use super::attributes::{cast, review};
use super::error::ExpressionError;
use super::expression::{AccessPath, BinaryOp, Clause, ExprValue, QuerySpec, QuerySpecBuilder};

const MOVIE_ID: &str = ":movieId";
const REVIEWER_NAME: &str = ":reviewerName";
const MIN_RATING: &str = ":minRating";
const MAX_RATING: &str = ":maxRating";
const ACTOR_NAME: &str = ":actorName";
const ROLE_NAME: &str = ":roleName";
const RATING: &str = ":rating";
const CONTENT: &str = ":content";
const REVIEW_DATE: &str = ":reviewDate";

/// Where rating bounds are applied when querying a movie's reviews.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RatingStrategy {
    /// Fetch the whole partition and discard rows outside the bounds.
    #[default]
    Filter,
    /// Apply the bounds as a sort-key range on an index keyed by
    /// (`movieId`, `rating`).
    KeyRange { index: String },
}

/// Indexes available on the review table.
///
/// Backends advertise this so callers can choose key-efficient access paths
/// and tests can assert cost separately from correctness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewTableLayout {
    /// Local secondary index sorted by `rating`.
    pub rating_index: Option<String>,
    /// Global secondary index partitioned by `reviewerName`.
    pub reviewer_index: Option<String>,
}

impl ReviewTableLayout {
    pub fn rating_strategy(&self) -> RatingStrategy {
        match &self.rating_index {
            Some(index) => RatingStrategy::KeyRange {
                index: index.clone(),
            },
            None => RatingStrategy::Filter,
        }
    }

    /// The access path used for reviewer-scoped lookups.
    pub fn reviewer_access(&self) -> AccessPath {
        if self.reviewer_index.is_some() {
            AccessPath::Query
        } else {
            AccessPath::Scan
        }
    }
}

/// Reviews of one movie, optionally bounded by rating.
#[derive(Debug, Clone)]
pub struct MovieReviewsQuery {
    movie_id: MovieId,
    bounds: RatingBounds,
    strategy: RatingStrategy,
}

impl MovieReviewsQuery {
    pub fn new(movie_id: MovieId) -> Self {
        Self {
            movie_id,
            bounds: RatingBounds::default(),
            strategy: RatingStrategy::default(),
        }
    }

    pub fn bounds(mut self, bounds: RatingBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn strategy(mut self, strategy: RatingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Builds the query.
    ///
    /// An inverted range is not rejected. Under the key-range strategy it is
    /// sent as a filter, because `BETWEEN` with `low > high` is a store-side
    /// validation error while the filter legally returns zero rows.
    pub fn build(self) -> Result<QuerySpec, ExpressionError> {
        let builder = QuerySpec::query()
            .key(Clause::eq(review::MOVIE_ID, MOVIE_ID))
            .bind(MOVIE_ID, self.movie_id);

        let RatingBounds { min, max } = self.bounds;
        let builder = match (self.strategy, min, max) {
            (RatingStrategy::KeyRange { index }, Some(low), Some(high)) if low <= high => builder
                .index(index)
                .key(Clause::between(review::RATING, MIN_RATING, MAX_RATING))
                .bind(MIN_RATING, low)
                .bind(MAX_RATING, high),
            (RatingStrategy::KeyRange { index }, Some(low), None) => builder
                .index(index)
                .key(Clause::compare(review::RATING, BinaryOp::Ge, MIN_RATING))
                .bind(MIN_RATING, low),
            (RatingStrategy::KeyRange { index }, None, Some(high)) => builder
                .index(index)
                .key(Clause::compare(review::RATING, BinaryOp::Le, MAX_RATING))
                .bind(MAX_RATING, high),
            _ => filter_by_rating(builder, min, max),
        };

        builder.build()
    }
}

fn filter_by_rating(
    mut builder: QuerySpecBuilder,
    min: Option<f64>,
    max: Option<f64>,
) -> QuerySpecBuilder {
    if let Some(low) = min {
        builder = builder
            .filter(Clause::compare(review::RATING, BinaryOp::Ge, MIN_RATING))
            .bind(MIN_RATING, low);
    }
    if let Some(high) = max {
        builder = builder
            .filter(Clause::compare(review::RATING, BinaryOp::Le, MAX_RATING))
            .bind(MAX_RATING, high);
    }
    builder
}

/// Reviews written by one reviewer, across movies.
///
/// The review table is partitioned by movie, so without a reviewer index this
/// is a full scan.
#[derive(Debug, Clone)]
pub struct ReviewerReviewsQuery {
    reviewer_name: String,
    movie_id: Option<MovieId>,
    index: Option<String>,
}

impl ReviewerReviewsQuery {
    pub fn new(reviewer_name: impl Into<String>) -> Self {
        Self {
            reviewer_name: reviewer_name.into(),
            movie_id: None,
            index: None,
        }
    }

    /// Restricts the results to one movie.
    pub fn movie(mut self, movie_id: Option<MovieId>) -> Self {
        self.movie_id = movie_id;
        self
    }

    /// Uses the reviewer index advertised by the table layout, if any.
    pub fn layout(mut self, layout: &ReviewTableLayout) -> Self {
        self.index = layout.reviewer_index.clone();
        self
    }

    pub fn build(self) -> Result<QuerySpec, ExpressionError> {
        let mut builder = match self.index {
            Some(index) => QuerySpec::query()
                .index(index)
                .key(Clause::eq(review::REVIEWER_NAME, REVIEWER_NAME)),
            None => QuerySpec::scan().filter(Clause::eq(review::REVIEWER_NAME, REVIEWER_NAME)),
        }
        .bind(REVIEWER_NAME, self.reviewer_name);

        if let Some(movie_id) = self.movie_id {
            builder = builder
                .filter(Clause::eq(review::MOVIE_ID, MOVIE_ID))
                .bind(MOVIE_ID, movie_id);
        }

        builder.build()
    }
}

/// Every review in the table.
pub fn all_reviews_query() -> Result<QuerySpec, ExpressionError> {
    QuerySpec::scan().build()
}

/// Cast of one movie, optionally narrowed by actor or role name prefix.
///
/// A role lookup goes through the `roleIx` index and wins when both names
/// are given.
#[derive(Debug, Clone)]
pub struct CastQuery {
    movie_id: MovieId,
    actor_name: Option<String>,
    role_name: Option<String>,
}

impl CastQuery {
    pub fn new(movie_id: MovieId) -> Self {
        Self {
            movie_id,
            actor_name: None,
            role_name: None,
        }
    }

    pub fn actor_name(mut self, actor_name: Option<String>) -> Self {
        self.actor_name = actor_name.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn role_name(mut self, role_name: Option<String>) -> Self {
        self.role_name = role_name.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn build(self) -> Result<QuerySpec, ExpressionError> {
        let builder = QuerySpec::query()
            .key(Clause::eq(cast::MOVIE_ID, MOVIE_ID))
            .bind(MOVIE_ID, self.movie_id);

        let builder = match (self.role_name, self.actor_name) {
            (Some(role), _) => builder
                .index(cast::ROLE_INDEX)
                .key(Clause::begins_with(cast::ROLE_NAME, ROLE_NAME))
                .bind(ROLE_NAME, role),
            (None, Some(actor)) => builder
                .key(Clause::begins_with(cast::ACTOR_NAME, ACTOR_NAME))
                .bind(ACTOR_NAME, actor),
            (None, None) => builder,
        };

        builder.build()
    }
}

/// `SET` assignments for a review update.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewUpdateSpec {
    assignments: Vec<(&'static str, &'static str)>,
    values: BTreeMap<&'static str, ExprValue>,
}

impl ReviewUpdateSpec {
    pub fn new(update: &UpdateReviewRequest) -> Result<Self, ExpressionError> {
        let mut assignments = Vec::new();
        let mut values = BTreeMap::new();

        if let Some(rating) = update.rating {
            assignments.push((review::RATING, RATING));
            values.insert(RATING, ExprValue::N(rating));
        }
        if let Some(content) = &update.content {
            assignments.push((review::CONTENT, CONTENT));
            values.insert(CONTENT, ExprValue::S(content.clone()));
        }
        if let Some(date) = update.review_date {
            assignments.push((review::REVIEW_DATE, REVIEW_DATE));
            values.insert(
                REVIEW_DATE,
                ExprValue::S(date.format("%Y-%m-%d").to_string()),
            );
        }

        if assignments.is_empty() {
            return Err(ExpressionError::EmptyUpdate);
        }

        Ok(Self {
            assignments,
            values,
        })
    }

    /// Renders e.g. `SET rating = :rating, content = :content`.
    pub fn update_expression(&self) -> String {
        let assignments: Vec<String> = self
            .assignments
            .iter()
            .map(|(attribute, placeholder)| format!("{attribute} = {placeholder}"))
            .collect();
        format!("SET {}", assignments.join(", "))
    }

    pub fn values(&self) -> &BTreeMap<&'static str, ExprValue> {
        &self.values
    }
}
