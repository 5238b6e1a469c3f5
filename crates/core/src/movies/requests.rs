//! API request types for review and catalog operations.
//!
//! Pure data types with no I/O. Query parameter structs keep raw strings so
//! malformed values are reported as validation errors rather than extractor
//! rejections.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::bounds::RatingBounds;
use super::error::ValidationError;
use super::operations::{validate_rating, validate_review};
use super::types::{MovieId, Review};

/// Request payload for adding a review.
///
/// `reviewDate` is generated when absent. `movieId` may be repeated in the
/// body but must then match the path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_id: Option<MovieId>,
    pub reviewer_name: String,
    pub rating: f64,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_date: Option<NaiveDate>,
}

impl CreateReviewRequest {
    pub fn new(reviewer_name: impl Into<String>, rating: f64, content: impl Into<String>) -> Self {
        Self {
            movie_id: None,
            reviewer_name: reviewer_name.into(),
            rating,
            content: content.into(),
            review_date: None,
        }
    }

    pub fn with_movie_id(mut self, movie_id: MovieId) -> Self {
        self.movie_id = Some(movie_id);
        self
    }

    pub fn with_review_date(mut self, date: NaiveDate) -> Self {
        self.review_date = Some(date);
        self
    }

    /// Converts into a validated review of `movie_id`, dated `today` unless
    /// the request carries its own date.
    pub fn into_review(self, movie_id: MovieId, today: NaiveDate) -> Result<Review, ValidationError> {
        if let Some(body_id) = self.movie_id.filter(|id| *id != movie_id) {
            return Err(ValidationError::MovieIdMismatch {
                path: movie_id,
                body: body_id,
            });
        }

        let review = Review::new(
            movie_id,
            self.reviewer_name.trim(),
            self.rating,
            self.content,
            self.review_date.unwrap_or(today),
        );
        validate_review(&review)?;
        Ok(review)
    }
}

/// Request payload for updating a reviewer's review.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_date: Option<NaiveDate>,
}

impl UpdateReviewRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_review_date(mut self, date: NaiveDate) -> Self {
        self.review_date = Some(date);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.content.is_none() && self.review_date.is_none()
    }

    /// Checks that the update changes something and every new value is valid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyUpdate);
        }
        if let Some(rating) = self.rating {
            validate_rating(rating)?;
        }
        if self.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(ValidationError::EmptyContent);
        }
        Ok(())
    }

    /// Applies the present fields to an existing review.
    pub fn apply_to(&self, review: &mut Review) {
        if let Some(rating) = self.rating {
            review.rating = rating;
        }
        if let Some(content) = &self.content {
            review.content = content.clone();
        }
        if let Some(date) = self.review_date {
            review.review_date = date;
        }
    }
}

/// Query parameters of the movie reviews lookup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewQueryParams {
    pub min_rating: Option<String>,
    pub max_rating: Option<String>,
}

impl ReviewQueryParams {
    pub fn bounds(&self) -> Result<RatingBounds, ValidationError> {
        RatingBounds::parse(self.min_rating.as_deref(), self.max_rating.as_deref())
    }
}

/// Query parameters of the reviewer-scoped lookup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewerQueryParams {
    pub movie_id: Option<String>,
}

impl ReviewerQueryParams {
    /// The optional movie filter. Blank counts as absent.
    pub fn movie_id(&self) -> Result<Option<MovieId>, ValidationError> {
        match self.movie_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some),
        }
    }
}

/// Query parameters of the cast lookup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastQueryParams {
    pub movie_id: Option<String>,
    pub actor_name: Option<String>,
    pub role_name: Option<String>,
}

/// Query parameters of the movie lookup.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieQueryParams {
    /// Include the cast in the response when `true`.
    #[serde(default)]
    pub cast: Option<String>,
}

impl MovieQueryParams {
    pub fn include_cast(&self) -> bool {
        self.cast
            .as_deref()
            .is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }
}
