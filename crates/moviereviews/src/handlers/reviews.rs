//! Review handlers.
//!
//! Every handler validates path and query input before its first store call,
//! so a client error never reaches the store.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use moviereviews_core::movies::{
    validate_reviewer_name, CreateReviewRequest, MovieId, Review, ReviewQueryParams,
    ReviewerQueryParams, UpdateReviewRequest,
};
use moviereviews_core::storage::{all_reviews_query, MovieReviewsQuery, ReviewerReviewsQuery};

use super::error::{invalid_body, NotFound};
use super::{AppError, DataResponse};
use crate::state::AppState;

type ReviewsResponse = Json<DataResponse<Vec<Review>>>;

/// Parses and validates a reviewer name taken from the path.
fn reviewer_param(raw: &str) -> Result<&str, AppError> {
    validate_reviewer_name(raw)?;
    Ok(raw.trim())
}

/// Reviews of a movie (GET /movies/{movieId}/reviews?minRating&maxRating).
///
/// An empty result, including the one an inverted range yields, is a 404.
pub async fn get_movie_reviews(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    Query(params): Query<ReviewQueryParams>,
) -> Result<ReviewsResponse, AppError> {
    let movie_id = MovieId::parse_param(Some(&movie_id))?;
    let bounds = params.bounds()?;

    let spec = MovieReviewsQuery::new(movie_id)
        .bounds(bounds)
        .strategy(state.review_repo.layout().rating_strategy())
        .build()?;

    tracing::debug!(
        movie_id = %movie_id,
        index = ?spec.index_name(),
        key_condition = ?spec.key_condition_expression(),
        filter = ?spec.filter_expression(),
        "Querying movie reviews"
    );

    let reviews = state.review_repo.query_reviews(&spec).await?;
    if reviews.is_empty() {
        return Err(NotFound(format!("No reviews found for movieId {movie_id}")).into());
    }

    Ok(Json(DataResponse::new(reviews)))
}

/// Add a review (POST /movies/{movieId}/reviews).
pub async fn add_review(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    body: Result<Json<CreateReviewRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<Review>>), AppError> {
    let movie_id = MovieId::parse_param(Some(&movie_id))?;
    let Json(payload) = body.map_err(invalid_body)?;

    let review = payload.into_review(movie_id, Utc::now().date_naive())?;
    state.review_repo.create_review(&review).await?;

    tracing::info!(
        movie_id = %review.movie_id,
        reviewer = %review.reviewer_name,
        rating = review.rating,
        "Added review"
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(review))))
}

/// A single review (GET /movies/{movieId}/reviews/{reviewerName}).
pub async fn get_review(
    State(state): State<AppState>,
    Path((movie_id, reviewer_name)): Path<(String, String)>,
) -> Result<Json<DataResponse<Review>>, AppError> {
    let movie_id = MovieId::parse_param(Some(&movie_id))?;
    let reviewer_name = reviewer_param(&reviewer_name)?;

    let review = state
        .review_repo
        .get_review(movie_id, reviewer_name)
        .await?
        .ok_or_else(|| {
            NotFound(format!(
                "No review by {reviewer_name} found for movieId {movie_id}"
            ))
        })?;

    Ok(Json(DataResponse::new(review)))
}

/// Update a reviewer's review (PUT /movies/{movieId}/reviews/{reviewerName}).
///
/// One conditional write; a missing review surfaces as a failed condition.
pub async fn update_review(
    State(state): State<AppState>,
    Path((movie_id, reviewer_name)): Path<(String, String)>,
    body: Result<Json<UpdateReviewRequest>, JsonRejection>,
) -> Result<Json<DataResponse<Review>>, AppError> {
    let movie_id = MovieId::parse_param(Some(&movie_id))?;
    let reviewer_name = reviewer_param(&reviewer_name)?;
    let Json(update) = body.map_err(invalid_body)?;
    update.validate()?;

    let review = state
        .review_repo
        .update_review(movie_id, reviewer_name, &update)
        .await?;

    tracing::info!(
        movie_id = %movie_id,
        reviewer = %reviewer_name,
        "Updated review"
    );

    Ok(Json(DataResponse::new(review)))
}

/// Every review (GET /reviews).
pub async fn list_reviews(State(state): State<AppState>) -> Result<ReviewsResponse, AppError> {
    let reviews = state.review_repo.query_reviews(&all_reviews_query()?).await?;
    Ok(Json(DataResponse::new(reviews)))
}

/// Reviews by one reviewer (GET /reviews/{reviewerName}?movieId).
///
/// Without a reviewer index this is a full table scan.
pub async fn get_reviewer_reviews(
    State(state): State<AppState>,
    Path(reviewer_name): Path<String>,
    Query(params): Query<ReviewerQueryParams>,
) -> Result<ReviewsResponse, AppError> {
    let reviewer_name = reviewer_param(&reviewer_name)?;
    let movie_id = params.movie_id()?;

    let layout = state.review_repo.layout();
    let spec = ReviewerReviewsQuery::new(reviewer_name)
        .movie(movie_id)
        .layout(layout)
        .build()?;

    tracing::debug!(
        reviewer = %reviewer_name,
        access = ?spec.access_path(),
        key_efficient = spec.access_path().is_key_efficient(),
        "Querying reviewer reviews"
    );

    let reviews = state.review_repo.query_reviews(&spec).await?;
    if reviews.is_empty() {
        return Err(NotFound(format!("No reviews found for reviewer {reviewer_name}")).into());
    }

    Ok(Json(DataResponse::new(reviews)))
}
