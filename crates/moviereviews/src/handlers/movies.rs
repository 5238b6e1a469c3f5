//! Movie catalog handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::json;

use moviereviews_core::movies::{validate_movie, CastMember, Movie, MovieId, MovieQueryParams};
use moviereviews_core::storage::CastQuery;

use super::error::{invalid_body, NotFound};
use super::{AppError, DataResponse};
use crate::state::AppState;

/// A movie with its cast attached when requested.
#[derive(Debug, Serialize)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast: Option<Vec<CastMember>>,
}

/// List all movies (GET /movies).
pub async fn list_movies(
    State(state): State<AppState>,
) -> Result<Json<DataResponse<Vec<Movie>>>, AppError> {
    let movies = state.movie_repo.list_movies().await?;
    Ok(Json(DataResponse::new(movies)))
}

/// Add a movie (POST /movies).
pub async fn create_movie(
    State(state): State<AppState>,
    body: Result<Json<Movie>, JsonRejection>,
) -> Result<(StatusCode, Json<DataResponse<Movie>>), AppError> {
    let Json(movie) = body.map_err(invalid_body)?;
    validate_movie(&movie)?;

    state.movie_repo.create_movie(&movie).await?;
    tracing::info!(movie_id = %movie.id, title = %movie.title, "Added movie");

    Ok((StatusCode::CREATED, Json(DataResponse::new(movie))))
}

/// A movie by ID (GET /movies/{movieId}?cast=true).
pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    Query(params): Query<MovieQueryParams>,
) -> Result<Json<DataResponse<MovieDetails>>, AppError> {
    let movie_id = MovieId::parse_param(Some(&movie_id))?;

    let movie = state
        .movie_repo
        .get_movie(movie_id)
        .await?
        .ok_or_else(|| NotFound(format!("Movie {movie_id} not found")))?;

    let cast = if params.include_cast() {
        let spec = CastQuery::new(movie_id).build()?;
        Some(state.cast_repo.query_cast(&spec).await?)
    } else {
        None
    };

    Ok(Json(DataResponse::new(MovieDetails { movie, cast })))
}

/// Delete a movie (DELETE /movies/{movieId}).
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
) -> Result<Json<DataResponse<serde_json::Value>>, AppError> {
    let movie_id = MovieId::parse_param(Some(&movie_id))?;

    state.movie_repo.delete_movie(movie_id).await?;
    tracing::info!(movie_id = %movie_id, "Deleted movie");

    Ok(Json(DataResponse::new(json!({ "id": movie_id }))))
}
