//! Cast handlers.

use axum::{
    extract::{Query, State},
    Json,
};

use moviereviews_core::movies::{CastMember, CastQueryParams, MovieId};
use moviereviews_core::storage::CastQuery;

use super::{AppError, DataResponse};
use crate::state::AppState;

/// Cast of a movie (GET /movies/cast?movieId&actorName&roleName).
///
/// `roleName` is looked up through the role index and takes precedence over
/// `actorName`. Both match by prefix.
pub async fn get_cast(
    State(state): State<AppState>,
    Query(params): Query<CastQueryParams>,
) -> Result<Json<DataResponse<Vec<CastMember>>>, AppError> {
    let movie_id = MovieId::parse_param(params.movie_id.as_deref())?;

    let spec = CastQuery::new(movie_id)
        .actor_name(params.actor_name)
        .role_name(params.role_name)
        .build()?;

    tracing::debug!(
        movie_id = %movie_id,
        index = ?spec.index_name(),
        key_condition = ?spec.key_condition_expression(),
        "Querying cast"
    );

    let cast = state.cast_repo.query_cast(&spec).await?;
    Ok(Json(DataResponse::new(cast)))
}
