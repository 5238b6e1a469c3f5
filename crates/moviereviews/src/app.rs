use std::time::Duration;

use axum::{
    http::{header, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{
        cast::get_cast,
        health::livez,
        movies::{create_movie, delete_movie, get_movie, list_movies},
        reviews::{
            add_review, get_movie_reviews, get_review, get_reviewer_reviews, list_reviews,
            update_review,
        },
    },
    middleware::enforce_request_timeout,
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState, request_timeout: Duration) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        // Movie routes
        .route("/movies", get(list_movies).post(create_movie))
        .route("/movies/cast", get(get_cast))
        .route("/movies/{movie_id}", get(get_movie).delete(delete_movie))
        // Review routes
        .route(
            "/movies/{movie_id}/reviews",
            get(get_movie_reviews).post(add_review),
        )
        .route(
            "/movies/{movie_id}/reviews/{reviewer_name}",
            get(get_review).put(update_review),
        )
        .route("/reviews", get(list_reviews))
        .route("/reviews/{reviewer_name}", get(get_reviewer_reviews))
        .layer(cors);

    Router::new()
        .route("/livez", get(livez))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn_with_state(
            request_timeout,
            enforce_request_timeout,
        ))
        .with_state(state)
}
