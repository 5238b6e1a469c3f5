mod bounds;
mod error;
mod operations;
mod requests;
mod types;

pub use bounds::RatingBounds;
pub use error::ValidationError;
pub use operations::{validate_movie, validate_rating, validate_review, validate_reviewer_name};
pub use requests::{
    CastQueryParams, CreateReviewRequest, MovieQueryParams, ReviewQueryParams,
    ReviewerQueryParams, UpdateReviewRequest,
};
pub use types::{CastMember, Movie, MovieId, Review};
