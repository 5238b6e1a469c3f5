pub mod attributes;
mod error;
mod expression;
mod http_mapping;
mod queries;
mod traits;

pub use attributes::Attributes;
pub use error::{ExpressionError, RepositoryError, Result};
pub use expression::{
    AccessPath, BinaryOp, Clause, Comparator, ExprValue, Expression, QuerySpec, QuerySpecBuilder,
};
pub use http_mapping::repository_error_to_status_code;
pub use queries::{
    all_reviews_query, CastQuery, MovieReviewsQuery, RatingStrategy, ReviewTableLayout,
    ReviewUpdateSpec, ReviewerReviewsQuery,
};
pub use traits::{CastRepository, MovieRepository, ReviewRepository};
