//! Canonical attribute names and attribute access for expression evaluation.
//!
//! Every reader and writer uses these names. The review and cast tables are
//! partitioned on `movieId`; the movie catalog on `id`.

use crate::movies::{CastMember, Review};

use super::expression::ExprValue;

/// Review table attributes. Primary key: (`movieId`, `reviewerName`).
pub mod review {
    pub const MOVIE_ID: &str = "movieId";
    pub const REVIEWER_NAME: &str = "reviewerName";
    pub const RATING: &str = "rating";
    pub const CONTENT: &str = "content";
    pub const REVIEW_DATE: &str = "reviewDate";
}

/// Cast table attributes. Primary key: (`movieId`, `actorName`).
pub mod cast {
    pub const MOVIE_ID: &str = "movieId";
    pub const ACTOR_NAME: &str = "actorName";
    pub const ROLE_NAME: &str = "roleName";
    pub const ROLE_DESCRIPTION: &str = "roleDescription";

    /// Local secondary index sorting a movie's cast by role.
    pub const ROLE_INDEX: &str = "roleIx";
}

/// Movie catalog attributes. Primary key: `id`.
pub mod movie {
    pub const ID: &str = "id";
}

/// Exposes named attributes of a stored entity to expression evaluation.
pub trait Attributes {
    fn attribute(&self, name: &str) -> Option<ExprValue>;
}

impl Attributes for Review {
    fn attribute(&self, name: &str) -> Option<ExprValue> {
        match name {
            review::MOVIE_ID => Some(self.movie_id.into()),
            review::REVIEWER_NAME => Some(self.reviewer_name.as_str().into()),
            review::RATING => Some(self.rating.into()),
            review::CONTENT => Some(self.content.as_str().into()),
            review::REVIEW_DATE => Some(self.review_date.format("%Y-%m-%d").to_string().into()),
            _ => None,
        }
    }
}

impl Attributes for CastMember {
    fn attribute(&self, name: &str) -> Option<ExprValue> {
        match name {
            cast::MOVIE_ID => Some(self.movie_id.into()),
            cast::ACTOR_NAME => Some(self.actor_name.as_str().into()),
            cast::ROLE_NAME => Some(self.role_name.as_str().into()),
            cast::ROLE_DESCRIPTION => self.role_description.as_deref().map(Into::into),
            _ => None,
        }
    }
}
