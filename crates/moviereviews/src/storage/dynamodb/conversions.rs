//! DynamoDB attribute conversion functions.
//!
//! Pure functions for converting between DynamoDB AttributeValue maps and domain types.
//! These are testable in isolation without DynamoDB access.

use std::collections::{BTreeMap, HashMap};

use aws_sdk_dynamodb::types::AttributeValue;
use chrono::NaiveDate;
use moviereviews_core::movies::{CastMember, Movie, MovieId, Review};
use moviereviews_core::storage::{
    attributes::{cast, movie, review},
    ExprValue, RepositoryError,
};

pub type Item = HashMap<String, AttributeValue>;

const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Expression values
// ============================================================================

/// Convert a bound expression value to an AttributeValue.
pub fn expr_value_to_attribute(value: &ExprValue) -> AttributeValue {
    match value {
        ExprValue::I(i) => AttributeValue::N(i.to_string()),
        ExprValue::N(n) => AttributeValue::N(n.to_string()),
        ExprValue::S(s) => AttributeValue::S(s.clone()),
    }
}

/// Convert a placeholder map to `ExpressionAttributeValues`.
///
/// Returns `None` for an empty map; DynamoDB rejects an empty value map.
pub fn expression_values(values: &BTreeMap<&'static str, ExprValue>) -> Option<Item> {
    if values.is_empty() {
        return None;
    }
    Some(
        values
            .iter()
            .map(|(placeholder, value)| (placeholder.to_string(), expr_value_to_attribute(value)))
            .collect(),
    )
}

/// Primary key of a review item.
pub fn review_key(movie_id: MovieId, reviewer_name: &str) -> Item {
    HashMap::from([
        (
            review::MOVIE_ID.to_string(),
            AttributeValue::N(movie_id.to_string()),
        ),
        (
            review::REVIEWER_NAME.to_string(),
            AttributeValue::S(reviewer_name.to_string()),
        ),
    ])
}

/// Primary key of a movie item.
pub fn movie_key(id: MovieId) -> Item {
    HashMap::from([(movie::ID.to_string(), AttributeValue::N(id.to_string()))])
}

// ============================================================================
// Review conversions
// ============================================================================

/// Convert a Review to DynamoDB item.
pub fn review_to_item(r: &Review) -> Item {
    let mut item = review_key(r.movie_id, &r.reviewer_name);
    item.insert(
        review::RATING.to_string(),
        AttributeValue::N(r.rating.to_string()),
    );
    item.insert(
        review::CONTENT.to_string(),
        AttributeValue::S(r.content.clone()),
    );
    item.insert(
        review::REVIEW_DATE.to_string(),
        AttributeValue::S(r.review_date.format(DATE_FORMAT).to_string()),
    );
    item
}

/// Convert a DynamoDB item to Review.
pub fn item_to_review(item: &Item) -> Result<Review, RepositoryError> {
    Ok(Review {
        movie_id: get_movie_id(item, review::MOVIE_ID)?,
        reviewer_name: get_string(item, review::REVIEWER_NAME)?,
        rating: get_number(item, review::RATING)?,
        content: get_string(item, review::CONTENT)?,
        review_date: get_date(item, review::REVIEW_DATE)?,
    })
}

// ============================================================================
// Movie conversions
// ============================================================================

/// Convert a Movie to DynamoDB item.
pub fn movie_to_item(m: &Movie) -> Item {
    let mut item = movie_key(m.id);
    item.insert("title".to_string(), AttributeValue::S(m.title.clone()));
    if let Some(overview) = &m.overview {
        item.insert("overview".to_string(), AttributeValue::S(overview.clone()));
    }
    item.insert(
        "genre_ids".to_string(),
        AttributeValue::L(
            m.genre_ids
                .iter()
                .map(|g| AttributeValue::N(g.to_string()))
                .collect(),
        ),
    );
    if let Some(language) = &m.original_language {
        item.insert(
            "original_language".to_string(),
            AttributeValue::S(language.clone()),
        );
    }
    if let Some(date) = m.release_date {
        item.insert(
            "release_date".to_string(),
            AttributeValue::S(date.format(DATE_FORMAT).to_string()),
        );
    }
    if let Some(popularity) = m.popularity {
        item.insert(
            "popularity".to_string(),
            AttributeValue::N(popularity.to_string()),
        );
    }
    item.insert("adult".to_string(), AttributeValue::Bool(m.adult));
    item
}

/// Convert a DynamoDB item to Movie.
pub fn item_to_movie(item: &Item) -> Result<Movie, RepositoryError> {
    let release_date = get_optional_string(item, "release_date")
        .map(|s| parse_date("release_date", &s))
        .transpose()?;
    let popularity = item
        .get("popularity")
        .map(|_| get_number(item, "popularity"))
        .transpose()?;

    Ok(Movie {
        id: get_movie_id(item, movie::ID)?,
        title: get_string(item, "title")?,
        overview: get_optional_string(item, "overview"),
        genre_ids: get_number_list(item, "genre_ids")?,
        original_language: get_optional_string(item, "original_language"),
        release_date,
        popularity,
        adult: item
            .get("adult")
            .and_then(|v| v.as_bool().ok())
            .copied()
            .unwrap_or(false),
    })
}

// ============================================================================
// Cast conversions
// ============================================================================

/// Convert a DynamoDB item to CastMember.
pub fn item_to_cast_member(item: &Item) -> Result<CastMember, RepositoryError> {
    Ok(CastMember {
        movie_id: get_movie_id(item, cast::MOVIE_ID)?,
        actor_name: get_string(item, cast::ACTOR_NAME)?,
        role_name: get_string(item, cast::ROLE_NAME)?,
        role_description: get_optional_string(item, cast::ROLE_DESCRIPTION),
    })
}

// ============================================================================
// Helpers
// ============================================================================

fn get_string(item: &Item, key: &str) -> Result<String, RepositoryError> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {key}")))
}

fn get_optional_string(item: &Item, key: &str) -> Option<String> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .map(|s| s.to_string())
}

fn get_number(item: &Item, key: &str) -> Result<f64, RepositoryError> {
    let raw = item
        .get(key)
        .and_then(|v| v.as_n().ok())
        .ok_or_else(|| RepositoryError::InvalidData(format!("Missing or invalid field: {key}")))?;
    raw.parse()
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid number {key}: {e}")))
}

/// Movie identities are stored as `N`. Items written by hand sometimes carry
/// them as strings, which are accepted as long as they parse.
fn get_movie_id(item: &Item, key: &str) -> Result<MovieId, RepositoryError> {
    let raw = match item.get(key) {
        Some(AttributeValue::N(n)) => n.as_str(),
        Some(AttributeValue::S(s)) => s.as_str(),
        _ => {
            return Err(RepositoryError::InvalidData(format!(
                "Missing or invalid field: {key}"
            )))
        }
    };
    raw.parse::<i64>()
        .map(MovieId::new)
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid movie id {key}: {e}")))
}

fn get_number_list(item: &Item, key: &str) -> Result<Vec<i64>, RepositoryError> {
    let Some(list) = item.get(key).and_then(|v| v.as_l().ok()) else {
        return Ok(Vec::new());
    };
    list.iter()
        .map(|v| {
            v.as_n()
                .ok()
                .and_then(|n| n.parse::<i64>().ok())
                .ok_or_else(|| RepositoryError::InvalidData(format!("Invalid entry in {key}")))
        })
        .collect()
}

fn get_date(item: &Item, key: &str) -> Result<NaiveDate, RepositoryError> {
    let s = get_string(item, key)?;
    parse_date(key, &s)
}

fn parse_date(key: &str, s: &str) -> Result<NaiveDate, RepositoryError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid date {key}: {e}")))
}
