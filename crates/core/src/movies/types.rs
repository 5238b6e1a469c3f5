use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Identity of a movie.
///
/// This is the partition key of every table: `id` in the movie catalog and
/// `movieId` in the cast and review tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(i64);

impl MovieId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    /// Parses a movie identity taken from a path or query parameter.
    ///
    /// An absent or blank value is a missing parameter; anything that is not
    /// an integer is a malformed one.
    pub fn parse_param(raw: Option<&str>) -> Result<Self, ValidationError> {
        raw.map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ValidationError::MissingParameter("movieId"))?
            .parse()
    }
}

impl FromStr for MovieId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| ValidationError::MalformedParameter {
                name: "movieId",
                value: s.to_string(),
            })
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MovieId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A movie in the catalog.
///
/// Descriptive fields keep the catalog's own attribute names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub adult: bool,
}

impl Movie {
    /// Creates a movie with only its identity and title set.
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            overview: None,
            genre_ids: Vec::new(),
            original_language: None,
            release_date: None,
            popularity: None,
            adult: false,
        }
    }

    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = Some(overview.into());
        self
    }

    pub fn with_genres(mut self, genre_ids: Vec<i64>) -> Self {
        self.genre_ids = genre_ids;
        self
    }

    pub fn with_release_date(mut self, date: NaiveDate) -> Self {
        self.release_date = Some(date);
        self
    }
}

/// A member of a movie's cast.
///
/// Identified by `(movieId, actorName)`. The `roleIx` local secondary index
/// orders the same partition by `roleName`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastMember {
    pub movie_id: MovieId,
    pub actor_name: String,
    pub role_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_description: Option<String>,
}

impl CastMember {
    pub fn new(
        movie_id: MovieId,
        actor_name: impl Into<String>,
        role_name: impl Into<String>,
    ) -> Self {
        Self {
            movie_id,
            actor_name: actor_name.into(),
            role_name: role_name.into(),
            role_description: None,
        }
    }

    pub fn with_role_description(mut self, description: impl Into<String>) -> Self {
        self.role_description = Some(description.into());
        self
    }
}

/// A review of a movie.
///
/// Identified by `(movieId, reviewerName)`: a reviewer holds at most one
/// review per movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub movie_id: MovieId,
    pub reviewer_name: String,
    /// Expected to fall within 1-10; the store does not enforce a range.
    pub rating: f64,
    pub content: String,
    pub review_date: NaiveDate,
}

impl Review {
    pub fn new(
        movie_id: MovieId,
        reviewer_name: impl Into<String>,
        rating: f64,
        content: impl Into<String>,
        review_date: NaiveDate,
    ) -> Self {
        Self {
            movie_id,
            reviewer_name: reviewer_name.into(),
            rating,
            content: content.into(),
            review_date,
        }
    }

    /// Returns the composite key of this review.
    pub fn key(&self) -> (MovieId, &str) {
        (self.movie_id, &self.reviewer_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_id_parse_param() {
        assert_eq!(MovieId::parse_param(Some("42")), Ok(MovieId::new(42)));
        assert_eq!(MovieId::parse_param(Some(" 7 ")), Ok(MovieId::new(7)));
    }

    #[test]
    fn test_movie_id_missing() {
        assert_eq!(
            MovieId::parse_param(None),
            Err(ValidationError::MissingParameter("movieId"))
        );
        assert_eq!(
            MovieId::parse_param(Some("   ")),
            Err(ValidationError::MissingParameter("movieId"))
        );
    }

    #[test]
    fn test_movie_id_malformed() {
        assert!(matches!(
            MovieId::parse_param(Some("abc")),
            Err(ValidationError::MalformedParameter { name: "movieId", .. })
        ));
        assert!("1.5".parse::<MovieId>().is_err());
    }

    #[test]
    fn test_review_serializes_with_canonical_names() {
        let review = Review::new(
            MovieId::new(1),
            "amy",
            9.0,
            "Loved it",
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        );

        let json = serde_json::to_value(&review).unwrap();

        assert_eq!(json["movieId"], 1);
        assert_eq!(json["reviewerName"], "amy");
        assert_eq!(json["rating"], 9.0);
        assert_eq!(json["reviewDate"], "2024-01-15");
    }

    #[test]
    fn test_movie_deserializes_catalog_fields() {
        let movie: Movie = serde_json::from_str(
            r#"{"id": 1234, "title": "Heat", "genre_ids": [28, 80], "adult": false}"#,
        )
        .unwrap();

        assert_eq!(movie.id, MovieId::new(1234));
        assert_eq!(movie.genre_ids, vec![28, 80]);
        assert!(movie.overview.is_none());
    }

    #[test]
    fn test_cast_member_camel_case() {
        let member = CastMember::new(MovieId::new(5), "Al Pacino", "Vincent Hanna");
        let json = serde_json::to_value(&member).unwrap();

        assert_eq!(json["actorName"], "Al Pacino");
        assert_eq!(json["roleName"], "Vincent Hanna");
        assert!(json.get("roleDescription").is_none());
    }
}
