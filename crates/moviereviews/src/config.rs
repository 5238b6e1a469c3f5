use std::{env, time::Duration};

use thiserror::Error;

/// Errors raised while reading configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("LOG_FORMAT must be 'pretty' or 'json', got {0:?}")]
    InvalidLogFormat(String),
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Review table name (default: "MovieReviews")
    pub reviews_table: String,
    /// Movie catalog table name (default: "Movies")
    pub movies_table: String,
    /// Cast table name (default: "MovieCast")
    pub cast_table: String,
    /// Local secondary index on the review table sorted by rating.
    pub rating_index: Option<String>,
    /// Global secondary index on the review table keyed by reviewer name.
    pub reviewer_index: Option<String>,
    /// AWS region. Falls back to the SDK default chain when unset.
    #[cfg_attr(not(feature = "dynamodb"), allow(dead_code))]
    pub region: Option<String>,
    /// Endpoint override, e.g. a local DynamoDB.
    #[cfg_attr(not(feature = "dynamodb"), allow(dead_code))]
    pub endpoint_url: Option<String>,
    /// Per-request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `REVIEWS_TABLE_NAME` - Review table (default: "MovieReviews")
    /// - `MOVIES_TABLE_NAME` - Movie table (default: "Movies")
    /// - `MOVIE_CAST_TABLE_NAME` - Cast table (default: "MovieCast")
    /// - `REVIEWS_RATING_INDEX` - Rating index on the review table (optional)
    /// - `REVIEWS_REVIEWER_INDEX` - Reviewer index on the review table (optional)
    /// - `REGION` - AWS region (optional)
    /// - `DYNAMODB_ENDPOINT` - DynamoDB endpoint override (optional)
    /// - `REQUEST_TIMEOUT_SECONDS` - Per-request timeout (default: 10)
    /// - `LOG_FORMAT` - `pretty` or `json` (default: pretty)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let table = |key: &'static str, default: &str| match lookup(key) {
            Some(value) if value.trim().is_empty() => Err(ConfigError::Empty(key)),
            Some(value) => Ok(value),
            None => Ok(default.to_string()),
        };

        let request_timeout_seconds = match optional("REQUEST_TIMEOUT_SECONDS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidNumber {
                    name: "REQUEST_TIMEOUT_SECONDS",
                    value,
                })?,
            None => 10,
        };

        let log_format = match optional("LOG_FORMAT").as_deref().map(str::trim) {
            None => LogFormat::Pretty,
            Some(v) if v.eq_ignore_ascii_case("pretty") => LogFormat::Pretty,
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            Some(v) => return Err(ConfigError::InvalidLogFormat(v.to_string())),
        };

        Ok(Self {
            reviews_table: table("REVIEWS_TABLE_NAME", "MovieReviews")?,
            movies_table: table("MOVIES_TABLE_NAME", "Movies")?,
            cast_table: table("MOVIE_CAST_TABLE_NAME", "MovieCast")?,
            rating_index: optional("REVIEWS_RATING_INDEX"),
            reviewer_index: optional("REVIEWS_REVIEWER_INDEX"),
            region: optional("REGION"),
            endpoint_url: optional("DYNAMODB_ENDPOINT"),
            request_timeout_seconds,
            log_format,
        })
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reviews_table: "MovieReviews".to_string(),
            movies_table: "Movies".to_string(),
            cast_table: "MovieCast".to_string(),
            rating_index: None,
            reviewer_index: None,
            region: None,
            endpoint_url: None,
            request_timeout_seconds: 10,
            log_format: LogFormat::Pretty,
        }
    }
}
