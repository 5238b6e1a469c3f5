//! Pure validation functions for movie catalog and review data.

use super::error::ValidationError;
use super::types::{Movie, Review};

const MAX_REVIEWER_NAME_LENGTH: usize = 100;

/// Ratings are stored as store numbers; keep them well inside the range
/// and precision the store accepts.
const MAX_RATING_MAGNITUDE: f64 = 1e9;
const MIN_RATING_MAGNITUDE: f64 = 1e-9;

/// Validates a reviewer name taken from a path or body.
pub fn validate_reviewer_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyReviewerName);
    }
    if trimmed.chars().count() > MAX_REVIEWER_NAME_LENGTH {
        return Err(ValidationError::ReviewerNameTooLong);
    }
    Ok(())
}

/// Validates a rating value.
///
/// Any finite number is accepted as long as its magnitude is zero or within
/// `1e-9..=1e9`. The 1-10 scale is a convention, not a rule.
pub fn validate_rating(rating: f64) -> Result<(), ValidationError> {
    if !rating.is_finite() {
        return Err(ValidationError::InvalidRating);
    }
    let magnitude = rating.abs();
    if magnitude == 0.0 || (MIN_RATING_MAGNITUDE..=MAX_RATING_MAGNITUDE).contains(&magnitude) {
        Ok(())
    } else {
        Err(ValidationError::RatingOutOfRange)
    }
}

/// Validates a review before it is written.
pub fn validate_review(review: &Review) -> Result<(), ValidationError> {
    validate_reviewer_name(&review.reviewer_name)?;
    validate_rating(review.rating)?;
    if review.content.trim().is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    Ok(())
}

/// Validates a movie before it is written.
pub fn validate_movie(movie: &Movie) -> Result<(), ValidationError> {
    if movie.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movies::MovieId;
    use chrono::NaiveDate;

    fn review(reviewer: &str, rating: f64, content: &str) -> Review {
        Review::new(
            MovieId::new(1),
            reviewer,
            rating,
            content,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        )
    }

    #[test]
    fn test_valid_review() {
        assert!(validate_review(&review("bob", 7.0, "Solid")).is_ok());
    }

    #[test]
    fn test_empty_reviewer_name() {
        assert_eq!(
            validate_review(&review("  ", 7.0, "Solid")),
            Err(ValidationError::EmptyReviewerName)
        );
    }

    #[test]
    fn test_reviewer_name_too_long() {
        let name = "x".repeat(101);
        assert_eq!(
            validate_reviewer_name(&name),
            Err(ValidationError::ReviewerNameTooLong)
        );
        assert!(validate_reviewer_name(&"x".repeat(100)).is_ok());
    }

    #[test]
    fn test_non_finite_rating() {
        assert_eq!(
            validate_review(&review("bob", f64::NAN, "Solid")),
            Err(ValidationError::InvalidRating)
        );
    }

    #[test]
    fn test_rating_range_not_enforced() {
        assert!(validate_review(&review("bob", 11.0, "Off the charts")).is_ok());
    }

    #[test]
    fn test_rating_magnitude_is_bounded() {
        assert_eq!(
            validate_review(&review("bob", 1e300, "Loud")),
            Err(ValidationError::RatingOutOfRange)
        );
        assert_eq!(validate_rating(-1e10), Err(ValidationError::RatingOutOfRange));
        assert_eq!(validate_rating(1e-300), Err(ValidationError::RatingOutOfRange));

        assert!(validate_rating(0.0).is_ok());
        assert!(validate_rating(1e9).is_ok());
        assert!(validate_rating(-2.5).is_ok());
    }

    #[test]
    fn test_empty_content() {
        assert_eq!(
            validate_review(&review("bob", 5.0, "")),
            Err(ValidationError::EmptyContent)
        );
    }

    #[test]
    fn test_movie_title_required() {
        assert_eq!(
            validate_movie(&Movie::new(MovieId::new(3), " ")),
            Err(ValidationError::EmptyTitle)
        );
        assert!(validate_movie(&Movie::new(MovieId::new(3), "Alien")).is_ok());
    }
}
