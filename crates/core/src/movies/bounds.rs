use super::error::ValidationError;
use super::operations::validate_rating;

/// Optional, independent bounds on a review's rating.
///
/// An absent bound leaves that side unbounded. An inverted pair
/// (`min > max`) is kept as given and matches nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatingBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RatingBounds {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    /// Parses the `minRating` / `maxRating` query parameters.
    ///
    /// Blank values count as absent.
    pub fn parse(min: Option<&str>, max: Option<&str>) -> Result<Self, ValidationError> {
        Ok(Self {
            min: parse_bound("minRating", min)?,
            max: parse_bound("maxRating", max)?,
        })
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Returns true when both bounds are present and `min > max`.
    pub fn is_inverted(&self) -> bool {
        matches!((self.min, self.max), (Some(min), Some(max)) if min > max)
    }

    pub fn contains(&self, rating: f64) -> bool {
        self.min.is_none_or(|min| rating >= min) && self.max.is_none_or(|max| rating <= max)
    }
}

fn parse_bound(name: &'static str, raw: Option<&str>) -> Result<Option<f64>, ValidationError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    match raw.parse::<f64>() {
        Ok(value) if validate_rating(value).is_ok() => Ok(Some(value)),
        _ => Err(ValidationError::MalformedParameter {
            name,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absent_bounds() {
        let bounds = RatingBounds::parse(None, None).unwrap();
        assert!(bounds.is_unbounded());
    }

    #[test]
    fn test_parse_blank_bound_is_absent() {
        let bounds = RatingBounds::parse(Some(""), Some("  ")).unwrap();
        assert!(bounds.is_unbounded());
    }

    #[test]
    fn test_parse_both_bounds() {
        let bounds = RatingBounds::parse(Some("3"), Some("7.5")).unwrap();
        assert_eq!(bounds, RatingBounds::new(Some(3.0), Some(7.5)));
    }

    #[test]
    fn test_parse_malformed_bound() {
        let err = RatingBounds::parse(Some("high"), None).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MalformedParameter {
                name: "minRating",
                value: "high".to_string(),
            }
        );

        assert!(RatingBounds::parse(None, Some("NaN")).is_err());
        assert!(RatingBounds::parse(None, Some("inf")).is_err());
        assert!(RatingBounds::parse(Some("1e300"), None).is_err());
    }

    #[test]
    fn test_contains() {
        let bounds = RatingBounds::new(Some(4.0), Some(8.0));
        assert!(bounds.contains(4.0));
        assert!(bounds.contains(8.0));
        assert!(!bounds.contains(3.9));
        assert!(!bounds.contains(8.1));

        assert!(RatingBounds::new(Some(8.0), None).contains(10.0));
        assert!(RatingBounds::new(None, Some(8.0)).contains(1.0));
    }

    #[test]
    fn test_inverted_range_contains_nothing() {
        let bounds = RatingBounds::new(Some(9.0), Some(2.0));
        assert!(bounds.is_inverted());
        assert!((0..=10).all(|r| !bounds.contains(f64::from(r))));
    }
}
