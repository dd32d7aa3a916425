use serde::{Deserialize, Serialize};
use std::fmt;

/// A member rating on the Letterboxd five-star scale, in half-star steps.
///
/// Stored as a count of half stars (1..=10) so that every value that exists is
/// a valid rating. Serializes as a plain JSON number (`4.5`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "f64", try_from = "f64")]
pub struct StarRating(u8);

impl StarRating {
    pub const MAX_HALF_STARS: u8 = 10;

    /// Build from a star value such as `3.5`.
    ///
    /// Returns `None` for zero, negative, non-finite, off-grid or over-scale
    /// values. The feed has no zero-star rating, so zero means "not rated".
    pub fn from_stars(stars: f64) -> Option<Self> {
        if !stars.is_finite() || stars <= 0.0 {
            return None;
        }
        let doubled = stars * 2.0;
        if doubled.fract() != 0.0 || doubled > f64::from(Self::MAX_HALF_STARS) {
            return None;
        }
        Some(Self(doubled as u8))
    }

    /// Build from a count of full star glyphs plus an optional half glyph.
    pub fn from_glyphs(full_stars: usize, half: bool) -> Option<Self> {
        let half_stars = full_stars.checked_mul(2)? + usize::from(half);
        if half_stars == 0 || half_stars > usize::from(Self::MAX_HALF_STARS) {
            return None;
        }
        Some(Self(half_stars as u8))
    }

    pub fn stars(self) -> f64 {
        f64::from(self.0) / 2.0
    }

    pub fn half_stars(self) -> u8 {
        self.0
    }
}

impl From<StarRating> for f64 {
    fn from(rating: StarRating) -> Self {
        rating.stars()
    }
}

impl TryFrom<f64> for StarRating {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        StarRating::from_stars(value).ok_or_else(|| format!("invalid star rating: {}", value))
    }
}

impl fmt::Display for StarRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/5", self.stars())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_stars_accepts_half_steps() {
        assert_eq!(StarRating::from_stars(4.5).map(StarRating::stars), Some(4.5));
        assert_eq!(StarRating::from_stars(0.5).map(StarRating::stars), Some(0.5));
        assert_eq!(StarRating::from_stars(5.0).map(StarRating::stars), Some(5.0));
    }

    #[test]
    fn test_from_stars_rejects_out_of_range() {
        assert_eq!(StarRating::from_stars(0.0), None);
        assert_eq!(StarRating::from_stars(-1.0), None);
        assert_eq!(StarRating::from_stars(5.5), None);
        assert_eq!(StarRating::from_stars(3.3), None);
        assert_eq!(StarRating::from_stars(f64::NAN), None);
    }

    #[test]
    fn test_from_glyphs() {
        assert_eq!(StarRating::from_glyphs(4, true).map(StarRating::stars), Some(4.5));
        assert_eq!(StarRating::from_glyphs(0, true).map(StarRating::stars), Some(0.5));
        assert_eq!(StarRating::from_glyphs(0, false), None);
        assert_eq!(StarRating::from_glyphs(6, false), None);
    }

    #[test]
    fn test_serializes_as_number() {
        let rating = StarRating::from_stars(3.5).unwrap();
        assert_eq!(serde_json::to_string(&rating).unwrap(), "3.5");
        let parsed: StarRating = serde_json::from_str("2.0").unwrap();
        assert_eq!(parsed.half_stars(), 4);
        assert!(serde_json::from_str::<StarRating>("7").is_err());
    }
}
