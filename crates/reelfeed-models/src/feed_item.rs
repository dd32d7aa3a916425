use serde::{Deserialize, Serialize};

/// One `<item>` from a Letterboxd RSS feed, exactly as it appeared.
///
/// `title` and `description` are optional here so the extractor can report
/// unusable items instead of failing the whole document; the normalizer skips
/// any item missing either of them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawFeedItem {
    pub title: Option<String>,
    pub description: Option<String>,
    pub pub_date: Option<String>,
    pub link: Option<String>,

    // letterboxd:* namespace fields
    pub film_title: Option<String>,
    pub film_year: Option<String>,
    pub member_rating: Option<String>,
    pub watched_date: Option<String>,
}

impl RawFeedItem {
    /// Custom film title and year, only when both are present.
    pub fn film_fields(&self) -> Option<(&str, &str)> {
        Some((self.film_title.as_deref()?, self.film_year.as_deref()?))
    }
}
