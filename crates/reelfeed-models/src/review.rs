use crate::rating::StarRating;
use serde::{Deserialize, Serialize};

/// A display-ready review, the element type of the output JSON array.
///
/// Field names follow the document the site's review component reads:
/// `review` and `watchedDate` are camel-cased, the enrichment fields are not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReviewRecord {
    pub title: String,
    pub year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<StarRating>,
    #[serde(rename = "review")]
    pub review_text: String,
    #[serde(rename = "watchedDate")]
    pub watched_date: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

impl ReviewRecord {
    pub fn is_enriched(&self) -> bool {
        self.tmdb_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ReviewRecord {
        ReviewRecord {
            title: "Oldboy".to_string(),
            year: "2003".to_string(),
            rating: StarRating::from_stars(4.5),
            review_text: "Hallway.".to_string(),
            watched_date: "May 12, 2024".to_string(),
            link: "https://letterboxd.com/someone/film/oldboy/".to_string(),
            tmdb_id: None,
            poster_url: None,
        }
    }

    #[test]
    fn test_bare_record_omits_enrichment_fields() {
        let json = serde_json::to_value(record()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj["review"], "Hallway.");
        assert_eq!(obj["watchedDate"], "May 12, 2024");
        assert_eq!(obj["rating"], 4.5);
        assert!(!obj.contains_key("tmdb_id"));
        assert!(!obj.contains_key("poster_url"));
    }

    #[test]
    fn test_enriched_record_field_names() {
        let mut review = record();
        review.rating = None;
        review.tmdb_id = Some(670);
        review.poster_url = Some("https://image.tmdb.org/t/p/w500/a.jpg".to_string());

        let json = serde_json::to_value(&review).unwrap();
        assert_eq!(json["tmdb_id"], 670);
        assert_eq!(json["poster_url"], "https://image.tmdb.org/t/p/w500/a.jpg");
        assert!(json.get("rating").is_none());
        assert!(review.is_enriched());
    }
}
