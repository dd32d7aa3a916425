use serde::{Deserialize, Serialize};

/// One movie returned by the metadata search endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchCandidate {
    pub id: u64,
    pub title: String,
    pub original_title: Option<String>,
    /// "YYYY-MM-DD", sometimes empty for unreleased titles
    pub release_date: Option<String>,
    pub popularity: f64,
    pub poster_path: Option<String>,
}

impl SearchCandidate {
    /// Release year taken from the first four characters of the release date.
    pub fn release_year(&self) -> Option<i32> {
        let date = self.release_date.as_deref()?;
        date.get(..4)?.parse().ok()
    }

    pub fn has_poster(&self) -> bool {
        self.poster_path.as_deref().is_some_and(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_year() {
        let mut candidate = SearchCandidate {
            release_date: Some("1997-02-28".to_string()),
            ..Default::default()
        };
        assert_eq!(candidate.release_year(), Some(1997));

        candidate.release_date = Some(String::new());
        assert_eq!(candidate.release_year(), None);

        candidate.release_date = None;
        assert_eq!(candidate.release_year(), None);
    }

    #[test]
    fn test_has_poster_ignores_empty_path() {
        let mut candidate = SearchCandidate::default();
        assert!(!candidate.has_poster());
        candidate.poster_path = Some(String::new());
        assert!(!candidate.has_poster());
        candidate.poster_path = Some("/p.jpg".to_string());
        assert!(candidate.has_poster());
    }
}
