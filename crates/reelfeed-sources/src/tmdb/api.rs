use reelfeed_models::{ImageCandidate, ImageKind, MovieImages, SearchCandidate};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TmdbSearchResponse {
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbMovie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    pub original_title: Option<String>,
    pub release_date: Option<String>,
    pub popularity: Option<f64>,
    pub poster_path: Option<String>,
}

/// Response of `/movie/{id}/images`. The `logos` collection is not read.
#[derive(Debug, Deserialize)]
pub struct TmdbImagesResponse {
    #[serde(default)]
    pub backdrops: Vec<TmdbImage>,
    #[serde(default)]
    pub posters: Vec<TmdbImage>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbImage {
    pub file_path: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    pub vote_average: Option<f64>,
    pub iso_639_1: Option<String>,
}

impl From<TmdbMovie> for SearchCandidate {
    fn from(movie: TmdbMovie) -> Self {
        SearchCandidate {
            id: movie.id,
            title: movie.title,
            original_title: movie.original_title,
            release_date: movie.release_date,
            popularity: movie.popularity.unwrap_or(0.0),
            poster_path: movie.poster_path,
        }
    }
}

impl TmdbImage {
    fn into_candidate(self, kind: ImageKind) -> ImageCandidate {
        ImageCandidate {
            file_path: self.file_path,
            width: self.width,
            height: self.height,
            vote_average: self.vote_average,
            language: self.iso_639_1,
            kind,
        }
    }
}

impl From<TmdbImagesResponse> for MovieImages {
    fn from(response: TmdbImagesResponse) -> Self {
        MovieImages {
            backdrops: response
                .backdrops
                .into_iter()
                .map(|image| image.into_candidate(ImageKind::Backdrop))
                .collect(),
            posters: response
                .posters
                .into_iter()
                .map(|image| image.into_candidate(ImageKind::Poster))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_response_conversion() {
        let json = r#"{
            "page": 1,
            "results": [
                {"id": 10494, "title": "Perfect Blue", "original_title": "パーフェクトブルー",
                 "release_date": "1997-07-25", "popularity": 21.4, "poster_path": "/p.jpg"},
                {"id": 1, "title": "Untitled", "release_date": "", "popularity": null, "poster_path": null}
            ],
            "total_results": 2
        }"#;
        let response: TmdbSearchResponse = serde_json::from_str(json).unwrap();
        let candidates: Vec<SearchCandidate> = response.results.into_iter().map(Into::into).collect();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, 10494);
        assert_eq!(candidates[0].original_title.as_deref(), Some("パーフェクトブルー"));
        assert_eq!(candidates[0].release_year(), Some(1997));
        assert_eq!(candidates[1].popularity, 0.0);
        assert_eq!(candidates[1].release_year(), None);
        assert!(!candidates[1].has_poster());
    }

    #[test]
    fn test_search_response_without_results() {
        let response: TmdbSearchResponse = serde_json::from_str(r#"{"status_code": 7}"#).unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn test_images_response_ignores_logos() {
        let json = r#"{
            "id": 10494,
            "backdrops": [{"file_path": "/b.jpg", "width": 1920, "height": 1080, "vote_average": 5.3, "iso_639_1": null}],
            "logos": [{"file_path": "/l.png", "width": 500, "height": 100}],
            "posters": [{"file_path": "/p.jpg", "width": 1000, "height": 1500, "vote_average": 0, "iso_639_1": "ja"}]
        }"#;
        let response: TmdbImagesResponse = serde_json::from_str(json).unwrap();
        let images = MovieImages::from(response);

        assert_eq!(images.backdrops.len(), 1);
        assert_eq!(images.backdrops[0].kind, ImageKind::Backdrop);
        assert_eq!(images.backdrops[0].language, None);
        assert_eq!(images.posters.len(), 1);
        assert_eq!(images.posters[0].kind, ImageKind::Poster);
        assert_eq!(images.posters[0].language.as_deref(), Some("ja"));
        assert!(images.backdrops.iter().chain(&images.posters).all(|i| i.file_path != "/l.png"));
    }
}
