use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    Backdrop,
    Poster,
}

/// One backdrop or poster option for a matched title.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageCandidate {
    pub file_path: String,
    pub width: u32,
    pub height: u32,
    pub vote_average: Option<f64>,
    /// ISO 639-1 code, `None` for language-neutral art
    pub language: Option<String>,
    pub kind: ImageKind,
}

impl ImageCandidate {
    /// Width over height. A zero height yields 0.0 so the image is never
    /// considered wide.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            return 0.0;
        }
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Image collections for one title. Logos are never requested.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MovieImages {
    pub backdrops: Vec<ImageCandidate>,
    pub posters: Vec<ImageCandidate>,
}

impl MovieImages {
    pub fn is_empty(&self) -> bool {
        self.backdrops.is_empty() && self.posters.is_empty()
    }
}
