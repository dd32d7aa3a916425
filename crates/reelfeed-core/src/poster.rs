use std::cmp::Ordering;

use reelfeed_models::{ImageCandidate, ImageKind, MovieImages};

pub const MIN_ASPECT_RATIO: f64 = 1.2;

const BACKDROP_BASE: f64 = 200.0;
const POSTER_BASE: f64 = 150.0;
const DEFAULT_VOTE: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredImage {
    pub image: ImageCandidate,
    pub score: f64,
    /// Position in the provider's list for this kind of image
    pub position: usize,
}

impl ScoredImage {
    pub fn aspect_ratio(&self) -> f64 {
        self.image.aspect_ratio()
    }

    /// e.g. `Cinematic backdrop 1 (1920x1080, ratio: 1.8:1)`
    pub fn describe(&self) -> String {
        let label = match self.image.kind {
            ImageKind::Backdrop => "Cinematic backdrop",
            ImageKind::Poster => "Widescreen poster",
        };
        format!(
            "{} {} ({}x{}, ratio: {:.1}:1)",
            label,
            self.position + 1,
            self.image.width,
            self.image.height,
            self.aspect_ratio()
        )
    }
}

/// Missing and zero votes both count as an average vote.
fn vote_or_default(image: &ImageCandidate) -> f64 {
    image.vote_average.filter(|v| *v != 0.0).unwrap_or(DEFAULT_VOTE)
}

pub fn score_backdrop(image: &ImageCandidate, position: usize) -> f64 {
    let ratio = image.aspect_ratio();
    let mut score = BACKDROP_BASE;

    score += if ratio >= 1.5 {
        60.0
    } else if ratio >= 1.2 {
        40.0
    } else {
        0.0
    };
    score += vote_or_default(image) * 4.0;
    score += if image.width >= 1000 {
        30.0
    } else if image.width >= 500 {
        15.0
    } else {
        0.0
    };
    score += if image.width >= 1920 {
        25.0
    } else if image.width >= 1280 {
        15.0
    } else {
        0.0
    };
    score + (15.0 - position as f64)
}

/// `None` for posters too narrow to use at all.
pub fn score_poster(image: &ImageCandidate, position: usize) -> Option<f64> {
    let ratio = image.aspect_ratio();
    if ratio < MIN_ASPECT_RATIO {
        return None;
    }

    let mut score = POSTER_BASE;
    score += if ratio >= 1.5 { 40.0 } else { 20.0 };
    if image.language.as_deref().map_or(true, |lang| lang == "en") {
        score += 25.0;
    }
    score += vote_or_default(image) * 3.0;
    if image.width >= 500 {
        score += 20.0;
    }
    Some(score + (12.0 - position as f64))
}

/// Every eligible image, best first. Equal scores keep backdrops ahead of
/// posters and provider order within each kind.
pub fn rank_images(images: &MovieImages) -> Vec<ScoredImage> {
    let backdrops = images.backdrops.iter().enumerate().map(|(position, image)| ScoredImage {
        image: image.clone(),
        score: score_backdrop(image, position),
        position,
    });
    let posters = images.posters.iter().enumerate().filter_map(|(position, image)| {
        score_poster(image, position).map(|score| ScoredImage {
            image: image.clone(),
            score,
            position,
        })
    });

    let mut ranked: Vec<ScoredImage> = backdrops.chain(posters).collect();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ranked.retain(|scored| scored.aspect_ratio() >= MIN_ASPECT_RATIO);
    ranked
}

/// Pick the display image for a matched film.
///
/// Backdrops score above posters, and posters only compete when they are
/// themselves wide. Nothing narrower than [`MIN_ASPECT_RATIO`] is returned.
pub fn select_poster(images: &MovieImages) -> Option<ScoredImage> {
    rank_images(images).into_iter().next()
}
