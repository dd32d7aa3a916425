use std::collections::HashSet;

use reelfeed_models::SearchCandidate;

pub const ACCEPTANCE_THRESHOLD: f64 = 0.6;

const TITLE_WEIGHT: f64 = 0.7;
const POSTER_BONUS: f64 = 0.05;
const POPULARITY_BONUS_CAP: f64 = 0.05;
const POPULARITY_SCALE: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: SearchCandidate,
    pub confidence: f64,
}

/// Lowercase, drop punctuation, collapse whitespace.
pub fn normalize_title(title: &str) -> String {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Similarity in `[0, 1]`: 1 for equal titles, 0.9 when one contains the
/// other, otherwise the Jaccard index of their word sets.
pub fn title_similarity(a: &str, b: &str) -> f64 {
    let a = normalize_title(a);
    let b = normalize_title(b);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    if a.contains(b.as_str()) || b.contains(a.as_str()) {
        return 0.9;
    }

    let words_a: HashSet<&str> = a.split(' ').collect();
    let words_b: HashSet<&str> = b.split(' ').collect();
    let common = words_a.intersection(&words_b).count();
    let total = words_a.union(&words_b).count();
    common as f64 / total as f64
}

fn year_score(candidate_year: Option<i32>, wanted_year: Option<i32>) -> f64 {
    match (candidate_year, wanted_year) {
        (Some(found), Some(wanted)) => match (found - wanted).abs() {
            0 => 0.3,
            1 => 0.2,
            2 => 0.1,
            _ => 0.0,
        },
        _ => 0.0,
    }
}

pub fn confidence(candidate: &SearchCandidate, title: &str, year: &str) -> f64 {
    let similarity = title_similarity(&candidate.title, title).max(
        candidate
            .original_title
            .as_deref()
            .map(|original| title_similarity(original, title))
            .unwrap_or(0.0),
    );

    let mut score = similarity * TITLE_WEIGHT;
    score += year_score(candidate.release_year(), year.trim().parse().ok());
    if candidate.has_poster() {
        score += POSTER_BONUS;
    }
    let popularity = candidate.popularity.max(0.0);
    score + (popularity / POPULARITY_SCALE).min(POPULARITY_BONUS_CAP)
}

/// Highest-confidence candidate above [`ACCEPTANCE_THRESHOLD`]. Ties go to
/// the earlier result.
///
/// Confidence combines title similarity, release year proximity and small
/// poster and popularity bonuses.
pub fn select_best_match(candidates: &[SearchCandidate], title: &str, year: &str) -> Option<ScoredCandidate> {
    let mut best: Option<ScoredCandidate> = None;
    for candidate in candidates {
        let score = confidence(candidate, title, year);
        if score <= ACCEPTANCE_THRESHOLD {
            continue;
        }
        if best.as_ref().map_or(true, |b| score > b.confidence) {
            best = Some(ScoredCandidate {
                candidate: candidate.clone(),
                confidence: score,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: u64, title: &str, release_date: &str) -> SearchCandidate {
        SearchCandidate {
            id,
            title: title.to_string(),
            release_date: Some(release_date.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("  Your Name.  "), "your name");
        assert_eq!(normalize_title("Spider-Man: No Way Home"), "spiderman no way home");
        assert_eq!(normalize_title("Amélie"), "amélie");
    }

    #[test]
    fn test_similarity_tiers() {
        assert_eq!(title_similarity("Perfect Blue", "perfect blue!"), 1.0);
        assert_eq!(title_similarity("Alien", "Aliens"), 0.9);
        assert_eq!(title_similarity("The Thing", "A Thing Apart"), 0.25);
        assert_eq!(title_similarity("...", "Heat"), 0.0);
    }

    #[test]
    fn test_exact_title_and_year_is_confident() {
        let mut perfect_blue = candidate(10494, "Perfect Blue", "1997-08-05");
        perfect_blue.popularity = 10.0;
        let remake = candidate(1, "Perfect Blue Remake", "2020-01-01");

        let best = select_best_match(&[remake, perfect_blue], "Perfect Blue", "1997").unwrap();
        assert_eq!(best.candidate.id, 10494);
        assert!(best.confidence >= 0.9);
    }

    #[test]
    fn test_original_title_counts() {
        let mut kimi = candidate(372058, "Your Name.", "2016-08-26");
        kimi.original_title = Some("Kimi no Na wa".to_string());

        let best = select_best_match(&[kimi], "Kimi no Na wa", "2016").unwrap();
        assert_eq!(best.candidate.id, 372058);
    }

    #[test]
    fn test_dissimilar_candidates_rejected() {
        let candidates = vec![
            candidate(1, "Completely Different", "1997-01-01"),
            candidate(2, "Another Film", "1996-01-01"),
        ];
        assert!(select_best_match(&candidates, "Perfect Blue", "1997").is_none());
        assert!(select_best_match(&[], "Perfect Blue", "1997").is_none());
    }

    #[test]
    fn test_year_proximity() {
        let film = |date: &str| candidate(1, "Heat", date);
        let score = |date: &str| confidence(&film(date), "Heat", "1995");

        assert!((score("1995-12-15") - 1.0).abs() < 1e-9);
        assert!((score("1996-01-01") - 0.9).abs() < 1e-9);
        assert!((score("1997-01-01") - 0.8).abs() < 1e-9);
        assert!((score("2005-01-01") - 0.7).abs() < 1e-9);
        assert!((confidence(&film(""), "Heat", "") - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_poster_and_popularity_bonus_capped() {
        let mut film = candidate(1, "Heat", "1995-12-15");
        film.poster_path = Some("/heat.jpg".to_string());
        film.popularity = 5000.0;
        assert!((confidence(&film, "Heat", "1995") - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_first_of_equal_scores_wins() {
        let first = candidate(1, "Heat", "1995-12-15");
        let second = candidate(2, "Heat", "1995-12-15");
        let best = select_best_match(&[first, second], "Heat", "1995").unwrap();
        assert_eq!(best.candidate.id, 1);
    }

    #[test]
    fn test_partial_word_overlap_rejected() {
        // One shared word out of four, right year: 0.25 * 0.7 + 0.3
        let candidates = vec![candidate(1, "Blue Velvet", "1986-09-19")];
        assert!(select_best_match(&candidates, "Perfect Blue Sky", "1986").is_none());

        // Containment without a year still clears the bar: 0.9 * 0.7
        let candidates = vec![candidate(2, "Blue", "")];
        assert!(select_best_match(&candidates, "Perfect Blue Sky", "").is_some());
    }
}
