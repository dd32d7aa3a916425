use chrono::{DateTime, Local, NaiveDate};
use reelfeed_models::{RawFeedItem, ReviewRecord, StarRating};
use thiserror::Error;

use crate::review_text::normalize_review_text;

pub const UNKNOWN_DATE: &str = "Unknown date";

/// "January 5, 2024"
const DISPLAY_DATE_FORMAT: &str = "%B %-d, %Y";

const FULL_STAR: char = '★';
const HALF_STAR: char = '½';

/// Why a feed item produced no record
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SkipReason {
    #[error("item has no title")]
    MissingTitle,
    #[error("item has no description")]
    MissingDescription,
    #[error("title {0:?} does not look like \"Film, Year - Stars\"")]
    UnrecognizedTitle(String),
}

/// Film details read from an item title like `Oldboy, 2003 - ★★★★½`
#[derive(Debug, Clone, PartialEq)]
pub struct TitleParts {
    pub title: String,
    pub year: String,
    pub rating: Option<StarRating>,
}

pub fn normalize_item(item: &RawFeedItem) -> Result<ReviewRecord, SkipReason> {
    let raw_title = item.title.as_deref().ok_or(SkipReason::MissingTitle)?;
    let description = item.description.as_deref().ok_or(SkipReason::MissingDescription)?;

    let parts = match item.film_fields() {
        Some((title, year)) => TitleParts {
            title: title.trim().to_string(),
            year: year.trim().to_string(),
            rating: item.member_rating.as_deref().and_then(parse_member_rating),
        },
        None => parse_item_title(raw_title)
            .ok_or_else(|| SkipReason::UnrecognizedTitle(raw_title.to_string()))?,
    };

    let watched_date = match item.watched_date.as_deref() {
        Some(date) => format_watched_date(date),
        None => format_pub_date(item.pub_date.as_deref().unwrap_or_default()),
    };

    Ok(ReviewRecord {
        title: parts.title,
        year: parts.year,
        rating: parts.rating,
        review_text: normalize_review_text(description),
        watched_date,
        link: item.link.clone().unwrap_or_default(),
        tmdb_id: None,
        poster_url: None,
    })
}

/// `letterboxd:memberRating` holds a decimal star count such as `3.5`.
pub fn parse_member_rating(value: &str) -> Option<StarRating> {
    value.trim().parse::<f64>().ok().and_then(StarRating::from_stars)
}

/// Parse `Title, YYYY - ★★★½`.
///
/// The title is everything before the first comma that is followed by a
/// four digit year and a dash, so titles containing commas still parse.
pub fn parse_item_title(raw: &str) -> Option<TitleParts> {
    for (comma, _) in raw.match_indices(',') {
        let title = raw[..comma].trim();
        if title.is_empty() {
            continue;
        }

        let rest = raw[comma + 1..].trim_start();
        let is_year = rest.len() >= 4 && rest.as_bytes()[..4].iter().all(u8::is_ascii_digit);
        if !is_year {
            continue;
        }
        let (year, after_year) = rest.split_at(4);
        let Some(stars) = after_year.trim_start().strip_prefix('-') else {
            continue;
        };

        let full = stars.chars().filter(|c| *c == FULL_STAR).count();
        let half = stars.contains(HALF_STAR);
        return Some(TitleParts {
            title: title.to_string(),
            year: year.to_string(),
            rating: StarRating::from_glyphs(full, half),
        });
    }
    None
}

/// `letterboxd:watchedDate` is a plain `YYYY-MM-DD` date.
pub fn format_watched_date(value: &str) -> String {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map(|date| date.format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_else(|_| UNKNOWN_DATE.to_string())
}

/// RSS `pubDate` (RFC 2822), shown as a date in the local time zone.
pub fn format_pub_date(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return UNKNOWN_DATE.to_string();
    }

    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|dt| dt.with_timezone(&Local).format(DISPLAY_DATE_FORMAT).to_string())
        .or_else(|_| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|date| date.format(DISPLAY_DATE_FORMAT).to_string())
        })
        .unwrap_or_else(|_| UNKNOWN_DATE.to_string())
}
