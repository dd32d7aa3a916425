pub mod error;
pub mod http;
pub mod letterboxd;
pub mod tmdb;
pub mod traits;

pub use error::SourceError;
pub use letterboxd::{parse_feed, LetterboxdFeed};
pub use tmdb::TmdbClient;
pub use traits::{FeedSource, MetadataProvider};
