use crate::error::SourceError;
use async_trait::async_trait;
use reelfeed_models::{MovieImages, SearchCandidate};

/// Where the raw syndication XML comes from.
#[async_trait]
pub trait FeedSource: Send + Sync {
    fn source_name(&self) -> &str;

    /// Fetch the whole feed document. One attempt, no retries.
    async fn fetch_feed(&self) -> Result<String, SourceError>;
}

/// A movie-metadata service that can search by title and list artwork.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    fn provider_name(&self) -> &str;

    /// Search movies by title, optionally constrained to a release year.
    async fn search_movies(
        &self,
        query: &str,
        year: Option<&str>,
    ) -> Result<Vec<SearchCandidate>, SourceError>;

    /// Backdrops and posters for one movie. Logos are never returned.
    async fn movie_images(&self, movie_id: u64) -> Result<MovieImages, SourceError>;
}
