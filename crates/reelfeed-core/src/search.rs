use std::sync::Arc;
use std::time::Duration;

use reelfeed_models::{MovieImages, SearchCandidate};
use reelfeed_sources::MetadataProvider;
use tracing::{debug, info, instrument, warn};

use crate::matching::select_best_match;
use crate::strategy::{plan_queries, AlternateTitles, SearchStrategy};

/// A film identified on the metadata service, with its artwork.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieMatch {
    pub candidate: SearchCandidate,
    pub confidence: f64,
    pub strategy: SearchStrategy,
    /// Empty when the image lookup failed
    pub images: MovieImages,
}

/// Runs the search strategies against a metadata provider until one yields
/// an accepted match.
pub struct MetadataSearch {
    provider: Arc<dyn MetadataProvider>,
    alternates: AlternateTitles,
    strategy_delay: Duration,
}

impl MetadataSearch {
    pub fn new(provider: Arc<dyn MetadataProvider>) -> Self {
        Self {
            provider,
            alternates: AlternateTitles::builtin(),
            strategy_delay: Duration::from_millis(200),
        }
    }

    pub fn with_alternate_titles(mut self, alternates: AlternateTitles) -> Self {
        self.alternates = alternates;
        self
    }

    /// Pause between consecutive strategy requests
    pub fn with_strategy_delay(mut self, delay: Duration) -> Self {
        self.strategy_delay = delay;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Look a film up. Provider errors only end the current strategy, so
    /// this never fails: it returns `None` when nothing was accepted.
    #[instrument(skip(self), fields(provider = self.provider.provider_name()))]
    pub async fn find_movie(&self, title: &str, year: &str) -> Option<MovieMatch> {
        let plan = plan_queries(title, year, &self.alternates);

        for (attempt, (strategy, query)) in plan.iter().enumerate() {
            if attempt > 0 && !self.strategy_delay.is_zero() {
                tokio::time::sleep(self.strategy_delay).await;
            }
            debug!(strategy = %strategy, query = %query.query, year = ?query.year, "Trying search strategy");

            let candidates = match self.provider.search_movies(&query.query, query.year.as_deref()).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!(strategy = %strategy, query = %query.query, error = %e, "Search request failed");
                    continue;
                }
            };
            if candidates.is_empty() {
                debug!(strategy = %strategy, "No search results");
                continue;
            }

            let Some(best) = select_best_match(&candidates, title, year) else {
                debug!(strategy = %strategy, results = candidates.len(), "No result above the confidence threshold");
                continue;
            };

            info!(
                title,
                year,
                strategy = %strategy,
                confidence = best.confidence,
                tmdb_id = best.candidate.id,
                "Matched {:?}",
                best.candidate.title
            );
            let images = self.fetch_images(best.candidate.id).await;
            return Some(MovieMatch {
                candidate: best.candidate,
                confidence: best.confidence,
                strategy: *strategy,
                images,
            });
        }

        info!(title, year, attempts = plan.len(), "No confident match");
        None
    }

    async fn fetch_images(&self, movie_id: u64) -> MovieImages {
        match self.provider.movie_images(movie_id).await {
            Ok(images) => {
                debug!(
                    tmdb_id = movie_id,
                    backdrops = images.backdrops.len(),
                    posters = images.posters.len(),
                    "Fetched images"
                );
                images
            }
            Err(e) => {
                warn!(tmdb_id = movie_id, error = %e, "Image lookup failed, continuing without artwork");
                MovieImages::default()
            }
        }
    }
}
