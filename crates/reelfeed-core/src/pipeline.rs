use anyhow::{Context, Result};
use reelfeed_config::Config;
use reelfeed_models::ReviewRecord;
use reelfeed_sources::{parse_feed, FeedSource, MetadataProvider};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

use crate::normalize::normalize_item;
use crate::poster::select_poster;
use crate::search::MetadataSearch;
use crate::strategy::AlternateTitles;

/// Settings for one pipeline run, resolved from [`Config`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub max_reviews: usize,
    pub output_path: PathBuf,
    pub image_base_url: String,
    pub image_size: String,
    pub strategy_delay: Duration,
    pub item_delay: Duration,
    pub alternate_titles: AlternateTitles,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_reviews: config.letterboxd.max_reviews,
            output_path: config.output.path.clone(),
            image_base_url: config.tmdb.image_base_url.clone(),
            image_size: config.tmdb.image_size.clone(),
            strategy_delay: Duration::from_millis(config.tmdb.strategy_delay_ms),
            item_delay: Duration::from_millis(config.output.item_delay_ms),
            alternate_titles: AlternateTitles::with_overrides(config.tmdb.alternate_titles.clone()),
        }
    }

    /// Public URL for an image path such as `/abc.jpg`
    pub fn image_url(&self, file_path: &str) -> String {
        format!(
            "{}/{}{}",
            self.image_base_url.trim_end_matches('/'),
            self.image_size,
            file_path
        )
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    FeedLoaded { items: usize, selected: usize },
    ItemStarted { index: usize, total: usize, title: String },
    ItemFinished { index: usize, total: usize, enriched: bool },
    ItemSkipped { index: usize, total: usize, reason: String },
}

type ProgressCallback = Arc<dyn Fn(&ProgressEvent) + Send + Sync>;

#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineReport {
    /// Items in the feed document
    pub feed_items: usize,
    /// Items considered after the `max_reviews` cut
    pub selected: usize,
    pub written: usize,
    pub enriched: usize,
    pub skipped: usize,
    pub enrichment_enabled: bool,
    pub duration: Duration,
    pub output_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct PipelineRun {
    pub records: Vec<ReviewRecord>,
    pub report: PipelineReport,
}

/// Fetches the review feed, normalizes the most recent items, enriches them
/// with metadata when a provider is configured, and writes the result.
pub struct ReviewPipeline {
    config: PipelineConfig,
    feed: Box<dyn FeedSource>,
    search: Option<MetadataSearch>,
    progress: Option<ProgressCallback>,
}

impl ReviewPipeline {
    pub fn new(config: PipelineConfig, feed: Box<dyn FeedSource>) -> Self {
        Self {
            config,
            feed,
            search: None,
            progress: None,
        }
    }

    /// Enable enrichment. Without a provider records are written bare.
    pub fn with_metadata_provider(mut self, provider: Arc<dyn MetadataProvider>) -> Self {
        self.search = Some(
            MetadataSearch::new(provider)
                .with_alternate_titles(self.config.alternate_titles.clone())
                .with_strategy_delay(self.config.strategy_delay),
        );
        self
    }

    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ProgressEvent) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(callback));
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn enrichment_enabled(&self) -> bool {
        self.search.is_some()
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(callback) = &self.progress {
            callback(&event);
        }
    }

    /// Build the records without writing anything.
    ///
    /// Only fetching and parsing the feed can fail; per-item problems are
    /// logged and the item is either skipped or left unenriched.
    #[instrument(skip(self), fields(feed = self.feed.source_name()))]
    pub async fn collect(&self) -> Result<PipelineRun> {
        let start = Instant::now();

        let xml = self
            .feed
            .fetch_feed()
            .await
            .with_context(|| format!("Failed to fetch feed from {}", self.feed.source_name()))?;
        let items = parse_feed(&xml).context("Failed to parse review feed")?;

        let total = items.len().min(self.config.max_reviews);
        info!("Feed has {} items, processing {}", items.len(), total);
        self.emit(ProgressEvent::FeedLoaded {
            items: items.len(),
            selected: total,
        });

        match &self.search {
            Some(search) => info!("Enriching reviews via {}", search.provider_name()),
            None => info!("No metadata API key configured, writing reviews without posters"),
        }

        let mut report = PipelineReport {
            feed_items: items.len(),
            selected: total,
            enrichment_enabled: self.search.is_some(),
            ..Default::default()
        };
        let mut records = Vec::with_capacity(total);

        for (index, item) in items.iter().take(total).enumerate() {
            let mut record = match normalize_item(item) {
                Ok(record) => record,
                Err(reason) => {
                    warn!("Skipping feed item {}: {}", index + 1, reason);
                    report.skipped += 1;
                    self.emit(ProgressEvent::ItemSkipped {
                        index,
                        total,
                        reason: reason.to_string(),
                    });
                    continue;
                }
            };

            info!(title = %record.title, year = %record.year, "Processing review {}/{}", index + 1, total);
            self.emit(ProgressEvent::ItemStarted {
                index,
                total,
                title: record.title.clone(),
            });

            if let Some(search) = &self.search {
                self.enrich(search, &mut record).await;
                if index + 1 < total && !self.config.item_delay.is_zero() {
                    tokio::time::sleep(self.config.item_delay).await;
                }
            }

            let enriched = record.is_enriched();
            if enriched {
                report.enriched += 1;
            }
            self.emit(ProgressEvent::ItemFinished { index, total, enriched });
            records.push(record);
        }

        report.written = records.len();
        report.duration = start.elapsed();
        info!(
            "Prepared {} reviews ({} enriched, {} skipped) in {:?}",
            report.written, report.enriched, report.skipped, report.duration
        );

        Ok(PipelineRun { records, report })
    }

    /// Collect and write the records to the configured output path.
    pub async fn run(&self) -> Result<PipelineRun> {
        let mut run = self.collect().await?;
        write_records(&self.config.output_path, &run.records)?;
        run.report.output_path = Some(self.config.output_path.clone());
        info!("Wrote {} reviews to {:?}", run.records.len(), self.config.output_path);
        Ok(run)
    }

    async fn enrich(&self, search: &MetadataSearch, record: &mut ReviewRecord) {
        let Some(found) = search.find_movie(&record.title, &record.year).await else {
            return;
        };
        record.tmdb_id = Some(found.candidate.id);

        match select_poster(&found.images) {
            Some(selected) => {
                info!(
                    title = %record.title,
                    score = selected.score,
                    "Selected {}",
                    selected.describe()
                );
                record.poster_url = Some(self.config.image_url(&selected.image.file_path));
            }
            None => info!(title = %record.title, tmdb_id = found.candidate.id, "No eligible wide image, leaving poster empty"),
        }
    }
}

/// Write records as a pretty-printed JSON array, creating parent
/// directories as needed.
pub fn write_records(path: &Path, records: &[ReviewRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {:?}", parent))?;
    }
    let json = serde_json::to_string_pretty(records).context("Failed to serialize reviews")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write reviews to {:?}", path))?;
    Ok(())
}
