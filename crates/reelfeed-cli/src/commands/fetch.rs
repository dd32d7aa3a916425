use super::config::{load_config, resolve_api_key};
use super::fetch_ui::FetchUI;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use reelfeed_config::PathManager;
use reelfeed_core::{PipelineConfig, PipelineRun, ReviewPipeline};
use reelfeed_sources::{LetterboxdFeed, TmdbClient};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct FetchArgs {
    pub username: Option<String>,
    pub output_path: Option<PathBuf>,
    pub max_reviews: Option<usize>,
    pub no_enrich: bool,
    pub dry_run: bool,
}

pub async fn run_fetch(args: FetchArgs, config_path: Option<&Path>, output: &Output) -> Result<()> {
    tracing::debug!("Fetch command started");

    let mut config = load_config(config_path)?;
    config.apply_env_overrides();
    if let Some(username) = args.username {
        config.letterboxd.username = username;
    }
    if let Some(path) = args.output_path {
        config.output.path = path;
    }
    if let Some(max_reviews) = args.max_reviews {
        config.letterboxd.max_reviews = max_reviews;
    }
    config
        .validate()
        .map_err(|e| eyre!("Configuration validation failed: {}", e))?;

    let api_key = if args.no_enrich {
        None
    } else {
        resolve_api_key(&PathManager::default())?
    };

    let feed = LetterboxdFeed::new(config.letterboxd.feed_url());
    let ui = FetchUI::new(output.is_human() && !output.is_quiet());
    let progress = ui.clone();
    let mut pipeline = ReviewPipeline::new(PipelineConfig::from_config(&config), Box::new(feed))
        .with_progress(move |event| progress.handle(event));

    match api_key {
        Some((key, source)) => {
            tracing::debug!("Using TMDb API key from {}", source);
            let client = TmdbClient::new(key, config.tmdb.api_base_url.clone());
            pipeline = pipeline.with_metadata_provider(Arc::new(client));
        }
        None if args.no_enrich => {}
        None => output.warn("TMDb API key not set; reviews will be written without posters. Run 'reelfeed config tmdb' to add one."),
    }

    let result = if args.dry_run {
        pipeline.collect().await
    } else {
        pipeline.run().await
    };
    ui.finish();
    let run = result.map_err(|e| eyre!("{:#}", e))?;

    print_summary(&run, args.dry_run, output)
}

fn print_summary(run: &PipelineRun, dry_run: bool, output: &Output) -> Result<()> {
    let report = &run.report;

    if !output.is_human() {
        let mut result = json!({
            "success": true,
            "dry_run": dry_run,
            "feed_items": report.feed_items,
            "selected": report.selected,
            "written": report.written,
            "enriched": report.enriched,
            "skipped": report.skipped,
            "enrichment_enabled": report.enrichment_enabled,
            "duration_seconds": report.duration.as_secs_f64(),
            "output_path": report.output_path.as_ref().map(|p| p.display().to_string()),
        });
        if dry_run {
            result["reviews"] = serde_json::to_value(&run.records)?;
        }
        output.json(&result);
        return Ok(());
    }

    if dry_run {
        // The document itself goes to stdout even with --quiet
        println!("{}", serde_json::to_string_pretty(&run.records)?);
    }

    let destination = match &report.output_path {
        Some(path) => format!(" to {}", path.display()),
        None => " (dry run, nothing written)".to_string(),
    };
    output.success(format!(
        "{} reviews{} in {:.1}s",
        report.written,
        destination,
        report.duration.as_secs_f64()
    ));
    if report.enrichment_enabled {
        output.println(format!("  Enriched with TMDb: {}/{}", report.enriched, report.written));
    }
    if report.skipped > 0 {
        output.println(format!("  Skipped feed items: {}", report.skipped));
    }
    Ok(())
}
