//! # NPR Topics
//!
//! Collects NPR stories for a range of days and turns their text into token
//! streams ready for topic modelling.
//!
//! ## Usage
//!
//! ```sh
//! npr_topics scrape 2016-07-01 2016-07-31 --api-key KEY
//! npr_topics clean
//! ```
//!
//! ## Architecture
//!
//! 1. **Dates**: expand `START..=END` into daily keys
//! 2. **Crawl**: page through the story API for each day, 20 stories per request
//! 3. **Extract**: map raw stories to canonical records, dropping incomplete ones
//! 4. **Clean**: normalize each record's text into content-word lemmas
//! 5. **Output**: JSON arrays for both stages

use clap::Parser;
use std::error::Error;
use std::time::Instant;
use tracing::{error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod cli;
mod config;
mod crawl;
mod dates;
mod error;
mod extract;
mod models;
mod nlp;
mod normalize;
mod outputs;
mod utils;

use api::NprClient;
use cli::{CleanArgs, Cli, Command, ScrapeArgs};
use config::{require_api_key, AppConfig};
use crawl::Crawler;
use dates::DateRange;
use extract::ArticleExtractor;
use nlp::lexicon::LexiconAnalyzer;
use normalize::TextNormalizer;
use outputs::json;
use utils::ensure_writable_parent;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = Instant::now();
    info!("npr_topics starting up");

    let args = Cli::parse();

    let config = match AppConfig::load(args.config.as_deref()).await {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };

    let result = match args.command {
        Command::Scrape(scrape) => run_scrape(&config, scrape).await,
        Command::Clean(clean) => run_clean(&config, clean).await,
    };
    if let Err(e) = result {
        error!(error = %e, "Run failed");
        return Err(e.into());
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );
    Ok(())
}

/// Crawl the requested days and write the canonical records.
///
/// The date range and credential are checked before any request is sent.
#[instrument(level = "info", skip_all, fields(start = %args.start, end = %args.end))]
async fn run_scrape(config: &AppConfig, args: ScrapeArgs) -> error::Result<()> {
    let range = DateRange::parse(&args.start, &args.end)?;
    let api_key = require_api_key(args.api_key.as_deref())?;
    ensure_writable_parent(&args.output).await?;

    let client = NprClient::new(config.api_url()?, api_key, config.page_size);
    let crawler = Crawler::new(
        client,
        ArticleExtractor::new(config.section_markers.clone()),
        config.max_pages_per_date,
    );

    info!(
        first = %range.start(),
        last = %range.end(),
        days = range.num_days(),
        "Starting crawl"
    );
    let articles = crawler.crawl(&range).await;
    info!(count = articles.len(), "Crawled articles");

    json::write_articles(&args.output, articles).await
}

/// Read scraped records, normalize their text and write the result.
#[instrument(level = "info", skip_all, fields(input = %args.input.display()))]
async fn run_clean(config: &AppConfig, args: CleanArgs) -> error::Result<()> {
    let articles = json::read_articles(&args.input).await?;
    ensure_writable_parent(&args.output).await?;

    let normalizer = TextNormalizer::from_config(LexiconAnalyzer::new(), config)
        .with_merge_entities(!args.no_entities);
    let processed = normalizer.process_all(articles);

    json::write_processed(&args.output, &processed).await
}
