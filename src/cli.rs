//! Command-line interface definitions for NPR Topics.
//!
//! Two subcommands, run one after the other:
//!
//! ```sh
//! # Crawl every day from 2016-07-01 to 2016-07-31 into npr_articles.json
//! NPR_ACCESS_KEY=... npr_topics scrape 2016-07-01 2016-07-31
//!
//! # Normalize the article text into npr_articles_clean.json
//! npr_topics clean
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the NPR Topics application.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to config.yaml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Crawl the story API for every day in START..=END and write canonical records
    Scrape(ScrapeArgs),
    /// Normalize the article text of a scraped file
    Clean(CleanArgs),
}

#[derive(Args, Debug)]
pub struct ScrapeArgs {
    /// First day to crawl (YYYY-MM-DD)
    pub start: String,

    /// Last day to crawl, inclusive (YYYY-MM-DD)
    pub end: String,

    /// Where to write the scraped articles
    #[arg(short, long, default_value = "npr_articles.json")]
    pub output: PathBuf,

    /// NPR API key
    #[arg(long, env = "NPR_ACCESS_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Scraped articles to read
    #[arg(short, long, default_value = "npr_articles.json")]
    pub input: PathBuf,

    /// Where to write the normalized articles
    #[arg(short, long, default_value = "npr_articles_clean.json")]
    pub output: PathBuf,

    /// Keep multi-word names as separate tokens
    #[arg(long)]
    pub no_entities: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_parsing() {
        let cli = Cli::parse_from([
            "npr_topics",
            "scrape",
            "2016-07-01",
            "2016-07-31",
            "--api-key",
            "k",
        ]);

        let Command::Scrape(args) = cli.command else {
            panic!("expected scrape");
        };
        assert_eq!(args.start, "2016-07-01");
        assert_eq!(args.end, "2016-07-31");
        assert_eq!(args.output, PathBuf::from("npr_articles.json"));
        assert_eq!(args.api_key.as_deref(), Some("k"));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_clean_defaults() {
        let cli = Cli::parse_from(["npr_topics", "clean"]);
        let Command::Clean(args) = cli.command else {
            panic!("expected clean");
        };
        assert_eq!(args.input, PathBuf::from("npr_articles.json"));
        assert_eq!(args.output, PathBuf::from("npr_articles_clean.json"));
        assert!(!args.no_entities);
    }

    #[test]
    fn test_short_flags_and_global_config() {
        let cli = Cli::parse_from([
            "npr_topics",
            "clean",
            "-i",
            "/tmp/in.json",
            "-o",
            "/tmp/out.json",
            "-c",
            "config.yaml",
            "--no-entities",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("config.yaml")));
        let Command::Clean(args) = cli.command else {
            panic!("expected clean");
        };
        assert_eq!(args.input, PathBuf::from("/tmp/in.json"));
        assert_eq!(args.output, PathBuf::from("/tmp/out.json"));
        assert!(args.no_entities);
    }

    #[test]
    fn test_scrape_requires_both_dates() {
        assert!(Cli::try_parse_from(["npr_topics", "scrape", "2016-07-01"]).is_err());
    }
}
