//! Persisted output of both stages.
//!
//! ```text
//! npr_articles.json        # scrape: canonical records sorted by publication time
//! npr_articles_clean.json  # clean: the same records plus `processed_text`
//! ```

pub mod json;
