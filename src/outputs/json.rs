//! JSON files exchanged between the two stages.
//!
//! - scrape writes an array of [`CanonicalArticle`], ordered by publication time
//! - clean reads it back and writes an array of [`ProcessedArticle`] in the same order
//!
//! Publication dates come from the API as RFC 2822 strings; RFC 3339 is accepted too.
//! Records whose date parses as neither sort after all others, in discovery order.

use crate::error::{AppError, Result};
use crate::models::{CanonicalArticle, ProcessedArticle};
use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Parse an API publication date.
pub fn parse_published(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    DateTime::parse_from_rfc2822(s)
        .or_else(|_| DateTime::parse_from_rfc3339(s))
        .ok()
}

/// Stable ascending sort by publication time; unparseable dates go last.
pub fn sort_by_published(articles: &mut [CanonicalArticle]) {
    articles.sort_by_cached_key(|a| {
        let published = parse_published(&a.date_published);
        (published.is_none(), published)
    });
}

/// Sort and write the scrape stage's output.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = articles.len()))]
pub async fn write_articles(path: &Path, mut articles: Vec<CanonicalArticle>) -> Result<()> {
    sort_by_published(&mut articles);
    let undated = articles
        .iter()
        .filter(|a| parse_published(&a.date_published).is_none())
        .count();
    if undated > 0 {
        warn!(undated, "Some publication dates could not be parsed; sorted last");
    }
    write_json(path, &articles).await
}

#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn read_articles(path: &Path) -> Result<Vec<CanonicalArticle>> {
    let articles: Vec<CanonicalArticle> = read_json(path).await?;
    info!(count = articles.len(), "Read articles");
    Ok(articles)
}

#[instrument(level = "info", skip_all, fields(path = %path.display(), count = articles.len()))]
pub async fn write_processed(path: &Path, articles: &[ProcessedArticle]) -> Result<()> {
    write_json(path, articles).await
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value)?;
    fs::write(path, json)
        .await
        .map_err(|e| AppError::io(path, e))?;
    info!(path = %path.display(), "Wrote JSON");
    Ok(())
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).await.map_err(|e| AppError::io(path, e))?;
    Ok(serde_json::from_slice(&bytes)?)
}
