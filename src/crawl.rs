//! Date-bounded, paginated crawl.
//!
//! For every date key the crawler walks pages at `offset = 0, page_size, 2 * page_size, ...`
//! and stops at the first page that does not hold exactly `page_size` items. A full page
//! always triggers one more request, so a day with exactly `k * page_size` stories costs
//! `k + 1` requests. The walk is capped at `max_pages_per_date` so an API that keeps
//! returning full pages cannot loop forever.
//!
//! Failures are contained per date:
//! - error envelope: the date contributes nothing
//! - transport / malformed body: warning, the date stops, pages already read are kept
//! - any other client error: logged at error level, contained the same way
//!
//! Extraction runs after every date is exhausted and keeps discovery order.

use crate::api::ContentApi;
use crate::error::ExtractionFailed;
use crate::extract::ArticleExtractor;
use crate::models::{CanonicalArticle, RawArticle};
use futures::stream::{self, StreamExt};
use tracing::{debug, error, info, instrument, warn};

/// Drives a [`ContentApi`] across a sequence of date keys.
#[derive(Debug)]
pub struct Crawler<C> {
    api: C,
    extractor: ArticleExtractor,
    max_pages_per_date: usize,
}

impl<C: ContentApi> Crawler<C> {
    pub fn new(api: C, extractor: ArticleExtractor, max_pages_per_date: usize) -> Self {
        Self {
            api,
            extractor,
            max_pages_per_date: max_pages_per_date.max(1),
        }
    }

    /// Crawl every date and return the canonical records that survived extraction.
    #[instrument(level = "info", skip_all)]
    pub async fn crawl<I>(&self, dates: I) -> Vec<CanonicalArticle>
    where
        I: IntoIterator<Item = String>,
    {
        let raw: Vec<RawArticle> = stream::iter(dates)
            .then(|date| async move { self.crawl_date(&date).await })
            .flat_map(stream::iter)
            .collect()
            .await;

        let articles: Vec<CanonicalArticle> = raw
            .iter()
            .filter_map(|story| self.extract_one(story))
            .collect();

        info!(
            raw_stories = raw.len(),
            articles = articles.len(),
            "Crawl complete"
        );
        articles
    }

    /// All raw stories for one date, in page order.
    #[instrument(level = "info", skip(self))]
    pub async fn crawl_date(&self, date: &str) -> Vec<RawArticle> {
        let page_size = self.api.page_size();
        let mut accumulated = Vec::new();
        let mut offset = 0;

        for page_no in 0..self.max_pages_per_date {
            let page = match self.api.fetch_page(date, offset).await {
                Ok(page) => page,
                Err(e) if e.is_skippable() => {
                    warn!(%date, offset, error = %e, "Page request failed; skipping rest of date");
                    return accumulated;
                }
                Err(e) => {
                    error!(%date, offset, error = %e, "Unexpected client error; skipping rest of date");
                    return accumulated;
                }
            };

            if page.is_error_envelope() {
                debug!(%date, offset, "API returned an error envelope; no more results");
                return accumulated;
            }

            if page.is_empty() && page_no == 0 {
                debug!(%date, "No stories for date");
            }

            let count = page.len();
            accumulated.extend(page.into_items());
            debug!(%date, offset, count, page_no, "Fetched page");

            if count != page_size {
                info!(%date, stories = accumulated.len(), pages = page_no + 1, "Date exhausted");
                return accumulated;
            }
            offset += page_size;
        }

        warn!(
            %date,
            max_pages = self.max_pages_per_date,
            stories = accumulated.len(),
            "Reached page limit for date; results may be incomplete"
        );
        accumulated
    }

    fn extract_one(&self, story: &RawArticle) -> Option<CanonicalArticle> {
        match self.extractor.extract(story) {
            Ok(article) => Some(article),
            Err(e @ ExtractionFailed::Rejected { .. }) => {
                debug!(reason = %e, "Dropping story");
                None
            }
            Err(e @ ExtractionFailed::Malformed { .. }) => {
                warn!(reason = %e, "Dropping story missing a field the API always sends");
                None
            }
        }
    }
}
