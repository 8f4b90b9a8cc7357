//! Content API access, one page at a time.
//!
//! # Architecture
//!
//! - [`ContentApi`]: trait for fetching one page of stories for one day
//! - [`NprClient`]: the HTTP implementation against the NPR story query API
//!
//! The crawler only sees the trait, so tests can drive it with a scripted fake.
//!
//! # Response classification
//!
//! | Response | Outcome |
//! |----------|---------|
//! | transport failure / non-2xx | [`AppError::Transport`] |
//! | 2xx, body not JSON | [`AppError::MalformedResponse`] |
//! | 2xx, top-level `message` key | [`PageResult::error_envelope`] |
//! | 2xx, `list.story` array | [`PageResult::stories`] |
//! | 2xx, neither | empty page |

use crate::error::{AppError, Result};
use crate::models::{PageResult, RawArticle};
use crate::utils::truncate_for_log;
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::time::Instant;
use tracing::{debug, instrument, warn};
use url::Url;

/// A paginated, date-scoped source of raw stories.
pub trait ContentApi {
    /// Number of items a full page holds.
    fn page_size(&self) -> usize;

    /// Fetch the page of stories for `date` starting at `offset`.
    async fn fetch_page(&self, date: &str, offset: usize) -> Result<PageResult>;
}

/// HTTP client for the NPR story query API.
pub struct NprClient {
    http: Client,
    base_url: Url,
    api_key: String,
    page_size: usize,
}

impl NprClient {
    /// Build a client. The key is taken as-is; resolve it with
    /// [`crate::config::require_api_key`] first.
    pub fn new(base_url: Url, api_key: String, page_size: usize) -> Self {
        Self {
            http: Client::new(),
            base_url,
            api_key,
            page_size,
        }
    }

    /// Query parameters for one page request.
    fn query(&self, date: &str, offset: usize) -> Vec<(&'static str, String)> {
        vec![
            ("fields", "all".to_string()),
            ("requiredAssets", "text".to_string()),
            ("date", date.to_string()),
            ("startNum", offset.to_string()),
            ("dateType", "story".to_string()),
            ("output", "JSON".to_string()),
            ("numResults", self.page_size.to_string()),
            ("searchType", "fullContent".to_string()),
            ("apiKey", self.api_key.clone()),
        ]
    }
}

impl fmt::Debug for NprClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NprClient")
            .field("base_url", &self.base_url.as_str())
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

impl ContentApi for NprClient {
    fn page_size(&self) -> usize {
        self.page_size
    }

    #[instrument(level = "debug", skip(self))]
    async fn fetch_page(&self, date: &str, offset: usize) -> Result<PageResult> {
        let transport = |message: String| AppError::Transport {
            date: date.to_string(),
            offset,
            message,
        };

        let t0 = Instant::now();
        let response = self
            .http
            .get(self.base_url.clone())
            .query(&self.query(date, offset))
            .send()
            .await
            .map_err(|e| transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(transport(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport(e.without_url().to_string()))?;
        debug!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            bytes = body.len(),
            "Fetched page"
        );

        let json: Value = serde_json::from_str(&body).map_err(|e| {
            warn!(
                body_preview = %truncate_for_log(&body, 200),
                "Response body is not JSON"
            );
            AppError::MalformedResponse {
                date: date.to_string(),
                offset,
                message: e.to_string(),
            }
        })?;

        Ok(classify(json))
    }
}

/// Sort a decoded body into envelope, stories, or an empty page.
pub fn classify(json: Value) -> PageResult {
    if json.get("message").is_some() {
        return PageResult::error_envelope();
    }
    match json.pointer("/list/story") {
        Some(Value::Array(stories)) => {
            PageResult::stories(stories.iter().cloned().map(RawArticle::new).collect())
        }
        _ => {
            debug!("Response has no story list; treating as an empty page");
            PageResult::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> NprClient {
        let base = Url::parse(&format!("{}/query", server.uri())).unwrap();
        NprClient::new(base, "test-key".to_string(), 20)
    }

    #[test]
    fn test_classify_message_envelope_drops_items() {
        let page = classify(json!({
            "message": [{"id": "401", "text": {"$text": "No results"}}],
            "list": {"story": [{"title": {"$text": "ignored"}}]}
        }));
        assert!(page.is_error_envelope());
        assert!(page.is_empty());
    }

    #[test]
    fn test_classify_story_list() {
        let page = classify(json!({"list": {"story": [{"id": "1"}, {"id": "2"}]}}));
        assert!(!page.is_error_envelope());
        assert_eq!(page.len(), 2);
        assert_eq!(page.into_items()[1].as_value()["id"], "2");
    }

    #[test]
    fn test_classify_missing_story_list_is_empty_page() {
        let page = classify(json!({"list": {"title": "NPR"}}));
        assert!(!page.is_error_envelope());
        assert!(page.is_empty());
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = NprClient::new(
            Url::parse("http://api.npr.org/query").unwrap(),
            "secret".to_string(),
            20,
        );
        assert!(!format!("{client:?}").contains("secret"));
    }

    #[tokio::test]
    async fn test_fetch_page_sends_query_contract() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/query"))
            .and(query_param("fields", "all"))
            .and(query_param("requiredAssets", "text"))
            .and(query_param("date", "2016-07-12"))
            .and(query_param("startNum", "40"))
            .and(query_param("dateType", "story"))
            .and(query_param("output", "JSON"))
            .and(query_param("numResults", "20"))
            .and(query_param("searchType", "fullContent"))
            .and(query_param("apiKey", "test-key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"list": {"story": [{"id": "1"}]}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let page = client_for(&server)
            .fetch_page("2016-07-12", 40)
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_page_error_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"message": [{"id": "401"}]})),
            )
            .mount(&server)
            .await;

        let page = client_for(&server).fetch_page("2016-07-12", 0).await.unwrap();
        assert!(page.is_error_envelope());
    }

    #[tokio::test]
    async fn test_fetch_page_non_success_status_is_transport_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_page("2016-07-12", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Transport { offset: 0, .. }));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_transport_error_does_not_expose_api_key() {
        let client = NprClient::new(
            Url::parse("http://127.0.0.1:1/query").unwrap(),
            "SECRETKEY".to_string(),
            20,
        );
        let err = client.fetch_page("2016-07-12", 0).await.unwrap_err();
        assert!(matches!(err, AppError::Transport { .. }));
        assert!(!err.to_string().contains("SECRETKEY"));
        assert!(!format!("{err:?}").contains("SECRETKEY"));
    }

    #[tokio::test]
    async fn test_fetch_page_non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<nprml/>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_page("2016-07-12", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse { .. }));
        assert!(err.is_skippable());
    }
}
