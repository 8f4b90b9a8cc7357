//! Runtime configuration.
//!
//! Everything is resolved once at startup and passed into the client, the crawler and
//! the normalizer. An optional YAML file overrides the defaults field by field; the API
//! credential never lives in the file and comes from the CLI or environment instead.

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument};
use url::Url;

/// Environment variable that supplies the content API key.
pub const API_KEY_ENV: &str = "NPR_ACCESS_KEY";

/// Default endpoint of the NPR story query API.
pub const DEFAULT_API_BASE_URL: &str = "http://api.npr.org/query";

/// Number of stories requested per page.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Upper bound on pages fetched for a single date.
pub const DEFAULT_MAX_PAGES_PER_DATE: usize = 50;

/// One URL-substring rule used to infer a story's section when no slug is present.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SectionMarker {
    /// Substring searched for in the story URL.
    pub marker: String,
    /// Section name assigned when the marker matches.
    pub section: String,
}

impl SectionMarker {
    pub fn new(marker: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            section: section.into(),
        }
    }
}

/// Tunables for both stages. Fields missing from the YAML file keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub page_size: usize,
    pub max_pages_per_date: usize,
    /// Checked in order; the first marker found in the URL wins.
    pub section_markers: Vec<SectionMarker>,
    /// Added on top of the built-in English stopword list.
    pub extra_stopwords: Vec<String>,
    /// Punctuation characters that survive the punctuation strip.
    pub punctuation_exclusions: Vec<char>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            max_pages_per_date: DEFAULT_MAX_PAGES_PER_DATE,
            section_markers: vec![
                SectionMarker::new("hereandnow", "Here And Now"),
                SectionMarker::new("onpoint", "On Point"),
            ],
            extra_stopwords: Vec::new(),
            punctuation_exclusions: vec!['_', '*'],
        }
    }
}

impl AppConfig {
    /// Parse a YAML document and validate it.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: AppConfig = serde_yaml::from_str(yaml)
            .map_err(|e| AppError::config(format!("invalid YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or fall back to defaults when no path is given.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let yaml = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AppError::io(path, e))?;
        let config = Self::from_yaml(&yaml)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(AppError::config("page_size must be greater than zero"));
        }
        if self.max_pages_per_date == 0 {
            return Err(AppError::config(
                "max_pages_per_date must be greater than zero",
            ));
        }
        self.api_url()?;
        Ok(())
    }

    pub fn api_url(&self) -> Result<Url> {
        Url::parse(&self.api_base_url).map_err(|e| {
            AppError::config(format!("api_base_url '{}': {e}", self.api_base_url))
        })
    }
}

/// Resolve the API key from an explicit value (CLI flag or env, via clap).
///
/// Blank keys count as missing.
pub fn require_api_key(key: Option<&str>) -> Result<String> {
    match key.map(str::trim) {
        Some(k) if !k.is_empty() => Ok(k.to_string()),
        _ => Err(AppError::MissingCredential { var: API_KEY_ENV }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_api_contract() {
        let config = AppConfig::default();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.api_base_url, "http://api.npr.org/query");
        assert_eq!(config.section_markers[0].marker, "hereandnow");
        assert_eq!(config.section_markers[1].section, "On Point");
        assert_eq!(config.punctuation_exclusions, vec!['_', '*']);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AppConfig::from_yaml("max_pages_per_date: 5\nextra_stopwords: [npr]\n")
            .unwrap();
        assert_eq!(config.max_pages_per_date, 5);
        assert_eq!(config.extra_stopwords, vec!["npr".to_string()]);
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.section_markers.len(), 2);
    }

    #[test]
    fn test_section_markers_keep_file_order() {
        let yaml = r#"
section_markers:
  - marker: onpoint
    section: On Point
  - marker: hereandnow
    section: Here And Now
"#;
        let config = AppConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.section_markers[0].marker, "onpoint");
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let err = AppConfig::from_yaml("page_size: 0").unwrap_err();
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn test_bad_base_url_is_rejected() {
        let err = AppConfig::from_yaml("api_base_url: 'not a url'").unwrap_err();
        assert!(matches!(err, AppError::Config { .. }));
    }

    #[test]
    fn test_require_api_key() {
        assert_eq!(require_api_key(Some(" abc ")).unwrap(), "abc");
        assert!(matches!(
            require_api_key(None),
            Err(AppError::MissingCredential { .. })
        ));
        assert!(require_api_key(Some("   ")).is_err());
    }

    #[tokio::test]
    async fn test_load_without_path_uses_defaults() {
        let config = AppConfig::load(None).await.unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "page_size: 10\n").unwrap();
        let config = AppConfig::load(Some(&path)).await.unwrap();
        assert_eq!(config.page_size, 10);
    }
}
