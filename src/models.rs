//! Data models for stories as they move through the two stages.
//!
//! - [`RawArticle`]: one story fragment exactly as the content API returned it
//! - [`PageResult`]: one page of raw stories, or an error envelope
//! - [`CanonicalArticle`]: the validated record written by the scrape stage
//! - [`ProcessedArticle`]: a canonical record plus its normalized token text
//!
//! The API wraps every scalar as `{"$text": ...}`, so [`RawArticle`] keeps the JSON
//! untyped and exposes small accessors instead of a rigid schema. A malformed optional
//! field then degrades to `None` without failing the whole page.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A story fragment from the content API, kept as untyped JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct RawArticle(Value);

impl RawArticle {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    #[cfg(test)]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// `{"<field>": {"$text": ...}}` rendered as a string.
    pub fn text_field(&self, field: &str) -> Option<String> {
        self.0.get(field).and_then(text_of)
    }

    /// The array stored under `field`, if it is one.
    pub fn list_field(&self, field: &str) -> Option<&Vec<Value>> {
        self.0.get(field).and_then(Value::as_array)
    }

    /// Follow a path of object keys.
    pub fn pointer(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(&self.0, |v, key| v.get(*key))
    }
}

/// The `$text` leaf of an API node. Numbers are accepted and rendered as text.
pub fn text_of(node: &Value) -> Option<String> {
    match node.get("$text")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// One page returned by the content API.
///
/// An error envelope always carries no items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResult {
    items: Vec<RawArticle>,
    is_error_envelope: bool,
}

impl PageResult {
    pub fn stories(items: Vec<RawArticle>) -> Self {
        Self {
            items,
            is_error_envelope: false,
        }
    }

    pub fn error_envelope() -> Self {
        Self {
            items: Vec::new(),
            is_error_envelope: true,
        }
    }

    pub fn into_items(self) -> Vec<RawArticle> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_error_envelope(&self) -> bool {
        self.is_error_envelope
    }
}

/// A validated story, ready to be persisted.
///
/// `url` and `article_text` are always present; records missing either never get built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CanonicalArticle {
    pub url: String,
    pub headline: String,
    pub date_published: String,
    pub authors: Option<Vec<String>>,
    pub article_text: String,
    pub section: Option<String>,
}

/// A canonical record with the normalizer's output attached.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProcessedArticle {
    #[serde(flatten)]
    pub article: CanonicalArticle,
    pub processed_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_article() -> CanonicalArticle {
        CanonicalArticle {
            url: "https://www.npr.org/2016/07/12/story".to_string(),
            headline: "A Headline".to_string(),
            date_published: "Tue, 12 Jul 2016 12:00:00 -0400".to_string(),
            authors: Some(vec!["Jane Doe".to_string()]),
            article_text: "Some text.".to_string(),
            section: None,
        }
    }

    #[test]
    fn test_text_field_reads_dollar_text() {
        let raw = RawArticle::new(json!({
            "title": {"$text": "Hello"},
            "id": {"$text": 12345}
        }));
        assert_eq!(raw.text_field("title").as_deref(), Some("Hello"));
        assert_eq!(raw.text_field("id").as_deref(), Some("12345"));
        assert_eq!(raw.text_field("missing"), None);
    }

    #[test]
    fn test_text_field_rejects_non_scalar_leaf() {
        let raw = RawArticle::new(json!({"title": {"$text": ["a", "b"]}}));
        assert_eq!(raw.text_field("title"), None);
        let raw = RawArticle::new(json!({"title": "bare string"}));
        assert_eq!(raw.text_field("title"), None);
    }

    #[test]
    fn test_pointer_follows_nested_keys() {
        let raw = RawArticle::new(json!({"text": {"paragraph": [{"$text": "p1"}]}}));
        let paragraphs = raw.pointer(&["text", "paragraph"]).unwrap();
        assert!(paragraphs.is_array());
        assert!(raw.pointer(&["text", "nope"]).is_none());
    }

    #[test]
    fn test_error_envelope_has_no_items() {
        let page = PageResult::error_envelope();
        assert!(page.is_error_envelope());
        assert!(page.is_empty());
        assert_eq!(page.len(), 0);
    }

    #[test]
    fn test_canonical_article_serializes_absent_fields_as_null() {
        let json = serde_json::to_value(sample_article()).unwrap();
        assert_eq!(json["section"], Value::Null);
        assert_eq!(json["authors"][0], "Jane Doe");
    }

    #[test]
    fn test_processed_article_flattens_canonical_columns() {
        let processed = ProcessedArticle {
            article: sample_article(),
            processed_text: "headline text".to_string(),
        };
        let json = serde_json::to_value(&processed).unwrap();
        assert_eq!(json["url"], "https://www.npr.org/2016/07/12/story");
        assert_eq!(json["processed_text"], "headline text");

        let back: ProcessedArticle = serde_json::from_value(json).unwrap();
        assert_eq!(back, processed);
    }
}
