//! Raw story → [`CanonicalArticle`].
//!
//! Each field is read on its own. `url` and `article_text` are required and reject the
//! record when missing; `authors` and `section` degrade to `None`.

use crate::config::SectionMarker;
use crate::error::ExtractionFailed;
use crate::models::{text_of, CanonicalArticle, RawArticle};
use itertools::Itertools;
use serde_json::Value;

/// Stand-in for a paragraph entry that carries no text.
const EMPTY_PARAGRAPH: &str = "\n";

/// Maps raw stories into canonical records.
#[derive(Debug, Clone)]
pub struct ArticleExtractor {
    section_markers: Vec<SectionMarker>,
}

impl ArticleExtractor {
    pub fn new(section_markers: Vec<SectionMarker>) -> Self {
        Self { section_markers }
    }

    pub fn extract(&self, raw: &RawArticle) -> Result<CanonicalArticle, ExtractionFailed> {
        let headline = raw
            .text_field("title")
            .ok_or(ExtractionFailed::Malformed { field: "title" })?;
        let date_published = raw
            .text_field("pubDate")
            .ok_or(ExtractionFailed::Malformed { field: "pubDate" })?;
        let url = extract_url(raw).ok_or(ExtractionFailed::Rejected { field: "link" })?;
        let article_text =
            extract_text(raw).ok_or(ExtractionFailed::Rejected { field: "paragraph" })?;
        let authors = extract_authors(raw);
        let section = raw
            .text_field("slug")
            .or_else(|| self.section_from_url(&url));

        Ok(CanonicalArticle {
            url,
            headline,
            date_published,
            authors,
            article_text,
            section,
        })
    }

    /// First marker contained in `url`, in configured order.
    pub fn section_from_url(&self, url: &str) -> Option<String> {
        self.section_markers
            .iter()
            .find(|m| url.contains(m.marker.as_str()))
            .map(|m| m.section.clone())
    }
}

/// Byline names in order. One malformed entry voids the whole list.
fn extract_authors(raw: &RawArticle) -> Option<Vec<String>> {
    raw.list_field("byline")?
        .iter()
        .map(|b| b.get("name").and_then(text_of))
        .collect()
}

fn extract_url(raw: &RawArticle) -> Option<String> {
    raw.list_field("link")?.first().and_then(text_of)
}

/// Paragraph texts joined by a space. An entry that is not an object voids the record.
fn extract_text(raw: &RawArticle) -> Option<String> {
    let paragraphs = raw.pointer(&["text", "paragraph"])?.as_array()?;
    if !paragraphs.iter().all(Value::is_object) {
        return None;
    }
    Some(
        paragraphs
            .iter()
            .map(|p| text_of(p).unwrap_or_else(|| EMPTY_PARAGRAPH.to_string()))
            .join(" "),
    )
}
