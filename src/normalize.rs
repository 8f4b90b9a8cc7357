//! Article text → space-separated content-word tokens.
//!
//! Pipeline, in order:
//!
//! 1. strip ASCII punctuation (except the configured exclusions, `_` and `*` by default)
//! 2. keep only ASCII printable characters
//! 3. analyze with the injected [`LinguisticAnalyzer`]
//! 4. merge each entity span into one token (can be switched off)
//! 5. keep adjectives, adverbs, nouns, proper nouns and verbs with at least one word character
//! 6. canonicalize the lemma: lowercase, whitespace runs → `_`, non-word characters dropped
//! 7. drop stopwords
//! 8. join with single spaces

use crate::config::AppConfig;
use crate::models::{CanonicalArticle, ProcessedArticle};
use crate::nlp::stopwords::default_stopwords;
use crate::nlp::{Analysis, EntitySpan, LinguisticAnalyzer, PosTag, Token};
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W").expect("valid regex"));
static WORD_CHAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w").expect("valid regex"));

/// Turns raw article text into normalized tokens.
#[derive(Debug, Clone)]
pub struct TextNormalizer<A> {
    analyzer: A,
    stopwords: HashSet<String>,
    punctuation_exclusions: HashSet<char>,
    merge_entities: bool,
}

impl<A: LinguisticAnalyzer> TextNormalizer<A> {
    /// Built-in stopwords, `_` and `*` kept, entity merging on.
    pub fn new(analyzer: A) -> Self {
        Self {
            analyzer,
            stopwords: default_stopwords(),
            punctuation_exclusions: HashSet::from(['_', '*']),
            merge_entities: true,
        }
    }

    pub fn from_config(analyzer: A, config: &AppConfig) -> Self {
        Self::new(analyzer)
            .with_extra_stopwords(config.extra_stopwords.iter().cloned())
            .with_punctuation_exclusions(config.punctuation_exclusions.iter().copied())
    }

    pub fn with_merge_entities(mut self, merge: bool) -> Self {
        self.merge_entities = merge;
        self
    }

    /// Extra stopwords are matched against canonical tokens, so they are lowercased here.
    pub fn with_extra_stopwords<I>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.stopwords
            .extend(words.into_iter().map(|w| w.to_lowercase()));
        self
    }

    /// Replace the set of punctuation characters that survive stage 1.
    pub fn with_punctuation_exclusions<I>(mut self, chars: I) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        self.punctuation_exclusions = chars.into_iter().collect();
        self
    }

    pub fn normalize(&self, text: &str) -> String {
        let printable = keep_printable(&self.strip_punctuation(text));
        let analysis = self.analyzer.analyze(&printable);
        let tokens = if self.merge_entities {
            merge_entities(analysis)
        } else {
            analysis.tokens
        };

        tokens
            .iter()
            .filter(|t| t.tag.is_content() && WORD_CHAR.is_match(&t.text))
            .map(|t| canonicalize(&t.lemma))
            .filter(|w| !w.is_empty() && !self.stopwords.contains(w))
            .join(" ")
    }

    /// Attach `processed_text` to every article, preserving order.
    #[instrument(level = "info", skip_all, fields(count = articles.len()))]
    pub fn process_all(&self, articles: Vec<CanonicalArticle>) -> Vec<ProcessedArticle> {
        let processed: Vec<ProcessedArticle> = articles
            .into_iter()
            .map(|article| {
                let processed_text = self.normalize(&article.article_text);
                debug!(
                    url = %article.url,
                    tokens = processed_text.split_whitespace().count(),
                    "Normalized article"
                );
                ProcessedArticle {
                    article,
                    processed_text,
                }
            })
            .collect();
        info!(count = processed.len(), "Normalized all articles");
        processed
    }

    fn strip_punctuation(&self, text: &str) -> String {
        text.chars()
            .filter(|c| !c.is_ascii_punctuation() || self.punctuation_exclusions.contains(c))
            .collect()
    }
}

/// ASCII digits, letters, punctuation and ` \t\n\r\x0b\x0c`.
pub fn keep_printable(text: &str) -> String {
    text.chars()
        .filter(|c| {
            c.is_ascii_alphanumeric()
                || c.is_ascii_punctuation()
                || matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
        })
        .collect()
}

/// Lowercase, join whitespace-separated parts with `_`, drop non-word characters.
///
/// Idempotent: the output contains only word characters.
pub fn canonicalize(lemma: &str) -> String {
    let lower = lemma.to_lowercase();
    let joined = WHITESPACE_RUN.replace_all(lower.trim(), "_");
    NON_WORD.replace_all(&joined, "").into_owned()
}

/// Collapse each entity span into a single token.
///
/// The merged token takes the tag of the span's root, or of its last token when the root is
/// a determiner. Its lemma is the span's surface text without leading determiners. Spans
/// that are out of bounds, empty, rootless or overlapping an earlier span are ignored.
pub fn merge_entities(analysis: Analysis) -> Vec<Token> {
    let Analysis {
        tokens,
        mut entities,
    } = analysis;
    entities.retain(|span| {
        let valid = span.is_valid_for(tokens.len());
        if !valid {
            debug!(?span, tokens = tokens.len(), "Ignoring invalid entity span");
        }
        valid
    });
    entities.sort_by_key(|span| span.start);

    let mut merged = Vec::with_capacity(tokens.len());
    let mut spans = entities.into_iter().peekable();
    let mut i = 0;
    while i < tokens.len() {
        while spans.next_if(|span| span.start < i).is_some() {}
        match spans.next_if(|span| span.start == i) {
            Some(span) => {
                merged.push(merge_span(&tokens[span.start..span.end], &span));
                i = span.end;
            }
            None => {
                merged.push(tokens[i].clone());
                i += 1;
            }
        }
    }
    merged
}

fn merge_span(tokens: &[Token], span: &EntitySpan) -> Token {
    let root = &tokens[span.root - span.start];
    let tag = match (root.tag, tokens.last()) {
        (PosTag::Det, Some(last)) => last.tag,
        (tag, _) => tag,
    };
    let text = tokens.iter().map(|t| t.text.as_str()).join(" ");
    let lemma = tokens
        .iter()
        .skip_while(|t| t.tag == PosTag::Det)
        .map(|t| t.text.as_str())
        .join(" ");

    Token {
        lemma: if lemma.is_empty() { text.clone() } else { lemma },
        text,
        tag,
        entity_label: Some(span.label.clone()),
    }
}
