//! Linguistic analysis capability used by the text normalizer.
//!
//! The normalizer never talks to a model directly. It takes any [`LinguisticAnalyzer`]
//! at construction, so a statistical tagger, a rule-based one, or a scripted fake in
//! tests are interchangeable.
//!
//! - [`lexicon::LexiconAnalyzer`]: built-in rule-based analyzer
//! - [`stopwords`]: the English stopword list applied after canonicalization

pub mod lexicon;
pub mod stopwords;

use std::fmt;

/// Coarse part-of-speech tags (Universal Dependencies tag set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PosTag {
    Adj,
    Adp,
    Adv,
    Aux,
    Cconj,
    Det,
    Intj,
    Noun,
    Num,
    Part,
    Pron,
    Propn,
    Punct,
    Sconj,
    Sym,
    Verb,
    X,
}

impl PosTag {
    /// Content-word tags kept by the normalizer.
    pub fn is_content(self) -> bool {
        matches!(
            self,
            PosTag::Adj | PosTag::Adv | PosTag::Noun | PosTag::Propn | PosTag::Verb
        )
    }
}

impl fmt::Display for PosTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PosTag::Adj => "ADJ",
            PosTag::Adp => "ADP",
            PosTag::Adv => "ADV",
            PosTag::Aux => "AUX",
            PosTag::Cconj => "CCONJ",
            PosTag::Det => "DET",
            PosTag::Intj => "INTJ",
            PosTag::Noun => "NOUN",
            PosTag::Num => "NUM",
            PosTag::Part => "PART",
            PosTag::Pron => "PRON",
            PosTag::Propn => "PROPN",
            PosTag::Punct => "PUNCT",
            PosTag::Sconj => "SCONJ",
            PosTag::Sym => "SYM",
            PosTag::Verb => "VERB",
            PosTag::X => "X",
        };
        f.write_str(s)
    }
}

/// One analyzed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Surface text as it appeared in the input.
    pub text: String,
    pub tag: PosTag,
    pub lemma: String,
    /// Entity label, set on tokens produced by merging an entity span.
    pub entity_label: Option<String>,
}

impl Token {
    pub fn new(text: impl Into<String>, tag: PosTag, lemma: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tag,
            lemma: lemma.into(),
            entity_label: None,
        }
    }
}

/// A named entity over tokens `start..end` of an [`Analysis`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySpan {
    pub start: usize,
    /// Exclusive.
    pub end: usize,
    /// Absolute index of the span's syntactic head.
    pub root: usize,
    pub label: String,
}

impl EntitySpan {
    pub fn new(start: usize, end: usize, root: usize, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            root,
            label: label.into(),
        }
    }

    /// Spans must be non-empty, in bounds, and contain their root.
    pub fn is_valid_for(&self, token_count: usize) -> bool {
        self.start < self.end
            && self.end <= token_count
            && (self.start..self.end).contains(&self.root)
    }
}

/// Tokens in document order plus the entity spans found over them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    pub tokens: Vec<Token>,
    pub entities: Vec<EntitySpan>,
}

/// Tokenizer + tagger + lemmatizer + entity recognizer.
pub trait LinguisticAnalyzer {
    fn analyze(&self, text: &str) -> Analysis;
}

impl<T: LinguisticAnalyzer + ?Sized> LinguisticAnalyzer for &T {
    fn analyze(&self, text: &str) -> Analysis {
        (**self).analyze(text)
    }
}

impl<T: LinguisticAnalyzer + ?Sized> LinguisticAnalyzer for Box<T> {
    fn analyze(&self, text: &str) -> Analysis {
        (**self).analyze(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_tags() {
        let kept: Vec<PosTag> = [
            PosTag::Adj,
            PosTag::Det,
            PosTag::Noun,
            PosTag::Pron,
            PosTag::Verb,
            PosTag::Propn,
            PosTag::Adv,
            PosTag::Num,
        ]
        .into_iter()
        .filter(|t| t.is_content())
        .collect();
        assert_eq!(
            kept,
            vec![PosTag::Adj, PosTag::Noun, PosTag::Verb, PosTag::Propn, PosTag::Adv]
        );
    }

    #[test]
    fn test_span_validity() {
        assert!(EntitySpan::new(0, 4, 3, "ORG").is_valid_for(5));
        assert!(!EntitySpan::new(0, 4, 4, "ORG").is_valid_for(5));
        assert!(!EntitySpan::new(2, 2, 2, "ORG").is_valid_for(5));
        assert!(!EntitySpan::new(3, 6, 4, "ORG").is_valid_for(5));
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(PosTag::Propn.to_string(), "PROPN");
        assert_eq!(PosTag::Det.to_string(), "DET");
    }
}
