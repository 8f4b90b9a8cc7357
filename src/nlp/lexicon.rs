//! Rule-based [`LinguisticAnalyzer`] that needs no model files.
//!
//! - tokenizer: whitespace split, edge punctuation peeled off, English clitics split
//!   (`don't` → `do` + `n't`)
//! - tagger: closed-class lexicon, then capitalization, then suffix rules
//! - lemmatizer: irregular-form tables, then suffix stripping
//! - entities: maximal runs of two or more proper nouns, optionally led by a capitalized
//!   determiner (`The New York Times`)
//!
//! Pronouns get the lemma [`PRONOUN_LEMMA`], which canonicalizes to `pron`.

use super::{Analysis, EntitySpan, LinguisticAnalyzer, PosTag, Token};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Lemma shared by every pronoun.
pub const PRONOUN_LEMMA: &str = "-PRON-";

const CLITICS: &[&str] = &["n't", "'s", "'m", "'re", "'ll", "'ve", "'d"];

/// Punctuation that is split off a word's edges. `_` and `'` stay attached.
fn is_edge_punct(c: char) -> bool {
    c.is_ascii_punctuation() && c != '_' && c != '\''
}

fn word_set(words: &[&'static str]) -> HashSet<&'static str> {
    words.iter().copied().collect()
}

fn word_map(pairs: &[(&'static str, &'static str)]) -> HashMap<&'static str, &'static str> {
    pairs.iter().copied().collect()
}

static CLOSED_CLASS: Lazy<HashMap<&'static str, PosTag>> = Lazy::new(|| {
    let groups: [(PosTag, &[&str]); 9] = [
        (
            PosTag::Det,
            &[
                "a", "an", "the", "this", "that", "these", "those", "every", "each", "some",
                "any", "no", "all", "another", "either", "neither", "both", "such",
            ],
        ),
        (
            PosTag::Pron,
            &[
                "i", "me", "my", "mine", "myself", "you", "your", "yours", "yourself",
                "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
                "it", "its", "itself", "we", "us", "our", "ours", "ourselves", "they", "them",
                "their", "theirs", "themselves", "who", "whom", "whose", "what", "which",
                "someone", "anyone", "everyone", "nobody", "something", "anything",
                "everything", "nothing",
            ],
        ),
        (
            PosTag::Adp,
            &[
                "of", "in", "on", "at", "by", "for", "with", "from", "to", "into", "onto",
                "about", "above", "below", "over", "under", "after", "before", "between",
                "through", "during", "without", "within", "against", "among", "across",
                "along", "around", "behind", "beyond", "near", "since", "until", "upon",
                "toward", "towards", "via", "per", "despite", "like", "than",
            ],
        ),
        (PosTag::Cconj, &["and", "or", "but", "nor", "yet", "so"]),
        (
            PosTag::Sconj,
            &["because", "although", "though", "if", "unless", "while", "whereas", "whether"],
        ),
        (
            PosTag::Aux,
            &[
                "be", "am", "is", "are", "was", "were", "been", "being", "have", "has", "had",
                "having", "do", "does", "did", "will", "would", "shall", "should", "can",
                "could", "may", "might", "must", "ca", "wo", "'m", "'re", "'ll", "'ve", "'d",
            ],
        ),
        (PosTag::Part, &["not", "n't", "'s"]),
        (
            PosTag::Adv,
            &[
                "very", "also", "just", "now", "then", "here", "there", "too", "still", "even",
                "never", "always", "often", "again", "already", "soon", "ever", "almost",
                "quite", "rather", "perhaps", "however", "instead", "later", "ago", "away",
                "back", "only", "else", "thus", "therefore", "indeed", "not", "how", "when",
                "where", "why",
            ],
        ),
        (
            PosTag::Num,
            &[
                "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
                "ten", "eleven", "twelve", "hundred", "thousand", "million", "billion",
                "trillion", "dozen",
            ],
        ),
    ];
    let mut table = HashMap::new();
    for (tag, words) in groups {
        for word in words {
            table.entry(*word).or_insert(tag);
        }
    }
    table.extend([("oh", PosTag::Intj), ("yes", PosTag::Intj), ("hello", PosTag::Intj)]);
    table
});

static AUX_LEMMAS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    word_map(&[
        ("am", "be"),
        ("is", "be"),
        ("are", "be"),
        ("was", "be"),
        ("were", "be"),
        ("been", "be"),
        ("being", "be"),
        ("'m", "be"),
        ("'re", "be"),
        ("has", "have"),
        ("had", "have"),
        ("having", "have"),
        ("'ve", "have"),
        ("does", "do"),
        ("did", "do"),
        ("ca", "can"),
        ("wo", "will"),
        ("'ll", "will"),
        ("'d", "would"),
        ("n't", "not"),
    ])
});

/// Verbs recognized in base or third-person form.
static BASE_VERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    word_set(&[
        "say", "tell", "make", "take", "go", "get", "give", "know", "think", "see", "come",
        "want", "need", "find", "ask", "work", "seem", "feel", "try", "leave", "call", "keep",
        "let", "begin", "show", "hear", "play", "run", "move", "live", "believe", "bring",
        "happen", "write", "provide", "sit", "stand", "lose", "pay", "meet", "include",
        "continue", "learn", "change", "lead", "understand", "watch", "follow", "stop",
        "create", "speak", "read", "allow", "add", "spend", "grow", "open", "walk", "win",
        "offer", "remember", "consider", "appear", "buy", "wait", "serve", "die", "send",
        "expect", "build", "stay", "fall", "cut", "reach", "kill", "remain", "suggest",
        "raise", "pass", "sell", "require", "decide", "proceed", "exceed", "succeed", "feed",
        "vote", "announce", "agree", "argue", "accuse", "finish", "publish", "establish",
        "punish", "report", "plan", "hope", "help", "claim", "warn", "face",
    ])
});

static IRREGULAR_VERBS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    word_map(&[
        ("said", "say"),
        ("went", "go"),
        ("gone", "go"),
        ("goes", "go"),
        ("made", "make"),
        ("took", "take"),
        ("taken", "take"),
        ("done", "do"),
        ("got", "get"),
        ("gotten", "get"),
        ("gave", "give"),
        ("given", "give"),
        ("knew", "know"),
        ("known", "know"),
        ("thought", "think"),
        ("saw", "see"),
        ("seen", "see"),
        ("came", "come"),
        ("told", "tell"),
        ("found", "find"),
        ("felt", "feel"),
        ("left", "leave"),
        ("kept", "keep"),
        ("began", "begin"),
        ("begun", "begin"),
        ("brought", "bring"),
        ("wrote", "write"),
        ("written", "write"),
        ("stood", "stand"),
        ("lost", "lose"),
        ("paid", "pay"),
        ("met", "meet"),
        ("led", "lead"),
        ("understood", "understand"),
        ("spoke", "speak"),
        ("spoken", "speak"),
        ("spent", "spend"),
        ("grew", "grow"),
        ("grown", "grow"),
        ("won", "win"),
        ("bought", "buy"),
        ("sent", "send"),
        ("built", "build"),
        ("fell", "fall"),
        ("fallen", "fall"),
        ("held", "hold"),
        ("ran", "run"),
        ("heard", "hear"),
        ("meant", "mean"),
        ("sold", "sell"),
        ("became", "become"),
        ("chose", "choose"),
        ("chosen", "choose"),
        ("drove", "drive"),
        ("driven", "drive"),
        ("ate", "eat"),
        ("eaten", "eat"),
        ("broke", "break"),
        ("broken", "break"),
        ("used", "use"),
        ("using", "use"),
        ("caused", "cause"),
        ("causing", "cause"),
        ("added", "add"),
        ("adding", "add"),
        ("died", "die"),
        ("dying", "die"),
        ("lying", "lie"),
        ("shown", "show"),
        ("struck", "strike"),
        ("fought", "fight"),
        ("caught", "catch"),
        ("taught", "teach"),
        ("sought", "seek"),
        ("rose", "rise"),
        ("risen", "rise"),
        ("threw", "throw"),
        ("thrown", "throw"),
        ("flew", "fly"),
        ("flown", "fly"),
        ("drew", "draw"),
        ("drawn", "draw"),
        ("wore", "wear"),
        ("worn", "wear"),
        ("forgot", "forget"),
        ("forgotten", "forget"),
        ("hid", "hide"),
        ("hidden", "hide"),
        ("shot", "shoot"),
        ("sat", "sit"),
        ("slept", "sleep"),
        ("fled", "flee"),
        ("dealt", "deal"),
        ("swore", "swear"),
        ("sworn", "swear"),
    ])
});

static IRREGULAR_NOUNS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    word_map(&[
        ("men", "man"),
        ("women", "woman"),
        ("children", "child"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("mice", "mouse"),
        ("geese", "goose"),
        ("lives", "life"),
        ("wives", "wife"),
        ("knives", "knife"),
        ("leaves", "leaf"),
        ("halves", "half"),
        ("wolves", "wolf"),
        ("shelves", "shelf"),
        ("movies", "movie"),
        ("criteria", "criterion"),
        ("phenomena", "phenomenon"),
    ])
});

/// Nouns whose plural looks like a singular or vice versa.
static NOUN_INVARIANTS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    word_set(&[
        "news", "series", "species", "politics", "economics", "physics", "mathematics",
        "ethics", "athletics", "means", "headquarters", "chaos", "lens", "bias", "aids",
        "people", "police", "texas", "kansas", "arkansas", "christmas", "atlas", "canvas",
        "alias", "pancreas", "cosmos", "ethos", "pathos", "thermos",
    ])
});

/// Open-class words whose suffix would mislead the tagger.
static OPEN_CLASS_OVERRIDES: Lazy<HashMap<&'static str, PosTag>> = Lazy::new(|| {
    let nouns = [
        "family", "ally", "rally", "belly", "bully", "assembly", "anomaly", "monopoly",
        "supply", "reply", "thing", "morning", "evening", "king", "ring", "spring", "string",
        "wing", "ceiling", "building", "seed", "speed", "weed", "greed", "creed", "breed",
        "shed", "bed", "animal", "hospital", "capital", "proposal", "trial", "approval",
        "signal", "rival", "journal", "festival", "referral", "denial", "ritual",
        "individual", "criminal", "arrival", "survival", "music", "topic", "traffic",
        "clinic", "logic", "republic", "panic", "critic", "mechanic", "executive",
        "detective", "representative", "initiative", "archive", "motive", "alternative",
        "incentive", "perspective", "objective", "vegetable", "today", "tonight",
    ];
    let adjectives = [
        "early", "likely", "daily", "weekly", "monthly", "yearly", "friendly", "elderly",
        "lonely", "ugly", "costly", "deadly", "lovely", "silly", "holy", "able", "sacred",
        "naked", "wicked", "rugged", "red", "new", "old", "good", "bad", "big", "small",
        "great", "high", "low", "long", "large", "little", "young", "major", "former", "same",
        "different", "important", "recent", "certain", "clear", "real", "whole", "best",
        "better", "worst", "hard", "full", "right", "wrong", "late", "strong", "true",
        "black", "white", "free", "open",
    ];
    nouns
        .into_iter()
        .map(|w| (w, PosTag::Noun))
        .chain(adjectives.into_iter().map(|w| (w, PosTag::Adj)))
        .collect()
});

const ADJ_SUFFIXES: &[&str] = &["ous", "ful", "ive", "able", "ible", "al", "ic", "less", "ish"];

/// Verb stems that take a silent `e` back regardless of the preceding letter.
const E_AFTER_ANY: &[&str] = &[
    "v", "c", "iz", "yz", "uir", "eas", "creat", "rv", "rg", "dg", "bl", "chang", "rang",
    "eng", "ns", "ps", "rs", "accus", "abus", "fus", "excus", "amus", "ais", "ois", "uis",
];

/// Verb stems that take a silent `e` back when a consonant precedes the ending.
const E_AFTER_CONSONANT: &[&str] = &[
    "at", "ak", "ok", "om", "id", "ud", "ut", "ur", "ar", "os", "ag", "ys", "ir", "ib", "in",
    "ul", "ot",
];

const ORG_HEADS: &[&str] = &[
    "times", "post", "journal", "inc", "corp", "company", "university", "department",
    "committee", "party", "council", "bank", "association", "agency", "court", "house",
    "senate", "congress", "news", "press", "institute", "foundation",
];

const PERSON_TITLES: &[&str] = &[
    "mr", "mrs", "ms", "dr", "president", "sen", "senator", "rep", "gov", "governor",
    "secretary", "judge", "mayor",
];

/// Lowercase words allowed inside a proper-noun run (`Bank of America`).
const ENTITY_CONNECTORS: &[&str] = &["of"];

/// Built-in analyzer backed by word lists and suffix rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconAnalyzer;

impl LexiconAnalyzer {
    pub fn new() -> Self {
        Self
    }
}

impl LinguisticAnalyzer for LexiconAnalyzer {
    fn analyze(&self, text: &str) -> Analysis {
        let words = tokenize(text);
        let mut tokens: Vec<Token> = Vec::with_capacity(words.len());
        for (i, word) in words.iter().enumerate() {
            let context = Context {
                prev: tokens.last().map(|t| t.tag),
                sentence_start: i == 0 || matches!(words[i - 1].as_str(), "." | "!" | "?"),
                next_capitalized: words.get(i + 1).is_some_and(|w| is_capitalized(w)),
            };
            let (tag, lemma) = tag_and_lemma(word, context);
            tokens.push(Token::new(word.as_str(), tag, lemma));
        }
        let entities = find_entities(&tokens);
        Analysis { tokens, entities }
    }
}

/// What the tagger knows about a word's neighbours.
#[derive(Debug, Clone, Copy)]
struct Context {
    prev: Option<PosTag>,
    sentence_start: bool,
    next_capitalized: bool,
}

fn tokenize(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for chunk in text.split_whitespace() {
        split_chunk(chunk, &mut out);
    }
    out
}

fn split_chunk(chunk: &str, out: &mut Vec<String>) {
    let mut rest = chunk;
    while let Some(c) = rest.chars().next().filter(|c| is_edge_punct(*c)) {
        out.push(c.to_string());
        rest = &rest[c.len_utf8()..];
    }

    let mut trailing = Vec::new();
    while let Some(c) = rest.chars().next_back().filter(|c| is_edge_punct(*c)) {
        trailing.push(c.to_string());
        rest = &rest[..rest.len() - c.len_utf8()];
    }

    if !rest.is_empty() {
        split_clitic(rest, out);
    }
    out.extend(trailing.into_iter().rev());
}

fn split_clitic(word: &str, out: &mut Vec<String>) {
    for clitic in CLITICS {
        let Some(cut) = word.len().checked_sub(clitic.len()) else {
            continue;
        };
        if cut > 0 && word.is_char_boundary(cut) && word[cut..].eq_ignore_ascii_case(clitic) {
            out.push(word[..cut].to_string());
            out.push(word[cut..].to_string());
            return;
        }
    }
    out.push(word.to_string());
}

fn is_capitalized(word: &str) -> bool {
    word.chars().next().is_some_and(char::is_uppercase)
}

fn is_acronym(word: &str) -> bool {
    word.len() >= 2 && word.chars().all(|c| c.is_ascii_uppercase())
}

fn is_number(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_digit())
        && word.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.')
}

fn tag_and_lemma(word: &str, context: Context) -> (PosTag, String) {
    if !word.chars().any(char::is_alphanumeric) {
        let punct_only = word.chars().all(|c| c != '*' && (is_edge_punct(c) || c == '\''));
        let tag = if punct_only { PosTag::Punct } else { PosTag::Sym };
        return (tag, word.to_string());
    }
    if is_number(word) {
        return (PosTag::Num, word.to_string());
    }
    // Digits mixed with symbols, or letters outside the Latin alphabet.
    if !word.chars().any(|c| c.is_ascii_alphabetic()) {
        return (PosTag::X, word.to_string());
    }
    // Compound tokens from an earlier merge pass are kept whole.
    if word.contains('_') || is_acronym(word) {
        return (PosTag::Propn, word.to_string());
    }

    let lower = word.to_lowercase();
    if let Some(&tag) = CLOSED_CLASS.get(lower.as_str()) {
        return (tag, closed_class_lemma(tag, &lower));
    }
    if is_capitalized(word) && (!context.sentence_start || context.next_capitalized) {
        return (PosTag::Propn, word.to_string());
    }
    open_class(&lower, context.prev)
}

fn closed_class_lemma(tag: PosTag, lower: &str) -> String {
    match tag {
        PosTag::Pron => PRONOUN_LEMMA.to_string(),
        PosTag::Aux | PosTag::Part => AUX_LEMMAS.get(lower).copied().unwrap_or(lower).to_string(),
        _ => lower.to_string(),
    }
}

fn open_class(lower: &str, prev: Option<PosTag>) -> (PosTag, String) {
    if let Some(base) = IRREGULAR_VERBS.get(lower) {
        return (PosTag::Verb, base.to_string());
    }
    if let Some(base) = IRREGULAR_NOUNS.get(lower) {
        return (PosTag::Noun, base.to_string());
    }
    if NOUN_INVARIANTS.contains(lower) {
        return (PosTag::Noun, lower.to_string());
    }

    let after_modifier = matches!(prev, Some(PosTag::Det | PosTag::Adj));
    if let Some(base) = verb_base(lower) {
        return if after_modifier {
            (PosTag::Noun, noun_lemma(lower))
        } else {
            (PosTag::Verb, base)
        };
    }

    match suffix_tag(lower) {
        PosTag::Verb if after_modifier && lower.ends_with("ing") => {
            (PosTag::Noun, lower.to_string())
        }
        PosTag::Verb if after_modifier => (PosTag::Adj, lower.to_string()),
        PosTag::Verb => (PosTag::Verb, verb_lemma(lower)),
        PosTag::Noun => (PosTag::Noun, noun_lemma(lower)),
        tag => (tag, lower.to_string()),
    }
}

/// Base form of a listed verb given as-is or in third person singular.
fn verb_base(lower: &str) -> Option<String> {
    if BASE_VERBS.contains(lower) {
        return Some(lower.to_string());
    }
    let candidates = [
        lower.strip_suffix("ies").map(|s| format!("{s}y")),
        lower.strip_suffix("es").map(str::to_string),
        lower.strip_suffix('s').map(str::to_string),
    ];
    candidates
        .into_iter()
        .flatten()
        .find(|base| BASE_VERBS.contains(base.as_str()))
}

fn suffix_tag(lower: &str) -> PosTag {
    if let Some(&tag) = OPEN_CLASS_OVERRIDES.get(lower) {
        return tag;
    }
    let len = lower.len();
    if lower.ends_with("ly") && len > 3 {
        PosTag::Adv
    } else if lower.ends_with("ing") && len > 4 {
        PosTag::Verb
    } else if lower.ends_with("ed") && len > 3 {
        PosTag::Verb
    } else if ADJ_SUFFIXES
        .iter()
        .any(|s| lower.ends_with(s) && len > s.len() + 2)
    {
        PosTag::Adj
    } else {
        PosTag::Noun
    }
}

fn verb_lemma(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ied").filter(|s| s.len() >= 2) {
        return format!("{stem}y");
    }
    if word.ends_with("eed") {
        return word[..word.len() - 1].to_string();
    }
    for suffix in ["ing", "ed"] {
        let Some(stem) = word.strip_suffix(suffix) else {
            continue;
        };
        if stem.len() < 2 {
            return word.to_string();
        }
        if let Some(single) = undouble(stem) {
            return single.to_string();
        }
        if needs_silent_e(stem) {
            return format!("{stem}e");
        }
        return stem.to_string();
    }
    noun_lemma(word)
}

/// `stopp` → `stop`. Doubled l, s, z and f are part of the base form.
fn undouble(stem: &str) -> Option<&str> {
    let mut rev = stem.chars().rev();
    let (last, before) = (rev.next()?, rev.next()?);
    let doubled = last == before
        && last.is_ascii_alphabetic()
        && !"aeiouylszf".contains(last);
    doubled.then(|| &stem[..stem.len() - 1])
}

fn needs_silent_e(stem: &str) -> bool {
    if E_AFTER_ANY.iter().any(|e| stem.ends_with(e)) {
        return true;
    }
    E_AFTER_CONSONANT.iter().any(|e| {
        stem.len() > e.len()
            && stem.ends_with(e)
            && stem[..stem.len() - e.len()]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_alphabetic() && !"aeiou".contains(c))
    })
}

fn noun_lemma(word: &str) -> String {
    if let Some(base) = IRREGULAR_NOUNS.get(word) {
        return base.to_string();
    }
    if NOUN_INVARIANTS.contains(word) || word.len() <= 3 {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix("ies").filter(|s| s.len() >= 3) {
        return format!("{stem}y");
    }
    for suffix in ["sses", "shes", "ches", "xes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with('s') && !["ss", "us", "is"].iter().any(|e| word.ends_with(e)) {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

fn find_entities(tokens: &[Token]) -> Vec<EntitySpan> {
    let mut spans = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let led_by_det = tokens[i].tag == PosTag::Det && is_capitalized(&tokens[i].text);
        let run_start = if led_by_det { i + 1 } else { i };
        let run_end = proper_noun_run_end(tokens, run_start);

        if run_end - run_start >= 2 {
            let start = if led_by_det { i } else { run_start };
            let span = &tokens[start..run_end];
            spans.push(EntitySpan::new(start, run_end, run_end - 1, entity_label(span)));
            i = run_end;
        } else {
            i += 1;
        }
    }
    spans
}

fn proper_noun_run_end(tokens: &[Token], start: usize) -> usize {
    let is_propn = |j: usize| tokens.get(j).is_some_and(|t| t.tag == PosTag::Propn);
    let mut j = start;
    loop {
        if is_propn(j) {
            j += 1;
        } else if j > start
            && tokens
                .get(j)
                .is_some_and(|t| ENTITY_CONNECTORS.contains(&t.text.as_str()))
            && is_propn(j + 1)
        {
            j += 1;
        } else {
            return j;
        }
    }
}

fn entity_label(span: &[Token]) -> &'static str {
    let names: Vec<String> = span
        .iter()
        .filter(|t| t.tag != PosTag::Det)
        .map(|t| t.text.trim_end_matches('.').to_lowercase())
        .collect();
    if names.last().is_some_and(|w| ORG_HEADS.contains(&w.as_str())) {
        "ORG"
    } else if names.first().is_some_and(|w| PERSON_TITLES.contains(&w.as_str())) {
        "PERSON"
    } else {
        "MISC"
    }
}
