// ABOUTME: Multi-pass highlighter marking foreign words, long sentences, quotations and list items.
// ABOUTME: Each pass wraps its matches in a fixed marker tag over the previous passes' output.

//! Highlighting.
//!
//! Four passes run in a fixed order, each over the text produced by the
//! previous one:
//!
//! 1. words missing from the lexicon (`<hl_notfrench>`),
//! 2. sentences longer than the threshold (`<hl_long>`),
//! 3. `«…»` quotations (`<hl_quote>`),
//! 4. `- ` list lines (`<hl_list>`).
//!
//! A pass finds all of its matches against its input, then copies the text
//! into a new buffer in one sweep, wrapping each match. Matches of one pass
//! never overlap; markers of different passes may nest.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cache::HighlightCache;
use crate::lexicon::Lexicon;
use crate::options::HighlightOptions;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-zÀ-ÖØ-öø-ÿœ]{3,}").unwrap());
static SENTENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r".+?[.!?\n]").unwrap());
static QUOTE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"«.+?»").unwrap());
static LIST_ITEM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^- .+?\n").unwrap());

/// A family of highlight markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    NotInLanguage,
    Long,
    Quote,
    List,
}

impl MarkerKind {
    /// Every kind, in the order the passes run.
    pub const ALL: [MarkerKind; 4] = [
        MarkerKind::NotInLanguage,
        MarkerKind::Long,
        MarkerKind::Quote,
        MarkerKind::List,
    ];

    /// Tag name emitted around spans of this kind. Renderers style on these names.
    pub fn tag(self) -> &'static str {
        match self {
            MarkerKind::NotInLanguage => "hl_notfrench",
            MarkerKind::Long => "hl_long",
            MarkerKind::Quote => "hl_quote",
            MarkerKind::List => "hl_list",
        }
    }

    pub fn open_tag(self) -> String {
        format!("<{}>", self.tag())
    }

    pub fn close_tag(self) -> String {
        format!("</{}>", self.tag())
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// One highlighted span. Offsets are byte offsets into the text as it was
/// when the span's pass ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub kind: MarkerKind,
    pub start: usize,
    pub end: usize,
}

/// Highlighted text along with the spans each pass wrapped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotated {
    pub text: String,
    pub highlights: Vec<Highlight>,
}

/// Highlights `text` with the default threshold.
pub fn highlight(text: &str, lexicon: &Lexicon) -> String {
    highlight_with(text, lexicon, &HighlightOptions::default())
}

/// Highlights `text`, returning the marker-annotated string.
pub fn highlight_with(text: &str, lexicon: &Lexicon, opts: &HighlightOptions) -> String {
    annotate(text, lexicon, opts).text
}

/// Runs the four passes, returning the annotated text and every wrapped span.
pub fn annotate(text: &str, lexicon: &Lexicon, opts: &HighlightOptions) -> Annotated {
    let mut current = text.to_string();
    let mut highlights = Vec::new();

    for kind in MarkerKind::ALL {
        let spans = match kind {
            MarkerKind::NotInLanguage => foreign_word_spans(&current, lexicon),
            MarkerKind::Long => long_sentence_spans(&current, opts.long_sentence_threshold),
            MarkerKind::Quote => QUOTE_RE.find_iter(&current).map(|m| m.range()).collect(),
            MarkerKind::List => list_item_spans(&current),
        };
        if spans.is_empty() {
            continue;
        }
        debug!(kind = %kind, count = spans.len(), "highlight pass");
        highlights.extend(spans.iter().map(|span| Highlight {
            kind,
            start: span.start,
            end: span.end,
        }));
        current = wrap_spans(&current, kind, &spans);
    }

    Annotated {
        text: current,
        highlights,
    }
}

/// Whether a word should be flagged as not in the lexicon's language.
///
/// Capitalised words (first letter uppercase, not all uppercase) are taken
/// for proper nouns and never flagged; acronyms and lowercase words are.
pub fn is_foreign_word(word: &str, lexicon: &Lexicon) -> bool {
    if lexicon.contains_word(word) {
        return false;
    }
    let capitalized = word.chars().next().is_some_and(char::is_uppercase);
    !capitalized || word.chars().all(char::is_uppercase)
}

fn foreign_word_spans(text: &str, lexicon: &Lexicon) -> Vec<Range<usize>> {
    WORD_RE
        .find_iter(text)
        .filter(|m| is_foreign_word(m.as_str(), lexicon))
        .map(|m| m.range())
        .collect()
}

// Length is measured in characters of the current text, markers from the
// foreign-word pass included.
fn long_sentence_spans(text: &str, threshold: usize) -> Vec<Range<usize>> {
    SENTENCE_RE
        .find_iter(text)
        .filter(|m| m.as_str().chars().count() > threshold)
        .map(|m| m.range())
        .collect()
}

// A list line must follow a newline; a `- ` at the very start of the text is not one.
fn list_item_spans(text: &str) -> Vec<Range<usize>> {
    LIST_ITEM_RE
        .find_iter(text)
        .filter(|m| m.start() > 0)
        .map(|m| m.range())
        .collect()
}

fn wrap_spans(text: &str, kind: MarkerKind, spans: &[Range<usize>]) -> String {
    let open = kind.open_tag();
    let close = kind.close_tag();
    let mut out = String::with_capacity(text.len() + spans.len() * (open.len() + close.len()));
    let mut copied = 0;
    for span in spans {
        out.push_str(&text[copied..span.start]);
        out.push_str(&open);
        out.push_str(&text[span.clone()]);
        out.push_str(&close);
        copied = span.end;
    }
    out.push_str(&text[copied..]);
    out
}

/// A highlighter bound to one lexicon, with an optional result cache.
#[derive(Debug)]
pub struct Highlighter {
    lexicon: Arc<Lexicon>,
    options: HighlightOptions,
    cache: Option<HighlightCache>,
}

impl Highlighter {
    pub fn new(lexicon: impl Into<Arc<Lexicon>>, options: HighlightOptions) -> Self {
        let cache = (options.cache_capacity > 0).then(|| HighlightCache::new(options.cache_capacity));
        Self {
            lexicon: lexicon.into(),
            options,
            cache,
        }
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn options(&self) -> &HighlightOptions {
        &self.options
    }

    pub fn cache(&self) -> Option<&HighlightCache> {
        self.cache.as_ref()
    }

    /// Highlights `text`, answering from the cache when the exact text was seen before.
    pub fn highlight(&self, text: &str) -> String {
        if let Some(hit) = self.cache.as_ref().and_then(|c| c.get(text)) {
            trace!(len = text.len(), "highlight cache hit");
            return hit;
        }
        let highlighted = highlight_with(text, &self.lexicon, &self.options);
        if let Some(cache) = &self.cache {
            cache.insert(text, highlighted.clone());
        }
        highlighted
    }

    /// Highlights `text` and reports the wrapped spans. Not cached.
    pub fn annotate(&self, text: &str) -> Annotated {
        annotate(text, &self.lexicon, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lexicon() -> Lexicon {
        Lexicon::from_words([
            "chat", "chien", "mange", "texte", "phrase", "courte", "nettement", "plus",
            "longue", "que", "vingt", "deux", "mot", "ici", "eleve", "oeuvre", "une",
        ])
    }

    #[test]
    fn test_capitalized_word_is_a_proper_noun() {
        let lexicon = Lexicon::from_words(["chat", "chien"]);
        let out = highlight("Le chat mange un Burger XYZ", &lexicon);
        assert_eq!(
            out,
            "Le chat <hl_notfrench>mange</hl_notfrench> un Burger <hl_notfrench>XYZ</hl_notfrench>"
        );
    }

    #[test]
    fn test_folded_lookup_keeps_accented_words() {
        let out = highlight("une élève et une œuvre", &lexicon());
        assert_eq!(out, "une élève et une œuvre");
    }

    #[test]
    fn test_short_words_are_ignored() {
        assert_eq!(highlight("le la un de", &lexicon()), "le la un de");
    }

    #[test]
    fn test_quotations_are_not_merged() {
        let out = highlight("«a» texte «b»", &lexicon());
        assert_eq!(out, "<hl_quote>«a»</hl_quote> texte <hl_quote>«b»</hl_quote>");
    }

    #[test]
    fn test_list_items_after_newline() {
        let out = highlight("Intro\n- un\n- deux\nFin", &lexicon());
        assert_eq!(
            out,
            "Intro\n<hl_list>- un\n</hl_list><hl_list>- deux\n</hl_list>Fin"
        );
    }

    #[test]
    fn test_list_marker_at_start_is_not_an_item() {
        assert_eq!(highlight("- un\nFin", &lexicon()), "- un\nFin");
    }

    #[test]
    fn test_long_sentence() {
        let opts = HighlightOptions {
            long_sentence_threshold: 20,
            ..HighlightOptions::default()
        };
        let out = highlight_with(
            "Une phrase courte. Une phrase nettement plus longue que vingt.",
            &lexicon(),
            &opts,
        );
        assert_eq!(
            out,
            "Une phrase courte.<hl_long> Une phrase nettement plus longue que vingt.</hl_long>"
        );
    }

    #[test]
    fn test_default_threshold_is_exclusive() {
        // Single letters only, so the foreign-word pass adds nothing.
        let exactly = format!("{}.", "a ".repeat(112));
        assert_eq!(exactly.chars().count(), 225);
        assert_eq!(highlight(&exactly, &lexicon()), exactly);

        let over = format!("{}.", "a ".repeat(113));
        assert_eq!(over.chars().count(), 227);
        assert_eq!(highlight(&over, &lexicon()), format!("<hl_long>{over}</hl_long>"));
    }

    #[test]
    fn test_sentence_length_counts_earlier_markers() {
        let opts = HighlightOptions {
            long_sentence_threshold: 20,
            ..HighlightOptions::default()
        };
        let out = highlight_with("un mot zzz ici.", &lexicon(), &opts);
        assert_eq!(
            out,
            "<hl_long>un mot <hl_notfrench>zzz</hl_notfrench> ici.</hl_long>"
        );
    }

    #[test]
    fn test_text_without_triggers_is_unchanged() {
        let text = "Le chat et le chien.\nUne phrase courte.";
        assert_eq!(highlight(text, &lexicon()), text);
    }

    #[test]
    fn test_annotate_reports_spans_per_pass() {
        let annotated = annotate("Le chat XYZ «ABC».", &lexicon(), &HighlightOptions::default());
        let kinds: Vec<_> = annotated.highlights.iter().map(|h| h.kind).collect();
        assert_eq!(
            kinds,
            vec![MarkerKind::NotInLanguage, MarkerKind::NotInLanguage, MarkerKind::Quote]
        );
        assert_eq!(annotated.highlights[0].start, 8);
        assert_eq!(annotated.highlights[0].end, 11);
    }

    #[test]
    fn test_is_foreign_word() {
        let lexicon = lexicon();
        assert!(is_foreign_word("burger", &lexicon));
        assert!(is_foreign_word("NASA", &lexicon));
        assert!(!is_foreign_word("Burger", &lexicon));
        assert!(!is_foreign_word("Chat", &lexicon));
    }

    #[test]
    fn test_marker_tags_are_stable() {
        assert_eq!(MarkerKind::NotInLanguage.open_tag(), "<hl_notfrench>");
        assert_eq!(MarkerKind::Long.close_tag(), "</hl_long>");
        assert_eq!(MarkerKind::Quote.to_string(), "hl_quote");
        assert_eq!(MarkerKind::List.tag(), "hl_list");
    }

    #[test]
    fn test_highlighter_cache_matches_fresh_result() {
        let highlighter = Highlighter::new(lexicon(), HighlightOptions::default());
        let text = "Le chat mange un burger.";
        let first = highlighter.highlight(text);
        let second = highlighter.highlight(text);
        assert_eq!(first, second);
        assert_eq!(first, highlight(text, highlighter.lexicon()));
        assert_eq!(highlighter.cache().map(HighlightCache::len), Some(1));
    }

    #[test]
    fn test_highlighter_without_cache() {
        let opts = HighlightOptions {
            cache_capacity: 0,
            ..HighlightOptions::default()
        };
        let highlighter = Highlighter::new(lexicon(), opts);
        assert!(highlighter.cache().is_none());
        assert_eq!(highlighter.highlight("XYZ"), "<hl_notfrench>XYZ</hl_notfrench>");
    }
}
