// ABOUTME: Configuration for every pipeline stage plus the NarratorBuilder fluent API.
// ABOUTME: Defaults carry the French word lists and markers the narration text relies on.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::NarratorError;
use crate::lexicon::Lexicon;
use crate::pipeline::Narrator;

/// Threshold, in characters, above which a sentence is highlighted as long.
pub const DEFAULT_LONG_SENTENCE_THRESHOLD: usize = 225;

/// Number of highlighted articles kept by the result cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 20;

/// A pipeline stage. Running "up to" a stage runs every earlier stage first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Convert,
    Purify,
    Prepare,
    #[default]
    Highlight,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Convert => "convert",
            Stage::Purify => "purify",
            Stage::Prepare => "prepare",
            Stage::Highlight => "highlight",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Stage {
    type Err = NarratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "convert" | "html" => Ok(Stage::Convert),
            "purify" | "clean" => Ok(Stage::Purify),
            "prepare" | "tts" => Ok(Stage::Prepare),
            "highlight" | "hl" => Ok(Stage::Highlight),
            _ => Err(NarratorError::UnknownStage(s.to_string())),
        }
    }
}

/// Text wrapped around one heading level by the structural converter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadingMarker {
    pub tag: String,
    pub open: String,
    pub close: String,
}

impl HeadingMarker {
    pub fn new(tag: impl Into<String>, open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            open: open.into(),
            close: close.into(),
        }
    }
}

/// Options for the HTML structural converter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub headings: Vec<HeadingMarker>,
    /// `<ul>` elements carrying this class are dropped with their content.
    pub gallery_class: String,
    /// `<sup>` elements whose class list is exactly this are emptied.
    pub cleared_citation_class: String,
    /// Put nested citation-list closings on their own line before parsing.
    pub split_citation_lists: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            headings: vec![
                HeadingMarker::new("h2", "\n== ", " ==\n"),
                HeadingMarker::new("h3", "\n=== ", " ===\n"),
                HeadingMarker::new("h4", "\n==== ", " ===="),
            ],
            gallery_class: "gallery".to_string(),
            cleared_citation_class: "reference cite_virgule".to_string(),
            split_citation_lists: true,
        }
    }
}

/// Options for the wikitext purifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PurifyOptions {
    /// Literal noise removed everywhere, one token after the other.
    pub removed_tokens: Vec<String>,
    /// Headings after which the rest of the article is dropped.
    pub stop_headings: Vec<String>,
    /// Rewrite `* item` bullets into numbered items.
    pub number_bullets: bool,
}

impl Default for PurifyOptions {
    fn default() -> Self {
        Self {
            removed_tokens: [
                " (en)",
                "(en) ",
                "(en)",
                "[Lequel ?]",
                "[Lesquel ?]",
                "[Quoi ?],",
                "[pas clair]",
                "[Qui ?]",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            stop_headings: [
                "== Annexes ==",
                "== Bibliographie ==",
                "== Notes et références ==",
                "== Voir aussi ==",
                "== Œuvres ==",
                "== Publications ==",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            number_bullets: false,
        }
    }
}

/// Options for the TTS preparer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechOptions {
    /// Abbreviation and its spoken form.
    pub abbreviations: Vec<(String, String)>,
    /// Connectors that get a comma in front of them.
    pub pause_before: Vec<String>,
    /// Relative pronouns whose preceding word gets a comma in front of it.
    pub pause_before_previous: Vec<String>,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            abbreviations: vec![("av. J.-C".to_string(), "avant Jésus Christ".to_string())],
            pause_before: ["mais", "donc", "or", "car", "ou", "parce que"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            pause_before_previous: ["lequel", "laquelle", "lesquels", "lesquelles"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Options for the highlighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightOptions {
    pub long_sentence_threshold: usize,
    /// Entries kept by the result cache; 0 disables caching.
    pub cache_capacity: usize,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            long_sentence_threshold: DEFAULT_LONG_SENTENCE_THRESHOLD,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Configuration for the whole pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    pub convert: ConvertOptions,
    pub purify: PurifyOptions,
    pub speech: SpeechOptions,
    pub highlight: HighlightOptions,
}

impl Options {
    /// Reads options from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Builder for constructing Narrator instances with custom configuration.
#[derive(Debug, Clone, Default)]
pub struct NarratorBuilder {
    opts: Options,
    lexicon: Option<Arc<Lexicon>>,
}

impl NarratorBuilder {
    /// Create a new NarratorBuilder with default options and no lexicon.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every option at once.
    pub fn options(mut self, opts: Options) -> Self {
        self.opts = opts;
        self
    }

    pub fn convert_options(mut self, convert: ConvertOptions) -> Self {
        self.opts.convert = convert;
        self
    }

    pub fn purify_options(mut self, purify: PurifyOptions) -> Self {
        self.opts.purify = purify;
        self
    }

    pub fn speech_options(mut self, speech: SpeechOptions) -> Self {
        self.opts.speech = speech;
        self
    }

    pub fn highlight_options(mut self, highlight: HighlightOptions) -> Self {
        self.opts.highlight = highlight;
        self
    }

    /// Set the length above which a sentence is highlighted as long.
    pub fn long_sentence_threshold(mut self, threshold: usize) -> Self {
        self.opts.highlight.long_sentence_threshold = threshold;
        self
    }

    /// Set how many highlighted texts are memoized; 0 disables the cache.
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.opts.highlight.cache_capacity = capacity;
        self
    }

    /// Set the lexicon used by the highlighter.
    pub fn lexicon(mut self, lexicon: impl Into<Arc<Lexicon>>) -> Self {
        self.lexicon = Some(lexicon.into());
        self
    }

    /// Build the Narrator with the configured options.
    pub fn build(self) -> Narrator {
        Narrator::new(self.opts, self.lexicon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_parsing() {
        assert_eq!("convert".parse::<Stage>().unwrap(), Stage::Convert);
        assert_eq!("PURIFY".parse::<Stage>().unwrap(), Stage::Purify);
        assert_eq!("tts".parse::<Stage>().unwrap(), Stage::Prepare);
        assert_eq!("highlight".parse::<Stage>().unwrap(), Stage::Highlight);
        assert!("translate".parse::<Stage>().is_err());
    }

    #[test]
    fn test_stage_order_follows_pipeline() {
        assert!(Stage::Convert < Stage::Purify);
        assert!(Stage::Purify < Stage::Prepare);
        assert!(Stage::Prepare < Stage::Highlight);
        assert_eq!(Stage::Prepare.to_string(), "prepare");
    }

    #[test]
    fn test_defaults() {
        let opts = Options::default();
        assert_eq!(opts.highlight.long_sentence_threshold, 225);
        assert_eq!(opts.highlight.cache_capacity, 20);
        assert_eq!(opts.purify.stop_headings.len(), 6);
        assert_eq!(opts.convert.headings[2].close, " ====");
        assert!(opts.speech.pause_before.contains(&"parce que".to_string()));
    }

    #[test]
    fn test_from_json_keeps_missing_fields_default() {
        let opts =
            Options::from_json(r#"{"highlight": {"long_sentence_threshold": 80}}"#).unwrap();
        assert_eq!(opts.highlight.long_sentence_threshold, 80);
        assert_eq!(opts.highlight.cache_capacity, DEFAULT_CACHE_CAPACITY);
        assert_eq!(opts.purify, PurifyOptions::default());
    }

    #[test]
    fn test_builder_sets_highlight_knobs() {
        let narrator = NarratorBuilder::new()
            .long_sentence_threshold(50)
            .cache_capacity(0)
            .build();
        assert_eq!(narrator.options().highlight.long_sentence_threshold, 50);
        assert_eq!(narrator.options().highlight.cache_capacity, 0);
        assert!(narrator.lexicon().is_none());
    }
}
