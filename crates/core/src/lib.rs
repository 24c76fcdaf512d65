// ABOUTME: Main library entry point for the narrator text pipeline.
// ABOUTME: Re-exports the public API: Narrator, NarratorBuilder, the four stages, Lexicon and errors.

//! Narrator core - turns encyclopedia article HTML into text for a speech
//! synthesizer, then highlights the passages a listener should watch for.
//!
//! The pipeline has four stages, each a pure function over strings:
//!
//! 1. [`convert`] - HTML to flat text with heading and list markers,
//! 2. [`purify`] - wikitext noise removal and trailing-section truncation,
//! 3. [`prepare`] - abbreviation, pronunciation and pause rewrites,
//! 4. [`highlight`] - marker tags around foreign words, long sentences,
//!    quotations and list items.
//!
//! # Example
//!
//! ```
//! use narrator_core::{Lexicon, Narrator};
//!
//! let narrator = Narrator::builder()
//!     .lexicon(Lexicon::from_words(["pleut", "mais", "sors"]))
//!     .build();
//! let text = narrator.narrate("<p>Il pleut mais je sors</p>").unwrap();
//! assert_eq!(text, "Il pleut, mais je sors");
//! ```

pub mod cache;
pub mod dom;
pub mod error;
pub mod highlight;
pub mod lexicon;
pub mod options;
pub mod pipeline;
pub mod purify;
pub mod speech;

pub use crate::cache::HighlightCache;
pub use crate::dom::{convert, convert_with};
pub use crate::error::{LexiconError, NarratorError};
pub use crate::highlight::{
    annotate, highlight, highlight_with, Annotated, Highlight, Highlighter, MarkerKind,
};
pub use crate::lexicon::{fold_diacritics, Lexicon};
pub use crate::options::{
    ConvertOptions, HeadingMarker, HighlightOptions, NarratorBuilder, Options, PurifyOptions,
    SpeechOptions, Stage,
};
pub use crate::pipeline::{clean_page_text, InputKind, Narrator};
pub use crate::purify::{
    first_keyword_position, number_bullet_points, purify, purify_with, KeywordEdge,
};
pub use crate::speech::{prepare, prepare_with};
