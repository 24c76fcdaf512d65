// ABOUTME: The Narrator pipeline context chaining convert, purify, prepare and highlight.
// ABOUTME: Built once through NarratorBuilder and shared read-only between requests.

use std::sync::Arc;

use tracing::debug;

use crate::dom::convert_with;
use crate::error::NarratorError;
use crate::highlight::{Annotated, Highlighter};
use crate::lexicon::Lexicon;
use crate::options::{NarratorBuilder, Options, Stage};
use crate::purify::purify_with;
use crate::speech::prepare_with;

/// What the pipeline input is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputKind {
    /// Article HTML; runs through the structural converter first.
    #[default]
    Html,
    /// Already-flat text; the structural converter is skipped.
    Text,
}

/// Cleans article HTML into narration text with the default options.
pub fn clean_page_text(html: &str) -> String {
    Narrator::builder().build().clean_page_text(html)
}

/// The narration pipeline: every stage's options plus the lexicon-bound highlighter.
#[derive(Debug)]
pub struct Narrator {
    opts: Options,
    highlighter: Option<Highlighter>,
}

impl Narrator {
    /// Create a new NarratorBuilder for configuring the pipeline.
    pub fn builder() -> NarratorBuilder {
        NarratorBuilder::new()
    }

    /// Create a new Narrator. Without a lexicon every stage but highlighting works.
    pub fn new(opts: Options, lexicon: Option<Arc<Lexicon>>) -> Self {
        let highlighter = lexicon.map(|lexicon| Highlighter::new(lexicon, opts.highlight));
        Self { opts, highlighter }
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    pub fn lexicon(&self) -> Option<&Lexicon> {
        self.highlighter.as_ref().map(Highlighter::lexicon)
    }

    pub fn highlighter(&self) -> Option<&Highlighter> {
        self.highlighter.as_ref()
    }

    /// Stage 1: article HTML to flat, heading- and list-annotated text.
    pub fn convert(&self, html: &str) -> String {
        convert_with(html, &self.opts.convert)
    }

    /// Stage 2: strip wikitext noise and trailing reference sections.
    pub fn purify(&self, text: &str) -> String {
        purify_with(text, &self.opts.purify)
    }

    /// Stage 3: rewrite text for a speech synthesizer.
    pub fn prepare(&self, text: &str) -> String {
        prepare_with(text, &self.opts.speech)
    }

    /// Stage 4: wrap passages worth attention in marker tags.
    pub fn highlight(&self, text: &str) -> Result<String, NarratorError> {
        Ok(self.require_highlighter()?.highlight(text))
    }

    /// Stage 4, also reporting the wrapped spans.
    pub fn annotate(&self, text: &str) -> Result<Annotated, NarratorError> {
        Ok(self.require_highlighter()?.annotate(text))
    }

    /// Stages 1 to 3: article HTML to narration text.
    pub fn clean_page_text(&self, html: &str) -> String {
        self.clean_text(&self.convert(html))
    }

    /// Stages 2 and 3, for text that is already flat.
    pub fn clean_text(&self, text: &str) -> String {
        self.prepare(&self.purify(text))
    }

    /// All four stages: article HTML to highlighted narration text.
    pub fn narrate(&self, html: &str) -> Result<String, NarratorError> {
        self.run(html, InputKind::Html, Stage::Highlight)
    }

    /// Runs every stage up to and including `until`.
    ///
    /// Text input skips the structural converter, so running it `until`
    /// [`Stage::Convert`] returns it unchanged.
    pub fn run(&self, input: &str, kind: InputKind, until: Stage) -> Result<String, NarratorError> {
        if until == Stage::Highlight {
            self.require_highlighter()?;
        }

        let mut text = match kind {
            InputKind::Html => self.convert(input),
            InputKind::Text => input.to_string(),
        };
        for stage in [Stage::Purify, Stage::Prepare, Stage::Highlight] {
            if stage > until {
                break;
            }
            text = match stage {
                Stage::Purify => self.purify(&text),
                Stage::Prepare => self.prepare(&text),
                Stage::Highlight => self.highlight(&text)?,
                Stage::Convert => text,
            };
            debug!(stage = %stage, len = text.len(), "stage complete");
        }
        Ok(text)
    }

    fn require_highlighter(&self) -> Result<&Highlighter, NarratorError> {
        self.highlighter.as_ref().ok_or(NarratorError::MissingLexicon)
    }
}
