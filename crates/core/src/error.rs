// ABOUTME: Error types for the narrator pipeline: LexiconError and NarratorError.
// ABOUTME: Only the lexicon and stage selection can fail; the text stages themselves are total.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the known-word list.
#[derive(Debug, Error)]
pub enum LexiconError {
    /// The word list could not be read from disk.
    #[error("failed to read lexicon {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The word list was read but holds no words, which would flag every word as foreign.
    #[error("lexicon {} contains no words", path.display())]
    Empty { path: PathBuf },
}

impl LexiconError {
    /// Creates an Io error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LexiconError::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an Empty error for the given path.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        LexiconError::Empty { path: path.into() }
    }

    /// Returns true if the file could not be read.
    pub fn is_io(&self) -> bool {
        matches!(self, LexiconError::Io { .. })
    }

    /// Returns true if the file held no words.
    pub fn is_no_words(&self) -> bool {
        matches!(self, LexiconError::Empty { .. })
    }
}

/// Errors surfaced by the `Narrator` pipeline.
#[derive(Debug, Error)]
pub enum NarratorError {
    #[error(transparent)]
    Lexicon(#[from] LexiconError),

    /// Highlighting was requested on a pipeline built without a lexicon.
    #[error("highlighting requires a lexicon, none was configured")]
    MissingLexicon,

    /// A stage name did not match any known stage.
    #[error("unknown stage {0:?} (expected convert, purify, prepare or highlight)")]
    UnknownStage(String),
}

impl NarratorError {
    /// Returns true if the pipeline has no lexicon to highlight with.
    pub fn is_missing_lexicon(&self) -> bool {
        matches!(self, NarratorError::MissingLexicon)
    }

    /// Returns true if the error came from loading the lexicon.
    pub fn is_lexicon(&self) -> bool {
        matches!(self, NarratorError::Lexicon(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicon_io_error_names_the_path() {
        let err = LexiconError::io(
            "/missing/dictionnaire.txt",
            io::Error::new(io::ErrorKind::NotFound, "no such file"),
        );
        assert!(err.is_io());
        let msg = err.to_string();
        assert!(msg.contains("/missing/dictionnaire.txt"), "got {msg}");
        assert!(msg.contains("no such file"), "got {msg}");
    }

    #[test]
    fn narrator_error_wraps_lexicon_error() {
        let err: NarratorError = LexiconError::empty("words.txt").into();
        assert!(err.is_lexicon());
        assert!(!err.is_missing_lexicon());
        assert_eq!(err.to_string(), "lexicon words.txt contains no words");
    }

    #[test]
    fn missing_lexicon_predicate() {
        assert!(NarratorError::MissingLexicon.is_missing_lexicon());
    }
}
