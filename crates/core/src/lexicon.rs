// ABOUTME: Known-word set used by the highlighter to tell in-language words from foreign ones.
// ABOUTME: Loads a newline-delimited word list and answers case- and diacritic-folded lookups.

//! The lexicon is loaded once and shared read-only between requests.
//!
//! Lookups try the lowercase form first, then the lowercase form with its
//! diacritics removed, so `Sœur` and `ÉCOLE` match `soeur` and `ecole`.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::info;
use unicode_normalization::char::{decompose_canonical, is_combining_mark};

use crate::error::LexiconError;

// Letters that canonical decomposition leaves alone but a transliteration spells out.
const FOLDED_LETTERS: &[(char, &str)] = &[
    ('œ', "oe"),
    ('Œ', "OE"),
    ('æ', "ae"),
    ('Æ', "AE"),
    ('ß', "ss"),
    ('ø', "o"),
    ('Ø', "O"),
    ('ð', "d"),
    ('Ð', "D"),
    ('þ', "th"),
    ('Þ', "Th"),
];

/// A set of in-language word forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexicon {
    words: HashSet<String>,
}

impl Lexicon {
    /// Builds a lexicon from an iterator of words, kept as given.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Parses a word list with one entry per line.
    pub fn parse(contents: &str) -> Self {
        Self::from_words(contents.lines())
    }

    /// Reads a word list from disk.
    ///
    /// A missing or unreadable file is an error, and so is a file without any
    /// words: highlighting against an empty lexicon would flag every word.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LexiconError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| LexiconError::io(path, e))?;
        let lexicon = Self::parse(&contents);
        if lexicon.words.iter().all(|w| w.trim().is_empty()) {
            return Err(LexiconError::empty(path));
        }
        info!(path = %path.display(), words = lexicon.len(), "lexicon loaded");
        Ok(lexicon)
    }

    /// Exact membership test, no folding.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Membership test used by the highlighter: lowercase lookup, then
    /// lowercase with diacritics removed.
    pub fn contains_word(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        self.contains(&lower) || self.contains(&fold_diacritics(&lower))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Lexicon {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_words(iter)
    }
}

/// Removes diacritics from `s` (`é` → `e`, `œ` → `oe`).
pub fn fold_diacritics(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if let Some((_, spelled)) = FOLDED_LETTERS.iter().find(|(letter, _)| *letter == c) {
            out.push_str(spelled);
            continue;
        }
        decompose_canonical(c, |d| {
            if !is_combining_mark(d) {
                out.push(d);
            }
        });
    }
    out
}
