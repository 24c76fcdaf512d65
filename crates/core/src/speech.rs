// ABOUTME: Prepares purified article text for a French text-to-speech voice.
// ABOUTME: Expands abbreviations, fixes pronunciation and punctuation, inserts pause commas.

//! TTS preparation.
//!
//! The rewrites are order sensitive: abbreviations first, then the
//! pronunciation and punctuation fixes, then the pause commas (a fix can move
//! or remove the spaces around a connector), then comma cleanup.
//!
//! The regex crate has no look-around, so rules that depend on context they
//! must not consume are written as small scanners.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::options::SpeechOptions;

static YEAR_SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"([12]\d\d\d) ").unwrap());
static REPEATED_COMMA_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r",(?:[ \t]*,)+").unwrap());

// Spoken form of a fraction or score slash.
const SLASH_WORD: &str = " sur ";
// A parenthesis closing right before this belongs to a heading and is kept.
const HEADING_CLOSE: &str = " ==";

/// Prepares text for speech with the default word lists.
pub fn prepare(text: &str) -> String {
    prepare_with(text, &SpeechOptions::default())
}

/// Prepares text for speech.
pub fn prepare_with(text: &str, opts: &SpeechOptions) -> String {
    let mut speech = expand_abbreviations(text, &opts.abbreviations);

    speech = expand_mc_prefix(&speech);
    speech = spell_out_slashes(&speech);
    speech = remove_asides(&speech);
    speech = YEAR_SPACE_RE.replace_all(&speech, "$1, ").into_owned();

    for word in opts.pause_before.iter().filter(|w| !w.is_empty()) {
        speech = speech.replace(&format!(" {word} "), &format!(", {word} "));
    }
    for word in opts.pause_before_previous.iter().filter(|w| !w.is_empty()) {
        speech = pause_before_previous_word(&speech, word);
    }

    let speech = REPEATED_COMMA_RE.replace_all(&speech, ",").trim().to_string();
    debug!(input_len = text.len(), output_len = speech.len(), "prepared text for speech");
    speech
}

fn expand_abbreviations(text: &str, abbreviations: &[(String, String)]) -> String {
    let mut out = text.to_string();
    for (short, spoken) in abbreviations.iter().filter(|(s, _)| !s.is_empty()) {
        if out.contains(short.as_str()) {
            out = out.replace(short.as_str(), spoken);
        }
    }
    out
}

/// `McGellan` → `MacGellan`: `Mc` followed by an uppercase then a lowercase letter.
fn expand_mc_prefix(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    for (pos, _) in text.match_indices("Mc") {
        let mut rest = text[pos + 2..].chars();
        let upper = rest.next().is_some_and(|c| c.is_ascii_uppercase());
        let lower = rest.next().is_some_and(|c| c.is_ascii_lowercase());
        if upper && lower {
            out.push_str(&text[copied..pos]);
            out.push_str("Mac");
            copied = pos + 2;
        }
    }
    out.push_str(&text[copied..]);
    out
}

/// `3/4` → `3 sur 4`: a slash between two digits is read out.
fn spell_out_slashes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        let between_digits = c == '/'
            && prev.is_some_and(|p| p.is_ascii_digit())
            && chars.peek().is_some_and(|n| n.is_ascii_digit());
        if between_digits {
            out.push_str(SLASH_WORD);
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

/// Deletes ` (…)` asides, keeping parentheses that end right before a heading marker.
fn remove_asides(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;
    while i + 1 < bytes.len() {
        if bytes[i] == b' ' && bytes[i + 1] == b'(' {
            if let Some(end) = aside_end(text, i) {
                out.push_str(&text[copied..i]);
                copied = end;
                i = end;
                continue;
            }
        }
        i += 1;
    }
    out.push_str(&text[copied..]);
    out
}

// End (exclusive) of the shortest aside starting at `start`, on a single line,
// with at least one character inside and not closing a heading.
fn aside_end(text: &str, start: usize) -> Option<usize> {
    let inner_start = start + 2;
    let line_end = text[inner_start..]
        .find('\n')
        .map_or(text.len(), |offset| inner_start + offset);
    text[inner_start..line_end]
        .match_indices(')')
        .map(|(offset, _)| inner_start + offset)
        .filter(|&close| close > inner_start)
        .find(|&close| !text[close + 1..].starts_with(HEADING_CLOSE))
        .map(|close| close + 1)
}

/// Replaces with `, ` every space that precedes a word directly followed by ` {pronoun}`.
fn pause_before_previous_word(text: &str, pronoun: &str) -> String {
    let target = format!(" {pronoun}");
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    for (pos, c) in text.char_indices() {
        if c != ' ' {
            continue;
        }
        let word_start = pos + 1;
        let word_len = text[word_start..]
            .find(char::is_whitespace)
            .unwrap_or(text.len() - word_start);
        if word_len > 0 && text[word_start + word_len..].starts_with(&target) {
            out.push_str(&text[copied..pos]);
            out.push_str(", ");
            copied = word_start;
        }
    }
    out.push_str(&text[copied..]);
    out
}
