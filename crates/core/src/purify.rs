// ABOUTME: Wikitext purifier: strips editorial noise and drops trailing reference sections.
// ABOUTME: Pure text scanning over the converter's output; never fails.

use aho_corasick::{AhoCorasick, MatchKind};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

use crate::options::PurifyOptions;

// "needs a reference/source" annotations, greedy up to the last `]` of the line
static REF_NEEDED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[réf\..+\]").unwrap());
static SOURCE_NEEDED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[source.+\]").unwrap());
// (1) or (12): image and footnote reference numbers
static SHORT_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(\d\d?\)").unwrap());
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\*( .+)").unwrap());

/// Which end of a found keyword `first_keyword_position` reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeywordEdge {
    #[default]
    Start,
    End,
}

/// Purifies text with the default token lists.
pub fn purify(text: &str) -> String {
    purify_with(text, &PurifyOptions::default())
}

/// Removes noise tokens and truncates the text at its earliest stop heading.
pub fn purify_with(text: &str, opts: &PurifyOptions) -> String {
    let mut cleaned = text.to_string();

    if opts.number_bullets {
        cleaned = number_bullet_points(&cleaned);
    }

    for token in opts.removed_tokens.iter().filter(|t| !t.is_empty()) {
        if cleaned.contains(token.as_str()) {
            cleaned = cleaned.replace(token.as_str(), "");
        }
    }
    for re in [&*REF_NEEDED_RE, &*SOURCE_NEEDED_RE, &*SHORT_NUMBER_RE] {
        cleaned = re.replace_all(&cleaned, "").into_owned();
    }

    if let Some(end) = first_keyword_position(&cleaned, &opts.stop_headings, KeywordEdge::Start) {
        debug!(offset = end, "truncating at stop heading");
        cleaned.truncate(end);
    }

    debug!(input_len = text.len(), output_len = cleaned.len(), "purified text");
    cleaned
}

/// Finds the earliest occurrence of any keyword in `text`.
///
/// The earliest offset wins whatever the keyword order; on a tie at the same
/// offset the keyword listed first is reported. Returns `None` when no
/// keyword occurs.
pub fn first_keyword_position<S: AsRef<str>>(
    text: &str,
    keywords: &[S],
    edge: KeywordEdge,
) -> Option<usize> {
    let patterns: Vec<&str> = keywords
        .iter()
        .map(AsRef::as_ref)
        .filter(|k| !k.is_empty())
        .collect();
    if patterns.is_empty() {
        return None;
    }

    let (start, end) = match AhoCorasick::builder()
        .match_kind(MatchKind::LeftmostFirst)
        .build(&patterns)
    {
        Ok(ac) => ac.find(text).map(|m| (m.start(), m.end()))?,
        Err(_) => patterns
            .iter()
            .filter_map(|k| text.find(k).map(|pos| (pos, pos + k.len())))
            .min_by_key(|(pos, _)| *pos)?,
    };

    Some(match edge {
        KeywordEdge::Start => start,
        KeywordEdge::End => end,
    })
}

/// Rewrites wiki bullets (`\n* item`) as numbered items (`\n1. item`).
///
/// Numbering runs across the whole text.
pub fn number_bullet_points(text: &str) -> String {
    let mut number = 0;
    BULLET_RE
        .replace_all(text, |caps: &Captures| {
            number += 1;
            format!("\n{}.{}", number, &caps[1])
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_removes_literal_tokens() {
        assert_eq!(
            purify("Il publie The Times (en) en 1990[Lequel ?]. Qui[Qui ?] ?"),
            "Il publie The Times en 1990. Qui ?"
        );
    }

    #[test]
    fn test_language_tag_spacing_variants() {
        assert_eq!(purify("(en) Titre"), "Titre");
        assert_eq!(purify("a(en)b"), "ab");
    }

    #[test]
    fn test_removes_citation_needed_annotations() {
        assert_eq!(purify("Il est né à Lyon[réf. nécessaire]."), "Il est né à Lyon.");
        assert_eq!(purify("Un fait[source insuffisante] établi."), "Un fait établi.");
    }

    #[test]
    fn test_annotation_removal_is_greedy_within_a_line() {
        assert_eq!(purify("a[réf. x] b [c] d\ne]"), "a d\ne]");
    }

    #[test]
    fn test_removes_short_parenthesized_numbers() {
        assert_eq!(purify("Le château (3) et la tour (12)."), "Le château  et la tour .");
        assert_eq!(purify("En (1987) déjà"), "En (1987) déjà");
    }

    #[test]
    fn test_truncates_at_earliest_stop_heading() {
        let opts = PurifyOptions {
            stop_headings: vec!["== Annexes ==".into(), "== Bibliographie ==".into()],
            ..PurifyOptions::default()
        };
        let text = "A == Bibliographie ==\nB == Annexes ==\nC";
        assert_eq!(purify_with(text, &opts), "A ");
    }

    #[test]
    fn test_truncates_converted_heading() {
        let text = "Texte.\n== Histoire ==\nSuite.\n== Notes et références ==\n[1] Ouvrage";
        assert_eq!(purify(text), "Texte.\n== Histoire ==\nSuite.\n");
    }

    #[test]
    fn test_no_stop_heading_keeps_text() {
        let text = "Rien à couper ici.\n== Histoire ==\nFin.";
        assert_eq!(purify(text), text);
    }

    #[test]
    fn test_purify_is_idempotent() {
        let text = "Marie Curie (en) est née en 1867[réf. nécessaire].\n== Carrière ==\nElle (2) travaille.\n== Voir aussi ==\nLiens";
        let once = purify(text);
        assert_eq!(purify(&once), once);
    }

    #[test]
    fn test_first_keyword_position_edges() {
        let keywords = ["chien", "chat"];
        let text = "un chat et un chien";
        assert_eq!(first_keyword_position(text, &keywords, KeywordEdge::Start), Some(3));
        assert_eq!(first_keyword_position(text, &keywords, KeywordEdge::End), Some(7));
        assert_eq!(first_keyword_position("rien", &keywords, KeywordEdge::Start), None);
        assert_eq!(first_keyword_position::<&str>(text, &[], KeywordEdge::Start), None);
    }

    #[test]
    fn test_number_bullet_points() {
        let text = "Liste :\n* pommes\n* poires\nFin";
        assert_eq!(number_bullet_points(text), "Liste :\n1. pommes\n2. poires\nFin");
    }

    #[test]
    fn test_number_bullets_option() {
        let opts = PurifyOptions {
            number_bullets: true,
            ..PurifyOptions::default()
        };
        assert_eq!(purify_with("x\n* a\n* b", &opts), "x\n1. a\n2. b");
        assert_eq!(purify("x\n* a"), "x\n* a");
    }
}
