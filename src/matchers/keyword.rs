//! Keyword search with duplicate detection.
//!
//! Every matcher eventually bottoms out here. A [`Keyword`] is one of:
//!
//! | JSON form | Variant | Search |
//! |-----------|---------|--------|
//! | `"pick up"` | [`Keyword::Phrase`] | one phrase |
//! | `["travel", "between"]` | [`Keyword::Ordered`] | each part after the previous match |
//! | `{"any_order": ["party", "size"]}` | [`Keyword::Unordered`] | each part anywhere |
//!
//! Parts that start and end with a word char are matched on word
//! boundaries; anything else (`£20`, `b&b`, `n/a`) as a plain substring,
//! since most symbols already act as boundaries.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::Realization;

/// A slot keyword.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Keyword {
    /// A single word or phrase.
    Phrase(String),
    /// Parts that must appear in this order.
    Ordered(Vec<String>),
    /// Parts that must all appear, in any order.
    Unordered {
        /// The parts.
        any_order: Vec<String>,
    },
}

impl Keyword {
    /// The keyword's parts.
    #[must_use]
    pub fn parts(&self) -> &[String] {
        match self {
            Self::Phrase(phrase) => std::slice::from_ref(phrase),
            Self::Ordered(parts) | Self::Unordered { any_order: parts } => parts,
        }
    }

    /// Whether parts must appear in the listed order.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        !matches!(self, Self::Unordered { .. })
    }

    /// The keyword as a single phrase, if it is one.
    #[must_use]
    pub fn as_phrase(&self) -> Option<&str> {
        match self {
            Self::Phrase(phrase) => Some(phrase),
            _ => None,
        }
    }
}

impl From<&str> for Keyword {
    fn from(phrase: &str) -> Self {
        Self::Phrase(phrase.to_string())
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Compile the search pattern for one keyword part.
///
/// Returns `None` for an empty part.
#[must_use]
pub fn phrase_pattern(part: &str) -> Option<Regex> {
    let first = part.chars().next()?;
    let last = part.chars().next_back()?;
    let escaped = regex::escape(part);
    let pattern = if is_word_char(first) && is_word_char(last) {
        format!(r"\b{escaped}\b")
    } else {
        escaped
    };
    Regex::new(&pattern).ok()
}

/// Byte offset of the first boundary-aware occurrence of `phrase`.
#[must_use]
pub fn find_phrase(text: &str, phrase: &str) -> Option<usize> {
    phrase_pattern(phrase)?.find(text).map(|m| m.start())
}

/// Number of boundary-aware occurrences of `phrase`.
#[must_use]
pub fn count_phrase(text: &str, phrase: &str) -> usize {
    phrase_pattern(phrase).map_or(0, |p| p.find_iter(text).count())
}

/// Find a keyword in `text`.
///
/// Reports the left-most matched part. Unless `ignore_dupes` is set, the
/// realization is flagged as a duplicate when any part occurs more than once.
#[must_use]
pub fn match_keyword(keyword: &Keyword, text: &str, ignore_dupes: bool) -> Option<Realization> {
    let ordered = keyword.is_ordered();
    let mut leftmost: Option<usize> = None;
    let mut end = 0;
    let mut is_dupe = false;

    for part in keyword.parts() {
        let pattern = phrase_pattern(part)?;
        let start = if ordered { end } else { 0 };
        let found = pattern.find_at(text, start)?;

        leftmost = Some(leftmost.map_or(found.start(), |p| p.min(found.start())));
        end = found.end();

        if !ignore_dupes && pattern.find_iter(text).nth(1).is_some() {
            is_dupe = true;
        }
    }

    leftmost.map(|pos| Realization { pos, is_dupe })
}

/// Find the first keyword of a list that matches.
#[must_use]
pub fn match_any_keyword<'k>(
    keywords: impl IntoIterator<Item = &'k Keyword>,
    text: &str,
    ignore_dupes: bool,
) -> Option<Realization> {
    keywords
        .into_iter()
        .find_map(|kw| match_keyword(kw, text, ignore_dupes))
}
