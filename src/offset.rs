//! Offset bookkeeping between the raw and the canonical utterance.
//!
//! # The Three Coordinate Systems
//!
//! Matching happens on a canonical copy of the utterance (lowercased,
//! hyphens and slashes turned into spaces, whitespace runs collapsed), but
//! callers want positions in the text they passed in.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  Raw:        "Café  Rouge - near\tthe river"                         │
//! │               0123456789...            (RAW CHAR INDEX, returned)    │
//! │                                                                      │
//! │  Canonical:  "café rouge   near the river"                           │
//! │               ├─ CANONICAL BYTE INDEX (what str::find / regex give)  │
//! │               └─ CANONICAL CHAR INDEX ("é" is 2 bytes, 1 char)       │
//! │                                                                      │
//! │  canonical byte ──SpanConverter──▶ canonical char                    │
//! │  canonical char ──RawIndexMap────▶ raw char                          │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Masking replaces a mention with the same number of bytes, so canonical
//! byte offsets stay valid in the masked text.
//!
//! This module provides:
//! - [`SpanConverter`]: canonical byte → canonical char (ASCII fast path)
//! - [`RawIndexMap`]: canonical char → raw char
//! - [`UtteranceOffsets`]: both, composed

use serde::{Deserialize, Serialize};

/// Build a byte-to-char index map for efficient repeated conversions.
///
/// Every byte of a multi-byte character maps to that character's index;
/// the entry at `text.len()` holds the total char count.
#[must_use]
pub fn build_byte_to_char_map(text: &str) -> Vec<usize> {
    let mut map = vec![0usize; text.len() + 1];

    for (char_idx, (byte_idx, ch)) in text.char_indices().enumerate() {
        for slot in map.iter_mut().skip(byte_idx).take(ch.len_utf8()) {
            *slot = char_idx;
        }
    }

    map[text.len()] = text.chars().count();
    map
}

/// Reusable byte → char converter for one text.
///
/// Pure-ASCII texts skip the table entirely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanConverter {
    byte_to_char: Vec<usize>,
    is_ascii: bool,
}

impl SpanConverter {
    /// Create a converter for the given text.
    #[must_use]
    pub fn new(text: &str) -> Self {
        if text.is_ascii() {
            Self {
                byte_to_char: Vec::new(),
                is_ascii: true,
            }
        } else {
            Self {
                byte_to_char: build_byte_to_char_map(text),
                is_ascii: false,
            }
        }
    }

    /// Convert byte offset to char offset.
    #[must_use]
    pub fn byte_to_char(&self, byte_idx: usize) -> usize {
        if self.is_ascii {
            byte_idx
        } else {
            self.byte_to_char
                .get(byte_idx)
                .copied()
                .unwrap_or(self.byte_to_char.last().copied().unwrap_or(0))
        }
    }

    /// Whether the text was pure ASCII.
    #[must_use]
    pub fn is_ascii(&self) -> bool {
        self.is_ascii
    }
}

/// Maps each canonical char back to the raw char it was derived from.
///
/// Lowercasing can expand one raw char into several canonical chars; all
/// of them point at the same raw index. Collapsed whitespace points at the
/// first raw whitespace char of its run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIndexMap {
    raw_index: Vec<usize>,
    raw_len: usize,
}

impl RawIndexMap {
    /// Create an empty map for a raw text of `raw_len` chars.
    #[must_use]
    pub fn with_raw_len(raw_len: usize) -> Self {
        Self {
            raw_index: Vec::new(),
            raw_len,
        }
    }

    /// Record that the next canonical char came from raw char `raw_idx`.
    pub fn push(&mut self, raw_idx: usize) {
        self.raw_index.push(raw_idx);
    }

    /// Raw char index for a canonical char index (clamped to the raw length).
    #[must_use]
    pub fn to_raw(&self, canonical_char: usize) -> usize {
        self.raw_index
            .get(canonical_char)
            .copied()
            .unwrap_or(self.raw_len)
    }

    /// Number of canonical chars recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw_index.len()
    }

    /// Whether no chars were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw_index.is_empty()
    }
}

/// Canonical byte offset → raw char offset for one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtteranceOffsets {
    converter: SpanConverter,
    raw: RawIndexMap,
}

impl UtteranceOffsets {
    /// Compose a converter over the canonical text with its raw index map.
    #[must_use]
    pub fn new(canonical: &str, raw: RawIndexMap) -> Self {
        Self {
            converter: SpanConverter::new(canonical),
            raw,
        }
    }

    /// Map a canonical byte offset to a char offset in the raw utterance.
    #[must_use]
    pub fn to_raw(&self, canonical_byte: usize) -> usize {
        self.raw.to_raw(self.converter.byte_to_char(canonical_byte))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Single-pass conversion the table must agree with.
    pub(super) fn byte_to_char(text: &str, byte_idx: usize) -> usize {
        if byte_idx >= text.len() {
            return text.chars().count();
        }
        text.char_indices().take_while(|(b, _)| *b < byte_idx).count()
    }

    #[test]
    fn test_converter_ascii() {
        let conv = SpanConverter::new("hello world");
        assert!(conv.is_ascii());
        assert_eq!(conv.byte_to_char(5), 5);
    }

    #[test]
    fn test_converter_unicode() {
        let text = "price €50";
        let conv = SpanConverter::new(text);

        assert!(!conv.is_ascii());
        // € spans bytes 6..9
        assert_eq!(conv.byte_to_char(6), 6);
        assert_eq!(conv.byte_to_char(9), 7);
        assert_eq!(conv.byte_to_char(11), 9);
        // past the end clamps
        assert_eq!(conv.byte_to_char(100), 9);
    }

    #[test]
    fn test_byte_to_char_matches_converter() {
        let text = "naïve café";
        let conv = SpanConverter::new(text);
        for (b, _) in text.char_indices() {
            assert_eq!(byte_to_char(text, b), conv.byte_to_char(b));
        }
    }

    #[test]
    fn test_raw_index_map_clamps() {
        let mut map = RawIndexMap::with_raw_len(4);
        map.push(0);
        map.push(2);
        assert_eq!(map.to_raw(1), 2);
        assert_eq!(map.to_raw(7), 4);
        assert_eq!(map.len(), 2);
    }
}
