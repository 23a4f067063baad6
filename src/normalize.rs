//! MR and utterance canonicalization.
//!
//! Both sides of the comparison are brought into the same shape before any
//! matcher runs:
//!
//! - lowercase, char by char on both sides (so a final `Σ` becomes `σ`
//!   in values and utterances alike)
//! - `-` and `/` become spaces
//! - whitespace runs collapse to a single space
//! - slot values additionally lose surrounding `,.?! `
//!
//! The utterance keeps a char-level map back to the raw input so reported
//! offsets index the caller's text (see [`crate::offset`]).
//!
//! # Tokens
//!
//! [`tokenize`] splits on whitespace, then peels leading punctuation, the
//! trailing punctuation run and English clitics (`n't`, `'s`, `'re`, `'ll`,
//! `'ve`, `'d`, `'m`) into their own tokens, and finally strips `.,!?` from
//! tokens longer than one char. Chunks without any alphanumeric char (`:)`,
//! `...`) are left whole before that final strip, so emoticons survive.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use slotalign_core::{base_slot_name, MeaningRepresentation, SlotValue, DIALOGUE_ACT_SLOT};

use crate::offset::{RawIndexMap, UtteranceOffsets};

/// `<|slot|>` wrapper around a slot name.
static SLOT_MARKUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<\|(?P<slot>.*?)\|>").expect("SLOT_MARKUP regex is invalid")
});

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("WHITESPACE regex is invalid"));

const VALUE_TRIM: &[char] = &[',', '.', '?', '!', ' '];
const TOKEN_STRIP: &[char] = &['.', ',', '!', '?'];
const LEADING_PUNCT: &[char] = &['"', '\'', '(', '[', '{', '`', '<'];
const TRAILING_PUNCT: &[char] = &['.', ',', '!', '?', ';', ':', '"', '\'', ')', ']', '}', '>'];
const CLITICS: &[&str] = &["'s", "'re", "'ll", "'ve", "'d", "'m"];

// =============================================================================
// Meaning representation
// =============================================================================

/// Strip a `<|slot|>` markup wrapper; names without valid markup pass through.
#[must_use]
pub fn strip_slot_markup(name: &str) -> &str {
    SLOT_MARKUP
        .captures(name)
        .and_then(|caps| caps.name("slot"))
        .map_or(name, |m| m.as_str())
}

/// Canonical form of a slot value.
#[must_use]
pub fn canonical_value(value: &str) -> String {
    let lowered: String = value
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == '-' || c == '/' { ' ' } else { c })
        .collect();
    WHITESPACE
        .replace_all(lowered.trim_matches(VALUE_TRIM), " ")
        .into_owned()
}

/// A slot after canonicalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalSlot {
    /// Lowercased slot name without markup; the numeric suffix is kept.
    pub name: String,
    /// Slot name as the caller spelled it, without markup. Used in reports.
    pub label: String,
    /// Canonical value, possibly masked.
    pub value: SlotValue,
}

impl CanonicalSlot {
    /// Slot name with its numeric suffix stripped.
    #[must_use]
    pub fn base_name(&self) -> &str {
        base_slot_name(&self.name)
    }
}

/// A canonical MR: content slots in their original order plus the number of
/// dialogue acts the raw MR contained.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalMr {
    /// Content slots (dialogue-act markers removed).
    pub slots: Vec<CanonicalSlot>,
    /// Number of dialogue-act markers in the raw MR.
    pub num_dialogue_acts: usize,
}

impl CanonicalMr {
    /// Base names of all slots present.
    #[must_use]
    pub fn slot_names(&self) -> HashSet<&str> {
        self.slots.iter().map(CanonicalSlot::base_name).collect()
    }

    /// Whether a slot with the given base name is present.
    #[must_use]
    pub fn has_slot(&self, base_name: &str) -> bool {
        self.slots.iter().any(|s| s.base_name() == base_name)
    }

    /// How many slots carry each value text.
    #[must_use]
    pub fn value_counts(&self) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for slot in &self.slots {
            *counts.entry(slot.value.text()).or_insert(0) += 1;
        }
        counts
    }

    /// Occurrence count of each (unstripped) slot name.
    #[must_use]
    pub fn name_counts(&self) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for slot in &self.slots {
            *counts.entry(slot.name.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Number of content slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether there are no content slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Canonicalize an MR: strip markup, lowercase names, drop dialogue-act
/// markers, normalize values.
#[must_use]
pub fn canonicalize_mr(mr: &MeaningRepresentation) -> CanonicalMr {
    let mut out = CanonicalMr::default();
    for slot in mr {
        let label = strip_slot_markup(&slot.name);
        let name = label.to_lowercase();
        if name == DIALOGUE_ACT_SLOT {
            out.num_dialogue_acts += 1;
            continue;
        }
        out.slots.push(CanonicalSlot {
            name,
            label: label.to_string(),
            value: SlotValue::Text(canonical_value(&slot.value)),
        });
    }
    out
}

// =============================================================================
// Utterance
// =============================================================================

/// A word token with its byte offset in the canonical utterance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    /// Token text.
    pub text: String,
    /// Byte offset in the canonical utterance.
    pub start: usize,
}

impl Token {
    fn new(text: &str, start: usize) -> Self {
        Self {
            text: text.to_string(),
            start,
        }
    }
}

/// A canonical utterance with its tokens and raw-offset mapping.
#[derive(Debug, Clone)]
pub struct Utterance {
    text: String,
    tokens: Vec<Token>,
    offsets: UtteranceOffsets,
}

impl Utterance {
    /// Canonicalize a raw utterance.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let mut text = String::with_capacity(raw.len());
        let mut map = RawIndexMap::with_raw_len(raw.chars().count());
        let mut in_space = false;

        for (raw_idx, c) in raw.chars().enumerate() {
            if c.is_whitespace() || c == '-' || c == '/' {
                if !in_space {
                    text.push(' ');
                    map.push(raw_idx);
                    in_space = true;
                }
                continue;
            }
            in_space = false;
            for lc in c.to_lowercase() {
                text.push(lc);
                map.push(raw_idx);
            }
        }

        let tokens = tokenize(&text);
        let offsets = UtteranceOffsets::new(&text, map);
        Self {
            text,
            tokens,
            offsets,
        }
    }

    /// The canonical text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Tokens of the canonical text.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Map a canonical byte offset to a raw char offset.
    #[must_use]
    pub fn to_raw_offset(&self, canonical_byte: usize) -> usize {
        self.offsets.to_raw(canonical_byte)
    }
}

/// Tokenize canonical text into positioned word tokens.
#[must_use]
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut raw_tokens = Vec::new();
    let mut chunk_start = None;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(start) = chunk_start.take() {
                split_chunk(&text[start..i], start, &mut raw_tokens);
            }
        } else if chunk_start.is_none() {
            chunk_start = Some(i);
        }
    }
    if let Some(start) = chunk_start {
        split_chunk(&text[start..], start, &mut raw_tokens);
    }

    raw_tokens.into_iter().filter_map(strip_token).collect()
}

fn split_chunk(chunk: &str, offset: usize, out: &mut Vec<Token>) {
    if !chunk.chars().any(char::is_alphanumeric) {
        out.push(Token::new(chunk, offset));
        return;
    }

    let mut core = chunk;
    let mut core_start = offset;
    while let Some(c) = core.chars().next().filter(|c| LEADING_PUNCT.contains(c)) {
        let len = c.len_utf8();
        out.push(Token::new(&core[..len], core_start));
        core = &core[len..];
        core_start += len;
    }

    let trailing = {
        let kept = core.trim_end_matches(TRAILING_PUNCT);
        let at = kept.len();
        let run = (at < core.len()).then(|| Token::new(&core[at..], core_start + at));
        core = kept;
        run
    };

    let clitic = core
        .strip_suffix("n't")
        .map(|stem| (stem, "n't"))
        .or_else(|| {
            CLITICS
                .iter()
                .find_map(|cl| core.strip_suffix(cl).map(|stem| (stem, *cl)))
        })
        .filter(|(stem, _)| !stem.is_empty());

    match clitic {
        Some((stem, suffix)) => {
            out.push(Token::new(stem, core_start));
            out.push(Token::new(suffix, core_start + stem.len()));
        }
        None => out.push(Token::new(core, core_start)),
    }

    out.extend(trailing);
}

fn strip_token(token: Token) -> Option<Token> {
    if token.text.chars().count() <= 1 {
        return Some(token);
    }
    let lead_trimmed = token.text.trim_start_matches(TOKEN_STRIP);
    let lead = token.text.len() - lead_trimmed.len();
    let stripped = lead_trimmed.trim_end_matches(TOKEN_STRIP);
    if stripped.is_empty() {
        return None;
    }
    Some(Token::new(stripped, token.start + lead))
}

/// Byte offset of the first token equal to `word`.
#[must_use]
pub fn find_token(tokens: &[Token], word: &str) -> Option<usize> {
    tokens.iter().find(|t| t.text == word).map(|t| t.start)
}

/// Index of the first token equal to `word`.
#[must_use]
pub fn find_token_index(tokens: &[Token], word: &str) -> Option<usize> {
    tokens.iter().position(|t| t.text == word)
}

/// Whether any token equals `word`.
#[must_use]
pub fn has_token(tokens: &[Token], word: &str) -> bool {
    tokens.iter().any(|t| t.text == word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_strip_slot_markup() {
        assert_eq!(strip_slot_markup("<|name|>"), "name");
        assert_eq!(strip_slot_markup("<|da|>"), "da");
        assert_eq!(strip_slot_markup("name"), "name");
        // malformed markup is kept as-is
        assert_eq!(strip_slot_markup("<|name"), "<|name");
    }

    #[test]
    fn test_canonical_value() {
        assert_eq!(canonical_value("Fast-Food"), "fast food");
        assert_eq!(canonical_value("  Italian.  "), "italian");
        assert_eq!(canonical_value("PC / Xbox"), "pc xbox");
        assert_eq!(canonical_value("£20-25"), "£20 25");
        assert_eq!(canonical_value(""), "");
    }

    #[test]
    fn test_canonicalize_mr_drops_dialogue_acts() {
        let mr = MeaningRepresentation::from_pairs([
            ("<|da|>", "inform"),
            ("<|name|>", "Aromi"),
            ("da", "request"),
            ("food2", "Italian"),
        ]);
        let canonical = canonicalize_mr(&mr);
        assert_eq!(canonical.num_dialogue_acts, 2);
        assert_eq!(canonical.len(), 2);
        assert_eq!(canonical.slots[0].name, "name");
        assert_eq!(canonical.slots[1].base_name(), "food");
        assert_eq!(canonical.slots[1].value.text(), "italian");
    }

    #[test]
    fn test_canonicalize_mr_lowercases_names() {
        let mr: MeaningRepresentation =
            "DA[inform], name[Aromi], eatType[pub], <|familyFriendly|>[yes]"
                .parse()
                .unwrap();
        let canonical = canonicalize_mr(&mr);
        assert_eq!(canonical.num_dialogue_acts, 1);
        let names: Vec<&str> = canonical.slots.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["name", "eattype", "familyfriendly"]);
        let labels: Vec<&str> = canonical.slots.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["name", "eatType", "familyFriendly"]);
    }

    #[test]
    fn test_value_and_utterance_lowercase_alike() {
        // final sigma lowercases to "ς" with str::to_lowercase but to "σ" per char
        assert_eq!(canonical_value("ΟΔΟΣ"), "οδοσ");
        assert_eq!(Utterance::new("ΟΔΟΣ").text(), canonical_value("ΟΔΟΣ"));
        assert_eq!(canonical_value("İstanbul"), Utterance::new("İstanbul").text());
    }

    #[test]
    fn test_utterance_canonical_text() {
        let utt = Utterance::new("The  Eagle-Pub\tis  GREAT");
        assert_eq!(utt.text(), "the eagle pub is great");
    }

    #[test]
    fn test_utterance_raw_offsets() {
        let raw = "Le  Café - near Aromi";
        let utt = Utterance::new(raw);
        assert_eq!(utt.text(), "le café near aromi");
        let byte = utt.text().find("aromi").unwrap();
        assert_eq!(utt.to_raw_offset(byte), 16);
        assert_eq!(&raw.chars().skip(16).collect::<String>(), "Aromi");
    }

    #[test]
    fn test_tokenize_punctuation_and_clitics() {
        let tokens = tokenize("it's a pub, isn't it? (great) :)");
        assert_eq!(
            texts(&tokens),
            vec!["it", "'s", "a", "pub", ",", "is", "n't", "it", "?", "(", "great", ")", ":)"]
        );
    }

    #[test]
    fn test_tokenize_offsets() {
        let text = "near the river, cheap.";
        let tokens = tokenize(text);
        for token in &tokens {
            assert_eq!(&text[token.start..token.start + token.text.len()], token.text);
        }
        assert_eq!(find_token(&tokens, "cheap"), Some(16));
        assert_eq!(find_token_index(&tokens, "river"), Some(2));
        assert!(has_token(&tokens, ","));
    }

    #[test]
    fn test_tokenize_strips_inner_punctuation_runs() {
        let tokens = tokenize("wow... ok");
        assert_eq!(texts(&tokens), vec!["wow", "ok"]);
    }

    #[test]
    fn test_empty_utterance() {
        let utt = Utterance::new("");
        assert_eq!(utt.text(), "");
        assert!(utt.tokens().is_empty());
        assert_eq!(utt.to_raw_offset(0), 0);
    }
}
