//! Meaning representations and slot values.
//!
//! A meaning representation (MR) is an ordered list of `(slot, value)` pairs.
//! Order is preserved for round-tripping but carries no meaning for matching,
//! and the same slot name may occur more than once (repeated slots usually
//! carry a numeric suffix, e.g. `food1`, `food2`).
//!
//! ```rust
//! use slotalign_core::{MeaningRepresentation, Sentinel};
//!
//! let mr = MeaningRepresentation::from_pairs([("name", "Aromi"), ("area", "dontcare")]);
//! assert_eq!(mr.len(), 2);
//! assert_eq!(Sentinel::from_value("dontcare"), Some(Sentinel::DontCare));
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Reserved slot name marking the start of a dialogue act.
pub const DIALOGUE_ACT_SLOT: &str = "da";

/// A single raw `(slot, value)` pair as supplied by the caller.
///
/// Serialized as a two-element array so MRs read naturally in JSON:
/// `[["name", "Aromi"], ["food", "Italian"]]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct Slot {
    /// Slot name, possibly wrapped in `<|...|>` markup or carrying a digit suffix.
    pub name: String,
    /// Raw slot value.
    pub value: String,
}

impl Slot {
    /// Create a new slot.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Slot name without its disambiguating numeric suffix.
    #[must_use]
    pub fn base_name(&self) -> &str {
        base_slot_name(&self.name)
    }
}

impl From<(String, String)> for Slot {
    fn from((name, value): (String, String)) -> Self {
        Self { name, value }
    }
}

impl From<Slot> for (String, String) {
    fn from(slot: Slot) -> Self {
        (slot.name, slot.value)
    }
}

/// An ordered meaning representation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeaningRepresentation {
    slots: Vec<Slot>,
}

impl MeaningRepresentation {
    /// Create an empty MR.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an MR from `(slot, value)` pairs, preserving their order.
    pub fn from_pairs<I, N, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        Self {
            slots: pairs.into_iter().map(|(n, v)| Slot::new(n, v)).collect(),
        }
    }

    /// Append a slot.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.slots.push(Slot::new(name, value));
    }

    /// Builder-style append.
    #[must_use]
    pub fn with_slot(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// All slots in their original order.
    #[must_use]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Iterate over the slots.
    pub fn iter(&self) -> std::slice::Iter<'_, Slot> {
        self.slots.iter()
    }

    /// Number of slots, including dialogue-act markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the MR has no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<'a> IntoIterator for &'a MeaningRepresentation {
    type Item = &'a Slot;
    type IntoIter = std::slice::Iter<'a, Slot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

impl FromIterator<Slot> for MeaningRepresentation {
    fn from_iter<T: IntoIterator<Item = Slot>>(iter: T) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

/// Parses the bracketed linear form used by the E2E-style datasets.
///
/// `name[Aromi], food[Italian]` yields two slots. A dialogue-act wrapper
/// such as `inform(name[Aromi], food[Italian])` additionally yields a
/// leading [`DIALOGUE_ACT_SLOT`] entry whose value is the act name.
impl FromStr for MeaningRepresentation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut mr = Self::new();
        let mut name = String::new();
        let mut chars = s.chars();

        while let Some(c) = chars.next() {
            match c {
                '[' => {
                    let slot = name.trim();
                    if slot.is_empty() {
                        return Err(Error::parse(format!("value without a slot name in {s:?}")));
                    }
                    let mut value = String::new();
                    let mut closed = false;
                    for v in chars.by_ref() {
                        if v == ']' {
                            closed = true;
                            break;
                        }
                        value.push(v);
                    }
                    if !closed {
                        return Err(Error::parse(format!("unclosed '[' after slot {slot:?}")));
                    }
                    mr.push(slot, value.trim());
                    name.clear();
                }
                '(' => {
                    let act = name.trim();
                    if !act.is_empty() {
                        mr.push(DIALOGUE_ACT_SLOT, act);
                    }
                    name.clear();
                }
                ',' | ')' => {
                    if !name.trim().is_empty() {
                        return Err(Error::parse(format!("slot {:?} has no value", name.trim())));
                    }
                    name.clear();
                }
                _ => name.push(c),
            }
        }

        if !name.trim().is_empty() {
            return Err(Error::parse(format!("slot {:?} has no value", name.trim())));
        }
        Ok(mr)
    }
}

/// Strip the trailing digits that disambiguate repeated slots (`food2` → `food`).
#[must_use]
pub fn base_slot_name(name: &str) -> &str {
    name.trim_end_matches(|c: char| c.is_ascii_digit())
}

// =============================================================================
// Universal sentinel values
// =============================================================================

/// Values that express a discourse-level constraint instead of literal content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentinel {
    /// `"dontcare"`: the user expressed no preference.
    DontCare,
    /// `"none"`: nothing matched / the constraint is negated.
    None,
    /// `""`: the value is elided; only the slot itself is mentioned.
    Empty,
}

impl Sentinel {
    /// Classify a canonical (lowercased, trimmed) value.
    #[must_use]
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "dontcare" => Some(Self::DontCare),
            "none" => Some(Self::None),
            "" => Some(Self::Empty),
            _ => None,
        }
    }

    /// The literal value this sentinel is written as.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DontCare => "dontcare",
            Self::None => "none",
            Self::Empty => "",
        }
    }
}

// =============================================================================
// Canonical slot values
// =============================================================================

/// A value already located by named-entity masking.
///
/// Masked slots carry their position so later stages never search for them
/// again (the utterance no longer contains their text).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaskedValue {
    /// The canonical value text.
    pub text: String,
    /// Byte offset of the first mention in the canonical (normalized) utterance.
    pub pos: usize,
    /// Whether the value is mentioned more than once.
    pub is_dupe: bool,
}

/// A canonical slot value: either plain text still to be matched, or a masked record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SlotValue {
    /// Masked by named-entity masking.
    Masked(MaskedValue),
    /// Plain canonical text.
    Text(String),
}

impl SlotValue {
    /// The value's text regardless of masking.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Masked(masked) => &masked.text,
        }
    }

    /// The masked record, if this value was masked.
    #[must_use]
    pub fn masked(&self) -> Option<&MaskedValue> {
        match self {
            Self::Masked(masked) => Some(masked),
            Self::Text(_) => None,
        }
    }

    /// The sentinel this value represents, if any.
    #[must_use]
    pub fn sentinel(&self) -> Option<Sentinel> {
        Sentinel::from_value(self.text())
    }
}

impl From<&str> for SlotValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for SlotValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_slot_name() {
        assert_eq!(base_slot_name("food2"), "food");
        assert_eq!(base_slot_name("food"), "food");
        assert_eq!(base_slot_name("release_year"), "release_year");
        assert_eq!(base_slot_name("42"), "");
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(Sentinel::from_value("dontcare"), Some(Sentinel::DontCare));
        assert_eq!(Sentinel::from_value("none"), Some(Sentinel::None));
        assert_eq!(Sentinel::from_value(""), Some(Sentinel::Empty));
        assert_eq!(Sentinel::from_value("italian"), None);
        assert_eq!(Sentinel::DontCare.as_str(), "dontcare");
    }

    #[test]
    fn test_mr_json_shape() {
        let mr = MeaningRepresentation::from_pairs([("name", "Aromi"), ("food", "Italian")]);
        let json = serde_json::to_string(&mr).unwrap();
        assert_eq!(json, r#"[["name","Aromi"],["food","Italian"]]"#);

        let back: MeaningRepresentation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mr);
    }

    #[test]
    fn test_parse_bracketed_form() {
        let mr: MeaningRepresentation = "name[The Eagle], food[Italian], area[]".parse().unwrap();
        assert_eq!(mr.len(), 3);
        assert_eq!(mr.slots()[0], Slot::new("name", "The Eagle"));
        assert_eq!(mr.slots()[2], Slot::new("area", ""));
    }

    #[test]
    fn test_parse_dialogue_act_wrapper() {
        let mr: MeaningRepresentation = "inform(name[Aromi], eatType[pub])".parse().unwrap();
        assert_eq!(mr.slots()[0], Slot::new(DIALOGUE_ACT_SLOT, "inform"));
        assert_eq!(mr.slots()[2], Slot::new("eatType", "pub"));
    }

    #[test]
    fn test_parse_errors() {
        assert!("name[Aromi".parse::<MeaningRepresentation>().is_err());
        assert!("name, food[Italian]".parse::<MeaningRepresentation>().is_err());
        assert!("[Aromi]".parse::<MeaningRepresentation>().is_err());
        assert!("".parse::<MeaningRepresentation>().unwrap().is_empty());
    }

    #[test]
    fn test_slot_value_text() {
        let plain = SlotValue::from("italian");
        assert_eq!(plain.text(), "italian");
        assert!(plain.masked().is_none());

        let masked = SlotValue::Masked(MaskedValue {
            text: "aromi".into(),
            pos: 4,
            is_dupe: false,
        });
        assert_eq!(masked.text(), "aromi");
        assert_eq!(masked.masked().map(|m| m.pos), Some(4));
        assert_eq!(SlotValue::from("").sentinel(), Some(Sentinel::Empty));
    }
}
