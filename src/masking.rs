//! Named-entity masking.
//!
//! Name-like slots (entity name, landmark, departure/destination, developer,
//! address) are located first and their verbatim mentions overwritten, so a
//! later slot cannot match text that belongs to a name: "The Rice Boat" must
//! not count as a realization of `food = rice`.
//!
//! ```text
//!   MR:   name = "the rice boat", food = "rice"
//!   Utt:  "the rice boat serves rice"
//!
//!   masked: "_____________ serves rice"
//!            └ name: pos 0 ┘        └ food still matchable at 21
//! ```
//!
//! Masks have the same byte length as the mention, so every later offset
//! stays valid. Masking is an immutable transform: the input MR and text
//! are untouched and a new pair is returned.

use std::collections::{HashMap, HashSet};

use regex::Regex;
use slotalign_core::{MaskedValue, SlotValue};

use crate::normalize::CanonicalMr;

/// Slots whose values are proper names, masked before matching.
pub const DEFAULT_NAME_SLOTS: &[&str] = &["addr", "depart", "dest", "developer", "name", "near"];

/// The entity-name slot, exempt from duplicate flags when configured.
pub const ENTITY_NAME_SLOT: &str = "name";

/// Result of masking: the MR with masked records and the rewritten text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Masked {
    /// MR in its original order; located name slots carry [`SlotValue::Masked`].
    pub mr: CanonicalMr,
    /// Canonical utterance with name mentions replaced by `_`.
    pub text: String,
}

/// Mask verbatim mentions of name-like slot values.
///
/// Values are processed longest first so a value that is a substring of a
/// longer one is not masked out from under it. When several slots share a
/// value, only the last of them masks the text; the earlier ones just count
/// mentions.
#[must_use]
pub fn mask_named_entities(
    mr: &CanonicalMr,
    text: &str,
    name_slots: &HashSet<String>,
    ignore_name_slot_dupes: bool,
) -> Masked {
    let mut order: Vec<usize> = (0..mr.slots.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(mr.slots[i].value.text().chars().count()));

    let mut remaining: HashMap<String, usize> = mr
        .value_counts()
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();

    let mut out = mr.clone();
    let mut text = text.to_string();

    for idx in order {
        let slot = &mr.slots[idx];
        let value = slot.value.text();
        if value.is_empty() || !name_slots.contains(slot.base_name()) {
            continue;
        }

        let Ok(pattern) = Regex::new(&format!(r"\b{}\b", regex::escape(value))) else {
            log::warn!("could not build mask pattern for {}={:?}", slot.name, value);
            continue;
        };
        let Some(first) = pattern.find(&text).map(|m| m.start()) else {
            continue;
        };

        let left = remaining.entry(value.to_string()).or_insert(1);
        *left = left.saturating_sub(1);

        let num_mentions = pattern.find_iter(&text).count();
        if *left == 0 {
            let mask = "_".repeat(value.len());
            text = pattern.replace_all(&text, mask.as_str()).into_owned();
        }

        let is_dupe = num_mentions > 1
            && !(slot.base_name() == ENTITY_NAME_SLOT && ignore_name_slot_dupes);
        log::trace!(
            "masked {}={:?} at {} ({} mentions)",
            slot.name,
            value,
            first,
            num_mentions
        );

        out.slots[idx].value = SlotValue::Masked(MaskedValue {
            text: value.to_string(),
            pos: first,
            is_dupe,
        });
    }

    Masked { mr: out, text }
}
