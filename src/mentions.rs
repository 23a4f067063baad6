//! Slot mention stems: words that signal a slot is being talked about.
//!
//! `area` is mentioned by "area", "part of town", "where"; `people` by
//! "guests", "how many", "party size". Universal sentinel values and
//! boolean slots are realized through these stems rather than the value.
//!
//! Some stems only apply when a related slot is also in the MR: "stations"
//! mentions `depart` only if `dest` is present too.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::matchers::keyword::Keyword;

/// Slot → mention stems, with stems conditioned on co-occurring slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotMentions {
    #[serde(default)]
    mentions: HashMap<String, Vec<Keyword>>,
    #[serde(default)]
    conditioned: HashMap<String, BTreeMap<String, Vec<Keyword>>>,
}

impl SlotMentions {
    /// Create an empty table (every slot is mentioned only by its own name).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add stems for a slot.
    pub fn insert(&mut self, slot: impl Into<String>, stems: impl IntoIterator<Item = Keyword>) {
        self.mentions.entry(slot.into()).or_default().extend(stems);
    }

    /// Add stems that apply only when `other_slot` is in the MR.
    pub fn insert_conditioned(
        &mut self,
        slot: impl Into<String>,
        other_slot: impl Into<String>,
        stems: impl IntoIterator<Item = Keyword>,
    ) {
        self.conditioned
            .entry(slot.into())
            .or_default()
            .entry(other_slot.into())
            .or_default()
            .extend(stems);
    }

    /// Stems for a slot given the slots present in the MR.
    ///
    /// Conditioned stems come first. A slot with no entry is mentioned by
    /// its own name.
    #[must_use]
    pub fn stems(&self, slot: &str, present_slots: &HashSet<&str>) -> Vec<Keyword> {
        let mut stems = Vec::new();

        if let Some(conditions) = self.conditioned.get(slot) {
            for (other, extra) in conditions {
                if present_slots.contains(other.as_str()) {
                    stems.extend(extra.iter().cloned());
                }
            }
        }

        match self.mentions.get(slot) {
            Some(base) => stems.extend(base.iter().cloned()),
            None => stems.push(Keyword::from(slot)),
        }
        stems
    }

    /// Unconditioned stems for a slot, if it has an entry.
    #[must_use]
    pub fn base_stems(&self, slot: &str) -> Option<&[Keyword]> {
        self.mentions.get(slot).map(Vec::as_slice)
    }

    /// Parse from JSON (`{"mentions": {...}, "conditioned": {...}}`).
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::parse(format!("slot mentions: {e}")))
    }

    /// Load from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::resource_not_found(format!(
                "slot mentions {}",
                path.display()
            )));
        }
        let table = Self::from_json_str(&std::fs::read_to_string(path)?)?;
        log::info!("loaded slot mentions from {}", path.display());
        Ok(table)
    }
}

/// Naive plural of a stem: `-y` → `-ies`, otherwise `+s`.
#[must_use]
pub fn stem_plural(word: &str) -> String {
    match word.strip_suffix('y') {
        Some(stem) => format!("{stem}ies"),
        None => format!("{word}s"),
    }
}

static BUILTIN: Lazy<Arc<SlotMentions>> = Lazy::new(|| {
    Arc::new(
        SlotMentions::from_json_str(include_str!("../resources/slot_mentions.json"))
            .expect("embedded slot_mentions.json is invalid"),
    )
});

/// The compiled-in mention table.
#[must_use]
pub fn builtin() -> Arc<SlotMentions> {
    Arc::clone(&BUILTIN)
}
