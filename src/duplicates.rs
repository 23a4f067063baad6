//! Second-pass re-evaluation of duplicate mentions.
//!
//! Matchers flag a slot as a duplicate whenever its cue occurs more than
//! once. Many of those flags are explained by the rest of the MR:
//!
//! - An elided (`""`) slot in a multi-act MR: each act may restate the cue.
//! - An elided slot alongside a slot sharing its cue: "leaving" serves both
//!   `depart` and `leave`. Those pairs are configured in [`DuplicatePolicy`].
//! - A concrete value shared with another slot: "Cambridge" twice for
//!   `depart = cambridge` and `dest = cambridge` is two slots, not a repeat.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::normalize::{CanonicalMr, CanonicalSlot};

/// Slot pairs whose shared lexical cue excuses a duplicate mention.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicatePolicy {
    #[serde(default)]
    ignore_when_present: HashMap<String, Vec<String>>,
}

impl DuplicatePolicy {
    /// Policy with no co-occurrence exemptions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Excuse duplicates of `slot` whenever any of `others` is in the MR.
    #[must_use]
    pub fn with_exemption(
        mut self,
        slot: impl Into<String>,
        others: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.ignore_when_present
            .entry(slot.into())
            .or_default()
            .extend(others.into_iter().map(Into::into));
        self
    }

    /// Slots whose presence excuses a duplicate of `slot`.
    #[must_use]
    pub fn exemptions(&self, slot: &str) -> &[String] {
        self.ignore_when_present
            .get(slot)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Parse from JSON (`{"ignore_when_present": {"day": ["stay"]}}`).
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::parse(format!("duplicate policy: {e}")))
    }

    /// Load from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::resource_not_found(format!(
                "duplicate policy {}",
                path.display()
            )));
        }
        let policy = Self::from_json_str(&std::fs::read_to_string(path)?)?;
        log::info!("loaded duplicate policy from {}", path.display());
        Ok(policy)
    }

    /// Decide whether a raw duplicate flag survives given the whole MR.
    #[must_use]
    pub fn reevaluate(&self, is_dupe: bool, slot: &CanonicalSlot, mr: &CanonicalMr) -> bool {
        if !is_dupe {
            return false;
        }

        let value = slot.value.text();
        if value.is_empty() {
            if mr.num_dialogue_acts > 1 {
                log::debug!(
                    "duplicate {} excused: {} dialogue acts",
                    slot.name,
                    mr.num_dialogue_acts
                );
                return false;
            }
            if let Some(other) = self
                .exemptions(slot.base_name())
                .iter()
                .find(|other| mr.has_slot(other))
            {
                log::debug!("duplicate {} excused: {} shares its cue", slot.name, other);
                return false;
            }
        } else if mr.value_counts().get(value).copied().unwrap_or(0) > 1 {
            log::debug!("duplicate {} excused: value {:?} shared", slot.name, value);
            return false;
        }

        true
    }
}

static BUILTIN: Lazy<Arc<DuplicatePolicy>> = Lazy::new(|| {
    Arc::new(
        DuplicatePolicy::from_json_str(include_str!("../resources/duplicate_policy.json"))
            .expect("embedded duplicate_policy.json is invalid"),
    )
});

/// The compiled-in duplicate policy.
#[must_use]
pub fn builtin() -> Arc<DuplicatePolicy> {
    Arc::clone(&BUILTIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::canonicalize_mr;
    use slotalign_core::MeaningRepresentation;

    fn canonical(pairs: &[(&str, &str)]) -> CanonicalMr {
        canonicalize_mr(&MeaningRepresentation::from_pairs(pairs.iter().copied()))
    }

    #[test]
    fn test_not_dupe_stays_not_dupe() {
        let mr = canonical(&[("area", "")]);
        assert!(!builtin().reevaluate(false, &mr.slots[0], &mr));
    }

    #[test]
    fn test_empty_value_excused_by_related_slot() {
        let mr = canonical(&[("day", ""), ("stay", "")]);
        assert!(!builtin().reevaluate(true, &mr.slots[0], &mr));

        let alone = canonical(&[("day", ""), ("area", "north")]);
        assert!(builtin().reevaluate(true, &alone.slots[0], &alone));
    }

    #[test]
    fn test_empty_value_excused_by_multiple_acts() {
        let mr = canonical(&[("<|da|>", "inform"), ("area", ""), ("<|da|>", "request")]);
        assert_eq!(mr.num_dialogue_acts, 2);
        assert!(!builtin().reevaluate(true, &mr.slots[0], &mr));
    }

    #[test]
    fn test_shared_value_excused() {
        let mr = canonical(&[("depart", "Cambridge"), ("dest", "Cambridge"), ("food", "Italian")]);
        assert!(!builtin().reevaluate(true, &mr.slots[0], &mr));
        assert!(builtin().reevaluate(true, &mr.slots[2], &mr));
    }

    #[test]
    fn test_custom_exemption() {
        let policy = DuplicatePolicy::new().with_exemption("color", ["accessories"]);
        let mr = canonical(&[("color", ""), ("accessories", "remote")]);
        assert!(!policy.reevaluate(true, &mr.slots[0], &mr));
        assert!(DuplicatePolicy::new().reevaluate(true, &mr.slots[0], &mr));
    }
}
