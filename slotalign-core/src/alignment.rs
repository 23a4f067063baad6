//! Alignment records and per-utterance error summaries.

use serde::{Deserialize, Serialize};

/// A slot realized in an utterance.
///
/// `offset` is the char index (not byte index) into the caller's raw
/// utterance of the left-most token realizing the slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotAlignment {
    /// Slot name with any numeric suffix stripped.
    pub slot: String,
    /// Canonical (lowercased) slot value.
    pub value: String,
    /// Char offset into the raw utterance.
    pub offset: usize,
}

impl SlotAlignment {
    /// Create a new alignment record.
    #[must_use]
    pub fn new(slot: impl Into<String>, value: impl Into<String>, offset: usize) -> Self {
        Self {
            slot: slot.into(),
            value: value.into(),
            offset,
        }
    }
}

/// Outcome of scoring one utterance against its MR.
///
/// `missing_slots` is a multiset: a slot that occurs twice in the MR and is
/// realized once appears once here. `duplicate_slots` holds each slot at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSummary {
    /// Missing slot occurrences plus slots with duplicate mentions.
    pub num_errors: usize,
    /// Slots not realized, one entry per missing occurrence.
    pub missing_slots: Vec<String>,
    /// Slots mentioned more than once.
    pub duplicate_slots: Vec<String>,
    /// Number of content slots in the MR (dialogue-act markers excluded).
    pub num_content_slots: usize,
}

impl ErrorSummary {
    /// Whether every slot was realized exactly once.
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.num_errors == 0
    }

    /// Fraction of content slots realized correctly, clamped at zero.
    ///
    /// Duplicates count as errors, so `num_errors` can exceed the number of
    /// content slots; the result never goes negative. An MR with no content
    /// slots scores 1.0.
    #[must_use]
    pub fn slot_accuracy(&self) -> f64 {
        if self.num_content_slots == 0 {
            return 1.0;
        }
        let correct = self.num_content_slots.saturating_sub(self.num_errors);
        correct as f64 / self.num_content_slots as f64
    }
}
