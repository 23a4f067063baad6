//! Per-slot error breakdown.
//!
//! Slot error rate says how often a system fails; the breakdown says
//! where: which slots go missing, which get repeated, and which samples to
//! look at first.
//!
//! # Example
//!
//! ```rust
//! use slotalign::eval::error_analysis::SlotErrorBreakdown;
//! use slotalign::ErrorSummary;
//!
//! let summaries = vec![
//!     ErrorSummary {
//!         num_errors: 1,
//!         missing_slots: vec!["food".into()],
//!         duplicate_slots: vec![],
//!         num_content_slots: 2,
//!     },
//!     ErrorSummary::default(),
//! ];
//! let breakdown = SlotErrorBreakdown::from_summaries(&summaries);
//! assert_eq!(breakdown.missing["food"], 1);
//! assert_eq!(breakdown.samples_with_missing, vec![0]);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use slotalign_core::{base_slot_name, ErrorSummary};

/// Missing and duplicate counts per slot across a corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotErrorBreakdown {
    /// Base slot name → missing occurrences.
    pub missing: BTreeMap<String, usize>,
    /// Base slot name → samples where it was mentioned more than once.
    pub duplicates: BTreeMap<String, usize>,
    /// Indices of samples with at least one missing slot.
    pub samples_with_missing: Vec<usize>,
}

impl SlotErrorBreakdown {
    /// Tally per-sample summaries (indices follow the input order).
    #[must_use]
    pub fn from_summaries(summaries: &[ErrorSummary]) -> Self {
        let mut out = Self::default();
        for (idx, summary) in summaries.iter().enumerate() {
            for slot in &summary.missing_slots {
                *out.missing.entry(base_slot_name(slot).to_string()).or_insert(0) += 1;
            }
            for slot in &summary.duplicate_slots {
                *out.duplicates.entry(base_slot_name(slot).to_string()).or_insert(0) += 1;
            }
            if !summary.missing_slots.is_empty() {
                out.samples_with_missing.push(idx);
            }
        }
        out
    }

    /// Slots by total errors, worst first (ties by name).
    #[must_use]
    pub fn worst_slots(&self) -> Vec<(&str, usize)> {
        let mut totals: BTreeMap<&str, usize> = BTreeMap::new();
        for (slot, n) in self.missing.iter().chain(&self.duplicates) {
            *totals.entry(slot.as_str()).or_insert(0) += n;
        }
        let mut ranked: Vec<(&str, usize)> = totals.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        ranked
    }

    /// Whether no errors were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.duplicates.is_empty()
    }
}

impl fmt::Display for SlotErrorBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "no slot errors");
        }
        writeln!(f, "{:<24} {:>8} {:>10}", "slot", "missing", "duplicate")?;
        for (slot, _) in self.worst_slots() {
            writeln!(
                f,
                "{:<24} {:>8} {:>10}",
                slot,
                self.missing.get(slot).copied().unwrap_or(0),
                self.duplicates.get(slot).copied().unwrap_or(0)
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(missing: &[&str], dupes: &[&str]) -> ErrorSummary {
        ErrorSummary {
            num_errors: missing.len() + dupes.len(),
            missing_slots: missing.iter().map(|s| (*s).to_string()).collect(),
            duplicate_slots: dupes.iter().map(|s| (*s).to_string()).collect(),
            num_content_slots: 3,
        }
    }

    #[test]
    fn test_breakdown_counts() {
        let b = SlotErrorBreakdown::from_summaries(&[
            summary(&["food", "area"], &[]),
            summary(&[], &["area"]),
            summary(&["type1", "type2"], &[]),
        ]);
        assert_eq!(b.missing["food"], 1);
        assert_eq!(b.missing["type"], 2);
        assert_eq!(b.duplicates["area"], 1);
        assert_eq!(b.samples_with_missing, vec![0, 2]);
        assert_eq!(b.worst_slots(), vec![("area", 2), ("type", 2), ("food", 1)]);
    }

    #[test]
    fn test_display() {
        let empty = SlotErrorBreakdown::default();
        assert_eq!(empty.to_string(), "no slot errors\n");

        let b = SlotErrorBreakdown::from_summaries(&[summary(&["food"], &[])]);
        let table = b.to_string();
        assert!(table.starts_with("slot"));
        assert!(table.contains("food"));
    }
}
