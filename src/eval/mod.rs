//! Corpus-level slot error rate (SER).
//!
//! Each sample is scored independently, so a corpus is an embarrassingly
//! parallel map: with the `parallel` feature samples are scored on the
//! rayon pool, otherwise sequentially. Either way results come back in
//! input order.
//!
//! ```text
//!   slot-level SER      = Σ num_errors / Σ num_content_slots
//!   utterance-level SER = |{ samples with num_errors > 0 }| / |samples|
//! ```
//!
//! # Example
//!
//! ```rust
//! use slotalign::eval::{score_corpus, CorpusSample};
//! use slotalign::{MeaningRepresentation, SlotAligner};
//!
//! let samples = vec![
//!     CorpusSample::new(
//!         MeaningRepresentation::from_pairs([("food", "italian")]),
//!         "Italian food.",
//!         "rest_e2e",
//!     ),
//!     CorpusSample::new(
//!         MeaningRepresentation::from_pairs([("food", "italian")]),
//!         "Nice place.",
//!         "rest_e2e",
//!     ),
//! ];
//! let report = score_corpus(&SlotAligner::new(), &samples);
//! assert_eq!(report.slot_level_ser, 0.5);
//! assert_eq!(report.utterance_level_ser, 0.5);
//! ```

pub mod error_analysis;

use std::io::BufRead;

use serde::{Deserialize, Serialize};
use slotalign_core::{ErrorSummary, MeaningRepresentation};

use crate::aligner::SlotAligner;
use crate::error::{Error, Result};

/// One corpus entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusSample {
    /// The meaning representation.
    pub mr: MeaningRepresentation,
    /// The generated utterance.
    pub utterance: String,
    /// Domain identifier used for routing.
    #[serde(default)]
    pub domain: String,
}

impl CorpusSample {
    /// Create a sample.
    #[must_use]
    pub fn new(mr: MeaningRepresentation, utterance: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            mr,
            utterance: utterance.into(),
            domain: domain.into(),
        }
    }
}

/// Read samples from JSON Lines; blank lines are skipped.
///
/// Parse errors report the 1-based line number.
pub fn read_jsonl(reader: impl BufRead) -> Result<Vec<CorpusSample>> {
    let mut samples = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let sample = serde_json::from_str(&line)
            .map_err(|e| Error::parse(format!("line {}: {e}", idx + 1)))?;
        samples.push(sample);
    }
    Ok(samples)
}

/// Scores of a whole corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorpusReport {
    /// Per-sample summaries, in input order.
    pub summaries: Vec<ErrorSummary>,
    /// Total errors over total content slots.
    pub slot_level_ser: f64,
    /// Fraction of samples with at least one error.
    pub utterance_level_ser: f64,
    /// Mean per-sample slot accuracy.
    pub mean_slot_accuracy: f64,
}

impl CorpusReport {
    /// Aggregate per-sample summaries.
    #[must_use]
    pub fn from_summaries(summaries: Vec<ErrorSummary>) -> Self {
        if summaries.is_empty() {
            return Self::default();
        }
        let n = summaries.len() as f64;
        let errors: usize = summaries.iter().map(|s| s.num_errors).sum();
        let content: usize = summaries.iter().map(|s| s.num_content_slots).sum();
        let failed = summaries.iter().filter(|s| !s.is_correct()).count();

        Self {
            slot_level_ser: if content == 0 {
                0.0
            } else {
                errors as f64 / content as f64
            },
            utterance_level_ser: failed as f64 / n,
            mean_slot_accuracy: summaries.iter().map(ErrorSummary::slot_accuracy).sum::<f64>() / n,
            summaries,
        }
    }

    /// Number of scored samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    /// Whether no samples were scored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}

/// Score every sample and aggregate.
#[must_use]
pub fn score_corpus(aligner: &SlotAligner, samples: &[CorpusSample]) -> CorpusReport {
    log::debug!("scoring {} samples", samples.len());
    CorpusReport::from_summaries(score_samples(aligner, samples))
}

#[cfg(feature = "parallel")]
fn score_samples(aligner: &SlotAligner, samples: &[CorpusSample]) -> Vec<ErrorSummary> {
    use rayon::prelude::*;

    samples
        .par_iter()
        .map(|s| aligner.score(&s.mr, &s.utterance, &s.domain))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn score_samples(aligner: &SlotAligner, samples: &[CorpusSample]) -> Vec<ErrorSummary> {
    samples
        .iter()
        .map(|s| aligner.score(&s.mr, &s.utterance, &s.domain))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(pairs: &[(&str, &str)], utt: &str) -> CorpusSample {
        CorpusSample::new(
            MeaningRepresentation::from_pairs(pairs.iter().copied()),
            utt,
            "rest_e2e",
        )
    }

    #[test]
    fn test_empty_corpus() {
        let report = score_corpus(&SlotAligner::new(), &[]);
        assert!(report.is_empty());
        assert_eq!(report.slot_level_ser, 0.0);
    }

    #[test]
    fn test_ser_aggregation() {
        let samples = vec![
            sample(&[("food", "italian"), ("area", "riverside")], "Italian food by the riverside."),
            sample(&[("food", "italian"), ("area", "riverside")], "Italian food."),
            sample(&[("food", "french"), ("area", "riverside")], "Nothing here."),
        ];
        let report = score_corpus(&SlotAligner::new(), &samples);
        assert_eq!(report.len(), 3);
        assert_eq!(report.summaries[1].missing_slots, vec!["area"]);
        assert!((report.slot_level_ser - 3.0 / 6.0).abs() < 1e-9);
        assert!((report.utterance_level_ser - 2.0 / 3.0).abs() < 1e-9);
        assert!((report.mean_slot_accuracy - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_read_jsonl() {
        let input = concat!(
            r#"{"mr": [["name", "Aromi"], ["food", "italian"]], "utterance": "Aromi is Italian.", "domain": "rest_e2e"}"#,
            "\n\n",
            r#"{"mr": [["area", "north"]], "utterance": "North."}"#,
            "\n"
        );
        let samples = read_jsonl(input.as_bytes()).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].mr.len(), 2);
        assert_eq!(samples[1].domain, "");
    }

    #[test]
    fn test_read_jsonl_reports_line() {
        let err = read_jsonl("{}\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }
}
