//! # slotalign
//!
//! Slot alignment for data-to-text generation.
//!
//! Given a meaning representation (MR), an utterance generated from it, and
//! a domain, find where each slot is realized, or count which slots are
//! missing and which are mentioned more than once. The latter is the input
//! to slot error rate (SER), the standard content-fidelity metric.
//!
//! - **Alignment**: `(slot, value, offset)` for every realized slot, sorted
//!   by char offset in the raw utterance
//! - **Scoring**: missing slots (a multiset) and duplicated slots
//! - **Corpora**: slot- and utterance-level SER, optionally on rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use slotalign::{align, score, MeaningRepresentation};
//!
//! let mr: MeaningRepresentation = "name[Aromi], eatType[coffee shop], area[city centre]"
//!     .parse()
//!     .unwrap();
//! let utt = "Aromi is a coffee shop in the city centre.";
//!
//! let alignment = align(&mr, utt, "rest_e2e");
//! let slots: Vec<&str> = alignment.iter().map(|a| a.slot.as_str()).collect();
//! assert_eq!(slots, ["name", "eattype", "area"]);
//!
//! assert!(score(&mr, utt, "rest_e2e").is_correct());
//! ```
//!
//! ## Matchers
//!
//! Each `(domain, slot)` pair is routed to a matcher by a data-driven
//! [`RoutingTable`]; anything unrouted falls back to verbatim search.
//!
//! | Matcher | Example slot | Realized by |
//! |---------|--------------|-------------|
//! | boolean | `familyfriendly` | stems + negation cues |
//! | categorical | `area` | value or lexicon alternative |
//! | food | `food` | value, then hypernym lookup |
//! | numeric | `stars` | digits or number words |
//! | scalar | `pricerange` | rank-equivalent values |
//! | list | `platforms` | all (or any) list items |
//!
//! Universal values (`dontcare`, `none`, empty) are realized through slot
//! stems and discourse cues rather than the value text.
//!
//! ## Resources
//!
//! The alternatives lexicon, slot-mention stems, duplicate policy, routing
//! table and food sense inventory are JSON, compiled in as defaults and
//! replaceable through [`SlotAligner::builder`].

#![warn(missing_docs)]

pub mod aligner;
pub mod classifier;
pub mod duplicates;
mod error;
pub mod eval;
pub mod format;
pub mod lexicon;
pub mod masking;
pub mod matchers;
pub mod mentions;
pub mod normalize;
pub mod offset;
pub mod routing;

use once_cell::sync::Lazy;

pub use aligner::{AlignerConfig, SlotAligner, SlotAlignerBuilder};
pub use classifier::{LexicalClassifier, NoLexicalClassifier, SenseInventoryClassifier};
pub use error::{Error, Result};
pub use format::{format_alignment, AlignmentFormat};
pub use lexicon::{AlternativesLexicon, Lexicon};
pub use routing::{MatchMode, MatcherDescriptor, RoutingTable};
pub use slotalign_core::{
    base_slot_name, ErrorSummary, MaskedValue, MeaningRepresentation, Sentinel, Slot,
    SlotAlignment, SlotValue, DIALOGUE_ACT_SLOT,
};

static DEFAULT_ALIGNER: Lazy<SlotAligner> = Lazy::new(SlotAligner::new);

/// Align with the default aligner.
///
/// See [`SlotAligner::align`].
#[must_use]
pub fn align(mr: &MeaningRepresentation, utterance: &str, domain: &str) -> Vec<SlotAlignment> {
    DEFAULT_ALIGNER.align(mr, utterance, domain)
}

/// Score with the default aligner.
///
/// See [`SlotAligner::score`].
#[must_use]
pub fn score(mr: &MeaningRepresentation, utterance: &str, domain: &str) -> ErrorSummary {
    DEFAULT_ALIGNER.score(mr, utterance, domain)
}
