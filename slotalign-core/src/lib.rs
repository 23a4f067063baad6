//! # slotalign-core
//!
//! Shared data model for the `slotalign` engine.
//!
//! Kept dependency-light (`serde` + `thiserror`) so corpus tooling can
//! exchange MRs, alignments and error summaries without pulling in the
//! matcher stack.
//!
//! | Type | Role |
//! |------|------|
//! | [`MeaningRepresentation`] | Ordered `(slot, value)` pairs |
//! | [`SlotValue`] / [`MaskedValue`] | Canonical value, optionally located by masking |
//! | [`Sentinel`] | `dontcare` / `none` / empty |
//! | [`SlotAlignment`] | `(slot, value, offset)` record |
//! | [`ErrorSummary`] | Missing/duplicate tally for one utterance |

#![warn(missing_docs)]

pub mod alignment;
pub mod error;
pub mod mr;

pub use alignment::{ErrorSummary, SlotAlignment};
pub use error::{Error, Result};
pub use mr::{
    base_slot_name, MaskedValue, MeaningRepresentation, Sentinel, Slot, SlotValue, DIALOGUE_ACT_SLOT,
};
