//! Alignment rendering for annotation files.
//!
//! | Format | Example |
//! |--------|---------|
//! | [`AlignmentFormat::Inline`] | `(12: food) (30: area)` |
//! | [`AlignmentFormat::Json`] | `[[12,"food"],[30,"area"]]` |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use slotalign_core::SlotAlignment;

use crate::error::{Error, Result};

/// How to render an alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentFormat {
    /// `(offset: slot)` pairs separated by spaces.
    #[default]
    Inline,
    /// A JSON array of `[offset, slot]` pairs.
    Json,
}

impl fmt::Display for AlignmentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline => write!(f, "inline"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for AlignmentFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "inline" => Ok(Self::Inline),
            "json" => Ok(Self::Json),
            other => Err(Error::invalid_input(format!(
                "unknown alignment format {other:?} (expected inline or json)"
            ))),
        }
    }
}

/// Render an alignment.
#[must_use]
pub fn format_alignment(alignment: &[SlotAlignment], format: AlignmentFormat) -> String {
    match format {
        AlignmentFormat::Inline => alignment
            .iter()
            .map(|a| format!("({}: {})", a.offset, a.slot))
            .collect::<Vec<_>>()
            .join(" "),
        AlignmentFormat::Json => {
            let pairs: Vec<(usize, &str)> =
                alignment.iter().map(|a| (a.offset, a.slot.as_str())).collect();
            serde_json::to_string(&pairs).unwrap_or_else(|_| "[]".to_string())
        }
    }
}
