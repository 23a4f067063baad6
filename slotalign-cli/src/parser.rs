//! CLI argument parsing and structure definitions

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{AlignArgs, ScoreArgs};

/// Slot alignment and slot error rate (SER) for data-to-text generation
#[derive(Parser)]
#[command(name = "slotalign")]
#[command(
    author,
    version,
    about = "Slot alignment and slot error rate (SER) for data-to-text generation",
    long_about = r#"
slotalign - find where each MR slot is realized in a generated utterance

COMMANDS:
  align   Locate the slots of one MR in one utterance
  score   Count missing and duplicated slots over a JSONL corpus

MR FORMATS:
  JSON pairs     [["name", "Aromi"], ["food", "Italian"]]
  Bracketed      name[Aromi], food[Italian]

EXAMPLES:
  slotalign align --mr 'name[Aromi], food[Italian]' -u "Aromi serves Italian food." -d rest_e2e
  slotalign score outputs.jsonl --breakdown
"#
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Locate realized slots in one utterance
    #[command(visible_alias = "a")]
    Align(AlignArgs),

    /// Score a JSONL corpus
    #[command(visible_alias = "s")]
    Score(ScoreArgs),
}

/// Output format for corpus scores
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable text
    #[default]
    Text,
    /// A single JSON document
    Json,
}

/// Output format for alignments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum AlignFormat {
    /// `(offset: slot)` pairs
    #[default]
    Inline,
    /// `[[offset, "slot"], ...]`
    Json,
}

impl From<AlignFormat> for slotalign::AlignmentFormat {
    fn from(format: AlignFormat) -> Self {
        match format {
            AlignFormat::Inline => Self::Inline,
            AlignFormat::Json => Self::Json,
        }
    }
}
