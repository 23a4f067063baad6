//! Score command: slot error rate over a JSONL corpus

use std::time::Instant;

use clap::Parser;

use slotalign::eval::error_analysis::SlotErrorBreakdown;
use slotalign::eval::{read_jsonl, score_corpus};

use super::super::output::{render_report_json, render_report_text, write_output};
use super::super::parser::ReportFormat;
use super::super::utils::{build_aligner, open_input};

/// Score a JSONL corpus
///
/// Each line is `{"mr": [["slot", "value"], ...], "utterance": "...", "domain": "..."}`.
#[derive(Parser, Debug)]
pub struct ScoreArgs {
    /// Corpus file (`-` for stdin)
    #[arg(default_value = "-")]
    pub input: String,

    /// Report every sample with errors, not just the totals
    #[arg(long)]
    pub slot_level: bool,

    /// Per-slot missing/duplicate table
    #[arg(long)]
    pub breakdown: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,

    /// Domain for samples that do not name one
    #[arg(short, long)]
    pub domain: Option<String>,

    /// Aligner configuration file (JSON)
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Alternatives lexicon replacing the builtin one (JSON)
    #[arg(long, value_name = "PATH")]
    pub lexicon: Option<String>,

    /// Relaxed matching
    #[arg(long)]
    pub soft: bool,

    /// Let a pronoun realize the name slot
    #[arg(long)]
    pub match_name_ref: bool,
}

pub fn cmd_score(args: ScoreArgs) -> Result<(), String> {
    let aligner = build_aligner(
        args.config.as_deref(),
        args.soft,
        args.match_name_ref,
        args.lexicon.as_deref(),
    )?;

    let reader = open_input(&args.input)?;
    let mut samples = read_jsonl(reader).map_err(|e| format!("{}: {}", args.input, e))?;
    if let Some(domain) = &args.domain {
        for sample in samples.iter_mut().filter(|s| s.domain.is_empty()) {
            sample.domain.clone_from(domain);
        }
    }

    let start = Instant::now();
    let report = score_corpus(&aligner, &samples);
    log::info!(
        "scored {} samples in {:.2?}",
        report.len(),
        start.elapsed()
    );

    let breakdown = args
        .breakdown
        .then(|| SlotErrorBreakdown::from_summaries(&report.summaries));

    let out = match args.format {
        ReportFormat::Text => render_report_text(&report, breakdown.as_ref(), args.slot_level),
        ReportFormat::Json => render_report_json(&report, breakdown.as_ref(), args.slot_level)?,
    };
    write_output(&out, args.output.as_deref())
}
