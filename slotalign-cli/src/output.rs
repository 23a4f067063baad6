//! Output formatting utilities for CLI commands

use std::fmt::Write as _;
use std::io::{self, Write};

use slotalign::eval::error_analysis::SlotErrorBreakdown;
use slotalign::eval::CorpusReport;

/// Write output to file or stdout
pub fn write_output(content: &str, path: Option<&str>) -> Result<(), String> {
    if let Some(path) = path {
        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write to {}: {}", path, e))?;
    } else {
        print!("{}", content);
        io::stdout()
            .flush()
            .map_err(|e| format!("Failed to flush stdout: {}", e))?;
    }
    Ok(())
}

/// Render a corpus report as text.
///
/// With `per_sample`, every sample with errors gets its own line before
/// the totals.
pub fn render_report_text(
    report: &CorpusReport,
    breakdown: Option<&SlotErrorBreakdown>,
    per_sample: bool,
) -> String {
    let mut out = String::new();

    if per_sample {
        for (idx, s) in report.summaries.iter().enumerate() {
            if s.is_correct() {
                continue;
            }
            let _ = writeln!(
                out,
                "#{idx}: {} error(s); missing [{}]; duplicate [{}]",
                s.num_errors,
                s.missing_slots.join(", "),
                s.duplicate_slots.join(", ")
            );
        }
        if !out.is_empty() {
            out.push('\n');
        }
    }

    let errors: usize = report.summaries.iter().map(|s| s.num_errors).sum();
    let content: usize = report.summaries.iter().map(|s| s.num_content_slots).sum();
    let _ = writeln!(out, "samples:             {}", report.len());
    let _ = writeln!(out, "slot errors:         {errors} / {content}");
    let _ = writeln!(out, "slot-level SER:      {:.4}", report.slot_level_ser);
    let _ = writeln!(out, "utterance-level SER: {:.4}", report.utterance_level_ser);
    let _ = writeln!(out, "mean slot accuracy:  {:.4}", report.mean_slot_accuracy);

    if let Some(breakdown) = breakdown {
        out.push('\n');
        out.push_str(&breakdown.to_string());
    }
    out
}

/// Render a corpus report as one JSON document.
pub fn render_report_json(
    report: &CorpusReport,
    breakdown: Option<&SlotErrorBreakdown>,
    per_sample: bool,
) -> Result<String, String> {
    let mut value = serde_json::json!({
        "samples": report.len(),
        "slot_level_ser": report.slot_level_ser,
        "utterance_level_ser": report.utterance_level_ser,
        "mean_slot_accuracy": report.mean_slot_accuracy,
    });
    if per_sample {
        value["summaries"] = serde_json::to_value(&report.summaries)
            .map_err(|e| format!("Failed to serialize summaries: {}", e))?;
    }
    if let Some(breakdown) = breakdown {
        value["breakdown"] = serde_json::to_value(breakdown)
            .map_err(|e| format!("Failed to serialize breakdown: {}", e))?;
    }
    let mut out = serde_json::to_string_pretty(&value)
        .map_err(|e| format!("Failed to serialize report: {}", e))?;
    out.push('\n');
    Ok(out)
}
