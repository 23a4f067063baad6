//! Utility functions for CLI commands

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::Arc;

use slotalign::{AlignerConfig, AlternativesLexicon, MeaningRepresentation, SlotAligner};

/// Parse an MR given either as JSON pairs or in bracketed form.
pub fn parse_mr(input: &str) -> Result<MeaningRepresentation, String> {
    let trimmed = input.trim();
    if trimmed.starts_with('[') {
        serde_json::from_str(trimmed).map_err(|e| format!("Failed to parse MR JSON: {}", e))
    } else {
        trimmed
            .parse()
            .map_err(|e| format!("Failed to parse MR {:?}: {}", trimmed, e))
    }
}

/// Load an aligner configuration file.
pub fn read_config(path: &str) -> Result<AlignerConfig, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {}", path, e))?;
    serde_json::from_str(&text).map_err(|e| format!("Failed to parse config {}: {}", path, e))
}

/// Build an aligner from an optional config file, flags and lexicon.
pub fn build_aligner(
    config_path: Option<&str>,
    soft: bool,
    match_name_ref: bool,
    lexicon_path: Option<&str>,
) -> Result<SlotAligner, String> {
    let mut config = match config_path {
        Some(path) => read_config(path)?,
        None => AlignerConfig::default(),
    };
    if soft {
        config.soft_align = true;
    }
    if match_name_ref {
        config.match_name_ref = true;
    }

    let mut builder = SlotAligner::builder().config(config);
    if let Some(path) = lexicon_path {
        let lexicon = AlternativesLexicon::from_path(path).map_err(|e| e.to_string())?;
        builder = builder.lexicon(Arc::new(lexicon));
    }
    builder.build().map_err(|e| e.to_string())
}

/// Open a corpus file, or stdin for `-`.
pub fn open_input(path: &str) -> Result<Box<dyn io::BufRead>, String> {
    if path == "-" {
        return Ok(Box::new(io::stdin().lock()));
    }
    if !Path::new(path).exists() {
        return Err(format!("File not found: {}", path));
    }
    let file = File::open(path).map_err(|e| format!("Failed to open {}: {}", path, e))?;
    Ok(Box::new(BufReader::new(file)))
}
