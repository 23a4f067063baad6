//! Align command: locate realized slots in one utterance

use clap::Parser;

use slotalign::format_alignment;

use super::super::output::write_output;
use super::super::parser::AlignFormat;
use super::super::utils::{build_aligner, parse_mr};

/// Locate realized slots in one utterance
#[derive(Parser, Debug)]
pub struct AlignArgs {
    /// Meaning representation (JSON pairs or `slot[value], ...`)
    #[arg(short, long)]
    pub mr: String,

    /// Generated utterance
    #[arg(short, long)]
    pub utterance: String,

    /// Domain identifier (selects matcher routes)
    #[arg(short, long, default_value = "")]
    pub domain: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = AlignFormat::Inline)]
    pub format: AlignFormat,

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

pub fn cmd_align(args: AlignArgs) -> Result<(), String> {
    let aligner = build_aligner(
        args.config.as_deref(),
        args.soft,
        args.match_name_ref,
        args.lexicon.as_deref(),
    )?;
    let mr = parse_mr(&args.mr)?;
    log::debug!("aligning {} slots in domain {:?}", mr.len(), args.domain);

    let alignment = aligner.align(&mr, &args.utterance, &args.domain);
    let mut out = format_alignment(&alignment, args.format.into());
    out.push('\n');
    write_output(&out, None)
}
