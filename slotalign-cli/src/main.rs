//! slotalign - slot alignment and SER scoring CLI
//!
//! # Usage
//!
//! ```bash
//! # Where is each slot realized?
//! slotalign align --mr 'name[Aromi], food[Italian]' \
//!     --utterance "Aromi serves Italian food." --domain rest_e2e
//!
//! # Slot error rate of a JSONL corpus
//! slotalign score outputs.jsonl --breakdown
//!
//! # Same, from stdin, as JSON
//! cat outputs.jsonl | slotalign score - --format json
//! ```
//!
//! Verbosity follows `-v` (info, debug with `-vv`, trace with `-vvv`) unless
//! `RUST_LOG` is set.

use std::process::ExitCode;

use clap::Parser;

mod commands;
mod output;
mod parser;
mod utils;

use parser::{Cli, Commands};

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_target(false);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    builder.init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<(), String> = match cli.command {
        Commands::Align(args) => commands::align::cmd_align(args),
        Commands::Score(args) => commands::score::cmd_score(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
