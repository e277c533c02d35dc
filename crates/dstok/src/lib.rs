//! # dstok
//!
//! **CLI Binary**
//!
//! Entry point for the `dstok` command-line application. It parses arguments,
//! reads input files, dispatches to the checker/validator/emitter crates, and
//! maps report validity to exit codes.
//!
//! This crate should contain minimal business logic.

pub mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};

/// Entry point used by the `dstok` binary.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Check(args) => commands::check::handle(args),
        Commands::Validate(args) => commands::validate::handle(args),
        Commands::Emit(args) => commands::emit::handle(args),
    }
}

/// Render a top-level error chain for stderr.
pub fn format_error(err: &anyhow::Error) -> String {
    format!("error: {err:#}")
}
