//! Command handlers. Each handler reads its inputs, calls into the library
//! crates, prints the report, and maps validity to the process exit code.

pub(crate) mod check;
pub(crate) mod emit;
pub(crate) mod validate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use dstok_contract::NamingContract;
use dstok_report as report;
use dstok_types::CollisionReport;

use crate::cli::ReportFormat;

/// Exit code for a failing report.
const EXIT_FAIL: i32 = 1;

pub(crate) fn load_contract(path: &Option<PathBuf>) -> Result<NamingContract> {
    match path {
        Some(path) => NamingContract::from_file(path)
            .with_context(|| format!("failed to load contract from {}", path.display())),
        None => Ok(NamingContract::default()),
    }
}

/// Print the report and exit non-zero if it is invalid.
pub(crate) fn finish(report_value: &CollisionReport, format: ReportFormat) -> Result<()> {
    match format {
        ReportFormat::Text => print!("{}", report::render_text(report_value)),
        ReportFormat::Json => println!("{}", report::render_json(report_value)),
    }

    if report::exit_code(report_value) != 0 {
        std::process::exit(EXIT_FAIL);
    }
    Ok(())
}
