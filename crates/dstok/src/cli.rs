//! Clap argument definitions for the `dstok` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use dstok_types::PlatformId;

/// `dstok` — collision-safe design-token validation and emission.
#[derive(Parser, Debug)]
#[command(name = "dstok", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the static collision checkers over generated artifacts and build
    /// config, print a report, and exit non-zero on any error finding.
    Check(CheckArgs),

    /// Validate a token source file: schema, alias resolution, namespace gate.
    Validate(ValidateArgs),

    /// Emit one platform's artifact from a validated token source.
    Emit(EmitArgs),
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Generated stylesheet artifact to scan.
    #[arg(long, value_name = "FILE")]
    pub stylesheet: Option<PathBuf>,

    /// Ports manifest (TOML) mapping documentation-server configs to their
    /// required ports.
    #[arg(long, value_name = "FILE")]
    pub ports: Option<PathBuf>,

    /// Native-bundler configuration file.
    #[arg(long, value_name = "FILE")]
    pub bundler: Option<PathBuf>,

    /// Workspace package manifest. Repeatable.
    #[arg(long = "manifest", value_name = "FILE")]
    pub manifests: Vec<PathBuf>,

    /// Naming-contract file (TOML). Defaults to the built-in `ds` contract.
    #[arg(long, value_name = "FILE")]
    pub contract: Option<PathBuf>,

    /// Report output format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Token source file (JSON).
    pub source: PathBuf,

    /// Naming-contract file (TOML). Defaults to the built-in `ds` contract.
    #[arg(long, value_name = "FILE")]
    pub contract: Option<PathBuf>,

    /// Report output format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

#[derive(Args, Debug)]
pub struct EmitArgs {
    /// Token source file (JSON).
    pub source: PathBuf,

    /// Target platform.
    #[arg(long, value_enum)]
    pub platform: PlatformArg,

    /// Output directory for the emitted artifact.
    #[arg(long, value_name = "DIR")]
    pub out: PathBuf,

    /// Naming-contract file (TOML). Defaults to the built-in `ds` contract.
    #[arg(long, value_name = "FILE")]
    pub contract: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformArg {
    Web,
    Mobile,
    Desktop,
}

impl From<PlatformArg> for PlatformId {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Web => PlatformId::Web,
            PlatformArg::Mobile => PlatformId::Mobile,
            PlatformArg::Desktop => PlatformId::Desktop,
        }
    }
}
