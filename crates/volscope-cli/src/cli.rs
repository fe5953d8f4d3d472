//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{AnalyzeArgs, BatchArgs, HvArgs, RangeArgs};

/// Volscope - Options volatility analytics CLI
#[derive(Parser)]
#[command(name = "volscope")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// TOML file with an [analysis] table overriding the analyzer defaults
    #[arg(short, long, global = true, env = "VOLSCOPE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Analyze one ticker's options chain (ATM IV, IV/HV spread, 25-delta skew)
    Analyze(AnalyzeArgs),

    /// Analyze many tickers, reporting unavailable ones inline
    Batch(BatchArgs),

    /// Historical volatility from daily closes
    Hv(HvArgs),

    /// 52-week range rank from daily bars
    Range(RangeArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (just the values)
    Minimal,
}

/// Options shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// Output format
    pub format: OutputFormat,
    /// Suppress headers and summaries
    pub quiet: bool,
    /// Analysis config file
    pub config: Option<&'a std::path::Path>,
}
