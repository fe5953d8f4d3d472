//! Volscope CLI - Command-line interface for options volatility analytics.
//!
//! # Usage
//!
//! ```bash
//! # Analyze one ticker's chain snapshot
//! volscope analyze --input aapl.json --as-of 2025-06-02
//!
//! # Analyze many tickers
//! volscope --format json batch --input universe.json
//!
//! # Historical volatility from a CSV with a `close` column
//! volscope hv --input aapl.csv --window 30
//!
//! # 52-week range rank from a CSV with `high`, `low`, `close` columns
//! volscope range --input spx.csv
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands, Context};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let ctx = Context {
        format: cli.format,
        quiet: cli.quiet,
        config: cli.config.as_deref(),
    };

    // Execute command
    match cli.command {
        Commands::Analyze(args) => commands::analyze::execute(args, ctx)?,
        Commands::Batch(args) => commands::batch::execute(args, ctx)?,
        Commands::Hv(args) => commands::hv::execute(args, ctx)?,
        Commands::Range(args) => commands::range::execute(args, ctx)?,
    }

    Ok(())
}
