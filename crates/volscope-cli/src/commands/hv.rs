//! Historical volatility command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::{Deserialize, Serialize};

use volscope_analytics::historical::historical_volatility;
use volscope_core::rounding::round_display;

use crate::cli::{Context, OutputFormat};
use crate::commands::{load_analysis_config, read_csv};
use crate::error::CliError;
use crate::output::{print_header, print_output, print_single, KeyValue};

/// Arguments for the hv command.
#[derive(Args, Debug)]
pub struct HvArgs {
    /// CSV of daily prices with a `close` column, oldest first ("-" for stdin)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Return window in trading days. Defaults to the configured window (30).
    #[arg(short, long)]
    pub window: Option<usize>,
}

#[derive(Deserialize)]
struct CloseRow {
    close: f64,
}

#[derive(Serialize)]
struct HvOutput {
    window: usize,
    observations: usize,
    hv_percent: f64,
}

/// Execute the hv command.
pub fn execute(args: HvArgs, ctx: Context<'_>) -> Result<()> {
    let config = load_analysis_config(ctx.config)?;
    let window = args.window.unwrap_or(config.hv_window);

    let closes: Vec<f64> = read_csv::<CloseRow>(&args.input)?
        .into_iter()
        .map(|row| row.close)
        .collect();

    let hv = historical_volatility(&closes, window).map_err(|e| CliError::InvalidInput(e.to_string()))?;
    let output = HvOutput {
        window,
        observations: closes.len(),
        hv_percent: round_display(hv, config.display_decimals),
    };

    match ctx.format {
        OutputFormat::Table => {
            if !ctx.quiet {
                print_header("Historical Volatility");
            }
            let rows = vec![
                KeyValue::new("Window", format!("{} days", output.window)),
                KeyValue::new("Closes", output.observations.to_string()),
                KeyValue::from_percent("Annualized HV", output.hv_percent, config.display_decimals),
            ];
            print_output(&rows, ctx.format)?;
        }
        OutputFormat::Minimal => println!("{}", output.hv_percent),
        OutputFormat::Json | OutputFormat::Csv => print_single(&output, ctx.format)?,
    }

    Ok(())
}
