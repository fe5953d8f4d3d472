//! Range rank command implementation.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::Deserialize;

use volscope_analytics::range::range_rank;
use volscope_core::PriceBar;

use crate::cli::{Context, OutputFormat};
use crate::commands::{load_analysis_config, parse_date, read_csv};
use crate::error::CliError;
use crate::output::{print_header, print_output, print_single, KeyValue};

/// Arguments for the range command.
#[derive(Args, Debug)]
pub struct RangeArgs {
    /// CSV of daily bars with `high`, `low`, `close` and optional `date` columns, oldest first ("-" for stdin)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Bars in the lookback. Defaults to the configured lookback (252).
    #[arg(short, long)]
    pub lookback: Option<usize>,
}

#[derive(Deserialize)]
struct BarRow {
    #[serde(default)]
    date: Option<String>,
    high: f64,
    low: f64,
    close: f64,
}

/// Execute the range command.
pub fn execute(args: RangeArgs, ctx: Context<'_>) -> Result<()> {
    let config = load_analysis_config(ctx.config)?;
    let lookback = args.lookback.unwrap_or(config.range_lookback);
    let dp = config.display_decimals;

    let bars = read_csv::<BarRow>(&args.input)?
        .into_iter()
        .map(|row| {
            let bar = PriceBar::new(row.high, row.low, row.close);
            match row.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
                Some(date) => Ok(bar.on(parse_date(date)?)),
                None => Ok(bar),
            }
        })
        .collect::<Result<Vec<PriceBar>, CliError>>()?;

    let rank = range_rank(&bars, lookback)
        .map_err(|e| CliError::InvalidInput(e.to_string()))?
        .rounded(dp);

    match ctx.format {
        OutputFormat::Table => {
            if !ctx.quiet {
                print_header(&format!("Range Rank ({lookback} bars)"));
            }
            let mut rows = Vec::new();
            if let Some(date) = rank.as_of {
                rows.push(KeyValue::new("As Of", date.to_string()));
            }
            rows.extend([
                KeyValue::from_f64("Last Close", rank.last_close, dp),
                KeyValue::from_f64("High", rank.high_52_week, dp),
                KeyValue::from_f64("Low", rank.low_52_week, dp),
                KeyValue::from_percent("Rank", rank.rank_percent, dp),
            ]);
            print_output(&rows, ctx.format)?;
        }
        OutputFormat::Minimal => println!("{}", rank.rank_percent),
        OutputFormat::Json | OutputFormat::Csv => print_single(&rank, ctx.format)?,
    }

    Ok(())
}
