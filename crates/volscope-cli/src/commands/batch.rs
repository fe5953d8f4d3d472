//! Batch command implementation.
//!
//! Analyzes many tickers; tickers without a result are listed as unavailable
//! instead of failing the run.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use volscope_analytics::batch::{BatchAnalyzer, TickerOutcome};
use volscope_core::validation::RawAnalysisRequest;

use crate::cli::{Context, OutputFormat};
use crate::commands::{load_analysis_config, read_input, reference_date};
use crate::output::{print_header, print_output, print_single, print_success, print_warning};

/// Arguments for the batch command.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// JSON array of analysis requests, or {"requests": [...]} ("-" for stdin)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Reference date for requests without their own as_of (YYYY-MM-DD). Defaults to today.
    #[arg(short, long)]
    pub as_of: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BatchInput {
    List(Vec<RawAnalysisRequest>),
    Wrapped { requests: Vec<RawAnalysisRequest> },
}

impl BatchInput {
    fn into_requests(self) -> Vec<RawAnalysisRequest> {
        match self {
            BatchInput::List(requests) | BatchInput::Wrapped { requests } => requests,
        }
    }
}

/// One table/CSV row per ticker.
#[derive(Debug, Serialize, Tabled)]
struct BatchRow {
    #[tabled(rename = "Ticker")]
    ticker: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "ATM IV %")]
    atm_iv_percent: String,
    #[tabled(rename = "IV-HV")]
    iv_hv_spread_percent: String,
    #[tabled(rename = "Skew 25d")]
    skew_25_delta: String,
    #[tabled(rename = "Note")]
    note: String,
}

impl BatchRow {
    fn from_outcome(outcome: &TickerOutcome, dp: usize) -> Self {
        match outcome {
            TickerOutcome::Analyzed(result) => Self {
                ticker: result.ticker.clone(),
                status: "ok".to_string(),
                atm_iv_percent: format!("{:.dp$}", result.atm_iv_percent),
                iv_hv_spread_percent: format!("{:.dp$}", result.iv_hv_spread_percent),
                skew_25_delta: format!("{:.dp$}", result.skew_25_delta),
                note: format!(
                    "{}, {}",
                    result.premium_bias().label(),
                    result.skew_bias().label()
                ),
            },
            TickerOutcome::Unavailable(failure) => Self {
                ticker: failure.ticker.clone().unwrap_or_else(|| "?".to_string()),
                status: "unavailable".to_string(),
                atm_iv_percent: String::new(),
                iv_hv_spread_percent: String::new(),
                skew_25_delta: String::new(),
                note: failure.error.to_string(),
            },
        }
    }
}

/// Execute the batch command.
pub fn execute(args: BatchArgs, ctx: Context<'_>) -> Result<()> {
    let config = load_analysis_config(ctx.config)?;
    let dp = config.display_decimals as usize;
    let as_of = reference_date(args.as_of.as_deref())?;

    let input: BatchInput = serde_json::from_str(&read_input(&args.input)?)?;
    let report = BatchAnalyzer::new(config).analyze_raw_batch(input.into_requests(), as_of);

    match ctx.format {
        OutputFormat::Json => print_single(&report, ctx.format)?,
        _ => {
            let rows: Vec<BatchRow> = report
                .results
                .iter()
                .map(|outcome| BatchRow::from_outcome(outcome, dp))
                .collect();
            if ctx.format == OutputFormat::Table && !ctx.quiet {
                print_header(&format!("Volatility Analysis ({as_of})"));
            }
            print_output(&rows, ctx.format)?;
        }
    }

    if ctx.format == OutputFormat::Table && !ctx.quiet {
        let summary = format!(
            "{} of {} tickers analyzed in {}ms",
            report.stats.succeeded, report.stats.total, report.stats.elapsed_ms
        );
        if report.stats.failed == 0 {
            print_success(&summary);
        } else {
            print_warning(&format!(
                "{summary}; {} without volatility data",
                report.stats.failed
            ));
        }
    }

    Ok(())
}
