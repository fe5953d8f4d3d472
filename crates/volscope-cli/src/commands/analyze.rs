//! Analyze command implementation.
//!
//! Runs the volatility analyzer on one ticker's chain snapshot.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use volscope_analytics::volatility::VolatilityAnalyzer;
use volscope_core::validation::RawAnalysisRequest;
use volscope_core::{AnalysisResult, Date};

use crate::cli::{Context, OutputFormat};
use crate::commands::{load_analysis_config, parse_date, read_input};
use crate::error::CliError;
use crate::output::{print_header, print_output, print_single, print_warning, KeyValue};

/// Arguments for the analyze command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// JSON request with ticker, stock_price, options_chain and historical_volatility ("-" for stdin)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Reference date for days-to-expiration (YYYY-MM-DD). Overrides the request's as_of; defaults to today.
    #[arg(short, long)]
    pub as_of: Option<String>,
}

/// Execute the analyze command.
pub fn execute(args: AnalyzeArgs, ctx: Context<'_>) -> Result<()> {
    let config = load_analysis_config(ctx.config)?;
    let dp = config.display_decimals;

    let raw: RawAnalysisRequest = serde_json::from_str(&read_input(&args.input)?)?;
    let request = raw
        .validate()
        .map_err(|e| CliError::InvalidInput(e.to_string()))?;

    let as_of = match args.as_of.as_deref() {
        Some(s) => parse_date(s)?,
        None => request.reference_date_or(Date::today()),
    };

    let analyzer = VolatilityAnalyzer::new(config);
    let breakdown = match analyzer.breakdown(
        &request.ticker,
        request.stock_price,
        &request.options_chain,
        request.historical_volatility,
        as_of,
    ) {
        Ok(breakdown) => breakdown,
        Err(e) if e.is_missing_data() => {
            print_warning(&format!("{}: insufficient options data", request.ticker));
            return Err(CliError::Unavailable {
                ticker: request.ticker,
                kind: e.kind(),
                message: e.to_string(),
            }
            .into());
        }
        Err(e) => return Err(CliError::InvalidInput(e.to_string()).into()),
    };

    let result = AnalysisResult::rounded(
        &request.ticker,
        breakdown.atm_iv_percent,
        breakdown.iv_hv_spread_percent,
        breakdown.skew_25_delta,
        dp,
    );

    match ctx.format {
        OutputFormat::Table => {
            let rows = vec![
                KeyValue::new("Ticker", &result.ticker),
                KeyValue::new("Reference Date", as_of.to_string()),
                KeyValue::new("Stock Price", format!("{}", request.stock_price)),
                KeyValue::new(
                    "Expiration",
                    format!("{} ({} DTE)", breakdown.atm_contract.expiration_date, breakdown.dte),
                ),
                KeyValue::new("", ""),
                KeyValue::new(
                    "ATM Contract",
                    format!(
                        "{} {}",
                        breakdown.atm_contract.strike_price, breakdown.atm_contract.contract_type
                    ),
                ),
                KeyValue::from_percent("ATM IV", result.atm_iv_percent, dp),
                KeyValue::from_percent("Historical Volatility", request.historical_volatility, dp),
                KeyValue::new(
                    "IV/HV Spread",
                    format!(
                        "{:.prec$} ({})",
                        result.iv_hv_spread_percent,
                        result.premium_bias().label(),
                        prec = dp as usize
                    ),
                ),
                KeyValue::new("", ""),
                KeyValue::new(
                    "Call Leg",
                    format!(
                        "{} (delta {:.2}, IV {:.2}%)",
                        breakdown.call_contract.strike_price,
                        breakdown.call_contract.delta,
                        breakdown.call_contract.iv_percent()
                    ),
                ),
                KeyValue::new(
                    "Put Leg",
                    format!(
                        "{} (delta {:.2}, IV {:.2}%)",
                        breakdown.put_contract.strike_price,
                        breakdown.put_contract.delta,
                        breakdown.put_contract.iv_percent()
                    ),
                ),
                KeyValue::new(
                    "25-Delta Skew",
                    format!(
                        "{:.prec$} ({})",
                        result.skew_25_delta,
                        result.skew_bias().label(),
                        prec = dp as usize
                    ),
                ),
            ];

            if !ctx.quiet {
                print_header("Volatility Analysis");
            }
            print_output(&rows, ctx.format)?;
        }
        OutputFormat::Json | OutputFormat::Csv => print_single(&result, ctx.format)?,
        OutputFormat::Minimal => {
            println!(
                "{} {} {}",
                result.atm_iv_percent, result.iv_hv_spread_percent, result.skew_25_delta
            );
        }
    }

    Ok(())
}
