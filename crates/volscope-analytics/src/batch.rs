//! Batch analysis over many tickers.
//!
//! A failure for one ticker never aborts the batch: it becomes an
//! [`TickerOutcome::Unavailable`] entry next to the successful results, in
//! input order. With the `parallel` feature the tickers are analyzed on the
//! rayon pool; outcomes are identical either way.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use volscope_core::validation::RawAnalysisRequest;
use volscope_core::{AnalysisRequest, AnalysisResult, Date};

use crate::config::AnalysisConfig;
use crate::error::{AnalyticsError, FailureKind};
use crate::volatility::VolatilityAnalyzer;

/// Why a ticker has no result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisFailure {
    /// Ticker the failure belongs to, when one was supplied.
    pub ticker: Option<String>,
    /// Machine-readable failure code.
    pub error: FailureKind,
    /// Human-readable description.
    pub message: String,
}

impl AnalysisFailure {
    /// Builds a failure record from an analytics error.
    ///
    /// `ticker` is used when the error does not carry one itself.
    #[must_use]
    pub fn from_error(err: &AnalyticsError, ticker: Option<&str>) -> Self {
        Self {
            ticker: err.ticker().or(ticker).map(str::to_string),
            error: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Per-ticker outcome of a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TickerOutcome {
    /// Analysis succeeded.
    #[serde(rename = "ok")]
    Analyzed(AnalysisResult),
    /// Analysis failed; the volatility section is unavailable for this ticker.
    Unavailable(AnalysisFailure),
}

impl TickerOutcome {
    /// Whether the outcome carries a result.
    #[must_use]
    pub fn is_analyzed(&self) -> bool {
        matches!(self, TickerOutcome::Analyzed(_))
    }

    /// Ticker of the outcome.
    #[must_use]
    pub fn ticker(&self) -> Option<&str> {
        match self {
            TickerOutcome::Analyzed(result) => Some(&result.ticker),
            TickerOutcome::Unavailable(failure) => failure.ticker.as_deref(),
        }
    }
}

/// Summary counts for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Requests in the batch.
    pub total: usize,
    /// Tickers analyzed.
    pub succeeded: usize,
    /// Tickers without a result.
    pub failed: usize,
    /// Wall time spent analyzing, in milliseconds.
    pub elapsed_ms: u64,
}

/// Outcomes of a batch, in input order, with summary counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// One outcome per request.
    pub results: Vec<TickerOutcome>,
    /// Summary counts.
    pub stats: BatchStats,
}

impl BatchReport {
    fn new(results: Vec<TickerOutcome>, started: Instant) -> Self {
        let succeeded = results.iter().filter(|o| o.is_analyzed()).count();
        let stats = BatchStats {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            elapsed_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        };
        Self { results, stats }
    }
}

/// Runs the volatility analyzer over many requests.
#[derive(Debug, Clone, Default)]
pub struct BatchAnalyzer {
    analyzer: VolatilityAnalyzer,
}

impl BatchAnalyzer {
    /// Creates a batch analyzer with the given configuration.
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            analyzer: VolatilityAnalyzer::new(config),
        }
    }

    /// Analyzes validated requests. `as_of` applies to requests without one.
    #[must_use]
    pub fn analyze_batch(&self, requests: &[AnalysisRequest], as_of: Date) -> BatchReport {
        let started = Instant::now();
        let inputs: Vec<Result<&AnalysisRequest, AnalysisFailure>> = requests.iter().map(Ok).collect();
        BatchReport::new(self.run(&inputs, as_of), started)
    }

    /// Validates and analyzes wire requests.
    ///
    /// Entries that fail validation become `invalid_input` outcomes; the rest
    /// of the batch is still analyzed.
    #[must_use]
    pub fn analyze_raw_batch(&self, requests: Vec<RawAnalysisRequest>, as_of: Date) -> BatchReport {
        let started = Instant::now();
        let validated: Vec<Result<AnalysisRequest, AnalysisFailure>> = requests
            .into_iter()
            .map(|raw| {
                let hint = raw.ticker_hint().map(str::to_string);
                raw.validate().map_err(|err| {
                    AnalysisFailure::from_error(&AnalyticsError::from(err), hint.as_deref())
                })
            })
            .collect();
        let inputs: Vec<Result<&AnalysisRequest, AnalysisFailure>> = validated
            .iter()
            .map(|v| v.as_ref().map_err(Clone::clone))
            .collect();
        BatchReport::new(self.run(&inputs, as_of), started)
    }

    fn analyze_one(
        &self,
        input: &Result<&AnalysisRequest, AnalysisFailure>,
        as_of: Date,
    ) -> TickerOutcome {
        match input {
            Ok(request) => match self.analyzer.analyze(request, as_of) {
                Ok(result) => TickerOutcome::Analyzed(result),
                Err(err) => {
                    log::info!("{}: volatility unavailable: {err}", request.ticker);
                    TickerOutcome::Unavailable(AnalysisFailure::from_error(
                        &err,
                        Some(&request.ticker),
                    ))
                }
            },
            Err(failure) => TickerOutcome::Unavailable(failure.clone()),
        }
    }

    #[cfg(feature = "parallel")]
    fn run(&self, inputs: &[Result<&AnalysisRequest, AnalysisFailure>], as_of: Date) -> Vec<TickerOutcome> {
        use rayon::prelude::*;

        inputs
            .par_iter()
            .map(|input| self.analyze_one(input, as_of))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn run(&self, inputs: &[Result<&AnalysisRequest, AnalysisFailure>], as_of: Date) -> Vec<TickerOutcome> {
        inputs
            .iter()
            .map(|input| self.analyze_one(input, as_of))
            .collect()
    }
}
