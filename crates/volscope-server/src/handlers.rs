//! Request handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use volscope_analytics::batch::{AnalysisFailure, BatchAnalyzer, BatchReport};
use volscope_analytics::historical::historical_volatility;
use volscope_analytics::range::{range_rank, RangeRank};
use volscope_analytics::{AnalysisConfig, AnalyticsError, FailureKind};
use volscope_analytics::volatility::VolatilityAnalyzer;
use volscope_core::rounding::round_display;
use volscope_core::validation::RawAnalysisRequest;
use volscope_core::{AnalysisResult, CoreError, Date, PriceBar};

/// Application state.
pub struct AppState {
    /// Single-ticker analyzer
    pub analyzer: VolatilityAnalyzer,
    /// Batch analyzer sharing the same parameters
    pub batch: BatchAnalyzer,
    /// Analysis parameters
    pub config: AnalysisConfig,
}

impl AppState {
    /// Create state for the given analysis parameters.
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            analyzer: VolatilityAnalyzer::new(config.clone()),
            batch: BatchAnalyzer::new(config.clone()),
            config,
        }
    }
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

/// Health check handler.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "options-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Error response: status code plus a `{ticker, error, message}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: AnalysisFailure,
}

impl ApiError {
    /// 400 with `invalid_input`.
    fn bad_request(ticker: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: AnalysisFailure {
                ticker: ticker.map(str::to_string),
                error: FailureKind::InvalidInput,
                message: message.into(),
            },
        }
    }

    /// Missing-data outcomes are 404, everything else 400.
    fn from_analytics(err: &AnalyticsError, ticker: Option<&str>) -> Self {
        let status = if err.is_missing_data() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::BAD_REQUEST
        };
        Self {
            status,
            body: AnalysisFailure::from_error(err, ticker),
        }
    }

    fn from_core(err: &CoreError, ticker: Option<&str>) -> Self {
        Self::bad_request(ticker, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(None, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Handler result.
pub type ApiResult<T> = Result<Json<T>, ApiError>;

fn parse_as_of(as_of: Option<&str>, ticker: Option<&str>) -> Result<Date, ApiError> {
    match as_of {
        Some(s) => Date::parse(s).map_err(|e| ApiError::from_core(&e, ticker)),
        None => Ok(Date::today()),
    }
}

// =============================================================================
// Volatility analysis
// =============================================================================

/// Analyze one ticker's options chain.
///
/// The reference date is the request's `as_of` when given, else today.
pub async fn analyze_volatility(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<RawAnalysisRequest>, JsonRejection>,
) -> ApiResult<AnalysisResult> {
    let Json(raw) = payload?;
    let hint = raw.ticker_hint().map(str::to_string);

    let request = raw.validate().map_err(|e| {
        warn!("rejected analysis request: {}", e);
        ApiError::from_core(&e, hint.as_deref())
    })?;

    let as_of = request.reference_date_or(Date::today());
    match state.analyzer.analyze(&request, as_of) {
        Ok(result) => {
            info!(
                "{}: ATM IV {}%, IV-HV {}, skew {}",
                result.ticker, result.atm_iv_percent, result.iv_hv_spread_percent, result.skew_25_delta
            );
            Ok(Json(result))
        }
        Err(e) => {
            info!("{}: {}", request.ticker, e);
            Err(ApiError::from_analytics(&e, Some(&request.ticker)))
        }
    }
}

/// Batch analysis request.
#[derive(Debug, Deserialize)]
pub struct BatchAnalysisRequest {
    /// Per-ticker requests.
    pub requests: Vec<RawAnalysisRequest>,
    /// Reference date for requests without their own (YYYY-MM-DD). Defaults to today.
    #[serde(default)]
    pub as_of: Option<String>,
}

/// Analyze many tickers. Per-ticker failures are reported inline.
pub async fn analyze_volatility_batch(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BatchAnalysisRequest>, JsonRejection>,
) -> ApiResult<BatchReport> {
    let Json(request) = payload?;
    let as_of = parse_as_of(request.as_of.as_deref(), None)?;

    let report = state.batch.analyze_raw_batch(request.requests, as_of);
    info!(
        "batch analysis: {} tickers, {} analyzed, {} unavailable in {}ms",
        report.stats.total, report.stats.succeeded, report.stats.failed, report.stats.elapsed_ms
    );
    Ok(Json(report))
}

// =============================================================================
// Price history
// =============================================================================

/// Historical volatility request.
#[derive(Debug, Deserialize)]
pub struct HistoricalVolatilityRequest {
    /// Ticker symbol, echoed back.
    pub ticker: String,
    /// Daily closes, oldest first.
    pub closes: Vec<f64>,
    /// Return window. Defaults to the configured window.
    #[serde(default)]
    pub window: Option<usize>,
}

/// Historical volatility response.
#[derive(Debug, Serialize)]
pub struct HistoricalVolatilityResponse {
    /// Ticker symbol.
    pub ticker: String,
    /// Return window used.
    pub window: usize,
    /// Annualized historical volatility, percent.
    pub hv_percent: f64,
}

/// Compute close-to-close historical volatility.
pub async fn compute_historical_volatility(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<HistoricalVolatilityRequest>, JsonRejection>,
) -> ApiResult<HistoricalVolatilityResponse> {
    let Json(request) = payload?;
    let window = request.window.unwrap_or(state.config.hv_window);

    let hv = historical_volatility(&request.closes, window)
        .map_err(|e| ApiError::from_analytics(&e, Some(&request.ticker)))?;

    Ok(Json(HistoricalVolatilityResponse {
        ticker: request.ticker,
        window,
        hv_percent: round_display(hv, state.config.display_decimals),
    }))
}

/// Index context request.
#[derive(Debug, Deserialize)]
pub struct IndexRequest {
    /// Index symbol, echoed back.
    pub symbol: String,
    /// Daily bars, oldest first.
    pub bars: Vec<PriceBar>,
}

/// Index context response.
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    /// Index symbol.
    pub symbol: String,
    /// Range figures.
    #[serde(flatten)]
    pub range: RangeRank,
}

/// Compute the 52-week range rank of an index.
pub async fn analyze_index(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<IndexRequest>, JsonRejection>,
) -> ApiResult<IndexResponse> {
    let Json(request) = payload?;

    let range = range_rank(&request.bars, state.config.range_lookback)
        .map_err(|e| ApiError::from_analytics(&e, Some(&request.symbol)))?;

    Ok(Json(IndexResponse {
        symbol: request.symbol,
        range: range.rounded(state.config.display_decimals),
    }))
}
