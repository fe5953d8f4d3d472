//! Boundary validation of wire records.
//!
//! Chain snapshots arrive as loosely-typed JSON. The `Raw*` records here accept
//! anything shaped roughly right (every field optional, numbers allowed as
//! numeric strings) and [`RawAnalysisRequest::validate`] turns them into typed
//! records or a [`CoreError`] that names the offending key or chain entry.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::{AnalysisRequest, ContractType, Date, OptionContract};

/// A number that may have been sent as a JSON string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    /// A JSON number.
    Number(f64),
    /// A JSON string expected to hold a number.
    Text(String),
}

impl LooseNumber {
    /// Reads the value as `f64`, rejecting unparsable text and non-finite values.
    pub fn to_finite(&self) -> Result<f64, String> {
        let value = match self {
            LooseNumber::Number(n) => *n,
            LooseNumber::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| format!("'{s}' is not a number"))?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(format!("{value} is not finite"))
        }
    }
}

impl From<f64> for LooseNumber {
    fn from(value: f64) -> Self {
        LooseNumber::Number(value)
    }
}

/// An options chain entry as received on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawOptionContract {
    /// Expiration as `YYYY-MM-DD` or an ISO date-time.
    #[serde(default)]
    pub expiration_date: Option<String>,
    /// Strike price.
    #[serde(default)]
    pub strike_price: Option<LooseNumber>,
    /// `call` or `put`, any case.
    #[serde(default)]
    pub contract_type: Option<String>,
    /// Implied volatility as a decimal fraction.
    #[serde(default)]
    pub implied_volatility: Option<LooseNumber>,
    /// Option delta.
    #[serde(default)]
    pub delta: Option<LooseNumber>,
}

impl RawOptionContract {
    /// Validates the entry at position `index` of a chain.
    pub fn validate(self, index: usize) -> CoreResult<OptionContract> {
        let expiration = self
            .expiration_date
            .ok_or_else(|| CoreError::invalid_contract(index, "missing expiration_date"))?;
        let expiration_date = Date::parse_lenient(&expiration)
            .map_err(|e| CoreError::invalid_contract(index, e.to_string()))?;

        let strike_price = required_number(self.strike_price.as_ref(), "strike_price", index)?;
        if strike_price <= 0.0 {
            return Err(CoreError::invalid_contract(
                index,
                format!("strike_price must be positive, got {strike_price}"),
            ));
        }

        let contract_type = self
            .contract_type
            .ok_or_else(|| CoreError::invalid_contract(index, "missing contract_type"))?
            .parse::<ContractType>()
            .map_err(|e| CoreError::invalid_contract(index, e.to_string()))?;

        let implied_volatility =
            required_number(self.implied_volatility.as_ref(), "implied_volatility", index)?;
        if implied_volatility < 0.0 {
            return Err(CoreError::invalid_contract(
                index,
                format!("implied_volatility must be non-negative, got {implied_volatility}"),
            ));
        }

        let delta = required_number(self.delta.as_ref(), "delta", index)?;
        if !(-1.0..=1.0).contains(&delta) {
            return Err(CoreError::invalid_contract(
                index,
                format!("delta must be within [-1, 1], got {delta}"),
            ));
        }

        let contract = OptionContract::new(
            expiration_date,
            strike_price,
            contract_type,
            implied_volatility,
            delta,
        );
        if !contract.has_consistent_delta() {
            log::warn!(
                "options_chain entry {}: {} with delta {} has an inconsistent sign",
                index,
                contract_type,
                delta
            );
        }
        Ok(contract)
    }
}

fn required_number(value: Option<&LooseNumber>, field: &str, index: usize) -> CoreResult<f64> {
    value
        .ok_or_else(|| CoreError::invalid_contract(index, format!("missing {field}")))?
        .to_finite()
        .map_err(|reason| CoreError::invalid_contract(index, format!("{field}: {reason}")))
}

/// A volatility analysis request as received on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAnalysisRequest {
    /// Ticker symbol.
    #[serde(default)]
    pub ticker: Option<String>,
    /// Reference price of the underlying.
    #[serde(default)]
    pub stock_price: Option<LooseNumber>,
    /// Chain entries.
    #[serde(default)]
    pub options_chain: Option<Vec<RawOptionContract>>,
    /// Historical volatility on the percentage scale.
    #[serde(default)]
    pub historical_volatility: Option<LooseNumber>,
    /// Optional reference date (`YYYY-MM-DD`).
    #[serde(default)]
    pub as_of: Option<String>,
}

impl RawAnalysisRequest {
    /// Keys a request must carry.
    pub const REQUIRED_KEYS: [&'static str; 4] = [
        "ticker",
        "stock_price",
        "options_chain",
        "historical_volatility",
    ];

    /// Names of required keys that are absent or null.
    #[must_use]
    pub fn missing_keys(&self) -> Vec<String> {
        let present = [
            self.ticker.is_some(),
            self.stock_price.is_some(),
            self.options_chain.is_some(),
            self.historical_volatility.is_some(),
        ];
        Self::REQUIRED_KEYS
            .iter()
            .zip(present)
            .filter(|(_, is_present)| !is_present)
            .map(|(key, _)| (*key).to_string())
            .collect()
    }

    /// The ticker as sent, for correlating errors with requests.
    #[must_use]
    pub fn ticker_hint(&self) -> Option<&str> {
        self.ticker.as_deref()
    }

    /// Validates every field and chain entry.
    ///
    /// Checks run in a fixed order: required keys, ticker, stock price,
    /// historical volatility, reference date, then chain entries by position.
    /// The first failure is returned.
    pub fn validate(self) -> CoreResult<AnalysisRequest> {
        let missing = self.missing_keys();
        if !missing.is_empty() {
            return Err(CoreError::MissingKeys { keys: missing });
        }

        let ticker = self.ticker.unwrap_or_default().trim().to_string();
        if ticker.is_empty() {
            return Err(CoreError::invalid_field("ticker", "must not be empty"));
        }

        let stock_price = scalar(self.stock_price.as_ref(), "stock_price")?;
        if stock_price <= 0.0 {
            return Err(CoreError::invalid_field(
                "stock_price",
                format!("must be positive, got {stock_price}"),
            ));
        }

        let historical_volatility =
            scalar(self.historical_volatility.as_ref(), "historical_volatility")?;

        let as_of = self.as_of.as_deref().map(Date::parse).transpose()?;

        let options_chain = self
            .options_chain
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, raw)| raw.validate(index))
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(AnalysisRequest {
            ticker,
            stock_price,
            options_chain,
            historical_volatility,
            as_of,
        })
    }
}

fn scalar(value: Option<&LooseNumber>, field: &str) -> CoreResult<f64> {
    value
        .ok_or_else(|| CoreError::MissingKeys {
            keys: vec![field.to_string()],
        })?
        .to_finite()
        .map_err(|reason| CoreError::invalid_field(field, reason))
}

impl From<OptionContract> for RawOptionContract {
    fn from(contract: OptionContract) -> Self {
        Self {
            expiration_date: Some(contract.expiration_date.to_string()),
            strike_price: Some(contract.strike_price.into()),
            contract_type: Some(contract.contract_type.to_string()),
            implied_volatility: Some(contract.implied_volatility.into()),
            delta: Some(contract.delta.into()),
        }
    }
}
