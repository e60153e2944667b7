// Core structs: Asset, PricePoint, AnalysisResult and the error taxonomy
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Canonical id used by CoinGecko (`bitcoin`).
    pub id: String,
    /// Display/ticker symbol used by Coinbase and in messages (`BTC`).
    pub symbol: String,
}

impl Asset {
    pub fn new(id: &str, symbol: &str) -> Self {
        Self {
            id: id.to_string(),
            symbol: symbol.to_uppercase(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// Ascending by timestamp. Duplicate timestamps are kept as delivered.
pub type PriceSeries = Vec<PricePoint>;

/// Indicator values aligned index-by-index with the `PriceSeries` they came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorSeries {
    pub sma: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
}

impl IndicatorSeries {
    pub fn latest_sma(&self) -> Option<f64> {
        self.sma.last().copied().flatten()
    }

    pub fn latest_rsi(&self) -> Option<f64> {
        self.rsi.last().copied().flatten()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub change_percent: f64,
    pub should_notify: bool,
}

#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub asset: Asset,
    pub current_price: f64,
    pub reference_price: f64,
    pub change_percent: f64,
    pub sma_latest: Option<f64>,
    pub rsi_latest: Option<f64>,
    pub timestamp: DateTime<Tz>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub source: String,
    pub url: String,
}

/// Reasons an asset is dropped for the current cycle. None of them is fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("price not available from any provider")]
    PriceUnavailable,
    #[error("history not available")]
    HistoryUnavailable,
    #[error("no reference point for yesterday at this hour")]
    ReferenceNotFound,
    #[error("invalid reference price {0}")]
    InvalidReference(f64),
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("api error: {0}")]
    ApiError(String),
    #[error("telegram unreachable")]
    Unreachable,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("not enough data to draw a chart ({0} points)")]
    NotEnoughData(usize),
    #[error("drawing failed: {0}")]
    Drawing(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("missing required setting: {0}")]
    Missing(&'static str),
    #[error("invalid setting: {0}")]
    Invalid(String),
}
