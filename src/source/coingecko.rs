// CoinGecko: fallback spot price and the market chart used as history
use crate::model::{Asset, PricePoint, PriceSeries, ProviderError};
use crate::source::traits::{HistoryProvider, PriceProvider};
use crate::source::valid_price;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

const BASE_URL: &str = "https://api.coingecko.com/api/v3";

#[derive(Debug, Deserialize)]
struct MarketChart {
    #[serde(default)]
    prices: Vec<(f64, f64)>,
}

pub struct CoinGeckoClient {
    client: Client,
    base_url: String,
    history_timeout: Duration,
}

impl CoinGeckoClient {
    pub fn new(client: Client, history_timeout: Duration) -> Self {
        Self {
            client,
            base_url: BASE_URL.to_string(),
            history_timeout,
        }
    }
}

#[async_trait::async_trait]
impl PriceProvider for CoinGeckoClient {
    fn name(&self) -> &str {
        "coingecko"
    }

    async fn fetch_price(&self, asset: &Asset) -> Result<f64, ProviderError> {
        let url = format!("{}/simple/price", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("ids", asset.id.as_str()), ("vs_currencies", "usd")])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status()));
        }
        let body: HashMap<String, HashMap<String, f64>> = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        extract_usd(&body, &asset.id)
    }
}

#[async_trait::async_trait]
impl HistoryProvider for CoinGeckoClient {
    fn name(&self) -> &str {
        "coingecko"
    }

    async fn fetch_series(&self, asset: &Asset, days: u32) -> Result<PriceSeries, ProviderError> {
        let url = format!("{}/coins/{}/market_chart", self.base_url, asset.id);
        let days = days.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("vs_currency", "usd"), ("days", days.as_str())])
            .timeout(self.history_timeout)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status()));
        }
        let chart: MarketChart = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        Ok(to_series(&chart.prices))
    }
}

fn extract_usd(body: &HashMap<String, HashMap<String, f64>>, id: &str) -> Result<f64, ProviderError> {
    let price = body
        .get(id)
        .and_then(|quotes| quotes.get("usd"))
        .copied()
        .ok_or_else(|| ProviderError::Malformed(format!("no usd quote for '{}'", id)))?;
    valid_price(price)
}

/// Millisecond timestamps to UTC instants; rows with an unusable time or price are dropped.
fn to_series(raw: &[(f64, f64)]) -> PriceSeries {
    raw.iter()
        .filter_map(|&(ms, price)| {
            let timestamp = DateTime::<Utc>::from_timestamp_millis(ms as i64)?;
            (price.is_finite() && price > 0.0).then_some(PricePoint { timestamp, price })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_chart_payload() {
        let chart: MarketChart = serde_json::from_str(
            r#"{"prices": [[1709294400000, 61000.5], [1709294700000, 61010.0], [1709295000000, -1]],
                "market_caps": [], "total_volumes": []}"#,
        )
        .unwrap();
        let series = to_series(&chart.prices);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].timestamp.timestamp(), 1_709_294_400);
        assert_eq!(series[1].price, 61010.0);
    }

    #[test]
    fn test_market_chart_without_prices() {
        let chart: MarketChart = serde_json::from_str(r#"{"error": "coin not found"}"#).unwrap();
        assert!(to_series(&chart.prices).is_empty());
    }

    #[test]
    fn test_extract_usd() {
        let body: HashMap<String, HashMap<String, f64>> =
            serde_json::from_str(r#"{"ripple": {"usd": 0.52}}"#).unwrap();
        assert_eq!(extract_usd(&body, "ripple").unwrap(), 0.52);
        assert!(extract_usd(&body, "bitcoin").is_err());
    }
}
