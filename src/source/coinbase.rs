// Coinbase Exchange spot ticker, the primary price feed
use crate::model::{Asset, ProviderError};
use crate::source::traits::PriceProvider;
use crate::source::valid_price;
use reqwest::Client;
use serde::Deserialize;

const BASE_URL: &str = "https://api.exchange.coinbase.com";

#[derive(Debug, Deserialize)]
struct Ticker {
    price: Option<String>,
}

pub struct CoinbaseClient {
    client: Client,
    base_url: String,
}

impl CoinbaseClient {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: BASE_URL.to_string(),
        }
    }

    fn build_url(&self, asset: &Asset) -> String {
        format!("{}/products/{}-USD/ticker", self.base_url, asset.symbol.to_uppercase())
    }
}

#[async_trait::async_trait]
impl PriceProvider for CoinbaseClient {
    fn name(&self) -> &str {
        "coinbase"
    }

    async fn fetch_price(&self, asset: &Asset) -> Result<f64, ProviderError> {
        let response = self.client.get(self.build_url(asset)).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::Status(response.status()));
        }
        let ticker: Ticker = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;
        let raw = ticker
            .price
            .ok_or_else(|| ProviderError::Malformed("missing 'price' field".into()))?;
        parse_price(&raw)
    }
}

fn parse_price(raw: &str) -> Result<f64, ProviderError> {
    let price = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| ProviderError::Malformed(format!("price '{}' is not a number", raw)))?;
    valid_price(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_uses_upper_symbol() {
        let client = CoinbaseClient::new(Client::new());
        let asset = Asset { id: "bitcoin".into(), symbol: "btc".into() };
        assert_eq!(
            client.build_url(&asset),
            "https://api.exchange.coinbase.com/products/BTC-USD/ticker"
        );
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("31000.55").unwrap(), 31000.55);
        assert!(parse_price("abc").is_err());
        assert!(parse_price("0").is_err());
    }

    #[test]
    fn test_ticker_without_price() {
        let ticker: Ticker = serde_json::from_str(r#"{"message": "NotFound"}"#).unwrap();
        assert!(ticker.price.is_none());
    }
}
