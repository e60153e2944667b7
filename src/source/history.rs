use crate::model::{Asset, PriceSeries};
use crate::source::traits::HistoryProvider;
use tracing::warn;

/// Recent price history. Any failure is reported as an empty series.
pub struct HistorySource {
    provider: Box<dyn HistoryProvider>,
}

impl HistorySource {
    pub fn new(provider: Box<dyn HistoryProvider>) -> Self {
        Self { provider }
    }

    pub async fn get_history(&self, asset: &Asset, lookback_days: u32) -> PriceSeries {
        match self.provider.fetch_series(asset, lookback_days).await {
            Ok(mut series) => {
                // stable: equal timestamps keep provider order
                series.sort_by_key(|p| p.timestamp);
                series
            }
            Err(e) => {
                warn!("{}: history from {} failed: {}", asset.symbol, self.provider.name(), e);
                PriceSeries::new()
            }
        }
    }
}
