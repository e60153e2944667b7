use crate::model::{AnalysisError, Asset};
use crate::source::traits::PriceProvider;
use tracing::warn;

/// Current price from an ordered list of providers; the first valid answer wins.
pub struct PriceSource {
    providers: Vec<Box<dyn PriceProvider>>,
}

impl PriceSource {
    pub fn new(providers: Vec<Box<dyn PriceProvider>>) -> Self {
        Self { providers }
    }

    pub async fn get_current_price(&self, asset: &Asset) -> Result<f64, AnalysisError> {
        for provider in &self.providers {
            match provider.fetch_price(asset).await {
                Ok(price) if price.is_finite() && price > 0.0 => return Ok(price),
                Ok(price) => warn!("{}: {} returned unusable price {}", asset.symbol, provider.name(), price),
                Err(e) => warn!("{}: {} price failed: {}", asset.symbol, provider.name(), e),
            }
        }
        Err(AnalysisError::PriceUnavailable)
    }
}
