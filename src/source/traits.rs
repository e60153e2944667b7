use crate::model::{Article, Asset, PriceSeries, ProviderError};

#[async_trait::async_trait]
pub trait PriceProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch_price(&self, asset: &Asset) -> Result<f64, ProviderError>;
}

#[async_trait::async_trait]
pub trait HistoryProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch_series(&self, asset: &Asset, days: u32) -> Result<PriceSeries, ProviderError>;
}

#[async_trait::async_trait]
pub trait NewsProvider: Send + Sync {
    fn name(&self) -> &str;
    async fn fetch_articles(&self, query: &str, max_count: usize) -> Result<Vec<Article>, ProviderError>;
}
