// Market data and news sources behind async traits.

pub mod traits;
pub mod coinbase;
pub mod coingecko;
pub mod news;
pub mod price;
pub mod history;

pub use coinbase::CoinbaseClient;
pub use coingecko::CoinGeckoClient;
pub use history::HistorySource;
pub use news::{GNewsClient, NewsApiClient, NewsDigest};
pub use price::PriceSource;
pub use traits::{HistoryProvider, NewsProvider, PriceProvider};

use crate::model::ProviderError;

pub(crate) fn valid_price(price: f64) -> Result<f64, ProviderError> {
    if price.is_finite() && price > 0.0 {
        Ok(price)
    } else {
        Err(ProviderError::Malformed(format!("price {} is not positive", price)))
    }
}
