use crate::analyzer::{compute_indicators, evaluate, find_closest};
use crate::chart::ChartRenderer;
use crate::model::{AnalysisError, AnalysisResult, Asset, IndicatorSeries, PriceSeries};
use crate::notifier::MessageSender;
use crate::report::compose_message;
use crate::source::{HistorySource, NewsDigest, PriceSource};
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchingPrice,
    FetchingHistory,
    LocatingReference,
    Evaluating,
    Composing,
    Delivering,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkipReason {
    #[error("{0}")]
    Analysis(#[from] AnalysisError),
    #[error("change {0:.2}% below threshold")]
    BelowThreshold(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Delivered {
        change_percent: f64,
        text_sent: bool,
        chart_sent: bool,
    },
    Skipped(SkipReason),
}

#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub threshold_percent: f64,
    pub lookback_days: u32,
    pub sma_window: usize,
    pub rsi_period: usize,
}

/// Runs the per-asset pipeline: price, history, reference, decision, then delivery.
pub struct Orchestrator {
    prices: PriceSource,
    history: HistorySource,
    news: NewsDigest,
    sender: Arc<dyn MessageSender>,
    chart: Box<dyn ChartRenderer>,
    settings: AnalysisSettings,
}

impl Orchestrator {
    pub fn new(
        prices: PriceSource,
        history: HistorySource,
        news: NewsDigest,
        sender: Arc<dyn MessageSender>,
        chart: Box<dyn ChartRenderer>,
        settings: AnalysisSettings,
    ) -> Self {
        Self {
            prices,
            history,
            news,
            sender,
            chart,
            settings,
        }
    }

    /// Analyses every asset in declaration order. One asset's failure never stops the rest.
    pub async fn run_cycle(&self, assets: &[Asset], now: DateTime<Tz>) -> Vec<(String, Outcome)> {
        let mut outcomes = Vec::with_capacity(assets.len());
        for asset in assets {
            let outcome = self.analyze_asset(asset, now).await;
            outcomes.push((asset.symbol.clone(), outcome));
        }
        outcomes
    }

    pub async fn analyze_asset(&self, asset: &Asset, now: DateTime<Tz>) -> Outcome {
        let (result, series, indicators) = match self.prepare(asset, now).await {
            Ok(prepared) => prepared,
            Err(reason) => {
                info!("{}: skipped, {}", asset.symbol, reason);
                return Outcome::Skipped(reason);
            }
        };

        debug!("{}: {:?}", asset.symbol, Stage::Composing);
        let news = self.news.digest(&asset.symbol).await;
        let message = compose_message(&result, news);

        debug!("{}: {:?}", asset.symbol, Stage::Delivering);
        let text_sent = match self.sender.send_text(&message).await {
            Ok(()) => true,
            Err(e) => {
                warn!("{}: text delivery failed: {}", asset.symbol, e);
                false
            }
        };
        let chart_sent = self.deliver_chart(&result, &series, &indicators).await;

        if text_sent {
            info!(
                "✅ {} sent, change {:.2}% (reference {})",
                asset.symbol,
                result.change_percent,
                crate::utils::format_usd(result.reference_price)
            );
        }
        Outcome::Delivered {
            change_percent: result.change_percent,
            text_sent,
            chart_sent,
        }
    }

    /// Everything up to and including the notify decision, plus indicators for a positive one.
    async fn prepare(
        &self,
        asset: &Asset,
        now: DateTime<Tz>,
    ) -> Result<(AnalysisResult, PriceSeries, IndicatorSeries), SkipReason> {
        debug!("{}: {:?}", asset.symbol, Stage::FetchingPrice);
        let current_price = self.prices.get_current_price(asset).await?;

        debug!("{}: {:?}", asset.symbol, Stage::FetchingHistory);
        let series = self.history.get_history(asset, self.settings.lookback_days).await;
        if series.is_empty() {
            return Err(AnalysisError::HistoryUnavailable.into());
        }

        debug!("{}: {:?}", asset.symbol, Stage::LocatingReference);
        let target = now.with_timezone(&Utc) - Duration::days(1);
        let reference = find_closest(&series, target).ok_or(AnalysisError::ReferenceNotFound)?;

        debug!("{}: {:?}", asset.symbol, Stage::Evaluating);
        let evaluation = evaluate(current_price, reference.price, self.settings.threshold_percent)?;
        if !evaluation.should_notify {
            return Err(SkipReason::BelowThreshold(evaluation.change_percent));
        }

        let indicators = compute_indicators(&series, self.settings.sma_window, self.settings.rsi_period);
        let result = AnalysisResult {
            asset: asset.clone(),
            current_price,
            reference_price: reference.price,
            change_percent: evaluation.change_percent,
            sma_latest: indicators.latest_sma(),
            rsi_latest: indicators.latest_rsi(),
            timestamp: now,
        };
        Ok((result, series, indicators))
    }

    async fn deliver_chart(&self, result: &AnalysisResult, series: &PriceSeries, indicators: &IndicatorSeries) -> bool {
        let png = match self.chart.render(series, indicators, &result.asset.symbol) {
            Ok(png) => png,
            Err(e) => {
                warn!("{}: chart not rendered, sending text only: {}", result.asset.symbol, e);
                return false;
            }
        };
        let file_name = format!("{}.png", result.asset.symbol.to_lowercase());
        match self.sender.send_image(png, &file_name).await {
            Ok(()) => true,
            Err(e) => {
                warn!("{}: chart delivery failed: {}", result.asset.symbol, e);
                false
            }
        }
    }
}
