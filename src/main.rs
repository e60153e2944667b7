mod analyzer;
mod chart;
mod config;
mod health;
mod model;
mod notifier;
mod orchestrator;
mod report;
mod scheduler;
mod source;
mod utils;

use chart::PlottersChart;
use config::{Settings, load_config};
use notifier::{MessageSender, TelegramNotifier};
use orchestrator::{AnalysisSettings, Orchestrator};
use reqwest::Client;
use scheduler::Schedule;
use source::{
    CoinGeckoClient, CoinbaseClient, GNewsClient, HistorySource, NewsApiClient, NewsDigest, NewsProvider,
    PriceSource,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    dotenv::dotenv().ok();
    let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.json".to_string());
    let settings = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            std::process::exit(1);
        }
    };

    let client = match Client::builder()
        .user_agent(concat!("coin-pulse/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(settings.http_timeout_seconds))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    let notifier: Arc<dyn MessageSender> = Arc::new(TelegramNotifier::new(
        settings.bot_token.clone(),
        settings.chat_id,
        client.clone(),
    ));
    let orchestrator = build_orchestrator(&settings, client, notifier.clone());

    tokio::spawn(health::serve(settings.health_port));

    info!("Sending startup message...");
    if let Err(e) = notifier.send_text(&report::startup_message(settings.threshold_percent)).await {
        warn!("Startup notification failed: {}", e);
    }

    info!(
        "Watching {} assets, threshold {}%, window {}-{} {}",
        settings.assets.len(),
        settings.threshold_percent,
        settings.window_start.format("%H:%M"),
        settings.window_end.format("%H:%M"),
        settings.timezone.name()
    );

    let schedule = Schedule {
        timezone: settings.timezone,
        window_start: settings.window_start,
        window_end: settings.window_end,
        wake_offset_seconds: settings.wake_offset_seconds,
        min_wait: Duration::from_secs(settings.min_wait_seconds),
    };
    scheduler::run(orchestrator, settings.assets.clone(), schedule).await;
}

/// Wires the concrete providers in their fixed priority order.
fn build_orchestrator(settings: &Settings, client: Client, sender: Arc<dyn MessageSender>) -> Orchestrator {
    let history_timeout = Duration::from_secs(settings.history_timeout_seconds);

    let prices = PriceSource::new(vec![
        Box::new(CoinbaseClient::new(client.clone())),
        Box::new(CoinGeckoClient::new(client.clone(), history_timeout)),
    ]);
    let history = HistorySource::new(Box::new(CoinGeckoClient::new(client.clone(), history_timeout)));

    let mut news_providers: Vec<Box<dyn NewsProvider>> = Vec::new();
    if let Some(key) = &settings.news_api_key {
        news_providers.push(Box::new(NewsApiClient::new(client.clone(), key.clone())));
    }
    if let Some(key) = &settings.gnews_api_key {
        news_providers.push(Box::new(GNewsClient::new(client.clone(), key.clone())));
    }
    if news_providers.is_empty() {
        info!("No news provider configured");
    }

    Orchestrator::new(
        prices,
        history,
        NewsDigest::new(news_providers, settings.max_news_articles),
        sender,
        Box::new(PlottersChart::new(settings.lookback_days)),
        AnalysisSettings {
            threshold_percent: settings.threshold_percent,
            lookback_days: settings.lookback_days,
            sma_window: settings.sma_window,
            rsi_period: settings.rsi_period,
        },
    )
}
