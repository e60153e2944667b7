use crate::model::AnalysisResult;
use crate::utils::format_usd;

const DISCLAIMER: &str = "_This analysis is educational, not financial advice._";

/// Builds the Telegram (Markdown) text for a result that crossed the threshold.
/// Sections whose value is undefined are left out entirely.
pub fn compose_message(result: &AnalysisResult, news: Option<String>) -> String {
    let sections: Vec<Option<String>> = vec![
        Some(format!("📊 *EDUCATIONAL ANALYSIS — {}*", result.asset.symbol)),
        Some(format!(
            "⏱ {} ({})",
            result.timestamp.format("%Y-%m-%d %H:%M:%S"),
            result.timestamp.timezone().name()
        )),
        Some(format!("💵 *Current price:* {}", format_usd(result.current_price))),
        result.sma_latest.map(|sma| {
            let side = if result.current_price > sma { "above" } else { "below" };
            format!("📈 Price {} SMA20 ({})", side, format_usd(sma))
        }),
        result.rsi_latest.map(|rsi| format!("📉 RSI14: {:.2}", rsi)),
        Some(format!(
            "📊 Change vs yesterday same hour: {:.2}%",
            result.change_percent
        )),
        news.filter(|n| !n.is_empty()),
        Some(DISCLAIMER.to_string()),
    ];

    sections.into_iter().flatten().collect::<Vec<_>>().join("\n")
}

pub fn startup_message(threshold_percent: f64) -> String {
    format!(
        "🤖 Crypto Bot started (educational). Notifications only when change ≥{}% vs yesterday same hour.",
        threshold_percent
    )
}
