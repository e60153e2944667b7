use crate::model::{Asset, ConfigError};
use chrono::NaiveTime;
use chrono_tz::Tz;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct AssetConfig {
    pub id: String,
    pub symbol: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActiveWindow {
    pub start: String,
    pub end: String,
}

impl Default for ActiveWindow {
    fn default() -> Self {
        Self {
            start: "06:00".into(),
            end: "21:30".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub telegram_bot_token: String,
    pub telegram_chat_id: Option<i64>,
    pub news_api_key: Option<String>,
    pub gnews_api_key: Option<String>,
    pub assets: Vec<AssetConfig>,
    pub threshold_percent: f64,
    pub timezone: String,
    pub active_window: ActiveWindow,
    pub lookback_days: u32,
    pub sma_window: usize,
    pub rsi_period: usize,
    pub http_timeout_seconds: u64,
    pub history_timeout_seconds: u64,
    pub max_news_articles: usize,
    pub wake_offset_seconds: u32,
    pub min_wait_seconds: u64,
    pub health_port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            telegram_bot_token: String::new(),
            telegram_chat_id: None,
            news_api_key: None,
            gnews_api_key: None,
            assets: vec![
                AssetConfig { id: "bitcoin".into(), symbol: "BTC".into() },
                AssetConfig { id: "ethereum".into(), symbol: "ETH".into() },
                AssetConfig { id: "ripple".into(), symbol: "XRP".into() },
            ],
            threshold_percent: 3.0,
            timezone: "America/Bogota".into(),
            active_window: ActiveWindow::default(),
            lookback_days: 2,
            sma_window: 20,
            rsi_period: 14,
            http_timeout_seconds: 8,
            history_timeout_seconds: 10,
            max_news_articles: 3,
            wake_offset_seconds: 5,
            min_wait_seconds: 60,
            health_port: 8080,
        }
    }
}

/// Settings that survived validation, in the types the rest of the crate uses.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bot_token: String,
    pub chat_id: i64,
    pub news_api_key: Option<String>,
    pub gnews_api_key: Option<String>,
    pub assets: Vec<Asset>,
    pub threshold_percent: f64,
    pub timezone: Tz,
    pub window_start: NaiveTime,
    pub window_end: NaiveTime,
    pub lookback_days: u32,
    pub sma_window: usize,
    pub rsi_period: usize,
    pub http_timeout_seconds: u64,
    pub history_timeout_seconds: u64,
    pub max_news_articles: usize,
    pub wake_offset_seconds: u32,
    pub min_wait_seconds: u64,
    pub health_port: u16,
}

/// Reads `path` if it exists, then lets the process environment override secrets.
pub fn load_config(path: &str) -> Result<Settings, ConfigError> {
    let mut config = if Path::new(path).exists() {
        let content = fs::read_to_string(path)?;
        serde_json::from_str::<AppConfig>(&content)?
    } else {
        AppConfig::default()
    };
    config.apply_env(|key| std::env::var(key).ok());
    config.validate()
}

impl AppConfig {
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("TOKEN") {
            self.telegram_bot_token = token;
        }
        if let Some(chat_id) = lookup("CHAT_ID").and_then(|v| v.trim().parse().ok()) {
            self.telegram_chat_id = Some(chat_id);
        }
        if let Some(key) = lookup("NEWS_API_KEY") {
            self.news_api_key = Some(key);
        }
        if let Some(key) = lookup("GNEWS_API_KEY") {
            self.gnews_api_key = Some(key);
        }
        if let Some(port) = lookup("PORT").and_then(|v| v.trim().parse().ok()) {
            self.health_port = port;
        }
    }

    pub fn validate(self) -> Result<Settings, ConfigError> {
        if self.telegram_bot_token.trim().is_empty() {
            return Err(ConfigError::Missing("telegram_bot_token / TOKEN"));
        }
        let chat_id = self
            .telegram_chat_id
            .ok_or(ConfigError::Missing("telegram_chat_id / CHAT_ID"))?;

        let timezone: Tz = self
            .timezone
            .parse()
            .map_err(|_| ConfigError::Invalid(format!("unknown timezone '{}'", self.timezone)))?;

        let window_start = parse_hhmm(&self.active_window.start)?;
        let window_end = parse_hhmm(&self.active_window.end)?;
        if window_start > window_end {
            return Err(ConfigError::Invalid(format!(
                "active window start {} is after end {}",
                self.active_window.start, self.active_window.end
            )));
        }

        if self.assets.is_empty() {
            return Err(ConfigError::Invalid("asset list is empty".into()));
        }
        if !(self.threshold_percent.is_finite() && self.threshold_percent > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "threshold_percent must be positive, got {}",
                self.threshold_percent
            )));
        }
        if self.sma_window == 0 || self.rsi_period == 0 || self.lookback_days == 0 {
            return Err(ConfigError::Invalid(
                "sma_window, rsi_period and lookback_days must be non-zero".into(),
            ));
        }

        Ok(Settings {
            bot_token: self.telegram_bot_token,
            chat_id,
            news_api_key: self.news_api_key.filter(|k| !k.trim().is_empty()),
            gnews_api_key: self.gnews_api_key.filter(|k| !k.trim().is_empty()),
            assets: self
                .assets
                .iter()
                .map(|a| Asset::new(&a.id, &a.symbol))
                .collect(),
            threshold_percent: self.threshold_percent,
            timezone,
            window_start,
            window_end,
            lookback_days: self.lookback_days,
            sma_window: self.sma_window,
            rsi_period: self.rsi_period,
            http_timeout_seconds: self.http_timeout_seconds,
            history_timeout_seconds: self.history_timeout_seconds,
            max_news_articles: self.max_news_articles,
            wake_offset_seconds: self.wake_offset_seconds,
            min_wait_seconds: self.min_wait_seconds,
            health_port: self.health_port,
        })
    }
}

fn parse_hhmm(value: &str) -> Result<NaiveTime, ConfigError> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M")
        .map_err(|_| ConfigError::Invalid(format!("expected HH:MM, got '{}'", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_credentials() -> AppConfig {
        AppConfig {
            telegram_bot_token: "123:abc".into(),
            telegram_chat_id: Some(42),
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_defaults_validate_with_credentials() {
        let settings = with_credentials().validate().unwrap();
        assert_eq!(settings.threshold_percent, 3.0);
        assert_eq!(settings.timezone, chrono_tz::America::Bogota);
        assert_eq!(settings.window_start, NaiveTime::from_hms_opt(6, 0, 0).unwrap());
        assert_eq!(settings.window_end, NaiveTime::from_hms_opt(21, 30, 0).unwrap());
        let symbols: Vec<_> = settings.assets.iter().map(|a| a.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["BTC", "ETH", "XRP"]);
    }

    #[test]
    fn test_missing_token_is_fatal() {
        let err = AppConfig::default().validate().unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = AppConfig::default();
        config.apply_env(|key| match key {
            "TOKEN" => Some("env-token".into()),
            "CHAT_ID" => Some(" -1001 ".into()),
            "NEWS_API_KEY" => Some("".into()),
            _ => None,
        });
        let settings = config.validate().unwrap();
        assert_eq!(settings.bot_token, "env-token");
        assert_eq!(settings.chat_id, -1001);
        assert!(settings.news_api_key.is_none());
    }

    #[test]
    fn test_rejects_unknown_timezone_and_inverted_window() {
        let mut config = with_credentials();
        config.timezone = "Mars/Olympus".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = with_credentials();
        config.active_window = ActiveWindow { start: "22:00".into(), end: "06:00".into() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"threshold_percent": 5.0, "assets": [{"id": "solana", "symbol": "sol"}]}"#)
                .unwrap();
        assert_eq!(config.lookback_days, 2);
        let settings = AppConfig {
            telegram_bot_token: "t".into(),
            telegram_chat_id: Some(1),
            ..config
        }
        .validate()
        .unwrap();
        assert_eq!(settings.threshold_percent, 5.0);
        assert_eq!(settings.assets, vec![Asset::new("solana", "SOL")]);
    }
}
