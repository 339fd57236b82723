use std::env;
use std::time::Duration;

use crate::sources::completion::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::types::{MacroSnapshot, MarketSentiment};

/// AI completion service configuration.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Completion API key. Absent means the AI paths use their fallbacks.
    pub api_key: Option<String>,
    /// Model identifier.
    pub model: String,
    /// API root, OpenAI-compatible.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl AiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// News search configuration.
#[derive(Debug, Clone)]
pub struct NewsConfig {
    /// NewsAPI key. Absent means the news-impact endpoint is unavailable.
    pub api_key: Option<String>,
    /// Search query for articles about the asset.
    pub query: String,
    /// Number of articles to classify per request.
    pub page_size: u32,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// SQLite database holding the price history.
    pub database_path: String,
    /// Days of history requested per prediction.
    pub history_days: usize,
    /// Asset name used in prompts.
    pub asset_name: String,
    pub ai: AiConfig,
    pub news: NewsConfig,
    /// Macro snapshot served to the synthesizer.
    pub macro_snapshot: MacroSnapshot,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty values count as unset.
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let parsed = |key: &str| get(key).and_then(|v| v.trim().parse::<f64>().ok());

        Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: get("PORT").and_then(|p| p.parse().ok()).unwrap_or(3001),
            database_path: get("DATABASE_PATH").unwrap_or_else(|| "augur.db".to_string()),
            history_days: get("HISTORY_DAYS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(200),
            asset_name: get("ASSET_NAME").unwrap_or_else(|| "gold".to_string()),
            ai: AiConfig {
                api_key: get("OPENAI_API_KEY"),
                model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
                timeout_secs: get("AI_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            },
            news: NewsConfig {
                api_key: get("NEWS_API_KEY"),
                query: get("NEWS_QUERY").unwrap_or_else(|| "gold price".to_string()),
                page_size: get("NEWS_PAGE_SIZE")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(5),
                timeout_secs: get("NEWS_TIMEOUT_SECS")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            },
            macro_snapshot: MacroSnapshot {
                usd_index: parsed("MACRO_USD_INDEX").unwrap_or(104.5),
                interest_rates: parsed("MACRO_INTEREST_RATES").unwrap_or(5.25),
                inflation: parsed("MACRO_INFLATION").unwrap_or(3.2),
                market_sentiment: get("MACRO_SENTIMENT")
                    .as_deref()
                    .and_then(MarketSentiment::from_str)
                    .unwrap_or_default(),
            },
        }
    }

    /// Address to bind the HTTP server to.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
