use crate::aliases::AcquirerAliases;
use crate::types::{Result, WatchError};
use serde::Deserialize;
use std::path::Path;
use url::Url;

/// Process-wide configuration, constructed once at startup and passed down.
/// Nothing in the pipeline reads ambient/global state.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    /// Syndication feed URLs to poll.
    pub feeds: Vec<String>,
    /// Tracked acquirers and their textual aliases. Must be non-empty.
    pub acquirers: Vec<AcquirerAliases>,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    /// Detected USD deals below this amount are dropped. Amounts in other
    /// currencies are never filtered (no conversion is attempted).
    #[serde(default)]
    pub min_amount_usd: Option<f64>,
    #[serde(default = "default_match_threshold")]
    pub acquirer_match_threshold: u8,
    /// A target candidate this similar to the acquirer name is rejected.
    #[serde(default = "default_match_threshold")]
    pub target_reject_threshold: u8,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_seconds")]
    pub retry_delay_seconds: u64,
    #[serde(default = "default_max_concurrent_feeds")]
    pub max_concurrent_feeds: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout_seconds(),
            max_retries: default_max_retries(),
            retry_delay_seconds: default_retry_delay_seconds(),
            max_concurrent_feeds: default_max_concurrent_feeds(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    pub token: String,
    pub chat_id: String,
    /// Minimum gap between two delivered messages; extra sends inside the
    /// window are silently swallowed so a busy feed cannot spam the chat.
    #[serde(default = "default_min_send_gap_secs")]
    pub min_send_gap_secs: u64,
}

impl WatchConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: WatchConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.feeds.is_empty() {
            return Err(WatchError::Config("no feeds configured".to_string()));
        }
        for feed in &self.feeds {
            Url::parse(feed)?;
        }
        if self.acquirers.is_empty() {
            return Err(WatchError::Config("acquirer alias list is empty".to_string()));
        }
        if self.acquirer_match_threshold > 100 || self.target_reject_threshold > 100 {
            return Err(WatchError::Config(
                "match thresholds are scores in 0-100".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_database_url() -> String {
    "sqlite://mna_watch.db".to_string()
}

fn default_match_threshold() -> u8 {
    90
}

fn default_user_agent() -> String {
    "mna-watch/0.1".to_string()
}

fn default_timeout_seconds() -> u64 {
    20
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_delay_seconds() -> u64 {
    2
}

fn default_max_concurrent_feeds() -> usize {
    4
}

fn default_min_send_gap_secs() -> u64 {
    600
}
