// src/config.rs
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::state::DEFAULT_SEEN_CAP;

pub const ENV_CONFIG_PATH: &str = "RELAY_CONFIG_PATH";
pub const ENV_WEBHOOK_URL: &str = "DISCORD_WEBHOOK_URL";
const DEFAULT_CONFIG_PATH: &str = "config/relay.toml";

/// One configured feed: a display name for the announcement footer and the
/// URL to poll. Immutable for the duration of a run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedConfig {
    pub name: String,
    pub url: String,
}

/// Everything a run needs, resolved once at startup. The webhook credential
/// never lives in the config file; it comes from the environment only.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelayConfig {
    pub feeds: Vec<FeedConfig>,
    /// Only announce entries whose title contains one of these,
    /// case-insensitively. Empty means announce everything.
    pub keywords: Vec<String>,
    pub state_path: PathBuf,
    /// Courtesy pause between consecutive deliveries to one channel.
    pub post_delay_ms: u64,
    pub seen_cap: usize,
    pub http_timeout_secs: u64,
    #[serde(skip)]
    pub webhook_url: Option<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            feeds: default_feeds(),
            keywords: Vec::new(),
            state_path: PathBuf::from("state.json"),
            post_delay_ms: 600,
            seen_cap: DEFAULT_SEEN_CAP,
            http_timeout_secs: 20,
            webhook_url: None,
        }
    }
}

impl RelayConfig {
    pub fn post_delay(&self) -> Duration {
        Duration::from_millis(self.post_delay_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parsing relay config")
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        Self::from_toml_str(&content)
    }

    /// Resolve configuration using env var + fallbacks:
    /// 1) $RELAY_CONFIG_PATH (must exist when set)
    /// 2) config/relay.toml
    /// 3) built-in defaults
    /// then pick up the webhook credential from $DISCORD_WEBHOOK_URL.
    pub fn load_default() -> Result<Self> {
        let mut cfg = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else {
            let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
            if fallback.exists() {
                Self::load_from(&fallback)?
            } else {
                Self::default()
            }
        };
        cfg.webhook_url = std::env::var(ENV_WEBHOOK_URL)
            .ok()
            .filter(|s| !s.trim().is_empty());
        Ok(cfg)
    }
}

fn default_feeds() -> Vec<FeedConfig> {
    [
        ("CoinDesk", "https://www.coindesk.com/arc/outboundfeeds/rss/"),
        (
            "Nasdaq - Cryptocurrencies",
            "https://www.nasdaq.com/feed/rssoutbound?category=Cryptocurrencies",
        ),
        ("CryptoNews", "https://cryptonews.com/news/feed/"),
        ("Coinpedia", "https://coinpedia.org/feed/"),
        (
            "Real-time Headlines",
            "https://feeds.content.dowjones.io/public/rss/mw_realtimeheadlines",
        ),
        (
            "Market Pulse",
            "https://feeds.content.dowjones.io/public/rss/mw_marketpulse",
        ),
        (
            "Nasdaq - Stocks",
            "https://www.nasdaq.com/feed/rssoutbound?category=Stocks",
        ),
        ("Bloomberg", "https://feeds.bloomberg.com/markets/news.rss"),
        ("Yahoo! Finance", "https://finance.yahoo.com/news/rss"),
        ("Investing", "https://www.investing.com/rss/news.rss"),
    ]
    .into_iter()
    .map(|(name, url)| FeedConfig {
        name: name.to_string(),
        url: url.to_string(),
    })
    .collect()
}
