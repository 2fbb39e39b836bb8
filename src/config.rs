//! Runtime configuration
//!
//! Starts from the defaults in `constants` and applies a small set of
//! environment overrides. Unparseable values are ignored with a warning.

use crate::constants::{
    COINGECKO_API_URL, COINS_PER_PAGE, EXCHANGE_RATE_API_URL, MAX_PAGES, NEWS_API_URL,
    REFRESH_INTERVAL_SECS, RETRY_DELAY_SECS,
};
use std::str::FromStr;
use std::time::Duration;

pub const ENV_REFRESH_SECS: &str = "COIN_BOARD_REFRESH_SECS";
pub const ENV_RETRY_SECS: &str = "COIN_BOARD_RETRY_SECS";
pub const ENV_PAGE_SIZE: &str = "COIN_BOARD_PAGE_SIZE";
pub const ENV_MAX_PAGES: &str = "COIN_BOARD_MAX_PAGES";
pub const ENV_NEWS_API_KEY: &str = "NEWS_API_KEY";

/// Settings for a board session and its providers
#[derive(Debug, Clone, PartialEq)]
pub struct BoardConfig {
    pub refresh_interval: Duration,
    pub retry_delay: Duration,
    pub page_size: usize,
    pub max_pages: usize,
    pub market_api_url: String,
    pub exchange_rate_api_url: String,
    pub news_api_url: String,
    pub news_api_key: Option<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(REFRESH_INTERVAL_SECS),
            retry_delay: Duration::from_secs(RETRY_DELAY_SECS),
            page_size: COINS_PER_PAGE,
            max_pages: MAX_PAGES,
            market_api_url: COINGECKO_API_URL.to_string(),
            exchange_rate_api_url: EXCHANGE_RATE_API_URL.to_string(),
            news_api_url: NEWS_API_URL.to_string(),
            news_api_key: None,
        }
    }
}

impl BoardConfig {
    /// Defaults with overrides read from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with overrides read through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(secs) = parse_positive::<u64>(&lookup, ENV_REFRESH_SECS) {
            config.refresh_interval = Duration::from_secs(secs);
            config.retry_delay = Duration::from_secs((secs / 2).max(1));
        }
        if let Some(secs) = parse_positive::<u64>(&lookup, ENV_RETRY_SECS) {
            config.retry_delay = Duration::from_secs(secs);
        }
        if let Some(size) = parse_positive::<usize>(&lookup, ENV_PAGE_SIZE) {
            config.page_size = size;
        }
        if let Some(max) = parse_positive::<usize>(&lookup, ENV_MAX_PAGES) {
            config.max_pages = max;
        }

        config.news_api_key = lookup(ENV_NEWS_API_KEY)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        if config.retry_delay >= config.refresh_interval {
            tracing::warn!(
                retry_secs = config.retry_delay.as_secs(),
                refresh_secs = config.refresh_interval.as_secs(),
                "Retry delay is not shorter than the refresh interval"
            );
        }

        config
    }

    /// Sets the news API key
    pub fn with_news_api_key(mut self, key: impl Into<String>) -> Self {
        self.news_api_key = Some(key.into());
        self
    }
}

fn parse_positive<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: FromStr + PartialOrd + Default + Copy,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Some(value),
        _ => {
            tracing::warn!(key = key, value = %raw, "Ignoring invalid configuration value");
            None
        }
    }
}
