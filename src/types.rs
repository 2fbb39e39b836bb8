//! Types for the coin board

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::constants::{COINS_PER_PAGE, MAX_PAGES};

/// Display currency for prices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    /// US Dollar, the currency source prices are quoted in
    #[default]
    Usd,
    /// Vietnamese Dong
    Vnd,
}

impl Currency {
    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Vnd => "VND",
        }
    }

    /// True for the currency market prices are already expressed in
    pub fn is_base(&self) -> bool {
        matches!(self, Currency::Usd)
    }

    /// All selectable currencies
    pub fn all() -> &'static [Currency] {
        &[Currency::Usd, Currency::Vnd]
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "usd" => Ok(Currency::Usd),
            "vnd" => Ok(Currency::Vnd),
            other => Err(format!("Unsupported currency: {}", other)),
        }
    }
}

/// Seven day sparkline as returned by the market endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sparkline {
    #[serde(default)]
    pub price: Vec<f64>,
}

/// One coin of the market listing
///
/// Field names follow the CoinGecko `/coins/markets` payload. `id` is stable
/// across refreshes and doubles as the key for per-coin chart containers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinRecord {
    pub id: String,
    pub name: String,
    pub symbol: String,

    #[serde(default)]
    pub market_cap_rank: Option<u32>,

    /// Price in USD
    #[serde(default)]
    pub current_price: Option<f64>,

    /// 24h change in percent
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default, rename = "sparkline_in_7d")]
    pub sparkline_7d: Option<Sparkline>,
}

impl CoinRecord {
    /// Creates a record with only the identifying fields and a price
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        symbol: impl Into<String>,
        price_usd: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            market_cap_rank: None,
            current_price: Some(price_usd),
            price_change_percentage_24h: None,
            image: None,
            sparkline_7d: None,
        }
    }

    /// Price in USD, 0 when the endpoint did not report one
    pub fn price_usd(&self) -> f64 {
        self.current_price.unwrap_or(0.0)
    }

    /// 24h change in percent, 0 when absent
    pub fn change_24h(&self) -> f64 {
        self.price_change_percentage_24h.unwrap_or(0.0)
    }

    /// Icon URL, empty when absent
    pub fn image_url(&self) -> &str {
        self.image.as_deref().unwrap_or("")
    }

    /// Sparkline samples, oldest first; empty when absent
    pub fn sparkline(&self) -> &[f64] {
        self.sparkline_7d
            .as_ref()
            .map(|s| s.price.as_slice())
            .unwrap_or(&[])
    }
}

/// User-controlled view parameters
///
/// Mutated only by [`UiEvent`]s; never touches the record list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryState {
    pub search_term: String,
    /// 1-based
    pub current_page: usize,
    pub currency: Currency,
    pub page_size: usize,
    pub max_pages: usize,
}

impl QueryState {
    /// Creates a query state with the given paging parameters
    pub fn new(page_size: usize, max_pages: usize) -> Self {
        Self {
            search_term: String::new(),
            current_page: 1,
            currency: Currency::Usd,
            page_size,
            max_pages,
        }
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(COINS_PER_PAGE, MAX_PAGES)
    }
}

/// Triggers coming from the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum UiEvent {
    SearchSubmitted(String),
    NextPage,
    PreviousPage,
    CurrencyChanged(Currency),
    RetryRequested,
}

/// Source block of a news article
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleSource {
    #[serde(default)]
    pub name: Option<String>,
}

/// One news article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub source: Option<ArticleSource>,
    pub published_at: DateTime<Utc>,
    pub url: String,
}

impl NewsArticle {
    /// Publisher name, "Unknown" when absent
    pub fn source_name(&self) -> &str {
        self.source
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .unwrap_or("Unknown")
    }

    /// Summary, with a placeholder when absent
    pub fn description_or_default(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or("No description available")
    }

    /// Publication date as `YYYY-MM-DD`
    pub fn published_date(&self) -> String {
        self.published_at.format("%Y-%m-%d").to_string()
    }
}

/// Board events, published on the board's broadcast channel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BoardEvent {
    /// A fetch succeeded and the record list was swapped
    RecordsReplaced {
        id: Uuid,
        count: usize,
        timestamp: DateTime<Utc>,
    },

    /// A market fetch failed; the previous list is still in place
    MarketFetchFailed {
        id: Uuid,
        error_message: String,
        retry_in_secs: u64,
        timestamp: DateTime<Utc>,
    },

    /// The conversion rate for a currency changed
    ExchangeRateUpdated {
        id: Uuid,
        currency: Currency,
        rate: f64,
        fallback: bool,
        timestamp: DateTime<Utc>,
    },

    /// The news pipeline failed
    NewsFetchFailed {
        id: Uuid,
        error_message: String,
        timestamp: DateTime<Utc>,
    },
}

impl BoardEvent {
    pub fn records_replaced(count: usize) -> Self {
        Self::RecordsReplaced {
            id: Uuid::new_v4(),
            count,
            timestamp: Utc::now(),
        }
    }

    pub fn market_fetch_failed(error_message: impl Into<String>, retry_in_secs: u64) -> Self {
        Self::MarketFetchFailed {
            id: Uuid::new_v4(),
            error_message: error_message.into(),
            retry_in_secs,
            timestamp: Utc::now(),
        }
    }

    pub fn exchange_rate_updated(currency: Currency, rate: f64, fallback: bool) -> Self {
        Self::ExchangeRateUpdated {
            id: Uuid::new_v4(),
            currency,
            rate,
            fallback,
            timestamp: Utc::now(),
        }
    }

    pub fn news_fetch_failed(error_message: impl Into<String>) -> Self {
        Self::NewsFetchFailed {
            id: Uuid::new_v4(),
            error_message: error_message.into(),
            timestamp: Utc::now(),
        }
    }

    /// Get the event ID
    pub fn id(&self) -> Uuid {
        match self {
            BoardEvent::RecordsReplaced { id, .. } => *id,
            BoardEvent::MarketFetchFailed { id, .. } => *id,
            BoardEvent::ExchangeRateUpdated { id, .. } => *id,
            BoardEvent::NewsFetchFailed { id, .. } => *id,
        }
    }

    /// Get the event type as string
    pub fn event_type(&self) -> &'static str {
        match self {
            BoardEvent::RecordsReplaced { .. } => "RECORDS_REPLACED",
            BoardEvent::MarketFetchFailed { .. } => "MARKET_FETCH_FAILED",
            BoardEvent::ExchangeRateUpdated { .. } => "EXCHANGE_RATE_UPDATED",
            BoardEvent::NewsFetchFailed { .. } => "NEWS_FETCH_FAILED",
        }
    }
}

impl fmt::Display for BoardEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardEvent::RecordsReplaced { count, .. } => {
                write!(f, "Record list replaced: {} coins", count)
            }
            BoardEvent::MarketFetchFailed {
                error_message,
                retry_in_secs,
                ..
            } => write!(
                f,
                "Market fetch failed: {} (retry in {}s)",
                error_message, retry_in_secs
            ),
            BoardEvent::ExchangeRateUpdated {
                currency,
                rate,
                fallback,
                ..
            } => {
                if *fallback {
                    write!(f, "USD/{} rate = {} (fallback)", currency, rate)
                } else {
                    write!(f, "USD/{} rate = {}", currency, rate)
                }
            }
            BoardEvent::NewsFetchFailed { error_message, .. } => {
                write!(f, "News fetch failed: {}", error_message)
            }
        }
    }
}

/// Overall system health status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    /// Fresh data, last fetch succeeded
    Healthy,
    /// Data is shown but the last fetch failed or it is getting old
    Degraded,
    /// Nothing to show
    Unhealthy,
}

/// Component health information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    pub message: Option<String>,
    pub details: std::collections::HashMap<String, serde_json::Value>,
    pub last_checked: DateTime<Utc>,
}
