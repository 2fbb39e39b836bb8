//! CoinGecko market listing provider

use crate::{
    constants::{COINGECKO_API_URL, COINGECKO_MARKETS_ENDPOINT, REQUEST_TIMEOUT_SECS, USER_AGENT},
    error::FetchError,
    provider::MarketDataProvider,
    types::CoinRecord,
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// CoinGecko's `per_page` ceiling for `/coins/markets`
const MAX_PER_PAGE: usize = 250;

/// CoinGecko market data provider
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    /// Creates a new CoinGecko provider against the public API
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(COINGECKO_API_URL)
    }

    /// Creates a provider against a custom base URL (mirror or test server)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::from)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Builds the markets URL: USD quotes, market cap descending, sparkline on
    fn build_url(&self, limit: usize) -> String {
        format!(
            "{}{}?vs_currency=usd&order=market_cap_desc&per_page={}&page=1&sparkline=true",
            self.base_url,
            COINGECKO_MARKETS_ENDPOINT,
            limit.clamp(1, MAX_PER_PAGE)
        )
    }
}

/// Parses a `/coins/markets` body
fn parse_markets(body: &str) -> Result<Vec<CoinRecord>, FetchError> {
    serde_json::from_str(body).map_err(|e| {
        FetchError::invalid_response(format!("Failed to parse CoinGecko markets response: {}", e))
    })
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn fetch_markets(&self, limit: usize) -> Result<Vec<CoinRecord>, FetchError> {
        let url = self.build_url(limit);
        tracing::debug!(url = %url, "Fetching market listing from CoinGecko");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::http(status, body));
        }

        let body = response.text().await?;
        let mut records = parse_markets(&body)?;
        records.truncate(limit);

        tracing::debug!(count = records.len(), "Fetched market listing from CoinGecko");

        Ok(records)
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}
