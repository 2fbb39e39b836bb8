//! exchangerate-api.com rate provider

use crate::{
    constants::{EXCHANGE_RATE_API_URL, REQUEST_TIMEOUT_SECS, USER_AGENT},
    error::FetchError,
    provider::ExchangeRateProvider,
    types::Currency,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// `/v4/latest/USD` response
#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    #[serde(default)]
    rates: HashMap<String, f64>,
}

impl LatestRatesResponse {
    fn rate_for(&self, currency: Currency) -> Result<f64, FetchError> {
        match self.rates.get(currency.code()) {
            Some(rate) if rate.is_finite() && *rate > 0.0 => Ok(*rate),
            Some(rate) => Err(FetchError::invalid_response(format!(
                "Unusable {} rate: {}",
                currency, rate
            ))),
            None => Err(FetchError::invalid_response(format!(
                "No {} rate in response",
                currency
            ))),
        }
    }
}

/// Provider for the latest USD-based exchange rates
pub struct ExchangeRateApiProvider {
    client: Client,
    url: String,
}

impl ExchangeRateApiProvider {
    /// Creates a provider against the public endpoint
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(EXCHANGE_RATE_API_URL)
    }

    /// Creates a provider against a custom URL returning the same payload
    pub fn with_base_url(url: impl Into<String>) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::from)?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ExchangeRateProvider for ExchangeRateApiProvider {
    async fn fetch_rate(&self, currency: Currency) -> Result<f64, FetchError> {
        if currency.is_base() {
            return Ok(1.0);
        }

        tracing::debug!(url = %self.url, currency = %currency, "Fetching exchange rate");

        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::http(status, body));
        }

        let body = response.text().await?;
        let latest: LatestRatesResponse = serde_json::from_str(&body).map_err(|e| {
            FetchError::invalid_response(format!("Failed to parse exchange rates: {}", e))
        })?;

        latest.rate_for(currency)
    }

    fn provider_name(&self) -> &'static str {
        "exchangerate-api"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> LatestRatesResponse {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_reads_vnd_rate() {
        let latest = parse(r#"{"base":"USD","date":"2024-03-05","rates":{"USD":1,"VND":25340.5}}"#);
        assert_eq!(latest.rate_for(Currency::Vnd).unwrap(), 25340.5);
    }

    #[test]
    fn test_missing_vnd_rate() {
        let latest = parse(r#"{"base":"USD","rates":{"USD":1,"EUR":0.92}}"#);
        assert!(latest.rate_for(Currency::Vnd).is_err());

        let latest = parse(r#"{"base":"USD"}"#);
        assert!(latest.rate_for(Currency::Vnd).is_err());
    }

    #[test]
    fn test_zero_rate_rejected() {
        let latest = parse(r#"{"rates":{"VND":0}}"#);
        assert!(latest.rate_for(Currency::Vnd).is_err());
    }

    #[tokio::test]
    async fn test_base_currency_skips_network() {
        let provider = ExchangeRateApiProvider::with_base_url("http://127.0.0.1:1/unused").unwrap();
        assert_eq!(provider.fetch_rate(Currency::Usd).await.unwrap(), 1.0);
    }
}
