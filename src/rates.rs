//! USD conversion rate kept by a board session

use crate::{
    constants::FALLBACK_USD_TO_VND,
    metrics::{FetchMetrics, Pipeline},
    provider::ExchangeRateProvider,
    types::Currency,
};
use std::sync::Arc;
use std::time::Instant;

/// Result of a rate refresh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateUpdate {
    pub currency: Currency,
    pub rate: f64,
    /// The provider failed and the fallback constant was applied
    pub fallback: bool,
}

/// Current USD to VND multiplier plus the provider used to refresh it
///
/// Refreshing never fails: provider errors are logged and replaced by
/// [`FALLBACK_USD_TO_VND`].
pub struct ExchangeRates {
    provider: Arc<dyn ExchangeRateProvider>,
    metrics: Arc<FetchMetrics>,
    usd_to_vnd: f64,
}

impl ExchangeRates {
    pub fn new(provider: Arc<dyn ExchangeRateProvider>) -> Self {
        Self::with_metrics(provider, Arc::new(FetchMetrics::new()))
    }

    /// Records rate fetches into a shared collector
    pub fn with_metrics(provider: Arc<dyn ExchangeRateProvider>, metrics: Arc<FetchMetrics>) -> Self {
        Self {
            provider,
            metrics,
            usd_to_vnd: FALLBACK_USD_TO_VND,
        }
    }

    /// Multiplier applied to USD prices for `currency`
    pub fn rate_for(&self, currency: Currency) -> f64 {
        match currency {
            Currency::Usd => 1.0,
            Currency::Vnd => self.usd_to_vnd,
        }
    }

    /// Refreshes the rate for `currency`; no-op for the base currency
    pub async fn refresh(&mut self, currency: Currency) -> RateUpdate {
        if currency.is_base() {
            return RateUpdate {
                currency,
                rate: 1.0,
                fallback: false,
            };
        }

        let start = Instant::now();
        let result = self.provider.fetch_rate(currency).await;
        self.metrics
            .record(Pipeline::ExchangeRate, start.elapsed(), result.is_ok())
            .await;

        let (rate, fallback) = match result {
            Ok(rate) => {
                tracing::debug!(
                    currency = %currency,
                    rate = rate,
                    provider = self.provider.provider_name(),
                    "Fetched exchange rate"
                );
                (rate, false)
            }
            Err(e) => {
                tracing::warn!(
                    currency = %currency,
                    error = %e,
                    fallback = FALLBACK_USD_TO_VND,
                    "Exchange rate unavailable, using fallback"
                );
                (FALLBACK_USD_TO_VND, true)
            }
        };

        match currency {
            Currency::Vnd => self.usd_to_vnd = rate,
            Currency::Usd => {}
        }

        RateUpdate {
            currency,
            rate,
            fallback,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::convert;
    use crate::provider::mock::{unavailable, MockRateProvider};

    #[tokio::test]
    async fn test_refresh_uses_provider_rate() {
        let provider = MockRateProvider::new();
        provider.push_rate(25000.0);
        let mut rates = ExchangeRates::new(Arc::new(provider.clone()));

        let update = rates.refresh(Currency::Vnd).await;
        assert_eq!(update.rate, 25000.0);
        assert!(!update.fallback);
        assert_eq!(rates.rate_for(Currency::Vnd), 25000.0);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failure_falls_back() {
        let provider = MockRateProvider::new();
        provider.push_rate(26000.0);
        provider.push_error(unavailable());
        let metrics = Arc::new(FetchMetrics::new());
        let mut rates = ExchangeRates::with_metrics(Arc::new(provider), metrics.clone());

        rates.refresh(Currency::Vnd).await;
        assert_eq!(rates.rate_for(Currency::Vnd), 26000.0);

        let update = rates.refresh(Currency::Vnd).await;
        assert!(update.fallback);
        assert_eq!(rates.rate_for(Currency::Vnd), 24000.0);
        assert_eq!(
            convert(100.0, Currency::Vnd, rates.rate_for(Currency::Vnd)),
            "2.400.000\u{a0}₫"
        );

        let stats = metrics.stats(Pipeline::ExchangeRate).await;
        assert_eq!(stats.total_requests, 2);
        assert_eq!(stats.failed_requests, 1);
    }

    #[tokio::test]
    async fn test_base_currency_never_fetches() {
        let provider = MockRateProvider::new();
        let mut rates = ExchangeRates::new(Arc::new(provider.clone()));

        let update = rates.refresh(Currency::Usd).await;
        assert_eq!(update.rate, 1.0);
        assert_eq!(provider.call_count(), 0);
        assert_eq!(rates.rate_for(Currency::Vnd), FALLBACK_USD_TO_VND);
    }
}
