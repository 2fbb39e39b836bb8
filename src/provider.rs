//! Provider abstractions for the remote endpoints the board reads from

use crate::{
    error::FetchError,
    types::{CoinRecord, Currency, NewsArticle},
};
use async_trait::async_trait;

/// Source of the coin market listing
///
/// Implementations return the list ordered by descending market cap, with
/// 7-day sparkline samples included.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches up to `limit` coin records
    async fn fetch_markets(&self, limit: usize) -> Result<Vec<CoinRecord>, FetchError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}

/// Source of USD conversion rates
#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Fetches how many units of `currency` one USD buys
    async fn fetch_rate(&self, currency: Currency) -> Result<f64, FetchError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}

/// Source of news articles
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Fetches up to `page_size` articles matching `query`
    async fn fetch_articles(
        &self,
        query: &str,
        page_size: usize,
    ) -> Result<Vec<NewsArticle>, FetchError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use reqwest::StatusCode;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Scripted response queue shared by the mock providers
    ///
    /// Responses are consumed in order; the last one is repeated once the
    /// queue is down to a single entry.
    struct Script<T> {
        responses: Mutex<VecDeque<Result<T, FetchError>>>,
        calls: AtomicUsize,
        delay: Mutex<Option<Duration>>,
    }

    impl<T: Clone> Script<T> {
        fn new() -> Self {
            Self {
                responses: Mutex::new(VecDeque::new()),
                calls: AtomicUsize::new(0),
                delay: Mutex::new(None),
            }
        }

        fn push(&self, response: Result<T, FetchError>) {
            self.responses.lock().unwrap().push_back(response);
        }

        async fn next(&self) -> Result<T, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let delay = *self.delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let mut responses = self.responses.lock().unwrap();
            let response = if responses.len() > 1 {
                responses.pop_front()
            } else {
                responses.front().cloned()
            };
            response.unwrap_or_else(|| Err(FetchError::invalid_response("no scripted response")))
        }
    }

    pub fn unavailable() -> FetchError {
        FetchError::http(StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    }

    /// Mock market provider for testing
    #[derive(Clone)]
    pub struct MockMarketProvider {
        script: Arc<Script<Vec<CoinRecord>>>,
    }

    impl Default for MockMarketProvider {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockMarketProvider {
        pub fn new() -> Self {
            Self {
                script: Arc::new(Script::new()),
            }
        }

        pub fn push_records(&self, records: Vec<CoinRecord>) {
            self.script.push(Ok(records));
        }

        pub fn push_error(&self, error: FetchError) {
            self.script.push(Err(error));
        }

        pub fn set_delay(&self, delay: Duration) {
            *self.script.delay.lock().unwrap() = Some(delay);
        }

        pub fn call_count(&self) -> usize {
            self.script.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MarketDataProvider for MockMarketProvider {
        async fn fetch_markets(&self, limit: usize) -> Result<Vec<CoinRecord>, FetchError> {
            let mut records = self.script.next().await?;
            records.truncate(limit);
            Ok(records)
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }

    /// Mock exchange-rate provider for testing
    #[derive(Clone)]
    pub struct MockRateProvider {
        script: Arc<Script<f64>>,
    }

    impl Default for MockRateProvider {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockRateProvider {
        pub fn new() -> Self {
            Self {
                script: Arc::new(Script::new()),
            }
        }

        pub fn push_rate(&self, rate: f64) {
            self.script.push(Ok(rate));
        }

        pub fn push_error(&self, error: FetchError) {
            self.script.push(Err(error));
        }

        pub fn call_count(&self) -> usize {
            self.script.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ExchangeRateProvider for MockRateProvider {
        async fn fetch_rate(&self, _currency: Currency) -> Result<f64, FetchError> {
            self.script.next().await
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }

    /// Mock news provider for testing
    #[derive(Clone)]
    pub struct MockNewsProvider {
        script: Arc<Script<Vec<NewsArticle>>>,
    }

    impl Default for MockNewsProvider {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockNewsProvider {
        pub fn new() -> Self {
            Self {
                script: Arc::new(Script::new()),
            }
        }

        pub fn push_articles(&self, articles: Vec<NewsArticle>) {
            self.script.push(Ok(articles));
        }

        pub fn push_error(&self, error: FetchError) {
            self.script.push(Err(error));
        }

        pub fn call_count(&self) -> usize {
            self.script.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl NewsProvider for MockNewsProvider {
        async fn fetch_articles(
            &self,
            _query: &str,
            page_size: usize,
        ) -> Result<Vec<NewsArticle>, FetchError> {
            let mut articles = self.script.next().await?;
            articles.truncate(page_size);
            Ok(articles)
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }
}
