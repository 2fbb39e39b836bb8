//! Crypto news feed
//!
//! Runs independently of the market board: its failures never touch market
//! state and it has its own retry.

use crate::{
    config::BoardConfig,
    constants::{NEWS_PAGE_SIZE, NEWS_QUERY},
    error::FetchError,
    metrics::{FetchMetrics, Pipeline},
    provider::NewsProvider,
    providers::NewsApiProvider,
    types::{BoardEvent, NewsArticle},
    view::{NewsItem, NewsView},
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;

/// Current state of the feed
#[derive(Debug, Clone)]
pub enum NewsState {
    Loading,
    Loaded(Vec<NewsArticle>),
    /// Request succeeded with zero articles
    Empty,
    Failed(FetchError),
}

/// News list with manual retry
pub struct NewsFeed {
    /// `None` when no provider could be built; the feed then stays failed
    provider: Option<Arc<dyn NewsProvider>>,
    metrics: Arc<FetchMetrics>,
    events: Option<broadcast::Sender<BoardEvent>>,
    state: NewsState,
}

impl NewsFeed {
    pub fn new(provider: Arc<dyn NewsProvider>) -> Self {
        Self {
            provider: Some(provider),
            metrics: Arc::new(FetchMetrics::new()),
            events: None,
            state: NewsState::Loading,
        }
    }

    /// A feed that cannot fetch, showing `error` in the news area
    pub fn unavailable(error: FetchError) -> Self {
        Self {
            provider: None,
            metrics: Arc::new(FetchMetrics::new()),
            events: None,
            state: NewsState::Failed(error),
        }
    }

    /// NewsAPI-backed feed, or an unavailable one when the key is missing
    pub fn from_config(config: &BoardConfig) -> Self {
        let api_key = config.news_api_key.clone().unwrap_or_default();
        match NewsApiProvider::with_base_url(config.news_api_url.clone(), api_key) {
            Ok(provider) => Self::new(Arc::new(provider)),
            Err(e) => {
                tracing::warn!(error = %e, "News feed disabled");
                Self::unavailable(e)
            }
        }
    }

    /// Shares a metrics collector, typically the board's
    pub fn with_metrics(mut self, metrics: Arc<FetchMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Publishes fetch failures on a board event channel
    pub fn with_events(mut self, events: broadcast::Sender<BoardEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Fetches the article list and updates the state
    ///
    /// Without a provider the configuration error is kept as is.
    pub async fn refresh(&mut self) -> &NewsState {
        let Some(provider) = self.provider.clone() else {
            tracing::debug!("News feed has no provider, skipping fetch");
            return &self.state;
        };

        let start = Instant::now();
        let result = provider.fetch_articles(NEWS_QUERY, NEWS_PAGE_SIZE).await;
        self.metrics
            .record(Pipeline::News, start.elapsed(), result.is_ok())
            .await;

        self.state = match result {
            Ok(articles) if articles.is_empty() => {
                tracing::info!(provider = provider.provider_name(), "No news articles returned");
                NewsState::Empty
            }
            Ok(articles) => {
                tracing::debug!(count = articles.len(), "Fetched news articles");
                NewsState::Loaded(articles)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch news");
                if let Some(events) = &self.events {
                    let _ = events.send(BoardEvent::news_fetch_failed(e.to_string()));
                }
                NewsState::Failed(e)
            }
        };

        &self.state
    }

    /// Manual retry from the failure view
    pub async fn retry(&mut self) -> &NewsState {
        self.refresh().await
    }

    pub fn state(&self) -> &NewsState {
        &self.state
    }

    /// Display view of the current state
    pub fn view(&self) -> NewsView {
        match &self.state {
            NewsState::Loading => NewsView::Loading,
            NewsState::Empty => NewsView::Empty,
            NewsState::Loaded(articles) => NewsView::Articles {
                items: articles.iter().map(NewsItem::from).collect(),
            },
            NewsState::Failed(e) => NewsView::Failed {
                message: e.user_message(),
                retry: e.is_retryable(),
            },
        }
    }
}
