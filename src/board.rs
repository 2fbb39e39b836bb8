//! Coin board session
//!
//! A [`MarketBoard`] owns everything one viewing session needs: the record
//! store, the providers, the exchange rate and the user's query state. It
//! runs the periodic refresh on a background task and turns UI events into
//! freshly derived [`BoardView`]s.

use crate::{
    config::BoardConfig,
    constants::{MARKET_FETCH_LIMIT, STALE_THRESHOLD_SECS},
    error::FetchError,
    metrics::{FetchMetrics, FetchStats, Pipeline},
    news::NewsFeed,
    paginate::{derive, filter, total_pages},
    provider::{ExchangeRateProvider, MarketDataProvider},
    providers::{CoinGeckoProvider, ExchangeRateApiProvider},
    rates::{ExchangeRates, RateUpdate},
    store::{RecordSnapshot, RecordStore},
    types::{BoardEvent, ComponentHealth, Currency, HealthStatus, QueryState, UiEvent},
    view::BoardView,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::sleep;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Outcome of one market refresh attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The list was replaced with this many records
    Replaced(usize),
    /// Another fetch was already running; nothing was done
    Skipped,
}

/// State shared between the session and its polling task
struct MarketFeed {
    store: RecordStore,
    provider: Arc<dyn MarketDataProvider>,
    metrics: Arc<FetchMetrics>,
    in_flight: AtomicBool,
    events: broadcast::Sender<BoardEvent>,
    retry_delay: Duration,
}

/// Clears the in-flight flag when the fetch ends, including on cancellation
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl MarketFeed {
    /// Fetches the listing and swaps it into the store
    ///
    /// On failure the store keeps its list and records the error.
    async fn fetch_and_update(&self) -> Result<RefreshOutcome, FetchError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::debug!("Market fetch already in flight, skipping");
            return Ok(RefreshOutcome::Skipped);
        };

        let start = Instant::now();
        match self.provider.fetch_markets(MARKET_FETCH_LIMIT).await {
            Ok(records) => {
                let count = records.len();
                tracing::info!(
                    count = count,
                    provider = self.provider.provider_name(),
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Fetched market listing"
                );
                self.store.replace(records).await;
                self.metrics
                    .record(Pipeline::Market, start.elapsed(), true)
                    .await;
                let _ = self.events.send(BoardEvent::records_replaced(count));
                Ok(RefreshOutcome::Replaced(count))
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    retry_in_secs = self.retry_delay.as_secs(),
                    "Failed to fetch market listing"
                );
                self.metrics
                    .record(Pipeline::Market, start.elapsed(), false)
                    .await;
                let _ = self.events.send(BoardEvent::market_fetch_failed(
                    e.to_string(),
                    self.retry_delay.as_secs(),
                ));
                self.store.record_failure(e.clone()).await;
                Err(e)
            }
        }
    }
}

/// One coin board session
///
/// # Example
/// ```no_run
/// use coin_board_sdk::{BoardConfig, MarketBoard, UiEvent, Currency};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut board = MarketBoard::new(&BoardConfig::from_env())?;
/// board.start();
///
/// let view = board.handle_event(UiEvent::CurrencyChanged(Currency::Vnd)).await;
/// for row in view.rows() {
///     println!("{} {}", row.symbol, row.price);
/// }
/// # Ok(())
/// # }
/// ```
pub struct MarketBoard {
    feed: Arc<MarketFeed>,
    rates: ExchangeRates,
    query: QueryState,
    refresh_interval: Duration,
    poll_task: Option<JoinHandle<()>>,
}

impl MarketBoard {
    /// Creates a session backed by CoinGecko and exchangerate-api.com
    pub fn new(config: &BoardConfig) -> Result<Self, FetchError> {
        let market = CoinGeckoProvider::with_base_url(config.market_api_url.clone())?;
        let rates = ExchangeRateApiProvider::with_base_url(config.exchange_rate_api_url.clone())?;
        Ok(Self::with_providers(Arc::new(market), Arc::new(rates), config))
    }

    /// Creates a session with custom providers
    pub fn with_providers(
        market: Arc<dyn MarketDataProvider>,
        rates: Arc<dyn ExchangeRateProvider>,
        config: &BoardConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let metrics = Arc::new(FetchMetrics::new());

        let feed = Arc::new(MarketFeed {
            store: RecordStore::new(),
            provider: market,
            metrics: metrics.clone(),
            in_flight: AtomicBool::new(false),
            events,
            retry_delay: config.retry_delay,
        });

        Self {
            feed,
            rates: ExchangeRates::with_metrics(rates, metrics),
            query: QueryState::new(config.page_size, config.max_pages),
            refresh_interval: config.refresh_interval,
            poll_task: None,
        }
    }

    /// Starts the refresh loop: one fetch now, then every refresh interval,
    /// or after the shorter retry delay when a fetch fails
    pub fn start(&mut self) {
        if self.poll_task.is_some() {
            return;
        }

        let feed = self.feed.clone();
        let refresh_interval = self.refresh_interval;

        self.poll_task = Some(tokio::spawn(async move {
            tracing::info!(
                refresh_interval_secs = refresh_interval.as_secs(),
                retry_delay_secs = feed.retry_delay.as_secs(),
                "Starting market board refresh loop"
            );

            loop {
                let delay = match feed.fetch_and_update().await {
                    Ok(_) => refresh_interval,
                    Err(_) => feed.retry_delay,
                };
                sleep(delay).await;
            }
        }));
    }

    /// Stops the refresh loop
    pub fn stop(&mut self) {
        if let Some(task) = self.poll_task.take() {
            task.abort();
            tracing::info!("Stopped market board refresh loop");
        }
    }

    pub fn is_running(&self) -> bool {
        self.poll_task.is_some()
    }

    /// Fetches the listing immediately, outside the regular schedule
    ///
    /// Returns `Skipped` when a fetch is already running.
    pub async fn refresh_now(&self) -> Result<RefreshOutcome, FetchError> {
        self.feed.fetch_and_update().await
    }

    /// Applies a UI event and returns the view to draw next
    ///
    /// Only `RetryRequested` hits the market endpoint; a currency change may
    /// refresh the exchange rate.
    pub async fn handle_event(&mut self, event: UiEvent) -> BoardView {
        tracing::debug!(event = ?event, "Handling UI event");

        match event {
            UiEvent::SearchSubmitted(term) => {
                self.query.search_term = term;
                self.query.current_page = 1;
            }
            UiEvent::NextPage => {
                let pages = self.total_pages().await;
                if self.query.current_page < pages {
                    self.query.current_page += 1;
                }
            }
            UiEvent::PreviousPage => {
                if self.query.current_page > 1 {
                    self.query.current_page -= 1;
                }
            }
            UiEvent::CurrencyChanged(currency) => {
                self.set_currency(currency).await;
            }
            UiEvent::RetryRequested => {
                // failures are already recorded in the store and show up in the view
                let _ = self.refresh_now().await;
            }
        }

        self.view().await
    }

    /// Switches display currency, refreshing the rate when it is not USD
    pub async fn set_currency(&mut self, currency: Currency) -> RateUpdate {
        self.query.currency = currency;
        self.query.current_page = 1;

        let update = self.rates.refresh(currency).await;
        if !currency.is_base() {
            let _ = self.feed.events.send(BoardEvent::exchange_rate_updated(
                currency,
                update.rate,
                update.fallback,
            ));
        }
        update
    }

    /// Derives the current view without any network access
    ///
    /// The current page is pulled back into range when the list shrank
    /// since the last draw.
    pub async fn view(&mut self) -> BoardView {
        let snapshot = self.feed.store.snapshot().await;
        self.view_from(&snapshot)
    }

    fn view_from(&mut self, snapshot: &RecordSnapshot) -> BoardView {
        let currency = self.query.currency;

        if !snapshot.has_loaded() {
            let term = self.query.search_term.as_str();
            return match &snapshot.last_error {
                Some(e) => BoardView::fetch_error(currency, term, e.user_message(), e.is_retryable()),
                None => BoardView::loading(currency, term),
            };
        }

        let page = derive(
            &snapshot.records,
            &self.query.search_term,
            self.query.current_page,
            self.query.page_size,
            self.query.max_pages,
        );
        if page.page != self.query.current_page {
            tracing::debug!(
                requested = self.query.current_page,
                clamped = page.page,
                "Current page out of range, clamping"
            );
            self.query.current_page = page.page;
        }

        let mut view = BoardView::from_page(
            page,
            currency,
            self.rates.rate_for(currency),
            &self.query.search_term,
            snapshot.last_updated,
        );
        view.last_error = snapshot.last_error.as_ref().map(|e| e.user_message());
        view
    }

    async fn total_pages(&self) -> usize {
        let records = self.feed.store.records().await;
        let filtered = filter(&records, &self.query.search_term).len();
        total_pages(filtered, self.query.page_size, self.query.max_pages)
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    /// USD to VND multiplier currently in use
    pub fn usd_to_vnd_rate(&self) -> f64 {
        self.rates.rate_for(Currency::Vnd)
    }

    pub fn store(&self) -> &RecordStore {
        &self.feed.store
    }

    /// Shared metrics collector, e.g. for a news feed
    pub fn metrics(&self) -> Arc<FetchMetrics> {
        self.feed.metrics.clone()
    }

    pub async fn market_stats(&self) -> FetchStats {
        self.feed.metrics.stats(Pipeline::Market).await
    }

    /// Subscribes to board events
    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.feed.events.subscribe()
    }

    /// Wires a news feed into this session's metrics and event channel
    pub fn link_news(&self, feed: NewsFeed) -> NewsFeed {
        feed.with_metrics(self.feed.metrics.clone())
            .with_events(self.feed.events.clone())
    }

    /// Health of the market pipeline
    pub async fn health_check(&self) -> ComponentHealth {
        let snapshot = self.feed.store.snapshot().await;
        let stats = self.market_stats().await;
        let age = snapshot.age_secs();

        let mut details = HashMap::new();
        details.insert(
            "records".to_string(),
            serde_json::json!(snapshot.records.len()),
        );
        details.insert(
            "provider_name".to_string(),
            serde_json::json!(self.feed.provider.provider_name()),
        );
        details.insert("age_secs".to_string(), serde_json::json!(age));
        details.insert(
            "consecutive_failures".to_string(),
            serde_json::json!(stats.consecutive_failures),
        );
        details.insert(
            "success_rate".to_string(),
            serde_json::json!(stats.success_rate()),
        );

        let stale = age.is_some_and(|a| a > STALE_THRESHOLD_SECS);
        let status = if !snapshot.has_loaded() {
            HealthStatus::Unhealthy
        } else if snapshot.last_error.is_some() || stale {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        let message = match status {
            HealthStatus::Healthy => "Market board is operational with fresh data".to_string(),
            HealthStatus::Degraded => match &snapshot.last_error {
                Some(e) => format!("Showing last known good data; last fetch failed: {}", e),
                None => format!("Market data is stale ({}s old)", age.unwrap_or_default()),
            },
            HealthStatus::Unhealthy => "Market board has no data".to_string(),
        };

        ComponentHealth {
            name: "market_board".to_string(),
            status,
            message: Some(message),
            details,
            last_checked: chrono::Utc::now(),
        }
    }
}

impl Drop for MarketBoard {
    fn drop(&mut self) {
        self.stop();
    }
}
