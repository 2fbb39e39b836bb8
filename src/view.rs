//! Presentation-ready views handed to a [`Renderer`](crate::render::Renderer)

use crate::{
    convert::convert,
    paginate::PageView,
    sparkline::{trend_series, SparklineTrend},
    types::{CoinRecord, Currency, NewsArticle},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One coin, formatted for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoinRow {
    /// Chart container key
    pub id: String,
    pub rank: Option<u32>,
    pub name: String,
    pub symbol: String,
    pub image: String,
    pub price: String,
    pub change_24h: f64,
    /// `+1.23%` / `-0.45%`
    pub change_text: String,
    pub change_up: bool,
    pub trend: Vec<f64>,
    pub trend_direction: SparklineTrend,
}

impl CoinRow {
    pub fn from_record(record: &CoinRecord, currency: Currency, rate: f64) -> Self {
        let change = record.change_24h();
        let trend = trend_series(record.sparkline());

        Self {
            id: record.id.clone(),
            rank: record.market_cap_rank,
            name: record.name.clone(),
            symbol: record.symbol.to_uppercase(),
            image: record.image_url().to_string(),
            price: convert(record.price_usd(), currency, rate),
            change_24h: change,
            change_text: format_change(change),
            change_up: change >= 0.0,
            trend: trend.to_vec(),
            trend_direction: SparklineTrend::of(trend),
        }
    }
}

/// Signed percentage with two decimals
pub fn format_change(change: f64) -> String {
    if change >= 0.0 {
        format!("+{:.2}%", change)
    } else {
        format!("{:.2}%", change)
    }
}

/// What the coin list area shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BoardState {
    /// First fetch still pending
    Loading,
    /// No data could be loaded; offer a retry
    FetchError { message: String, retry: bool },
    /// Data is loaded but nothing matches the search
    NoResults,
    Page {
        rows: Vec<CoinRow>,
        page: usize,
        total_pages: usize,
        has_previous: bool,
        has_next: bool,
    },
}

/// Everything needed to draw the coin board once
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardView {
    pub state: BoardState,
    pub currency: Currency,
    pub search_term: String,
    /// Matches before pagination
    pub total_filtered: usize,
    pub last_updated: Option<DateTime<Utc>>,
    /// Set when a refresh failed while older data is still displayed
    pub last_error: Option<String>,
}

impl BoardView {
    /// Builds the view from a derived page and session context
    pub fn from_page(
        page: PageView,
        currency: Currency,
        rate: f64,
        search_term: &str,
        last_updated: Option<DateTime<Utc>>,
    ) -> Self {
        let state = if page.is_empty() {
            BoardState::NoResults
        } else {
            BoardState::Page {
                rows: page
                    .records
                    .iter()
                    .map(|r| CoinRow::from_record(r, currency, rate))
                    .collect(),
                page: page.page,
                total_pages: page.total_pages,
                has_previous: page.has_previous(),
                has_next: page.has_next(),
            }
        };

        Self {
            state,
            currency,
            search_term: search_term.to_string(),
            total_filtered: page.total_filtered,
            last_updated,
            last_error: None,
        }
    }

    /// View shown before any data has arrived
    pub fn loading(currency: Currency, search_term: &str) -> Self {
        Self {
            state: BoardState::Loading,
            currency,
            search_term: search_term.to_string(),
            total_filtered: 0,
            last_updated: None,
            last_error: None,
        }
    }

    /// View shown when nothing could be loaded
    pub fn fetch_error(
        currency: Currency,
        search_term: &str,
        message: impl Into<String>,
        retry: bool,
    ) -> Self {
        Self {
            state: BoardState::FetchError {
                message: message.into(),
                retry,
            },
            currency,
            search_term: search_term.to_string(),
            total_filtered: 0,
            last_updated: None,
            last_error: None,
        }
    }

    pub fn rows(&self) -> &[CoinRow] {
        match &self.state {
            BoardState::Page { rows, .. } => rows,
            _ => &[],
        }
    }

    /// Whether a retry control should be visible
    pub fn shows_retry(&self) -> bool {
        match &self.state {
            BoardState::FetchError { retry, .. } => *retry,
            _ => self.last_error.is_some(),
        }
    }
}

/// One news article, formatted for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub source: String,
    pub published: String,
    pub description: String,
    pub url: String,
}

impl From<&NewsArticle> for NewsItem {
    fn from(article: &NewsArticle) -> Self {
        Self {
            title: article.title.clone(),
            source: article.source_name().to_string(),
            published: article.published_date(),
            description: article.description_or_default().to_string(),
            url: article.url.clone(),
        }
    }
}

/// What the news area shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum NewsView {
    Loading,
    Articles { items: Vec<NewsItem> },
    /// Well-formed response with no articles
    Empty,
    Failed { message: String, retry: bool },
}
