//! # Coin Board SDK
//!
//! A polling coin market board: the top coins by market cap, searchable and
//! paginated, with prices in USD or VND and a 7-point sparkline per coin,
//! plus an independent crypto news list.
//!
//! ## Architecture
//!
//! ```text
//! MarketBoard::start()
//!     ↓
//! Background task (every 60s, 30s after a failure)
//!     ↓
//! MarketDataProvider (CoinGecko)
//!     ↓
//! RecordStore (last known good, swapped wholesale)
//!     ↓
//! paginate::derive + convert + sparkline
//!     ↓
//! BoardView → Renderer
//! ```
//!
//! UI events (search, paging, currency change) re-derive the view from the
//! stored list without refetching. Only an explicit retry hits the market
//! endpoint out of schedule.
//!
//! ## Usage
//!
//! ```no_run
//! use coin_board_sdk::{BoardConfig, MarketBoard, PlainTextRenderer, Renderer, UiEvent};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = BoardConfig::from_env();
//! let mut board = MarketBoard::new(&config)?;
//! board.refresh_now().await?;
//!
//! let view = board
//!     .handle_event(UiEvent::SearchSubmitted("btc".to_string()))
//!     .await;
//! print!("{}", PlainTextRenderer.render_board(&view));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Market fetch failures keep the previous list and surface a retry in the
//! view. Exchange-rate failures fall back to 24000 VND per USD silently.
//! News failures only affect the [`NewsFeed`].

pub mod board;
pub mod config;
pub mod constants;
pub mod convert;
pub mod error;
pub mod metrics;
pub mod news;
pub mod paginate;
pub mod provider;
pub mod providers;
pub mod rates;
pub mod render;
pub mod sparkline;
pub mod store;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use board::{MarketBoard, RefreshOutcome};
pub use config::BoardConfig;
pub use convert::convert;
pub use error::FetchError;
pub use metrics::{FetchMetrics, FetchStats, Pipeline};
pub use news::{NewsFeed, NewsState};
pub use paginate::{derive, PageView};
pub use render::{PlainTextRenderer, Renderer};
pub use types::{
    BoardEvent, CoinRecord, ComponentHealth, Currency, HealthStatus, NewsArticle, QueryState,
    UiEvent,
};
pub use view::{BoardState, BoardView, CoinRow, NewsView};
