//! Constants for the coin board
//!
//! Defaults for every tunable live here. `BoardConfig` starts from these
//! values and only a handful can be overridden from the environment.

/// How often the market list is refetched (in seconds)
pub const REFRESH_INTERVAL_SECS: u64 = 60;

/// Delay before retrying after a failed market fetch (in seconds)
pub const RETRY_DELAY_SECS: u64 = REFRESH_INTERVAL_SECS / 2;

/// How long before the record list is reported as stale by the health check
pub const STALE_THRESHOLD_SECS: u64 = 300;

/// HTTP request timeout (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Number of coins requested from the market endpoint
pub const MARKET_FETCH_LIMIT: usize = 100;

/// Coins shown per page
pub const COINS_PER_PAGE: usize = 20;

/// Upper bound on the number of pages, whatever the list length
pub const MAX_PAGES: usize = 5;

/// Number of most recent sparkline samples drawn per coin
pub const SPARKLINE_POINTS: usize = 7;

/// USD to VND rate used whenever the exchange endpoint cannot answer
pub const FALLBACK_USD_TO_VND: f64 = 24000.0;

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko endpoint for market listings
pub const COINGECKO_MARKETS_ENDPOINT: &str = "/coins/markets";

/// Latest USD exchange rates
pub const EXCHANGE_RATE_API_URL: &str = "https://api.exchangerate-api.com/v4/latest/USD";

/// NewsAPI base URL
pub const NEWS_API_URL: &str = "https://newsapi.org/v2";

/// NewsAPI endpoint for full-text article search
pub const NEWS_EVERYTHING_ENDPOINT: &str = "/everything";

/// Query sent to the news endpoint
pub const NEWS_QUERY: &str = "cryptocurrency";

/// Articles requested per news fetch
pub const NEWS_PAGE_SIZE: usize = 10;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "coin-board-sdk/0.1.0";
