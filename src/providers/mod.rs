//! Provider implementations for the remote endpoints

pub mod coingecko;
pub mod exchange_rate;
pub mod newsapi;

pub use coingecko::CoinGeckoProvider;
pub use exchange_rate::ExchangeRateApiProvider;
pub use newsapi::NewsApiProvider;
