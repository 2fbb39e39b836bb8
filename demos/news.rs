//! Fetches and prints the crypto news list
//!
//! Needs `NEWS_API_KEY`; without it the news area shows the configuration
//! error and no retry is attempted.

use coin_board_sdk::{BoardConfig, NewsFeed, NewsState, PlainTextRenderer, Renderer};
use std::time::Duration;
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

const MAX_ATTEMPTS: u32 = 3;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("coin_board_sdk=info")),
        )
        .init();

    let config = BoardConfig::from_env();
    let mut feed = NewsFeed::from_config(&config);
    let renderer = PlainTextRenderer;

    feed.refresh().await;
    for attempt in 2..=MAX_ATTEMPTS {
        match feed.state() {
            NewsState::Failed(e) if e.is_retryable() => {}
            _ => break,
        }
        print!("{}", renderer.render_news(&feed.view()));
        println!("Retrying ({}/{})...", attempt, MAX_ATTEMPTS);
        sleep(Duration::from_secs(2)).await;
        feed.retry().await;
    }

    print!("{}", renderer.render_news(&feed.view()));
    Ok(())
}
