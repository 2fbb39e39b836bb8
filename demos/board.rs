//! Interactive terminal coin board
//!
//! Commands: `s <term>` search, `n` next page, `p` previous page,
//! `c usd|vnd` change currency, `r` retry, `h` health, `q` quit.
//! An empty line redraws the current view.

use coin_board_sdk::{
    BoardConfig, Currency, MarketBoard, PlainTextRenderer, Renderer, UiEvent,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

fn parse_command(line: &str) -> Option<UiEvent> {
    let line = line.trim();
    let (cmd, arg) = line.split_once(' ').unwrap_or((line, ""));

    match cmd {
        "s" => Some(UiEvent::SearchSubmitted(arg.trim().to_string())),
        "n" => Some(UiEvent::NextPage),
        "p" => Some(UiEvent::PreviousPage),
        "r" => Some(UiEvent::RetryRequested),
        "c" => match arg.parse::<Currency>() {
            Ok(currency) => Some(UiEvent::CurrencyChanged(currency)),
            Err(e) => {
                eprintln!("{}", e);
                None
            }
        },
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("coin_board_sdk=info")),
        )
        .with_target(true)
        .init();

    let config = BoardConfig::from_env();
    let mut board = MarketBoard::new(&config)?;
    let renderer = PlainTextRenderer;

    let mut events = board.subscribe();
    board.start();

    // Wait for the first fetch to land, one way or the other
    if let Ok(event) = events.recv().await {
        tracing::info!(event = %event, "First refresh done");
    }
    print!("{}", renderer.render_board(&board.view().await));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "q" => break,
            "h" => {
                let health = board.health_check().await;
                println!("{}", serde_json::to_string_pretty(&health)?);
                continue;
            }
            "" => {
                print!("{}", renderer.render_board(&board.view().await));
                continue;
            }
            _ => {}
        }

        match parse_command(&line) {
            Some(event) => {
                let view = board.handle_event(event).await;
                print!("{}", renderer.render_board(&view));
            }
            None => println!("s <term> | n | p | c usd|vnd | r | h | q"),
        }
    }

    board.stop();
    Ok(())
}
