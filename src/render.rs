//! Rendering seam and a plain-text renderer for terminals

use crate::{
    sparkline::SparklineTrend,
    view::{BoardState, BoardView, CoinRow, NewsView},
};
use std::fmt::Write;

/// Turns views into output
///
/// Implementations own all markup and chart drawing; the board only hands
/// them fully formatted views.
pub trait Renderer {
    fn render_board(&self, view: &BoardView) -> String;

    fn render_news(&self, view: &NewsView) -> String;
}

const SPARK_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Draws a series as unicode block characters scaled between its min and max
pub fn spark_bar(series: &[f64]) -> String {
    let (min, max) = series
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    let span = max - min;

    series
        .iter()
        .map(|v| {
            if span <= 0.0 || !span.is_finite() {
                SPARK_CHARS[SPARK_CHARS.len() / 2]
            } else {
                let level = ((v - min) / span * (SPARK_CHARS.len() - 1) as f64).round() as usize;
                SPARK_CHARS[level.min(SPARK_CHARS.len() - 1)]
            }
        })
        .collect()
}

/// Fixed-width text renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRenderer;

impl PlainTextRenderer {
    fn render_row(out: &mut String, row: &CoinRow) {
        let rank = row.rank.map(|r| r.to_string()).unwrap_or_default();
        let arrow = match row.trend_direction {
            SparklineTrend::Up => "▲",
            SparklineTrend::Down => "▼",
            SparklineTrend::Flat => " ",
        };
        let _ = writeln!(
            out,
            "{:>4}  {:<24} {:<8} {:>22} {:>9}  {} {}",
            rank,
            truncate(&row.name, 24),
            row.symbol,
            row.price,
            row.change_text,
            spark_bar(&row.trend),
            arrow
        );
    }
}

impl Renderer for PlainTextRenderer {
    fn render_board(&self, view: &BoardView) -> String {
        let mut out = String::new();

        match &view.state {
            BoardState::Loading => out.push_str("Loading market data...\n"),
            BoardState::FetchError { message, retry } => {
                let _ = writeln!(out, "{}", message);
                if *retry {
                    out.push_str("[Retry]\n");
                }
            }
            BoardState::NoResults => out.push_str("No cryptocurrencies found\n"),
            BoardState::Page {
                rows,
                page,
                total_pages,
                has_previous,
                has_next,
            } => {
                for row in rows {
                    Self::render_row(&mut out, row);
                }
                let _ = writeln!(
                    out,
                    "{} Page {} of {} {}",
                    if *has_previous { "<" } else { " " },
                    page,
                    total_pages,
                    if *has_next { ">" } else { " " }
                );
            }
        }

        if let Some(error) = &view.last_error {
            let _ = writeln!(out, "! {} [Retry]", error);
        }
        if let Some(updated) = view.last_updated {
            let _ = writeln!(out, "Last updated: {}", updated.format("%H:%M:%S"));
        }

        out
    }

    fn render_news(&self, view: &NewsView) -> String {
        let mut out = String::new();

        match view {
            NewsView::Loading => out.push_str("Loading news...\n"),
            NewsView::Empty => {
                out.push_str("No crypto news available at the moment. Please check back later.\n")
            }
            NewsView::Failed { message, retry } => {
                let _ = writeln!(out, "Failed to load news: {}", message);
                if *retry {
                    out.push_str("[Retry]\n");
                }
            }
            NewsView::Articles { items } => {
                for item in items {
                    let _ = writeln!(out, "{}", item.title);
                    let _ = writeln!(out, "  {} • {}", item.source, item.published);
                    let _ = writeln!(out, "  {}", item.description);
                    let _ = writeln!(out, "  {}", item.url);
                }
            }
        }

        out
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        t.push('…');
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Currency;
    use crate::view::NewsItem;

    #[test]
    fn test_spark_bar_scaling() {
        assert_eq!(spark_bar(&[1.0, 2.0, 3.0]), "▁▅█");
        assert_eq!(spark_bar(&[5.0, 5.0]), "▅▅");
        assert_eq!(spark_bar(&[]), "");
    }

    #[test]
    fn test_error_and_no_results_differ() {
        let renderer = PlainTextRenderer;
        let error = renderer.render_board(&BoardView::fetch_error(
            Currency::Usd,
            "",
            "Failed to load data.",
            true,
        ));
        let mut no_results = BoardView::loading(Currency::Usd, "zzz");
        no_results.state = BoardState::NoResults;
        let no_results = renderer.render_board(&no_results);

        assert!(error.contains("[Retry]"));
        assert!(no_results.contains("No cryptocurrencies found"));
        assert!(!no_results.contains("[Retry]"));
    }

    #[test]
    fn test_render_news() {
        let renderer = PlainTextRenderer;
        let view = NewsView::Articles {
            items: vec![NewsItem {
                title: "Bitcoin rallies".to_string(),
                source: "Unknown".to_string(),
                published: "2024-03-05".to_string(),
                description: "No description available".to_string(),
                url: "https://a".to_string(),
            }],
        };
        let text = renderer.render_news(&view);
        assert!(text.contains("Bitcoin rallies"));
        assert!(text.contains("Unknown • 2024-03-05"));

        let failed = renderer.render_news(&NewsView::Failed {
            message: "HTTP 500".to_string(),
            retry: true,
        });
        assert!(failed.contains("[Retry]"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Bitcoin", 24), "Bitcoin");
        assert_eq!(truncate("abcdef", 4), "abc…");
    }
}
