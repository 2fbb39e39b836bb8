//! Search filtering and pagination over the record list

use crate::types::CoinRecord;

/// One page of filtered records plus the paging metadata needed to draw
/// pagination controls
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub records: Vec<CoinRecord>,
    /// 1-based, already clamped to `1..=total_pages`
    pub page: usize,
    pub total_pages: usize,
    /// Number of records matching the search term, before slicing
    pub total_filtered: usize,
}

impl PageView {
    /// "No results" signal: nothing matched the search
    pub fn is_empty(&self) -> bool {
        self.total_filtered == 0
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Number of pages for `filtered` records, capped at `max_pages`
pub fn total_pages(filtered: usize, page_size: usize, max_pages: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    filtered.div_ceil(page_size).min(max_pages)
}

/// Clamps a requested page into `1..=total_pages`
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Whether `record` matches an already-lowercased search term
fn matches(record: &CoinRecord, term: &str) -> bool {
    record.name.to_lowercase().contains(term) || record.symbol.to_lowercase().contains(term)
}

/// Records matching `search_term` by name or symbol, case-insensitively
pub fn filter<'a>(records: &'a [CoinRecord], search_term: &str) -> Vec<&'a CoinRecord> {
    if search_term.is_empty() {
        return records.iter().collect();
    }

    let term = search_term.to_lowercase();
    records.iter().filter(|r| matches(r, &term)).collect()
}

/// Derives the visible page from the full record list
///
/// Pure and deterministic: the same inputs always yield the same page.
pub fn derive(
    records: &[CoinRecord],
    search_term: &str,
    page: usize,
    page_size: usize,
    max_pages: usize,
) -> PageView {
    let filtered = filter(records, search_term);
    let total_filtered = filtered.len();
    let total_pages = total_pages(total_filtered, page_size, max_pages);
    let page = clamp_page(page, total_pages);

    let start = (page - 1).saturating_mul(page_size);
    let records = filtered
        .into_iter()
        .skip(start)
        .take(page_size)
        .cloned()
        .collect();

    PageView {
        records,
        page,
        total_pages,
        total_filtered,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coins(n: usize) -> Vec<CoinRecord> {
        (0..n)
            .map(|i| {
                CoinRecord::new(
                    format!("coin-{}", i),
                    format!("Coin {}", i),
                    format!("c{}", i),
                    i as f64,
                )
            })
            .collect()
    }

    fn sample() -> Vec<CoinRecord> {
        vec![
            CoinRecord::new("bitcoin", "Bitcoin", "btc", 64000.0),
            CoinRecord::new("ethereum", "Ethereum", "eth", 3200.0),
            CoinRecord::new("wrapped-bitcoin", "Wrapped Bitcoin", "wbtc", 64000.0),
            CoinRecord::new("tether", "Tether", "usdt", 1.0),
            CoinRecord::new("solana", "Solana", "sol", 150.0),
        ]
    }

    #[test]
    fn test_search_is_sound_and_complete() {
        let records = sample();
        for term in ["BTC", "bit", "e", "SoL", "zzz"] {
            let view = derive(&records, term, 1, 100, 5);
            let lower = term.to_lowercase();

            for r in &view.records {
                assert!(
                    r.name.to_lowercase().contains(&lower)
                        || r.symbol.to_lowercase().contains(&lower)
                );
            }

            let ids: Vec<_> = view.records.iter().map(|r| r.id.as_str()).collect();
            for r in &records {
                let hit = r.name.to_lowercase().contains(&lower)
                    || r.symbol.to_lowercase().contains(&lower);
                assert_eq!(hit, ids.contains(&r.id.as_str()), "term {}", term);
            }
        }
    }

    #[test]
    fn test_search_matches_name_or_symbol() {
        let view = derive(&sample(), "BTC", 1, 20, 5);
        let ids: Vec<_> = view.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["bitcoin", "wrapped-bitcoin"]);

        let view = derive(&sample(), "teth", 1, 20, 5);
        assert_eq!(view.records.len(), 1);
        assert_eq!(view.records[0].id, "tether");
    }

    #[test]
    fn test_empty_term_keeps_everything_in_order() {
        let records = sample();
        let view = derive(&records, "", 1, 20, 5);
        assert_eq!(view.records, records);
        assert_eq!(view.total_filtered, 5);
        assert_eq!(view.total_pages, 1);
    }

    #[test]
    fn test_derive_is_idempotent() {
        let records = coins(57);
        let first = derive(&records, "1", 2, 10, 5);
        let second = derive(&records, "1", 2, 10, 5);
        assert_eq!(first, second);
    }

    #[test]
    fn test_page_count_for_45_records() {
        let records = coins(45);
        let view = derive(&records, "", 1, 20, 5);
        assert_eq!(view.total_pages, 3);
        assert!(!view.has_previous());
        assert!(view.has_next());

        let last = derive(&records, "", 3, 20, 5);
        assert_eq!(last.records.len(), 5);
        assert!(!last.has_next());
        assert!(last.has_previous());
    }

    #[test]
    fn test_page_beyond_range_is_clamped() {
        let records = coins(45);
        let view = derive(&records, "", 4, 20, 5);
        assert_eq!(view.page, 3);
        assert_eq!(view.records.first().unwrap().id, "coin-40");

        let view = derive(&records, "", 0, 20, 5);
        assert_eq!(view.page, 1);
    }

    #[test]
    fn test_max_pages_caps_total() {
        let records = coins(100);
        let view = derive(&records, "", 1, 10, 5);
        assert_eq!(view.total_pages, 5);

        let view = derive(&records, "", 9, 10, 5);
        assert_eq!(view.page, 5);
        assert_eq!(view.records[0].id, "coin-40");
    }

    #[test]
    fn test_no_results() {
        let view = derive(&sample(), "dogecoin", 1, 20, 5);
        assert!(view.is_empty());
        assert_eq!(view.total_pages, 0);
        assert_eq!(view.page, 1);
        assert!(view.records.is_empty());
        assert!(!view.has_next());
        assert!(!view.has_previous());
    }

    #[test]
    fn test_zero_page_size() {
        let view = derive(&sample(), "", 1, 0, 5);
        assert!(view.records.is_empty());
        assert_eq!(view.total_pages, 0);
    }

    #[test]
    fn test_unicode_lowercasing() {
        let records = vec![CoinRecord::new("ox", "ÖKO Token", "öko", 1.0)];
        assert_eq!(derive(&records, "öko", 1, 20, 5).records.len(), 1);
        assert_eq!(derive(&records, "ÖKO", 1, 20, 5).records.len(), 1);
    }
}
