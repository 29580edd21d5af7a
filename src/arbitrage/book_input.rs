//! Raw book input: "venue-fee" keyed price levels
//!
//! Books arrive as maps from a composite key such as `ex1-0.00024` to a
//! `(price, volume)` pair. The venue is everything before the first '-', the
//! fee everything after it.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::arbitrage::quote::{Quote, QuoteBook, Side};
use crate::error::{MatchError, MatchResult};

/// key -> (price, volume)
pub type RawBook = BTreeMap<String, (f64, i64)>;

/// Split a composite key into (venue, fee)
pub fn parse_quote_key(key: &str) -> MatchResult<(String, f64)> {
    let (venue, fee) = key
        .split_once('-')
        .ok_or_else(|| MatchError::malformed(key, "expected '<venue>-<fee>'"))?;

    if venue.is_empty() {
        return Err(MatchError::malformed(key, "empty venue"));
    }

    let fee: f64 = fee
        .trim()
        .parse()
        .map_err(|e| MatchError::malformed(key, format!("bad fee '{}': {}", fee, e)))?;

    Ok((venue.to_string(), fee))
}

/// Convert a raw keyed map into a validated book
pub fn build_book(side: Side, raw: &RawBook) -> MatchResult<QuoteBook> {
    let quotes = raw
        .iter()
        .map(|(key, &(price, volume))| {
            let (venue, fee) = parse_quote_key(key)?;
            Quote::new(venue, fee, price, volume)
        })
        .collect::<MatchResult<Vec<_>>>()?;

    QuoteBook::new(side, quotes)
}

/// Book document on disk (TOML or JSON)
///
/// ```toml
/// [bids]
/// "ex1-0.00024" = [0.95, 10]
///
/// [asks]
/// "ex1-0.00024" = [0.96, 50]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookFile {
    #[serde(default)]
    pub bids: RawBook,
    #[serde(default)]
    pub asks: RawBook,
}

impl BookFile {
    /// Load from a `.toml` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read book file {}", path.display()))?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let file: Self = match ext.as_deref() {
            Some("toml") => toml::from_str(&contents)
                .with_context(|| format!("Invalid TOML book file {}", path.display()))?,
            Some("json") => serde_json::from_str(&contents)
                .with_context(|| format!("Invalid JSON book file {}", path.display()))?,
            _ => bail!(
                "Unsupported book file extension for {} (expected .toml or .json)",
                path.display()
            ),
        };

        Ok(file)
    }

    /// Validate both sides, returning (bids, asks)
    pub fn into_books(self) -> MatchResult<(QuoteBook, QuoteBook)> {
        let bids = build_book(Side::Bid, &self.bids)?;
        let asks = build_book(Side::Ask, &self.asks)?;
        Ok((bids, asks))
    }
}

/// Five-venue demo book
pub fn sample_book_file() -> BookFile {
    let bids: [(&str, (f64, i64)); 5] = [
        ("ex1-0.00024", (0.95, 10)),
        ("ex2-0.0005", (0.98, 10)),
        ("ex3-0.0002", (1.00, 5)),
        ("ex4-0.00025", (1.02, 4)),
        ("ex5-0", (0.94, 11)),
    ];
    let asks: [(&str, (f64, i64)); 5] = [
        ("ex1-0.00024", (0.96, 50)),
        ("ex2-0.0005", (1.03, 8)),
        ("ex3-0.0002", (1.01, 2)),
        ("ex4-0.00025", (1.04, 5)),
        ("ex5-0", (0.96, 3)),
    ];

    BookFile {
        bids: bids.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        asks: asks.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
    }
}

/// Validated demo books, returned as (bids, asks)
pub fn sample_books() -> MatchResult<(QuoteBook, QuoteBook)> {
    sample_book_file().into_books()
}
