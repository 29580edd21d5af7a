//! Quotes and Single-Level Order Books
//! Mission: Hold validated venue quotes with stable identities
//! Philosophy: Validate once at the door, never inside the matching loop

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::Index;

use crate::error::{MatchError, MatchResult};

/// Which side of the book a quote sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Willing to buy: we sell into it
    Bid,
    /// Willing to sell: we buy from it
    Ask,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => write!(f, "bid"),
            Side::Ask => write!(f, "ask"),
        }
    }
}

/// A single price level offered by one venue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    venue: String,
    fee: f64,
    price: f64,
    volume: u64,
}

impl Quote {
    /// Build a quote, rejecting values the matcher cannot reason about
    ///
    /// # Arguments
    /// * `venue` - Venue identifier (non-empty)
    /// * `fee` - Proportional fee, in [0, 1)
    /// * `price` - Unit price, > 0
    /// * `volume` - Available quantity, >= 0
    pub fn new(venue: impl Into<String>, fee: f64, price: f64, volume: i64) -> MatchResult<Self> {
        let venue = venue.into();

        if venue.trim().is_empty() {
            return Err(MatchError::invalid(&venue, "venue must not be empty"));
        }
        if !fee.is_finite() || !(0.0..1.0).contains(&fee) {
            return Err(MatchError::invalid(
                &venue,
                format!("fee {} outside [0, 1)", fee),
            ));
        }
        if !price.is_finite() || price <= 0.0 {
            return Err(MatchError::invalid(
                &venue,
                format!("price {} must be positive", price),
            ));
        }
        let volume = u64::try_from(volume).map_err(|_| {
            MatchError::invalid(&venue, format!("volume {} must not be negative", volume))
        })?;

        Ok(Self {
            venue,
            // collapse -0.0 so identity comparison stays exact
            fee: fee + 0.0,
            price,
            volume,
        })
    }

    pub fn venue(&self) -> &str {
        &self.venue
    }

    pub fn fee(&self) -> f64 {
        self.fee
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn volume(&self) -> u64 {
        self.volume
    }

    pub fn is_live(&self) -> bool {
        self.volume > 0
    }

    /// True when both quotes carry the same (venue, fee, price) identity
    pub fn same_identity(&self, other: &Quote) -> bool {
        self.venue == other.venue && self.fee == other.fee && self.price == other.price
    }

    fn book_order(&self, other: &Quote) -> Ordering {
        self.venue
            .cmp(&other.venue)
            .then_with(|| self.price.total_cmp(&other.price))
            .then_with(|| self.fee.total_cmp(&other.fee))
    }
}

/// Stable index of a quote inside its book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct QuoteId(usize);

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One side of the cross-venue book
///
/// Quotes live in an arena ordered by (venue, price, fee). A `QuoteId` is the
/// arena index and never changes for the lifetime of the book, so the matcher
/// can decrement volumes without re-locating entries by value.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteBook {
    side: Side,
    quotes: Vec<Quote>,
}

impl QuoteBook {
    /// Build a book, rejecting duplicate (venue, fee, price) identities
    pub fn new(side: Side, quotes: impl IntoIterator<Item = Quote>) -> MatchResult<Self> {
        let mut quotes: Vec<Quote> = quotes.into_iter().collect();
        quotes.sort_by(Quote::book_order);

        if let Some(pair) = quotes.windows(2).find(|w| w[0].same_identity(&w[1])) {
            let dup = &pair[0];
            return Err(MatchError::AmbiguousIdentity {
                side,
                venue: dup.venue.clone(),
                fee: dup.fee,
                price: dup.price,
            });
        }

        Ok(Self { side, quotes })
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn get(&self, id: QuoteId) -> Option<&Quote> {
        self.quotes.get(id.0)
    }

    #[cfg(test)]
    pub(crate) fn find(&self, venue: &str, fee: f64, price: f64) -> Option<(QuoteId, &Quote)> {
        self.iter()
            .find(|(_, q)| q.venue == venue && q.fee == fee && q.price == price)
    }

    /// All quotes in deterministic book order
    pub fn iter(&self) -> impl Iterator<Item = (QuoteId, &Quote)> + '_ {
        self.quotes.iter().enumerate().map(|(i, q)| (QuoteId(i), q))
    }

    /// Quotes with volume remaining, in book order
    pub fn live(&self) -> impl Iterator<Item = (QuoteId, &Quote)> + '_ {
        self.iter().filter(|(_, q)| q.is_live())
    }

    /// Sum of remaining volume, widened so any number of `i64::MAX` quotes fits
    pub fn total_volume(&self) -> u128 {
        self.quotes.iter().map(|q| u128::from(q.volume)).sum()
    }

    /// Take `qty` units from a quote, saturating at zero
    pub(crate) fn consume(&mut self, id: QuoteId, qty: u64) {
        if let Some(quote) = self.quotes.get_mut(id.0) {
            quote.volume = quote.volume.saturating_sub(qty);
        }
    }
}

/// Panics on an id minted by a different, shorter book
impl Index<QuoteId> for QuoteBook {
    type Output = Quote;

    fn index(&self, id: QuoteId) -> &Quote {
        &self.quotes[id.0]
    }
}
