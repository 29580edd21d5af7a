//! Domain errors raised while building order books.
//!
//! The matcher itself never fails: every variant here is produced before a
//! matching run starts.

use thiserror::Error;

use crate::arbitrage::quote::Side;

#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum MatchError {
    /// Quote fields outside their valid domain
    #[error("Invalid quote from venue '{venue}': {reason}")]
    InvalidQuote { venue: String, reason: String },

    /// Two quotes on one side share (venue, fee, price)
    #[error("Ambiguous {side} quote identity: venue '{venue}', fee {fee}, price {price}")]
    AmbiguousIdentity {
        side: Side,
        venue: String,
        fee: f64,
        price: f64,
    },

    /// Composite "venue-fee" key that cannot be parsed
    #[error("Malformed quote key '{key}': {reason}")]
    MalformedKey { key: String, reason: String },
}

impl MatchError {
    pub(crate) fn invalid(venue: &str, reason: impl Into<String>) -> Self {
        MatchError::InvalidQuote {
            venue: venue.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(key: &str, reason: impl Into<String>) -> Self {
        MatchError::MalformedKey {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

pub type MatchResult<T> = std::result::Result<T, MatchError>;
