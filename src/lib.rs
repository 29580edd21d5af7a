//! Venue Arb Library
//!
//! Greedy cross-venue arbitrage matching over single-level bid/ask books.
//! The binary in `main.rs` wires configuration, logging and reporting around
//! the matcher exposed here.

pub mod arbitrage;
pub mod config;
pub mod error;
pub mod report;

pub use arbitrage::{find_best_arbitrage, ArbitrageMatcher, MatchOutcome, Quote, QuoteBook, Trade};
pub use error::{MatchError, MatchResult};
