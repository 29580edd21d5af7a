//! Arbitrage Matching Module
//! Mission: Turn two venue books into an ordered list of profitable trades
//! Philosophy: Profit is in the spread, fees decide whether it is real

pub mod book_input;
pub mod fees;
pub mod matcher;
pub mod quote;

pub use book_input::{build_book, parse_quote_key, sample_books, BookFile, RawBook};
pub use fees::{
    effective_cost, effective_proceed, profit_per_unit, FeeCalculator, PairEconomics, PricedLeg,
};
pub use matcher::{
    find_best_arbitrage, total_net_profit, ArbitrageMatcher, MatchOutcome, MatcherConfig, Trade,
    TradeLeg,
};
pub use quote::{Quote, QuoteBook, QuoteId, Side};
