//! Run Report Generation
//!
//! Renders order books and executed trades for the console, or bundles the
//! whole run as JSON.

use serde::Serialize;

use crate::arbitrage::{MatchOutcome, PairEconomics, QuoteBook, Trade};

/// Render one side of the book under a label
pub fn render_order_book(book: &QuoteBook, label: &str) -> String {
    let mut out = format!("\n{}:\n", label);
    for (_, quote) in book.iter() {
        out.push_str(&format!(
            "  {} -> price: {:.8}, fee: {:.8}, volume: {}\n",
            quote.venue(),
            quote.price(),
            quote.fee(),
            quote.volume()
        ));
    }
    out
}

/// Render the trade sequence followed by the running total
pub fn render_trades(trades: &[Trade]) -> String {
    let mut out = String::from("\nExecuted Arbitrage Trades:\n");
    let mut total_profit = 0.0;

    for t in trades {
        out.push_str(&format!(
            " Buy from {} @ {:.8} (fee={:.8}), sell to {} @ {:.8} (fee={:.8}), vol={}, ppu={:.8}, net={:.8}\n",
            t.buy.venue,
            t.buy.price,
            t.buy.fee,
            t.sell.venue,
            t.sell.price,
            t.sell.fee,
            t.quantity,
            t.profit_per_unit,
            t.net_profit
        ));
        total_profit += t.net_profit;
    }

    out.push_str(&format!("\nTotal Net Profit: {:.8}\n", total_profit));
    out
}

/// One executed trade with its fee breakdown
#[derive(Debug, Clone, Serialize)]
pub struct TradeReport {
    #[serde(flatten)]
    pub trade: Trade,
    pub economics: PairEconomics,
}

impl From<Trade> for TradeReport {
    fn from(trade: Trade) -> Self {
        let economics = trade.economics();
        Self { trade, economics }
    }
}

/// Everything a single matching run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub initial_bids: QuoteBook,
    pub initial_asks: QuoteBook,
    pub trades: Vec<TradeReport>,
    pub truncated: bool,
    pub total_net_profit: f64,
    pub total_fees: f64,
    pub remaining_bids: QuoteBook,
    pub remaining_asks: QuoteBook,
}

impl RunReport {
    pub fn new(
        initial_bids: QuoteBook,
        initial_asks: QuoteBook,
        outcome: MatchOutcome,
        remaining_bids: QuoteBook,
        remaining_asks: QuoteBook,
    ) -> Self {
        let total_net_profit = outcome.total_net_profit();
        let trades: Vec<TradeReport> = outcome.trades.into_iter().map(TradeReport::from).collect();
        let total_fees: f64 = trades.iter().map(|t| t.economics.total_fees).sum();
        Self {
            initial_bids,
            initial_asks,
            trades,
            truncated: outcome.truncated,
            total_net_profit,
            total_fees,
            remaining_bids,
            remaining_asks,
        }
    }

    /// Console rendering: books before, trades, books after
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&render_order_book(&self.initial_bids, "Initial Bids"));
        out.push_str(&render_order_book(&self.initial_asks, "Initial Asks"));
        let trades: Vec<Trade> = self.trades.iter().map(|t| t.trade.clone()).collect();
        out.push_str(&render_trades(&trades));
        out.push_str(&format!("Total Fees Paid: {:.8}\n", self.total_fees));
        if self.truncated {
            out.push_str("\n(stopped at round cap; profitable pairs remain)\n");
        }
        out.push_str(&render_order_book(&self.remaining_bids, "Remaining Bids"));
        out.push_str(&render_order_book(&self.remaining_asks, "Remaining Asks"));
        out
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
