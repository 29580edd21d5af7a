//! Greedy Cross-Venue Matcher
//! Mission: Drain every profitable ask/bid crossing between venues
//! Philosophy: Always take the best remaining edge first

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::arbitrage::fees::{profit_per_unit, FeeCalculator, PairEconomics, PricedLeg};
use crate::arbitrage::quote::{Quote, QuoteBook, QuoteId};

/// Matcher tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Stop after this many executed trades (None = run to exhaustion)
    #[serde(default)]
    pub max_rounds: Option<usize>,

    /// A pair is only eligible when its profit per unit is strictly above this
    #[serde(default)]
    pub min_profit_per_unit: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            max_rounds: None,
            min_profit_per_unit: 0.0,
        }
    }
}

/// One leg of an executed trade, copied from the quote at match time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeLeg {
    pub quote_id: QuoteId,
    pub venue: String,
    pub fee: f64,
    pub price: f64,
}

impl TradeLeg {
    fn from_quote(quote_id: QuoteId, quote: &Quote) -> Self {
        Self {
            quote_id,
            venue: quote.venue().to_string(),
            fee: quote.fee(),
            price: quote.price(),
        }
    }
}

impl PricedLeg for TradeLeg {
    fn unit_price(&self) -> f64 {
        self.price
    }

    fn fee_rate(&self) -> f64 {
        self.fee
    }
}

/// Executed arbitrage trade: buy from `buy`, sell into `sell`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub buy: TradeLeg,
    pub sell: TradeLeg,
    pub quantity: u64,
    pub profit_per_unit: f64,
    pub net_profit: f64,
}

impl Trade {
    /// Gross spread, fees paid and net profit for this fill
    pub fn economics(&self) -> PairEconomics {
        FeeCalculator::new().calculate_net_profit(&self.buy, &self.sell, self.quantity)
    }
}

/// Sum of `net_profit` over a trade sequence
pub fn total_net_profit(trades: &[Trade]) -> f64 {
    trades.iter().map(|t| t.net_profit).sum()
}

/// Result of a full matching run
#[derive(Debug, Clone, Serialize)]
pub struct MatchOutcome {
    /// Trades in execution order
    pub trades: Vec<Trade>,
    /// True when `max_rounds` stopped the run with profitable pairs left
    pub truncated: bool,
}

impl MatchOutcome {
    pub fn rounds(&self) -> usize {
        self.trades.len()
    }

    pub fn total_net_profit(&self) -> f64 {
        total_net_profit(&self.trades)
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    ask: QuoteId,
    bid: QuoteId,
    profit_per_unit: f64,
}

/// Greedy arbitrage matcher
#[derive(Debug, Clone, Default)]
pub struct ArbitrageMatcher {
    config: MatcherConfig,
}

impl ArbitrageMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// Run the matcher until no eligible pair remains (or the round cap hits)
    ///
    /// Both books are mutated in place: each trade decrements the matched ask
    /// and bid by the traded quantity.
    pub fn run(&self, bids: &mut QuoteBook, asks: &mut QuoteBook) -> MatchOutcome {
        info!(
            "🎯 Matching {} asks against {} bids",
            asks.len(),
            bids.len()
        );

        let mut trades: Vec<Trade> = Vec::new();
        let mut truncated = false;

        while let Some(best) = self.best_pair(bids, asks) {
            if self.config.max_rounds.is_some_and(|cap| trades.len() >= cap) {
                warn!(
                    "Round cap {} reached with profitable pairs remaining",
                    trades.len()
                );
                truncated = true;
                break;
            }

            let trade = execute(bids, asks, best);
            debug!(
                "Round {}: buy {} @ {:.8} -> sell {} @ {:.8}, qty={}, ppu={:.8}",
                trades.len() + 1,
                trade.buy.venue,
                trade.buy.price,
                trade.sell.venue,
                trade.sell.price,
                trade.quantity,
                trade.profit_per_unit
            );
            trades.push(trade);
        }

        let outcome = MatchOutcome { trades, truncated };
        info!(
            "✅ Executed {} arbitrage trades, net profit {:.8}",
            outcome.rounds(),
            outcome.total_net_profit()
        );
        outcome
    }

    /// Full rescan for the most profitable live cross-venue pair
    ///
    /// Asks are scanned in book order and bids in book order inside each ask.
    /// Only a strictly greater profit replaces the current best, so the first
    /// pair reaching the maximum wins ties.
    fn best_pair(&self, bids: &QuoteBook, asks: &QuoteBook) -> Option<Candidate> {
        let mut best: Option<Candidate> = None;
        let mut best_profit = self.config.min_profit_per_unit.max(0.0);

        for (ask_id, ask) in asks.live() {
            for (bid_id, bid) in bids.live() {
                // a venue cannot arbitrage against itself
                if ask.venue() == bid.venue() {
                    continue;
                }

                let ppu = profit_per_unit(ask, bid);
                if ppu > best_profit {
                    best_profit = ppu;
                    best = Some(Candidate {
                        ask: ask_id,
                        bid: bid_id,
                        profit_per_unit: ppu,
                    });
                }
            }
        }

        best
    }
}

/// Size, record and apply one selected pair
fn execute(bids: &mut QuoteBook, asks: &mut QuoteBook, best: Candidate) -> Trade {
    // candidate ids come from these books' own iterators within this round
    let ask = &asks[best.ask];
    let bid = &bids[best.bid];

    let quantity = ask.volume().min(bid.volume());
    let buy = TradeLeg::from_quote(best.ask, ask);
    let sell = TradeLeg::from_quote(best.bid, bid);

    asks.consume(best.ask, quantity);
    bids.consume(best.bid, quantity);

    Trade {
        buy,
        sell,
        quantity,
        profit_per_unit: best.profit_per_unit,
        net_profit: best.profit_per_unit * quantity as f64,
    }
}

/// Repeatedly execute the best profitable trade until none remains
///
/// Convenience entry point with the default configuration (no round cap,
/// any strictly positive profit is eligible).
pub fn find_best_arbitrage(bids: &mut QuoteBook, asks: &mut QuoteBook) -> Vec<Trade> {
    ArbitrageMatcher::default().run(bids, asks).trades
}
