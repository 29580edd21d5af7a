//! Fee Calculation for Cross-Venue Arbitrage
//! Mission: Accurate profit calculation after all fees
//! Philosophy: A profitable trade on paper must be profitable in reality

use serde::{Deserialize, Serialize};

use crate::arbitrage::quote::Quote;

/// Anything carrying a unit price and a proportional fee
pub trait PricedLeg {
    fn unit_price(&self) -> f64;
    fn fee_rate(&self) -> f64;
}

impl PricedLeg for Quote {
    fn unit_price(&self) -> f64 {
        self.price()
    }

    fn fee_rate(&self) -> f64 {
        self.fee()
    }
}

/// What it costs to acquire one unit from an ask, fee included
pub fn effective_cost(price: f64, fee: f64) -> f64 {
    price * (1.0 + fee)
}

/// What selling one unit into a bid actually yields, net of fee
pub fn effective_proceed(price: f64, fee: f64) -> f64 {
    price * (1.0 - fee)
}

/// Net per-unit profit of buying from `ask` and selling into `bid`
pub fn profit_per_unit(ask: &impl PricedLeg, bid: &impl PricedLeg) -> f64 {
    effective_proceed(bid.unit_price(), bid.fee_rate())
        - effective_cost(ask.unit_price(), ask.fee_rate())
}

/// Full fee breakdown for one matched quantity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairEconomics {
    /// (bid price - ask price) * quantity, before fees
    pub gross_profit: f64,
    /// Fees paid on both legs
    pub total_fees: f64,
    /// gross_profit - total_fees
    pub net_profit: f64,
    /// net_profit relative to the fee-inclusive buy cost
    pub net_profit_pct: f64,
}

/// Fee calculator for ask/bid pairs
#[derive(Debug, Clone, Copy, Default)]
pub struct FeeCalculator;

impl FeeCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Calculate total fees for a two-leg arbitrage trade
    ///
    /// # Arguments
    /// * `buy` - Leg we buy from (the ask)
    /// * `sell` - Leg we sell into (the bid)
    /// * `quantity` - Units traded
    ///
    /// # Returns
    /// Total fees in quote currency
    pub fn calculate_total_fees(
        &self,
        buy: &impl PricedLeg,
        sell: &impl PricedLeg,
        quantity: u64,
    ) -> f64 {
        let qty = quantity as f64;

        // Leg 1: buy from the ask
        let buy_fees = buy.unit_price() * buy.fee_rate() * qty;

        // Leg 2: sell into the bid
        let sell_fees = sell.unit_price() * sell.fee_rate() * qty;

        buy_fees + sell_fees
    }

    /// Calculate net profit after all fees
    pub fn calculate_net_profit(
        &self,
        buy: &impl PricedLeg,
        sell: &impl PricedLeg,
        quantity: u64,
    ) -> PairEconomics {
        let qty = quantity as f64;
        let gross_profit = (sell.unit_price() - buy.unit_price()) * qty;
        let total_fees = self.calculate_total_fees(buy, sell, quantity);
        let net_profit = profit_per_unit(buy, sell) * qty;

        let buy_cost = effective_cost(buy.unit_price(), buy.fee_rate()) * qty;
        let net_profit_pct = if buy_cost > 0.0 {
            net_profit / buy_cost
        } else {
            0.0
        };

        PairEconomics {
            gross_profit,
            total_fees,
            net_profit,
            net_profit_pct,
        }
    }
}
