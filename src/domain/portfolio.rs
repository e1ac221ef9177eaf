//! Mark-to-market valuation of the simulation state.
//!
//! Sampling policy: the in-loop sample for a record is taken from the state
//! before any trade on that record; the closing sample is taken after forced
//! liquidation.

use chrono::NaiveDate;

use super::position::{Position, SimulationState};

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSample {
    pub date: NaiveDate,
    pub value: f64,
}

/// `capital` when flat, `shares * price` when long.
pub fn mark_to_market(state: &SimulationState, price: f64) -> f64 {
    match state.position() {
        Position::Flat => state.capital(),
        long => long.market_value(price),
    }
}

pub fn sample(state: &SimulationState, date: NaiveDate, price: f64) -> PortfolioSample {
    PortfolioSample {
        date,
        value: mark_to_market(state, price),
    }
}
