//! Append-only trade ledger.

use std::fmt;

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeAction {
    Buy,
    Sell,
    /// Liquidation on the last record of the series.
    SellForced,
}

impl TradeAction {
    pub fn is_exit(&self) -> bool {
        matches!(self, TradeAction::Sell | TradeAction::SellForced)
    }
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TradeAction::Buy => "BUY",
            TradeAction::Sell => "SELL",
            TradeAction::SellForced => "SELL_FORCED",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeEvent {
    pub date: NaiveDate,
    pub action: TradeAction,
    pub price: f64,
    pub shares: f64,
}

impl TradeEvent {
    pub fn notional(&self) -> f64 {
        self.price * self.shares
    }
}

/// An entry paired with the exit that closed it.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundTrip {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    pub shares: f64,
    pub forced: bool,
}

impl RoundTrip {
    pub fn pnl(&self) -> f64 {
        self.shares * (self.exit_price - self.entry_price)
    }

    pub fn return_pct(&self) -> f64 {
        (self.exit_price - self.entry_price) / self.entry_price
    }

    pub fn holding_days(&self) -> i64 {
        (self.exit_date - self.entry_date).num_days()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TradeLedger {
    events: Vec<TradeEvent>,
}

impl TradeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, event: TradeEvent) {
        self.events.push(event);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TradeEvent> {
        self.events.iter()
    }

    pub fn events(&self) -> &[TradeEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Replays the events against `initial_capital` without looking at any
    /// price series: a buy converts all capital into shares at the event
    /// price, an exit converts the held shares back.
    pub fn replay(&self, initial_capital: f64) -> f64 {
        let mut capital = initial_capital;
        let mut shares = 0.0;
        for event in &self.events {
            match event.action {
                TradeAction::Buy => {
                    shares = capital / event.price;
                    capital = 0.0;
                }
                TradeAction::Sell | TradeAction::SellForced => {
                    capital = shares * event.price;
                    shares = 0.0;
                }
            }
        }
        capital
    }

    pub fn round_trips(&self) -> Vec<RoundTrip> {
        let mut trips = Vec::new();
        let mut open: Option<&TradeEvent> = None;
        for event in &self.events {
            match (event.action, open) {
                (TradeAction::Buy, _) => open = Some(event),
                (action, Some(entry)) if action.is_exit() => {
                    trips.push(RoundTrip {
                        entry_date: entry.date,
                        exit_date: event.date,
                        entry_price: entry.price,
                        exit_price: event.price,
                        shares: event.shares,
                        forced: action == TradeAction::SellForced,
                    });
                    open = None;
                }
                _ => {}
            }
        }
        trips
    }
}

impl<'a> IntoIterator for &'a TradeLedger {
    type Item = &'a TradeEvent;
    type IntoIter = std::slice::Iter<'a, TradeEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
