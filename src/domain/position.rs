//! Position and simulation state.
//!
//! The simulator is all-in or all-out: while flat every unit of value sits in
//! `capital`, while long every unit sits in `shares` and `capital` is zero.

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    Flat,
    Long { entry_price: f64, shares: f64 },
}

impl Position {
    pub fn is_long(&self) -> bool {
        matches!(self, Position::Long { .. })
    }

    pub fn is_flat(&self) -> bool {
        matches!(self, Position::Flat)
    }

    pub fn shares(&self) -> f64 {
        match self {
            Position::Flat => 0.0,
            Position::Long { shares, .. } => *shares,
        }
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.shares() * price
    }

    /// (price - entry_price) / entry_price, or `None` when flat.
    pub fn current_return(&self, price: f64) -> Option<f64> {
        match self {
            Position::Flat => None,
            Position::Long { entry_price, .. } => Some((price - entry_price) / entry_price),
        }
    }

    /// Boundary-inclusive: a return equal to `take_profit` triggers.
    pub fn should_take_profit(&self, price: f64, take_profit: f64) -> bool {
        self.current_return(price).is_some_and(|r| r >= take_profit)
    }

    /// Boundary-inclusive: a return equal to `stop_loss` triggers.
    pub fn should_stop_loss(&self, price: f64, stop_loss: f64) -> bool {
        self.current_return(price).is_some_and(|r| r <= stop_loss)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationState {
    capital: f64,
    position: Position,
}

impl SimulationState {
    /// Flat state holding `capital` in cash. `capital` must be positive.
    pub fn flat(capital: f64) -> Self {
        debug_assert!(capital > 0.0, "flat state needs positive capital, got {capital}");
        SimulationState {
            capital,
            position: Position::Flat,
        }
    }

    /// Fully invested state. Both `entry_price` and `shares` must be positive.
    pub fn long(entry_price: f64, shares: f64) -> Self {
        debug_assert!(
            entry_price > 0.0 && shares > 0.0,
            "long state needs positive entry price and shares, got {entry_price} x {shares}"
        );
        SimulationState {
            capital: 0.0,
            position: Position::Long {
                entry_price,
                shares,
            },
        }
    }

    pub fn capital(&self) -> f64 {
        self.capital
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_long(&self) -> bool {
        self.position.is_long()
    }

    /// Flat with positive capital, or long with zero capital.
    pub fn holds_invariant(&self) -> bool {
        match self.position {
            Position::Flat => self.capital > 0.0,
            Position::Long { shares, .. } => self.capital == 0.0 && shares > 0.0,
        }
    }
}
