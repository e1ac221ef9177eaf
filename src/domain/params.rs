//! Strategy thresholds for the simulator.

use chrono::NaiveDate;

use super::error::InvalidInput;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 10_000.0;
pub const DEFAULT_BUY_THRESHOLD: f64 = 0.02;
pub const DEFAULT_TAKE_PROFIT: f64 = 0.05;
pub const DEFAULT_STOP_LOSS: f64 = -0.03;

/// Entry threshold on the predicted move, and the exit returns measured from
/// the entry price. All values are fractions (0.05 == 5%).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationParams {
    pub buy_threshold: f64,
    pub take_profit: f64,
    pub stop_loss: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        SimulationParams {
            buy_threshold: DEFAULT_BUY_THRESHOLD,
            take_profit: DEFAULT_TAKE_PROFIT,
            stop_loss: DEFAULT_STOP_LOSS,
        }
    }
}

impl SimulationParams {
    /// Requires `take_profit > 0 > stop_loss`. NaN fails both checks.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if self.take_profit.is_nan() || self.take_profit <= 0.0 {
            return Err(InvalidInput::TakeProfitNotPositive {
                take_profit: self.take_profit,
            });
        }
        if self.stop_loss.is_nan() || self.stop_loss >= 0.0 {
            return Err(InvalidInput::StopLossNotNegative {
                stop_loss: self.stop_loss,
            });
        }
        Ok(())
    }
}

/// Everything needed to run one simulation besides the data itself.
/// Unset dates mean the ticker's full data range.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub ticker: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub initial_capital: f64,
    pub params: SimulationParams,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            ticker: None,
            start_date: None,
            end_date: None,
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            params: SimulationParams::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let p = SimulationParams::default();
        assert_eq!(p.buy_threshold, 0.02);
        assert_eq!(p.take_profit, 0.05);
        assert_eq!(p.stop_loss, -0.03);
        assert!(p.validate().is_ok());
    }

    #[test]
    fn default_config() {
        let c = SimulationConfig::default();
        assert_eq!(c.ticker, None);
        assert_eq!(c.start_date, None);
        assert_eq!(c.initial_capital, 10_000.0);
        assert_eq!(c.params, SimulationParams::default());
    }

    #[test]
    fn zero_take_profit_rejected() {
        let p = SimulationParams {
            take_profit: 0.0,
            ..Default::default()
        };
        assert_eq!(
            p.validate(),
            Err(InvalidInput::TakeProfitNotPositive { take_profit: 0.0 })
        );
    }

    #[test]
    fn non_negative_stop_loss_rejected() {
        let p = SimulationParams {
            stop_loss: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            p.validate(),
            Err(InvalidInput::StopLossNotNegative { .. })
        ));

        let p = SimulationParams {
            stop_loss: 0.03,
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn nan_thresholds_rejected() {
        let p = SimulationParams {
            take_profit: f64::NAN,
            ..Default::default()
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn negative_buy_threshold_allowed() {
        let p = SimulationParams {
            buy_threshold: -0.01,
            ..Default::default()
        };
        assert!(p.validate().is_ok());
    }
}
