//! Performance metrics derived from a finished simulation.

use super::ledger::RoundTrip;
use super::portfolio::PortfolioSample;
use super::simulation::SimulationResult;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub total_return: f64,
    pub max_drawdown: f64,
    pub total_trades: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub forced_exits: usize,
    pub win_rate: f64,
    pub best_trade: f64,
    pub worst_trade: f64,
    pub avg_holding_days: f64,
    /// Fraction of samples taken while holding shares.
    pub exposure: f64,
}

impl Metrics {
    pub fn compute(result: &SimulationResult, initial_capital: f64) -> Self {
        let trips = result.ledger.round_trips();

        let total_return = if initial_capital > 0.0 {
            result.total_return(initial_capital)
        } else {
            0.0
        };

        let trades_won = trips.iter().filter(|t| t.pnl() > 0.0).count();
        let trades_lost = trips.iter().filter(|t| t.pnl() < 0.0).count();
        let forced_exits = trips.iter().filter(|t| t.forced).count();
        let total_trades = trips.len();

        let win_rate = if total_trades > 0 {
            trades_won as f64 / total_trades as f64
        } else {
            0.0
        };

        let returns = trips.iter().map(RoundTrip::return_pct);
        let best_trade = returns.clone().fold(None, |acc: Option<f64>, r| {
            Some(acc.map_or(r, |a| a.max(r)))
        });
        let worst_trade = returns.fold(None, |acc: Option<f64>, r| {
            Some(acc.map_or(r, |a| a.min(r)))
        });

        let avg_holding_days = if total_trades > 0 {
            trips.iter().map(|t| t.holding_days()).sum::<i64>() as f64 / total_trades as f64
        } else {
            0.0
        };

        Metrics {
            total_return,
            max_drawdown: compute_drawdown(&result.samples),
            total_trades,
            trades_won,
            trades_lost,
            forced_exits,
            win_rate,
            best_trade: best_trade.unwrap_or(0.0),
            worst_trade: worst_trade.unwrap_or(0.0),
            avg_holding_days,
            exposure: compute_exposure(&result.samples, &trips),
        }
    }
}

/// Largest peak-to-trough decline as a fraction of the peak.
fn compute_drawdown(samples: &[PortfolioSample]) -> f64 {
    let Some(first) = samples.first() else {
        return 0.0;
    };

    let mut peak = first.value;
    let mut max_dd = 0.0_f64;
    for sample in samples {
        if sample.value > peak {
            peak = sample.value;
        } else if peak > 0.0 {
            max_dd = max_dd.max((peak - sample.value) / peak);
        }
    }
    max_dd
}

// A day counts as exposed when its sample was taken while long: strictly
// after the entry day, up to the exit day. The forced exit day is excluded
// since its sample is taken after liquidation.
fn compute_exposure(samples: &[PortfolioSample], trips: &[RoundTrip]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let held = |s: &PortfolioSample, t: &RoundTrip| {
        s.date > t.entry_date && (s.date < t.exit_date || (!t.forced && s.date == t.exit_date))
    };
    let exposed = samples
        .iter()
        .filter(|s| trips.iter().any(|t| held(s, t)))
        .count();
    exposed as f64 / samples.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::params::SimulationParams;
    use crate::domain::price_record::PriceRecord;
    use crate::domain::simulation::run;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn simulate(points: &[(f64, f64)]) -> SimulationResult {
        let series: Vec<PriceRecord> = points
            .iter()
            .enumerate()
            .map(|(i, &(a, p))| PriceRecord::new(date(i as u32 + 1), a, p))
            .collect();
        run(&series, 10_000.0, &SimulationParams::default()).unwrap()
    }

    #[test]
    fn no_trades() {
        let result = simulate(&[(100.0, 100.0), (101.0, 101.0)]);
        let m = Metrics::compute(&result, 10_000.0);
        assert_eq!(m.total_trades, 0);
        assert_eq!(m.win_rate, 0.0);
        assert_eq!(m.total_return, 0.0);
        assert_eq!(m.max_drawdown, 0.0);
        assert_eq!(m.exposure, 0.0);
        assert_eq!(m.best_trade, 0.0);
    }

    #[test]
    fn winning_then_losing_trade() {
        // buy 100, sell 106 (tp); buy 106, sell 102 forced
        let result = simulate(&[
            (100.0, 105.0),
            (103.0, 103.0),
            (106.0, 106.0),
            (106.0, 120.0),
            (104.0, 104.0),
            (102.0, 102.0),
        ]);
        let m = Metrics::compute(&result, 10_000.0);

        assert_eq!(m.total_trades, 2);
        assert_eq!(m.trades_won, 1);
        assert_eq!(m.trades_lost, 1);
        assert_eq!(m.forced_exits, 1);
        assert_relative_eq!(m.win_rate, 0.5);
        assert_relative_eq!(m.best_trade, 0.06);
        assert_relative_eq!(m.worst_trade, (102.0 - 106.0) / 106.0);
        assert_relative_eq!(m.avg_holding_days, 2.0);
        assert_relative_eq!(m.total_return, 0.02, max_relative = 1e-12);
    }

    #[test]
    fn drawdown_from_peak() {
        let samples: Vec<PortfolioSample> = [100.0, 120.0, 90.0, 130.0, 117.0]
            .iter()
            .enumerate()
            .map(|(i, &v)| PortfolioSample {
                date: date(i as u32 + 1),
                value: v,
            })
            .collect();
        assert_relative_eq!(compute_drawdown(&samples), 0.25);
    }

    #[test]
    fn exposure_counts_days_held() {
        // entry day 1, exit day 3 of 4 samples: days 2 and 3 exposed
        let result = simulate(&[(100.0, 105.0), (100.0, 101.0), (106.0, 106.0), (97.0, 97.0)]);
        let m = Metrics::compute(&result, 10_000.0);
        assert_relative_eq!(m.exposure, 0.5);
    }

    #[test]
    fn forced_exit_day_is_not_exposed() {
        // entry day 1, held on day 2, force-sold on day 3 before its sample
        let result = simulate(&[(100.0, 110.0), (101.0, 101.0), (102.0, 102.0)]);
        let m = Metrics::compute(&result, 10_000.0);
        assert_eq!(m.forced_exits, 1);
        assert_relative_eq!(m.exposure, 1.0 / 3.0);
    }
}
