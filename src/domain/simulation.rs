//! Single-position backtest simulator.
//!
//! The run is a fold over the price series: [`step`] maps one state and one
//! record to the next state, the sample taken before acting, and at most one
//! trade. The last record is reserved for [`liquidate`] and the closing
//! sample. Signal and execution use the same record's close; there is no
//! next-day fill.

use super::error::{InvalidInput, PredtraderError};
use super::ledger::{TradeAction, TradeEvent, TradeLedger};
use super::params::SimulationParams;
use super::portfolio::{self, PortfolioSample};
use super::position::{Position, SimulationState};
use super::price_record::PriceRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub ledger: TradeLedger,
    pub samples: Vec<PortfolioSample>,
    pub final_value: f64,
}

impl SimulationResult {
    pub fn total_return(&self, initial_capital: f64) -> f64 {
        (self.final_value - initial_capital) / initial_capital
    }
}

/// Outcome of feeding one record to the state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub state: SimulationState,
    pub sample: PortfolioSample,
    pub trade: Option<TradeEvent>,
}

/// Precondition checks. Nothing is simulated when these fail.
pub fn validate_inputs(
    series: &[PriceRecord],
    initial_capital: f64,
    params: &SimulationParams,
) -> Result<(), InvalidInput> {
    if series.is_empty() {
        return Err(InvalidInput::EmptySeries);
    }
    if !(initial_capital.is_finite() && initial_capital > 0.0) {
        return Err(InvalidInput::NonPositiveCapital {
            capital: initial_capital,
        });
    }
    params.validate()?;

    if let Some((i, pair)) = series
        .windows(2)
        .enumerate()
        .find(|(_, pair)| pair[1].date <= pair[0].date)
    {
        return Err(InvalidInput::NonAscendingDates {
            index: i + 1,
            previous: pair[0].date,
            date: pair[1].date,
        });
    }
    Ok(())
}

fn check_price(index: usize, record: &PriceRecord) -> Result<(), PredtraderError> {
    if !(record.actual_close.is_finite() && record.actual_close > 0.0) {
        return Err(PredtraderError::DataGap {
            index,
            date: record.date,
            actual_close: record.actual_close,
        });
    }
    Ok(())
}

/// Advance the state machine by one record. `record.actual_close` must be
/// finite and positive.
pub fn step(state: SimulationState, record: &PriceRecord, params: &SimulationParams) -> Step {
    let price = record.actual_close;
    let sample = portfolio::sample(&state, record.date, price);

    match state.position() {
        Position::Flat => {
            if record.predicted_pct() > params.buy_threshold {
                let shares = state.capital() / price;
                Step {
                    state: SimulationState::long(price, shares),
                    sample,
                    trade: Some(TradeEvent {
                        date: record.date,
                        action: TradeAction::Buy,
                        price,
                        shares,
                    }),
                }
            } else {
                Step {
                    state,
                    sample,
                    trade: None,
                }
            }
        }
        long @ Position::Long { shares, .. } => {
            if long.should_take_profit(price, params.take_profit)
                || long.should_stop_loss(price, params.stop_loss)
            {
                Step {
                    state: SimulationState::flat(shares * price),
                    sample,
                    trade: Some(TradeEvent {
                        date: record.date,
                        action: TradeAction::Sell,
                        price,
                        shares,
                    }),
                }
            } else {
                Step {
                    state,
                    sample,
                    trade: None,
                }
            }
        }
    }
}

/// Close any open position at the last record's close, regardless of
/// thresholds.
pub fn liquidate(state: SimulationState, last: &PriceRecord) -> (SimulationState, Option<TradeEvent>) {
    match state.position() {
        Position::Flat => (state, None),
        Position::Long { shares, .. } => {
            let price = last.actual_close;
            let event = TradeEvent {
                date: last.date,
                action: TradeAction::SellForced,
                price,
                shares,
            };
            (SimulationState::flat(shares * price), Some(event))
        }
    }
}

/// Replay the strategy over `series`.
///
/// Produces one sample per record: the first `n - 1` reflect the state
/// before that day's action, the last reflects the settled capital after
/// forced liquidation.
pub fn run(
    series: &[PriceRecord],
    initial_capital: f64,
    params: &SimulationParams,
) -> Result<SimulationResult, PredtraderError> {
    validate_inputs(series, initial_capital, params)?;
    let Some((last, body)) = series.split_last() else {
        return Err(InvalidInput::EmptySeries.into());
    };

    let init = (
        SimulationState::flat(initial_capital),
        TradeLedger::new(),
        Vec::with_capacity(series.len()),
    );
    let (state, mut ledger, mut samples) = body.iter().enumerate().try_fold(
        init,
        |(state, mut ledger, mut samples), (index, record)| {
            check_price(index, record)?;
            let step = step(state, record, params);
            samples.push(step.sample);
            if let Some(trade) = step.trade {
                ledger.append(trade);
            }
            Ok::<_, PredtraderError>((step.state, ledger, samples))
        },
    )?;

    check_price(body.len(), last)?;
    let (state, forced) = liquidate(state, last);
    if let Some(trade) = forced {
        ledger.append(trade);
    }
    samples.push(portfolio::sample(&state, last.date, last.actual_close));

    Ok(SimulationResult {
        ledger,
        samples,
        final_value: state.capital(),
    })
}
