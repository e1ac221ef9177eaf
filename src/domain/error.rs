//! Domain error types.

use chrono::NaiveDate;

/// Precondition failures detected before a simulation builds any state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidInput {
    #[error("price series is empty")]
    EmptySeries,

    #[error("initial capital must be positive and finite, got {capital}")]
    NonPositiveCapital { capital: f64 },

    #[error("dates must be strictly ascending: record {index} ({date}) does not follow {previous}")]
    NonAscendingDates {
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },

    #[error("take_profit must be positive, got {take_profit}")]
    TakeProfitNotPositive { take_profit: f64 },

    #[error("stop_loss must be negative, got {stop_loss}")]
    StopLossNotNegative { stop_loss: f64 },
}

/// Top-level error type for predtrader.
#[derive(Debug, thiserror::Error)]
pub enum PredtraderError {
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    #[error("data gap at record {index} ({date}): actual close {actual_close} is not positive")]
    DataGap {
        index: usize,
        date: NaiveDate,
        actual_close: f64,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {ticker}")]
    NoData { ticker: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&PredtraderError> for std::process::ExitCode {
    fn from(err: &PredtraderError) -> Self {
        let code: u8 = match err {
            PredtraderError::Io(_) => 1,
            PredtraderError::ConfigParse { .. }
            | PredtraderError::ConfigMissing { .. }
            | PredtraderError::ConfigInvalid { .. } => 2,
            PredtraderError::Data { .. } => 3,
            PredtraderError::InvalidInput(_) | PredtraderError::DataGap { .. } => 4,
            PredtraderError::NoData { .. } => 5,
            PredtraderError::Report { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
