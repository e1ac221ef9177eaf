//! Configuration validation.
//!
//! Validates the `[simulation]` section before any data is loaded. Keys that
//! are absent fall back to their defaults; keys that are present must parse.

use crate::domain::error::PredtraderError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

const SECTION: &str = "simulation";

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), PredtraderError> {
    validate_initial_capital(config)?;
    validate_buy_threshold(config)?;
    validate_take_profit(config)?;
    validate_stop_loss(config)?;
    validate_dates(config)?;
    Ok(())
}

/// Parse an optional numeric key, rejecting values that are present but
/// malformed.
pub fn parse_number(config: &dyn ConfigPort, key: &str) -> Result<Option<f64>, PredtraderError> {
    match config.get_string(SECTION, key) {
        None => Ok(None),
        Some(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| invalid(key, format!("{key} must be a number, got '{s}'"))),
    }
}

/// Parse an optional `YYYY-MM-DD` key.
pub fn parse_date(config: &dyn ConfigPort, key: &str) -> Result<Option<NaiveDate>, PredtraderError> {
    match config.get_string(SECTION, key) {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| invalid(key, format!("invalid {key} format, expected YYYY-MM-DD"))),
    }
}

fn invalid(key: &str, reason: String) -> PredtraderError {
    PredtraderError::ConfigInvalid {
        section: SECTION.to_string(),
        key: key.to_string(),
        reason,
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), PredtraderError> {
    if let Some(value) = parse_number(config, "initial_capital")? {
        if !(value.is_finite() && value > 0.0) {
            return Err(invalid(
                "initial_capital",
                "initial_capital must be positive and finite".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_buy_threshold(config: &dyn ConfigPort) -> Result<(), PredtraderError> {
    if let Some(value) = parse_number(config, "buy_threshold")? {
        if !value.is_finite() {
            return Err(invalid(
                "buy_threshold",
                "buy_threshold must be finite".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_take_profit(config: &dyn ConfigPort) -> Result<(), PredtraderError> {
    if let Some(value) = parse_number(config, "take_profit")? {
        if !(value > 0.0) {
            return Err(invalid(
                "take_profit",
                "take_profit must be positive".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_stop_loss(config: &dyn ConfigPort) -> Result<(), PredtraderError> {
    if let Some(value) = parse_number(config, "stop_loss")? {
        if !(value < 0.0) {
            return Err(invalid(
                "stop_loss",
                "stop_loss must be negative (e.g. -0.03)".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), PredtraderError> {
    let start = parse_date(config, "start_date")?;
    let end = parse_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(invalid(
                "start_date",
                "start_date must not be after end_date".to_string(),
            ));
        }
    }
    Ok(())
}
