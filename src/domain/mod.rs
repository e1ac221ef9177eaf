//! Core domain types and logic.

pub mod price_record;
pub mod position;
pub mod portfolio;
pub mod ledger;
pub mod params;
pub mod simulation;
pub mod metrics;
pub mod price_summary;
pub mod config_validation;
pub mod error;
