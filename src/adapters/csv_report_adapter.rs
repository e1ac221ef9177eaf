//! CSV export of the trade log and portfolio value trajectory.
//!
//! Writes `<ticker>_trades.csv` and `<ticker>_portfolio.csv` into the output
//! directory, creating it if needed.

use crate::domain::error::PredtraderError;
use crate::domain::simulation::SimulationResult;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::path::{Path, PathBuf};

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn trades_path(output: &Path, ticker: &str) -> PathBuf {
        output.join(format!("{}_trades.csv", ticker))
    }

    pub fn portfolio_path(output: &Path, ticker: &str) -> PathBuf {
        output.join(format!("{}_portfolio.csv", ticker))
    }
}

fn report_err(path: &Path, e: impl std::fmt::Display) -> PredtraderError {
    PredtraderError::Report {
        reason: format!("failed to write {}: {}", path.display(), e),
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        ticker: &str,
        result: &SimulationResult,
        output: &Path,
    ) -> Result<(), PredtraderError> {
        fs::create_dir_all(output)?;

        let trades_path = Self::trades_path(output, ticker);
        let mut wtr = csv::Writer::from_path(&trades_path).map_err(|e| report_err(&trades_path, e))?;
        wtr.write_record(["Date", "Action", "Price", "Shares"])
            .map_err(|e| report_err(&trades_path, e))?;
        for event in &result.ledger {
            wtr.write_record([
                event.date.to_string(),
                event.action.to_string(),
                event.price.to_string(),
                event.shares.to_string(),
            ])
            .map_err(|e| report_err(&trades_path, e))?;
        }
        wtr.flush().map_err(|e| report_err(&trades_path, e))?;

        let portfolio_path = Self::portfolio_path(output, ticker);
        let mut wtr =
            csv::Writer::from_path(&portfolio_path).map_err(|e| report_err(&portfolio_path, e))?;
        wtr.write_record(["Date", "Portfolio Value"])
            .map_err(|e| report_err(&portfolio_path, e))?;
        for sample in &result.samples {
            wtr.write_record([sample.date.to_string(), sample.value.to_string()])
                .map_err(|e| report_err(&portfolio_path, e))?;
        }
        wtr.flush().map_err(|e| report_err(&portfolio_path, e))?;

        Ok(())
    }
}
