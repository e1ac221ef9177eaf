//! Report output port trait.

use crate::domain::error::PredtraderError;
use crate::domain::simulation::SimulationResult;
use std::path::Path;

/// Port for exporting a finished simulation.
pub trait ReportPort {
    fn write(
        &self,
        ticker: &str,
        result: &SimulationResult,
        output: &Path,
    ) -> Result<(), PredtraderError>;
}
