//! Price series provider port trait.

use crate::domain::error::PredtraderError;
use crate::domain::price_record::PriceRecord;
use chrono::NaiveDate;

pub trait DataPort {
    /// Records for `ticker` with `start_date <= date <= end_date`, ordered by
    /// date. The provider does not deduplicate or validate prices.
    fn fetch_series(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceRecord>, PredtraderError>;

    fn list_tickers(&self) -> Result<Vec<String>, PredtraderError>;

    /// First date, last date and record count, or `None` if the ticker has
    /// no data.
    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, PredtraderError>;
}
