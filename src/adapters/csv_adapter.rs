//! CSV predictions file data adapter.
//!
//! Expects a header row with `Date`, `Ticker`, `Close` and `Predicted_Close`
//! columns (any order, case-insensitive); other columns are ignored.

use crate::domain::error::PredtraderError;
use crate::domain::price_record::PriceRecord;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    path: PathBuf,
}

struct Columns {
    date: usize,
    ticker: usize,
    close: usize,
    predicted: usize,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, PredtraderError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| PredtraderError::Data {
                    reason: format!("missing {} column", name),
                })
        };
        Ok(Columns {
            date: find("date")?,
            ticker: find("ticker")?,
            close: find("close")?,
            predicted: find("predicted_close")?,
        })
    }
}

/// Accepts `YYYY-MM-DD` optionally followed by a time component.
fn parse_date(value: &str) -> Result<NaiveDate, PredtraderError> {
    let value = value.trim();
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| PredtraderError::Data {
        reason: format!("invalid date '{}': {}", value, e),
    })
}

fn parse_price(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, PredtraderError> {
    record
        .get(index)
        .ok_or_else(|| PredtraderError::Data {
            reason: format!("missing {} value", name),
        })?
        .trim()
        .parse()
        .map_err(|e| PredtraderError::Data {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_rows(&self) -> Result<Vec<(String, PriceRecord)>, PredtraderError> {
        let content = fs::read_to_string(&self.path).map_err(|e| PredtraderError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| PredtraderError::Data {
            reason: format!("CSV header error: {}", e),
        })?;
        let cols = Columns::resolve(headers)?;

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| PredtraderError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let ticker = record
                .get(cols.ticker)
                .ok_or_else(|| PredtraderError::Data {
                    reason: "missing ticker value".into(),
                })?
                .trim()
                .to_string();
            let date = parse_date(record.get(cols.date).unwrap_or_default())?;
            let actual_close = parse_price(&record, cols.close, "close")?;
            let predicted_close = parse_price(&record, cols.predicted, "predicted_close")?;

            rows.push((ticker, PriceRecord::new(date, actual_close, predicted_close)));
        }
        Ok(rows)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_series(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceRecord>, PredtraderError> {
        let mut records: Vec<PriceRecord> = self
            .read_rows()?
            .into_iter()
            .filter(|(t, r)| t == ticker && r.date >= start_date && r.date <= end_date)
            .map(|(_, r)| r)
            .collect();

        records.sort_by_key(|r| r.date);
        Ok(records)
    }

    fn list_tickers(&self) -> Result<Vec<String>, PredtraderError> {
        let mut tickers: Vec<String> = self
            .read_rows()?
            .into_iter()
            .map(|(t, _)| t)
            .filter(|t| !t.is_empty())
            .collect();
        tickers.sort();
        tickers.dedup();
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, PredtraderError> {
        let range = self
            .read_rows()?
            .into_iter()
            .filter(|(t, _)| t == ticker)
            .fold(None, |acc: Option<(NaiveDate, NaiveDate, usize)>, (_, r)| {
                Some(match acc {
                    None => (r.date, r.date, 1),
                    Some((min, max, n)) => (min.min(r.date), max.max(r.date), n + 1),
                })
            });
        Ok(range)
    }
}
