#![allow(dead_code)]

use chrono::NaiveDate;
use predtrader::domain::error::PredtraderError;
pub use predtrader::domain::price_record::PriceRecord;
use predtrader::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceRecord>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_records(mut self, ticker: &str, records: Vec<PriceRecord>) -> Self {
        self.data.insert(ticker.to_string(), records);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }

    fn check(&self, ticker: &str) -> Result<(), PredtraderError> {
        match self.errors.get(ticker) {
            Some(reason) => Err(PredtraderError::Data {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceRecord>, PredtraderError> {
        self.check(ticker)?;
        Ok(self
            .data
            .get(ticker)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| r.date >= start_date && r.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_tickers(&self) -> Result<Vec<String>, PredtraderError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }

    fn get_data_range(
        &self,
        ticker: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, PredtraderError> {
        self.check(ticker)?;
        match self.data.get(ticker) {
            Some(records) if !records.is_empty() => {
                let min = records.iter().map(|r| r.date).min().unwrap();
                let max = records.iter().map(|r| r.date).max().unwrap();
                Ok(Some((min, max, records.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Consecutive daily records starting at `start`.
pub fn make_series(start: &str, points: &[(f64, f64)]) -> Vec<PriceRecord> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap();
    points
        .iter()
        .enumerate()
        .map(|(i, &(actual, predicted))| {
            PriceRecord::new(start + chrono::Duration::days(i as i64), actual, predicted)
        })
        .collect()
}

/// The take-profit walkthrough: buy at 100 on day 1, sell at 106 on day 3.
pub fn take_profit_series() -> Vec<PriceRecord> {
    make_series(
        "2024-01-01",
        &[(100.0, 105.0), (100.0, 101.0), (106.0, 106.0), (97.0, 97.0)],
    )
}
