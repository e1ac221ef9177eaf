//! Daily actual/predicted close pair for one instrument.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub date: NaiveDate,
    pub actual_close: f64,
    pub predicted_close: f64,
}

impl PriceRecord {
    pub fn new(date: NaiveDate, actual_close: f64, predicted_close: f64) -> Self {
        PriceRecord {
            date,
            actual_close,
            predicted_close,
        }
    }

    /// (predicted_close - actual_close) / actual_close
    pub fn predicted_pct(&self) -> f64 {
        (self.predicted_close - self.actual_close) / self.actual_close
    }

    /// Absolute prediction error as a fraction of the actual close.
    pub fn abs_pct_error(&self) -> f64 {
        self.predicted_pct().abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_record() -> PriceRecord {
        PriceRecord::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), 100.0, 105.0)
    }

    #[test]
    fn predicted_pct_above_actual() {
        assert_relative_eq!(sample_record().predicted_pct(), 0.05);
    }

    #[test]
    fn predicted_pct_below_actual() {
        let r = PriceRecord {
            predicted_close: 97.0,
            ..sample_record()
        };
        assert_relative_eq!(r.predicted_pct(), -0.03);
        assert_relative_eq!(r.abs_pct_error(), 0.03);
    }

    #[test]
    fn predicted_pct_flat() {
        let r = PriceRecord {
            predicted_close: 100.0,
            ..sample_record()
        };
        assert_eq!(r.predicted_pct(), 0.0);
    }
}
