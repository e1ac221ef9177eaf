//! Closing-price summary and prediction error over a series.

use chrono::NaiveDate;

use super::price_record::PriceRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSummary {
    pub count: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub low: f64,
    pub mean: f64,
    pub high: f64,
    /// low - mean, non-positive.
    pub delta_low: f64,
    /// high - mean, non-negative.
    pub delta_high: f64,
    /// Mean of |predicted - actual| / actual over records with a positive close.
    pub mean_abs_pct_error: f64,
}

impl PriceSummary {
    pub fn compute(series: &[PriceRecord]) -> Option<Self> {
        let first = series.first()?;
        let last = series.last()?;

        let (low, high, sum) = series.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(lo, hi, sum), r| (lo.min(r.actual_close), hi.max(r.actual_close), sum + r.actual_close),
        );
        let n = series.len() as f64;
        let mean = sum / n;

        let (error_sum, scored) = series
            .iter()
            .filter(|r| r.actual_close > 0.0)
            .fold((0.0, 0usize), |(sum, count), r| (sum + r.abs_pct_error(), count + 1));
        let mean_abs_pct_error = if scored > 0 {
            error_sum / scored as f64
        } else {
            0.0
        };

        Some(PriceSummary {
            count: series.len(),
            first_date: first.date,
            last_date: last.date,
            low,
            mean,
            high,
            delta_low: low - mean,
            delta_high: high - mean,
            mean_abs_pct_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(d: u32, actual: f64, predicted: f64) -> PriceRecord {
        PriceRecord::new(NaiveDate::from_ymd_opt(2023, 6, d).unwrap(), actual, predicted)
    }

    #[test]
    fn empty_series_has_no_summary() {
        assert!(PriceSummary::compute(&[]).is_none());
    }

    #[test]
    fn low_mean_high_with_deltas() {
        let series = vec![
            record(1, 100.0, 110.0),
            record(2, 90.0, 90.0),
            record(5, 110.0, 99.0),
        ];
        let s = PriceSummary::compute(&series).unwrap();
        assert_eq!(s.count, 3);
        assert_eq!(s.first_date, series[0].date);
        assert_eq!(s.last_date, series[2].date);
        assert_eq!(s.low, 90.0);
        assert_eq!(s.high, 110.0);
        assert_relative_eq!(s.mean, 100.0);
        assert_relative_eq!(s.delta_low, -10.0);
        assert_relative_eq!(s.delta_high, 10.0);
        assert_relative_eq!(s.mean_abs_pct_error, (0.1 + 0.0 + 0.1) / 3.0);
    }

    #[test]
    fn prediction_error_skips_unpriced_records() {
        let series = vec![
            record(1, 100.0, 110.0),
            record(2, 0.0, 5.0),
            record(3, 50.0, 45.0),
        ];
        let s = PriceSummary::compute(&series).unwrap();
        assert_relative_eq!(s.mean_abs_pct_error, (0.1 + 0.1) / 2.0);
    }
}
