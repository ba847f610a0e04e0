//! Temperature trend
//!
//! The temperature of a stage is a weekly, exponentially decayed count of
//! its proceedings events. The trend is the slope of a least-squares line
//! through the most recent weekly samples: positive when activity grows.

use crate::models::{NewTemperatureRecord, ProceedingsEvent, TemperatureRecord};
use chrono::{Duration, NaiveDate};

/// Default number of weekly samples in the trend window
pub const DEFAULT_TREND_WINDOW: usize = 6;

/// Least-squares trend over weekly temperature samples
pub struct TrendEstimator;

impl TrendEstimator {
    /// Slope of `recent_temperature` over time (units per second), using
    /// the first `window` samples of a newest-first history.
    ///
    /// Returns `0.0` with fewer than two samples, and also when every
    /// sample shares the same period.
    pub fn coefficient(history: &[TemperatureRecord], window: usize) -> f64 {
        let points: Vec<(f64, f64)> = history
            .iter()
            .take(window)
            .map(|t| (period_timestamp(t.period), t.recent_temperature))
            .collect();
        ols_slope(&points)
    }

    /// Values for the next weekly sample of a stage.
    ///
    /// Counts the events dated inside `[period, period + 7 days)` and adds
    /// them to the previous accumulated temperature scaled by `decay`.
    pub fn weekly_sample(
        stage_id: i32,
        period: NaiveDate,
        events: &[ProceedingsEvent],
        previous: Option<&TemperatureRecord>,
        decay: f64,
    ) -> NewTemperatureRecord {
        let week_end = period + Duration::days(7);
        let period_events = events
            .iter()
            .filter(|e| e.date >= period && e.date < week_end)
            .count() as i32;

        let carried = previous.map(|p| p.recent_temperature * decay).unwrap_or(0.0);

        NewTemperatureRecord {
            stage_id,
            period,
            period_events,
            recent_temperature: carried + period_events as f64,
        }
    }
}

/// Seconds since the Unix epoch at midnight (UTC) of the given day
pub fn period_timestamp(day: NaiveDate) -> f64 {
    day.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp() as f64)
        .unwrap_or_default()
}

/// Ordinary least-squares slope of `y` over `x`.
///
/// Degenerate inputs (fewer than two points, or no spread in `x`) give 0.
pub fn ols_slope(points: &[(f64, f64)]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    // centred sums keep epoch-sized x values from swamping the result
    let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
        let dx = x - mean_x;
        (sxy + dx * (y - mean_y), sxx + dx * dx)
    });

    if sxx == 0.0 {
        0.0
    } else {
        sxy / sxx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEK_SECS: f64 = 7.0 * 86_400.0;

    fn sample(period: NaiveDate, value: f64) -> TemperatureRecord {
        TemperatureRecord {
            id: 0,
            stage_id: 1,
            period,
            period_events: value as i32,
            recent_temperature: value,
        }
    }

    fn week(n: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, 1, 7).unwrap() + Duration::weeks(n)
    }

    #[test]
    fn test_no_samples_is_flat() {
        assert_eq!(TrendEstimator::coefficient(&[], DEFAULT_TREND_WINDOW), 0.0);
    }

    #[test]
    fn test_single_sample_is_flat() {
        let history = vec![sample(week(0), 12.0)];
        assert_eq!(TrendEstimator::coefficient(&history, DEFAULT_TREND_WINDOW), 0.0);
    }

    #[test]
    fn test_rising_temperature_has_positive_slope() {
        // newest first: 5, 3, 1 over three consecutive weeks
        let history = vec![sample(week(2), 5.0), sample(week(1), 3.0), sample(week(0), 1.0)];
        let slope = TrendEstimator::coefficient(&history, DEFAULT_TREND_WINDOW);
        let expected = 2.0 / WEEK_SECS;
        assert!((slope - expected).abs() < 1e-15, "expected {}, got {}", expected, slope);
    }

    #[test]
    fn test_cooling_temperature_has_negative_slope() {
        let history = vec![sample(week(1), 0.5), sample(week(0), 4.0)];
        assert!(TrendEstimator::coefficient(&history, DEFAULT_TREND_WINDOW) < 0.0);
    }

    #[test]
    fn test_window_ignores_older_samples() {
        // six rising samples followed by an old spike that must not count
        let mut history: Vec<TemperatureRecord> = (0..6)
            .rev()
            .map(|n| sample(week(n + 1), n as f64))
            .collect();
        history.push(sample(week(0), 100.0));

        let slope = TrendEstimator::coefficient(&history, DEFAULT_TREND_WINDOW);
        assert!((slope - 1.0 / WEEK_SECS).abs() < 1e-15);
    }

    #[test]
    fn test_duplicate_periods_degenerate_to_zero() {
        let history = vec![sample(week(0), 1.0), sample(week(0), 9.0)];
        assert_eq!(TrendEstimator::coefficient(&history, DEFAULT_TREND_WINDOW), 0.0);
    }

    #[test]
    fn test_ols_slope_matches_textbook_fit() {
        let points = [(0.0, 1.5), (1.0, 2.5), (2.0, 5.5), (3.0, 6.5)];
        assert!((ols_slope(&points) - 1.8).abs() < 1e-12);
    }

    #[test]
    fn test_period_timestamp_is_utc_midnight() {
        let day = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        assert_eq!(period_timestamp(day), 86_400.0);
    }

    #[test]
    fn test_weekly_sample_decays_previous_temperature() {
        let event = |d: NaiveDate| ProceedingsEvent {
            id: 0,
            stage_id: 1,
            date: d,
            sequence: 1,
            event: String::new(),
            venue_code: "PLEN".into(),
            venue: "Plenário".into(),
            situation: String::new(),
            text: String::new(),
            status: String::new(),
            full_text_link: None,
            level: None,
        };
        let events = vec![
            event(week(1) - Duration::days(1)),
            event(week(1)),
            event(week(1) + Duration::days(6)),
            event(week(2)),
        ];
        let previous = sample(week(0), 4.0);

        let next = TrendEstimator::weekly_sample(1, week(1), &events, Some(&previous), 0.5);
        assert_eq!(next.period_events, 2);
        assert_eq!(next.recent_temperature, 4.0);

        let first = TrendEstimator::weekly_sample(1, week(1), &events, None, 0.5);
        assert_eq!(first.recent_temperature, 2.0);
    }
}
