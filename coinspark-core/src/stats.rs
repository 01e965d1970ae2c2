//! Summary statistics over a price sequence.
//!
//! Trend classification uses the percent change from first to last element
//! with a ±1% dead band; volatility is the population standard deviation
//! (no Bessel correction). Float outputs are rounded to 2 decimals for
//! presentation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ChartError;

/// Direction classification for a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Flat => "flat",
        };
        f.write_str(s)
    }
}

/// Derived summary metrics. Not persisted anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub volatility: f64,
    pub trend: Trend,
    pub data_points: usize,
}

/// Analyze a price sequence. Fails on empty input.
pub fn analyze(prices: &[f64]) -> Result<SeriesStats, ChartError> {
    if prices.is_empty() {
        return Err(ChartError::NoData);
    }

    let n = prices.len() as f64;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    for &p in prices {
        min = min.min(p);
        max = max.max(p);
        sum += p;
    }
    let avg = sum / n;

    let variance = prices.iter().map(|p| (p - avg).powi(2)).sum::<f64>() / n;
    let volatility = variance.sqrt();

    let first = prices[0];
    let last = prices[prices.len() - 1];
    // A zero first element reads as 0% change, not a division by zero.
    let change_pct = if first == 0.0 {
        0.0
    } else {
        (last - first) / first * 100.0
    };
    let trend = if change_pct > 1.0 {
        Trend::Up
    } else if change_pct < -1.0 {
        Trend::Down
    } else {
        Trend::Flat
    };

    Ok(SeriesStats {
        min: round2(min),
        max: round2(max),
        avg: round2(avg),
        volatility: round2(volatility),
        trend,
        data_points: prices.len(),
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_series_is_flat_with_zero_volatility() {
        let stats = analyze(&[100.0, 100.0, 100.0]).unwrap();
        assert_eq!(stats.trend, Trend::Flat);
        assert_eq!(stats.volatility, 0.0);
        assert_eq!(stats.min, 100.0);
        assert_eq!(stats.max, 100.0);
        assert_eq!(stats.avg, 100.0);
        assert_eq!(stats.data_points, 3);
    }

    #[test]
    fn trend_thresholds_sit_at_one_percent() {
        assert_eq!(analyze(&[100.0, 102.0]).unwrap().trend, Trend::Up);
        assert_eq!(analyze(&[100.0, 98.0]).unwrap().trend, Trend::Down);
        // Below the dead band in either direction.
        assert_eq!(analyze(&[100.0, 100.5]).unwrap().trend, Trend::Flat);
        assert_eq!(analyze(&[100.0, 99.5]).unwrap().trend, Trend::Flat);
    }

    #[test]
    fn zero_first_element_reads_as_flat() {
        assert_eq!(analyze(&[0.0, 50.0]).unwrap().trend, Trend::Flat);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(analyze(&[]), Err(ChartError::NoData)));
    }

    #[test]
    fn volatility_is_the_population_standard_deviation() {
        // mean = 4, squared deviations (4, 0, 4) → variance 8/3
        let stats = analyze(&[2.0, 4.0, 6.0]).unwrap();
        let expected = (8.0_f64 / 3.0).sqrt();
        assert_eq!(stats.volatility, (expected * 100.0).round() / 100.0);
    }

    #[test]
    fn outputs_are_rounded_to_two_decimals() {
        let stats = analyze(&[1.0 / 3.0, 2.0 / 3.0]).unwrap();
        assert_eq!(stats.min, 0.33);
        assert_eq!(stats.max, 0.67);
        assert_eq!(stats.avg, 0.5);
    }

    #[test]
    fn average_sits_between_min_and_max() {
        let stats = analyze(&[10.0, 35.5, 21.2, 18.9]).unwrap();
        assert!(stats.min <= stats.avg && stats.avg <= stats.max);
    }
}
