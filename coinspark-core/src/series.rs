//! Domain vocabulary: quote currencies, timeframes, and the price series.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ChartError;
use crate::render;
use crate::stats::{self, SeriesStats};

/// Quote currencies the upstream providers accept for bitcoin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Jpy,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Usd, Currency::Eur, Currency::Gbp, Currency::Jpy];

    /// Lowercase code as the APIs spell it.
    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Eur => "eur",
            Currency::Gbp => "gbp",
            Currency::Jpy => "jpy",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "usd" => Ok(Currency::Usd),
            "eur" => Ok(Currency::Eur),
            "gbp" => Ok(Currency::Gbp),
            "jpy" => Ok(Currency::Jpy),
            other => Err(format!("unknown currency '{other}' (valid: usd, eur, gbp, jpy)")),
        }
    }
}

/// Chart lookback windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1h")]
    Hour,
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "1y")]
    Year,
}

impl Timeframe {
    pub const ALL: [Timeframe; 5] = [
        Timeframe::Hour,
        Timeframe::Day,
        Timeframe::Week,
        Timeframe::Month,
        Timeframe::Year,
    ];

    /// Day count used by the generic time-series endpoint.
    pub fn days(self) -> f64 {
        match self {
            Timeframe::Hour => 1.0 / 24.0,
            Timeframe::Day => 1.0,
            Timeframe::Week => 7.0,
            Timeframe::Month => 30.0,
            Timeframe::Year => 365.0,
        }
    }

    /// Label stored on a returned series.
    ///
    /// A 1y request is re-labeled 30d; the fetched window is unchanged.
    pub fn label(self) -> Timeframe {
        match self {
            Timeframe::Year => Timeframe::Month,
            other => other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Timeframe::Hour => "1h",
            Timeframe::Day => "24h",
            Timeframe::Week => "7d",
            Timeframe::Month => "30d",
            Timeframe::Year => "1y",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1h" => Ok(Timeframe::Hour),
            "24h" => Ok(Timeframe::Day),
            "7d" => Ok(Timeframe::Week),
            "30d" => Ok(Timeframe::Month),
            "1y" => Ok(Timeframe::Year),
            other => Err(format!(
                "unknown timeframe '{other}' (valid: 1h, 24h, 7d, 30d, 1y)"
            )),
        }
    }
}

/// An acquired, time-ordered price sequence plus the request that shaped it.
///
/// `prices` is ascending in time and never empty once a series leaves the
/// acquirer — empty sequences are an error condition, not a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub prices: Vec<f64>,
    pub timeframe: Timeframe,
    pub currency: Currency,
    pub width: usize,
    pub height: usize,
}

impl PriceSeries {
    /// Summary statistics over the price sequence.
    pub fn stats(&self) -> Result<SeriesStats, ChartError> {
        stats::analyze(&self.prices)
    }

    /// Rasterize the sequence onto this series' character grid.
    pub fn render(&self) -> String {
        render::render(&self.prices, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_roundtrips_through_strings() {
        for currency in Currency::ALL {
            assert_eq!(currency.code().parse::<Currency>().unwrap(), currency);
        }
        assert!("chf".parse::<Currency>().is_err());
    }

    #[test]
    fn timeframe_roundtrips_through_strings() {
        for timeframe in Timeframe::ALL {
            assert_eq!(timeframe.as_str().parse::<Timeframe>().unwrap(), timeframe);
        }
        assert!("90d".parse::<Timeframe>().is_err());
    }

    #[test]
    fn day_counts_match_the_endpoint_mapping() {
        assert!((Timeframe::Hour.days() - 1.0 / 24.0).abs() < 1e-12);
        assert_eq!(Timeframe::Day.days(), 1.0);
        assert_eq!(Timeframe::Week.days(), 7.0);
        assert_eq!(Timeframe::Month.days(), 30.0);
        assert_eq!(Timeframe::Year.days(), 365.0);
    }

    #[test]
    fn one_year_label_rewrites_to_30d() {
        assert_eq!(Timeframe::Year.label(), Timeframe::Month);
        for timeframe in [Timeframe::Hour, Timeframe::Day, Timeframe::Week, Timeframe::Month] {
            assert_eq!(timeframe.label(), timeframe);
        }
    }
}
