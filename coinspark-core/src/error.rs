//! Crate-wide error types.
//!
//! Two conditions reach callers: every acquisition tier came up empty, or
//! the final tier exhausted its providers. Everything else is swallowed by
//! the tier fall-through policy and surfaces only as warnings.

use thiserror::Error;

/// Errors surfaced by the chart pipeline.
#[derive(Debug, Error)]
pub enum ChartError {
    /// No tier produced a non-empty series, or analysis/rendering was
    /// handed an empty one.
    #[error("no price data available")]
    NoData,

    /// The last acquisition tier ran out of providers.
    #[error("Failed to fetch {operation}: {message}")]
    Upstream {
        operation: &'static str,
        message: String,
    },
}

impl ChartError {
    /// Wrap a failure from the embedded-sparkline fast path.
    pub fn sparkline_failure(err: impl std::fmt::Display) -> Self {
        ChartError::Upstream {
            operation: "sparkline data",
            message: err.to_string(),
        }
    }

    /// Wrap a failure from the market-chart/spot path.
    pub fn market_chart_failure(err: impl std::fmt::Display) -> Self {
        ChartError::Upstream {
            operation: "market chart data",
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_messages_carry_stable_prefixes() {
        let spark = ChartError::sparkline_failure("boom");
        assert_eq!(spark.to_string(), "Failed to fetch sparkline data: boom");

        let chart = ChartError::market_chart_failure("all providers failed");
        assert_eq!(
            chart.to_string(),
            "Failed to fetch market chart data: all providers failed"
        );
    }
}
