//! Provider identity, the fetch seam, and ordered-fallback plumbing.
//!
//! The `FetchBackend` trait abstracts over the HTTP layer so the chart
//! service can run against scripted backends in tests. `try_providers` is
//! the single attempt-in-order combinator every acquisition tier shares.

use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

use crate::series::Currency;

/// Upstream data providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    CoinGecko,
    CoinCap,
    CoinPaprika,
    Binance,
    Kraken,
}

impl ProviderId {
    pub const ALL: [ProviderId; 5] = [
        ProviderId::CoinGecko,
        ProviderId::CoinCap,
        ProviderId::CoinPaprika,
        ProviderId::Binance,
        ProviderId::Kraken,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ProviderId::CoinGecko => "coingecko",
            ProviderId::CoinCap => "coincap",
            ProviderId::CoinPaprika => "coinpaprika",
            ProviderId::Binance => "binance",
            ProviderId::Kraken => "kraken",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Providers whose coin-detail resource embeds a 7-day sparkline array.
pub const SPARKLINE_PROVIDERS: &[ProviderId] = &[ProviderId::CoinGecko];

/// Providers serving the generic market-chart endpoint.
pub const CHART_PROVIDERS: &[ProviderId] = &[
    ProviderId::CoinGecko,
    ProviderId::CoinCap,
    ProviderId::CoinPaprika,
];

/// Providers serving a bare spot-price snapshot.
pub const SPOT_PROVIDERS: &[ProviderId] = &[
    ProviderId::CoinGecko,
    ProviderId::CoinCap,
    ProviderId::CoinPaprika,
    ProviderId::Binance,
    ProviderId::Kraken,
];

/// Sampling granularity for the market-chart endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval {
    Hourly,
    Daily,
}

impl Interval {
    pub fn as_str(self) -> &'static str {
        match self {
            Interval::Hourly => "hourly",
            Interval::Daily => "daily",
        }
    }
}

/// Structured fetch-layer errors.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by {provider}")]
    RateLimited { provider: ProviderId },

    #[error("HTTP {status} from {provider}")]
    HttpStatus { provider: ProviderId, status: u16 },

    #[error("unexpected response shape from {provider}: {detail}")]
    ResponseShape { provider: ProviderId, detail: String },

    #[error("{provider} is cooling down after repeated failures")]
    CircuitOpen { provider: ProviderId },

    #[error("{provider} does not serve {what}")]
    Unsupported { provider: ProviderId, what: String },

    #[error("all {count} providers failed (last: {last})")]
    Exhausted { count: usize, last: String },
}

/// Coin-detail resource, reduced to the field the acquirer inspects.
#[derive(Debug, Clone, Default)]
pub struct CoinDetail {
    /// 7-day sparkline prices, when the provider embeds them.
    pub sparkline_7d: Option<Vec<f64>>,
}

/// Market-chart response: `[timestamp-ms, price]` pairs in upstream order.
#[derive(Debug, Clone)]
pub struct MarketChart {
    pub points: Vec<(i64, f64)>,
}

impl MarketChart {
    /// Price components, order preserved.
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|&(_, price)| price).collect()
    }
}

/// Spot snapshot: price per quote currency.
#[derive(Debug, Clone, Default)]
pub struct SpotQuote {
    pub prices: HashMap<Currency, f64>,
}

impl SpotQuote {
    /// Price in `currency`, falling back to USD when absent.
    pub fn price_for(&self, currency: Currency) -> Option<f64> {
        self.prices
            .get(&currency)
            .or_else(|| self.prices.get(&Currency::Usd))
            .copied()
    }
}

/// The fetch seam: one method per upstream resource shape.
///
/// Implementations fail cleanly rather than returning partial data; shape
/// detection beyond that (a missing sparkline array, an absent currency) is
/// the acquirer's job.
pub trait FetchBackend: Send + Sync {
    /// Coin-detail resource with sparkline data requested.
    fn coin_detail(
        &self,
        provider: ProviderId,
        currency: Currency,
    ) -> Result<CoinDetail, FetchError>;

    /// Price history across `days`, sampled at `interval`.
    fn market_chart(
        &self,
        provider: ProviderId,
        currency: Currency,
        days: f64,
        interval: Interval,
    ) -> Result<MarketChart, FetchError>;

    /// Current-price snapshot for the given quote currencies.
    fn spot_price(
        &self,
        provider: ProviderId,
        currencies: &[Currency],
    ) -> Result<SpotQuote, FetchError>;
}

/// Attempt `op` against each provider in order; first success wins.
///
/// Individual failures are absorbed; only the last one survives, folded into
/// the `Exhausted` error when the whole list fails.
pub fn try_providers<T>(
    providers: &[ProviderId],
    mut op: impl FnMut(ProviderId) -> Result<T, FetchError>,
) -> Result<T, FetchError> {
    let mut last: Option<FetchError> = None;
    for &provider in providers {
        match op(provider) {
            Ok(value) => return Ok(value),
            Err(err) => last = Some(err),
        }
    }
    Err(FetchError::Exhausted {
        count: providers.len(),
        last: last
            .map(|e| e.to_string())
            .unwrap_or_else(|| "empty provider list".into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_success_short_circuits() {
        let mut attempts = Vec::new();
        let result = try_providers(CHART_PROVIDERS, |provider| {
            attempts.push(provider);
            Ok::<_, FetchError>(provider)
        });
        assert_eq!(result.unwrap(), ProviderId::CoinGecko);
        assert_eq!(attempts, vec![ProviderId::CoinGecko]);
    }

    #[test]
    fn failures_roll_over_to_the_next_provider() {
        let result = try_providers(CHART_PROVIDERS, |provider| {
            if provider == ProviderId::CoinPaprika {
                Ok(provider)
            } else {
                Err(FetchError::NetworkUnreachable("down".into()))
            }
        });
        assert_eq!(result.unwrap(), ProviderId::CoinPaprika);
    }

    #[test]
    fn exhaustion_reports_the_last_error() {
        let result: Result<(), _> = try_providers(SPARKLINE_PROVIDERS, |provider| {
            Err(FetchError::RateLimited { provider })
        });
        match result.unwrap_err() {
            FetchError::Exhausted { count, last } => {
                assert_eq!(count, 1);
                assert!(last.contains("rate limited by coingecko"));
            }
            other => panic!("expected Exhausted, got {other}"),
        }
    }

    #[test]
    fn spot_quote_falls_back_to_usd() {
        let mut prices = HashMap::new();
        prices.insert(Currency::Usd, 50_000.0);
        let quote = SpotQuote { prices };

        assert_eq!(quote.price_for(Currency::Usd), Some(50_000.0));
        assert_eq!(quote.price_for(Currency::Eur), Some(50_000.0));

        let empty = SpotQuote::default();
        assert_eq!(empty.price_for(Currency::Eur), None);
    }

    #[test]
    fn sparkline_tier_is_restricted_to_embedding_providers() {
        assert_eq!(SPARKLINE_PROVIDERS, &[ProviderId::CoinGecko]);
        // Each tier widens the net.
        assert!(SPARKLINE_PROVIDERS.len() < CHART_PROVIDERS.len());
        assert!(CHART_PROVIDERS.len() < SPOT_PROVIDERS.len());
    }
}
