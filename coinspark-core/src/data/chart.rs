//! Chart-data acquisition with tiered fallback.
//!
//! Resolution order for a (currency, timeframe, grid) request:
//! 1. live cache entry
//! 2. 7d-only fast path: coin detail with an embedded sparkline array
//! 3. generic market-chart endpoint across the chart provider list
//! 4. synthetic extrapolation from a spot snapshot
//!
//! Tiers 2 and 3 swallow their own failures and fall through; only the final
//! tier's failure reaches the caller. Each step down trades fidelity for
//! availability: provider-shaped data first, a generic series next,
//! fabricated data last.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::{Duration, Instant};

use super::cache::{CacheStats, SeriesCache};
use super::http::HttpBackend;
use super::provider::{
    try_providers, FetchBackend, FetchError, Interval, CHART_PROVIDERS, SPARKLINE_PROVIDERS,
    SPOT_PROVIDERS,
};
use super::synthetic;
use crate::config::ChartConfig;
use crate::error::ChartError;
use crate::series::{Currency, PriceSeries, Timeframe};

/// Result of one acquisition tier: data, or a recorded reason to move on.
#[derive(Debug)]
enum TierOutcome {
    Fetched(Vec<f64>),
    Skipped(FetchError),
}

/// The chart-data service.
///
/// Process-scoped state: build one (it owns the cache) and share it by
/// reference. All methods take `&self`.
pub struct ChartService {
    backend: Box<dyn FetchBackend>,
    cache: SeriesCache,
    width: usize,
    height: usize,
}

impl ChartService {
    /// Service backed by the live HTTP providers.
    pub fn over_http(config: &ChartConfig) -> Self {
        Self::with_backend(Box::new(HttpBackend::new(config)), config)
    }

    /// Service over an arbitrary backend; tests pass scripted ones.
    pub fn with_backend(backend: Box<dyn FetchBackend>, config: &ChartConfig) -> Self {
        Self {
            backend,
            cache: SeriesCache::with_ttl(Duration::from_secs(config.cache_ttl_secs)),
            width: config.width,
            height: config.height,
        }
    }

    /// Default grid dimensions for the convenience entry point.
    pub fn grid(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Acquire a price series for `(currency, timeframe)` on a
    /// `width`×`height` grid, consulting the cache first.
    pub fn series(
        &self,
        currency: Currency,
        timeframe: Timeframe,
        width: usize,
        height: usize,
    ) -> Result<PriceSeries, ChartError> {
        let key = SeriesCache::key(currency, timeframe, width, height);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let days = timeframe.days();
        let mut prices = Vec::new();

        if timeframe == Timeframe::Week {
            match self.sparkline_tier(currency) {
                TierOutcome::Fetched(fetched) => prices = fetched,
                TierOutcome::Skipped(err) => {
                    eprintln!("WARNING: {}", ChartError::sparkline_failure(err));
                }
            }
        }

        if prices.is_empty() {
            match self.market_chart_tier(currency, days) {
                TierOutcome::Fetched(fetched) => prices = fetched,
                TierOutcome::Skipped(err) => {
                    eprintln!("WARNING: {}", ChartError::market_chart_failure(err));
                    prices = self.synthetic_tier(currency, days)?;
                }
            }
        }

        if prices.is_empty() {
            return Err(ChartError::NoData);
        }

        let series = PriceSeries {
            prices,
            timeframe: timeframe.label(),
            currency,
            width,
            height,
        };
        self.cache.put(key, series.clone());
        Ok(series)
    }

    /// Acquire on the configured default grid; never fails.
    ///
    /// The only interface for callers who want failure as data: every error
    /// is captured into the envelope.
    pub fn fetch_chart_data(&self, currency: Currency, timeframe: Timeframe) -> ChartOutcome {
        let started = Instant::now();
        let result = self.series(currency, timeframe, self.width, self.height);
        let execution_time_ms = started.elapsed().as_millis() as u64;

        match result {
            Ok(series) => ChartOutcome {
                success: true,
                data: Some(series),
                error: None,
                timestamp: Utc::now(),
                execution_time_ms,
            },
            Err(err) => ChartOutcome {
                success: false,
                data: None,
                error: Some(err.to_string()),
                timestamp: Utc::now(),
                execution_time_ms,
            },
        }
    }

    /// Probe upstream availability with a default (usd, 7d) acquisition.
    pub fn health_check(&self) -> bool {
        self.series(Currency::Usd, Timeframe::Week, self.width, self.height)
            .is_ok()
    }

    /// Cache summary for operators.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop every cached series.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Fast path: coin detail with an embedded 7-day sparkline.
    ///
    /// A present-but-empty array is a shape miss, not data — the provider is
    /// treated as failed and the fallback continues.
    fn sparkline_tier(&self, currency: Currency) -> TierOutcome {
        let fetched = try_providers(SPARKLINE_PROVIDERS, |provider| {
            let detail = self.backend.coin_detail(provider, currency)?;
            match detail.sparkline_7d {
                Some(prices) if !prices.is_empty() => Ok(prices),
                _ => Err(FetchError::ResponseShape {
                    provider,
                    detail: "coin detail carries no sparkline array".into(),
                }),
            }
        });
        match fetched {
            Ok(prices) => TierOutcome::Fetched(prices),
            Err(err) => TierOutcome::Skipped(err),
        }
    }

    /// Generic path: market-chart history across the broader provider list.
    fn market_chart_tier(&self, currency: Currency, days: f64) -> TierOutcome {
        let interval = if days <= 1.0 {
            Interval::Hourly
        } else {
            Interval::Daily
        };
        let fetched = try_providers(CHART_PROVIDERS, |provider| {
            self.backend.market_chart(provider, currency, days, interval)
        });
        match fetched {
            Ok(chart) => TierOutcome::Fetched(chart.prices()),
            Err(err) => TierOutcome::Skipped(err),
        }
    }

    /// Last resort: extrapolate from a single spot price.
    ///
    /// This tier's failure is the one callers see, wrapped with the
    /// market-chart operation prefix.
    fn synthetic_tier(&self, currency: Currency, days: f64) -> Result<Vec<f64>, ChartError> {
        let want = if currency == Currency::Usd {
            vec![currency]
        } else {
            vec![currency, Currency::Usd]
        };
        let quote = try_providers(SPOT_PROVIDERS, |provider| {
            self.backend.spot_price(provider, &want)
        })
        .map_err(ChartError::market_chart_failure)?;

        let price = quote.price_for(currency).ok_or_else(|| {
            ChartError::market_chart_failure(format!("spot snapshot has no {currency} price"))
        })?;

        eprintln!(
            "WARNING: extrapolating a synthetic series from a single {currency} spot price"
        );
        Ok(synthetic::extrapolate(price, days, &mut rand::thread_rng()))
    }
}

/// Uniform result envelope for external callers.
#[derive(Debug, Clone, Serialize)]
pub struct ChartOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PriceSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub execution_time_ms: u64,
}
