//! Acquisition: provider fallback, HTTP backend, cache, and the chart service.

pub mod cache;
pub mod chart;
pub mod circuit_breaker;
pub mod http;
pub mod provider;
pub mod synthetic;

pub use cache::{CacheStats, SeriesCache};
pub use chart::{ChartOutcome, ChartService};
pub use circuit_breaker::CircuitBreaker;
pub use http::HttpBackend;
pub use provider::{FetchBackend, FetchError, ProviderId};
