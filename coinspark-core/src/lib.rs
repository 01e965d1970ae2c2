//! coinspark core — bitcoin price acquisition, caching, and sparkline rendering.
//!
//! The pipeline has four pieces:
//! - a fetch layer with ordered provider fallback (`data::provider`, `data::http`)
//! - a chart-data acquirer that degrades tier by tier down to synthetic
//!   extrapolation (`data::chart`)
//! - a short-lived in-memory result cache (`data::cache`)
//! - pure analysis and rendering over the acquired series (`stats`, `render`)

pub mod config;
pub mod data;
pub mod error;
pub mod render;
pub mod series;
pub mod stats;

pub use config::ChartConfig;
pub use data::chart::{ChartOutcome, ChartService};
pub use error::ChartError;
pub use series::{Currency, PriceSeries, Timeframe};
pub use stats::{analyze, SeriesStats, Trend};
