//! coinspark CLI — bitcoin price sparklines in the terminal.
//!
//! Commands:
//! - `chart` — fetch a price series and draw it with summary statistics
//! - `stats` — summary statistics only
//! - `health` — probe upstream availability (exit code reports the result)

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use coinspark_core::{ChartConfig, ChartService, Currency, PriceSeries, Timeframe};

#[derive(Parser)]
#[command(name = "coinspark", about = "Bitcoin price sparklines in the terminal")]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a price series and draw it with summary statistics.
    Chart {
        #[command(flatten)]
        request: RequestArgs,

        /// Grid width in columns. Defaults to the config value.
        #[arg(long)]
        width: Option<usize>,

        /// Grid height in rows. Defaults to the config value.
        #[arg(long)]
        height: Option<usize>,

        /// Emit the full result envelope as JSON instead of drawing.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print summary statistics without the chart.
    Stats {
        #[command(flatten)]
        request: RequestArgs,
    },
    /// Probe upstream availability with a default acquisition.
    Health,
}

#[derive(Args)]
struct RequestArgs {
    /// Quote currency: usd, eur, gbp, jpy.
    #[arg(long, default_value = "usd")]
    currency: Currency,

    /// Lookback window: 1h, 24h, 7d, 30d, 1y.
    #[arg(long, default_value = "7d")]
    timeframe: Timeframe,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ChartConfig::from_file(path)?,
        None => ChartConfig::default(),
    };
    let service = ChartService::over_http(&config);

    match cli.command {
        Commands::Chart {
            request,
            width,
            height,
            json,
        } => run_chart(&service, &config, request, width, height, json),
        Commands::Stats { request } => run_stats(&service, &config, request),
        Commands::Health => run_health(&service),
    }
}

fn run_chart(
    service: &ChartService,
    config: &ChartConfig,
    request: RequestArgs,
    width: Option<usize>,
    height: Option<usize>,
    json: bool,
) -> Result<()> {
    if json {
        let outcome = service.fetch_chart_data(request.currency, request.timeframe);
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        if !outcome.success {
            std::process::exit(1);
        }
        return Ok(());
    }

    let width = width.unwrap_or(config.width);
    let height = height.unwrap_or(config.height);
    let series = service.series(request.currency, request.timeframe, width, height)?;

    println!("{}", series.render());
    print_summary(&series)?;
    Ok(())
}

fn run_stats(service: &ChartService, config: &ChartConfig, request: RequestArgs) -> Result<()> {
    let series = service.series(
        request.currency,
        request.timeframe,
        config.width,
        config.height,
    )?;
    print_summary(&series)?;
    Ok(())
}

fn run_health(service: &ChartService) -> Result<()> {
    if service.health_check() {
        println!("OK: chart data pipeline is healthy");
        Ok(())
    } else {
        println!("FAIL: chart data pipeline is unavailable");
        std::process::exit(1);
    }
}

fn print_summary(series: &PriceSeries) -> Result<()> {
    let stats = series.stats()?;
    println!();
    println!(
        "BTC/{} {} ({} points)",
        series.currency.code().to_uppercase(),
        series.timeframe,
        stats.data_points
    );
    println!(
        "min {:.2}  max {:.2}  avg {:.2}",
        stats.min, stats.max, stats.avg
    );
    println!("trend {}  volatility {:.2}", stats.trend, stats.volatility);
    Ok(())
}
