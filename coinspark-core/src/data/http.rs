//! Live HTTP backend over the public provider APIs.
//!
//! Each provider speaks its own response dialect; this module maps every
//! dialect onto the common shapes in `provider`. Providers that cannot serve
//! a request (CoinCap and CoinPaprika quote history only in USD, Binance
//! lists no BTC/JPY market) report `FetchError::Unsupported` so the fallback
//! order moves on. A per-provider circuit breaker refuses requests to a
//! provider that recently blocked us or failed repeatedly.
//!
//! None of these APIs require authentication; rate limits are the only
//! practical constraint, which is what the breaker absorbs.

use chrono::Utc;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::circuit_breaker::CircuitBreaker;
use super::provider::{
    CoinDetail, FetchBackend, FetchError, Interval, MarketChart, ProviderId, SpotQuote,
};
use crate::config::ChartConfig;
use crate::series::Currency;

const GECKO_BASE: &str = "https://api.coingecko.com/api/v3";
const CAP_BASE: &str = "https://api.coincap.io/v2";
const PAPRIKA_BASE: &str = "https://api.coinpaprika.com/v1";
const BINANCE_BASE: &str = "https://api.binance.com/api/v3";
const KRAKEN_BASE: &str = "https://api.kraken.com/0/public";

/// Live backend: one blocking client, one breaker per provider.
pub struct HttpBackend {
    client: Client,
    breakers: HashMap<ProviderId, CircuitBreaker>,
}

impl HttpBackend {
    pub fn new(config: &ChartConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!("coinspark/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");

        let breakers = ProviderId::ALL
            .into_iter()
            .map(|provider| (provider, CircuitBreaker::default_provider()))
            .collect();

        Self { client, breakers }
    }

    /// One GET, breaker-gated, parsed into `T`.
    fn get_json<T: DeserializeOwned>(
        &self,
        provider: ProviderId,
        url: &str,
    ) -> Result<T, FetchError> {
        let breaker = &self.breakers[&provider];
        if !breaker.is_allowed() {
            return Err(FetchError::CircuitOpen { provider });
        }

        let resp = self.client.get(url).send().map_err(|e| {
            breaker.record_failure();
            FetchError::NetworkUnreachable(e.to_string())
        })?;

        let status = resp.status();
        if status == StatusCode::FORBIDDEN {
            // Blocked — stop hammering this provider immediately.
            breaker.trip();
            return Err(FetchError::HttpStatus {
                provider,
                status: status.as_u16(),
            });
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            breaker.record_failure();
            return Err(FetchError::RateLimited { provider });
        }
        if !status.is_success() {
            breaker.record_failure();
            return Err(FetchError::HttpStatus {
                provider,
                status: status.as_u16(),
            });
        }

        let parsed = resp.json::<T>().map_err(|e| FetchError::ResponseShape {
            provider,
            detail: e.to_string(),
        })?;
        breaker.record_success();
        Ok(parsed)
    }
}

impl FetchBackend for HttpBackend {
    fn coin_detail(
        &self,
        provider: ProviderId,
        _currency: Currency,
    ) -> Result<CoinDetail, FetchError> {
        match provider {
            ProviderId::CoinGecko => {
                let url = format!(
                    "{GECKO_BASE}/coins/bitcoin?localization=false&tickers=false\
                     &market_data=true&community_data=false&developer_data=false\
                     &sparkline=true"
                );
                let detail: GeckoCoinDetail = self.get_json(provider, &url)?;
                Ok(CoinDetail {
                    sparkline_7d: detail
                        .market_data
                        .and_then(|m| m.sparkline_7d)
                        .and_then(|s| s.price),
                })
            }
            other => Err(FetchError::Unsupported {
                provider: other,
                what: "coin detail with an embedded sparkline".into(),
            }),
        }
    }

    fn market_chart(
        &self,
        provider: ProviderId,
        currency: Currency,
        days: f64,
        interval: Interval,
    ) -> Result<MarketChart, FetchError> {
        match provider {
            ProviderId::CoinGecko => {
                let url = format!(
                    "{GECKO_BASE}/coins/bitcoin/market_chart?vs_currency={currency}\
                     &days={}&interval={}",
                    format_days(days),
                    interval.as_str()
                );
                let chart: GeckoMarketChart = self.get_json(provider, &url)?;
                Ok(MarketChart {
                    points: chart
                        .prices
                        .into_iter()
                        .map(|(ts, price)| (ts as i64, price))
                        .collect(),
                })
            }
            ProviderId::CoinCap => {
                if currency != Currency::Usd {
                    return Err(FetchError::Unsupported {
                        provider,
                        what: format!("{currency}-quoted history"),
                    });
                }
                let end = Utc::now().timestamp_millis();
                let start = end - (days * 86_400_000.0) as i64;
                let granularity = match interval {
                    Interval::Hourly => "h1",
                    Interval::Daily => "d1",
                };
                let url = format!(
                    "{CAP_BASE}/assets/bitcoin/history?interval={granularity}\
                     &start={start}&end={end}"
                );
                let history: CapHistory = self.get_json(provider, &url)?;
                let mut points = Vec::with_capacity(history.data.len());
                for point in history.data {
                    points.push((point.time, parse_price(provider, &point.price_usd)?));
                }
                Ok(MarketChart { points })
            }
            ProviderId::CoinPaprika => {
                if currency != Currency::Usd {
                    return Err(FetchError::Unsupported {
                        provider,
                        what: format!("{currency}-quoted history"),
                    });
                }
                let start = Utc::now().timestamp() - (days * 86_400.0) as i64;
                let granularity = match interval {
                    Interval::Hourly => "1h",
                    Interval::Daily => "1d",
                };
                let url = format!(
                    "{PAPRIKA_BASE}/tickers/btc-bitcoin/historical?start={start}\
                     &interval={granularity}"
                );
                let history: Vec<PaprikaHistoryPoint> = self.get_json(provider, &url)?;
                let mut points = Vec::with_capacity(history.len());
                for point in history {
                    let ts = chrono::DateTime::parse_from_rfc3339(&point.timestamp)
                        .map_err(|e| FetchError::ResponseShape {
                            provider,
                            detail: format!("bad timestamp '{}': {e}", point.timestamp),
                        })?
                        .timestamp_millis();
                    points.push((ts, point.price));
                }
                Ok(MarketChart { points })
            }
            other => Err(FetchError::Unsupported {
                provider: other,
                what: "market chart history".into(),
            }),
        }
    }

    fn spot_price(
        &self,
        provider: ProviderId,
        currencies: &[Currency],
    ) -> Result<SpotQuote, FetchError> {
        match provider {
            ProviderId::CoinGecko => {
                let vs: Vec<&str> = currencies.iter().map(|c| c.code()).collect();
                let url = format!(
                    "{GECKO_BASE}/simple/price?ids=bitcoin&vs_currencies={}",
                    vs.join(",")
                );
                let table: HashMap<String, HashMap<String, f64>> =
                    self.get_json(provider, &url)?;
                let coin = table.get("bitcoin").ok_or_else(|| FetchError::ResponseShape {
                    provider,
                    detail: "no bitcoin entry in simple price response".into(),
                })?;
                let mut prices = HashMap::new();
                for &currency in currencies {
                    if let Some(&price) = coin.get(currency.code()) {
                        prices.insert(currency, price);
                    }
                }
                if prices.is_empty() {
                    return Err(FetchError::ResponseShape {
                        provider,
                        detail: "no requested currency in simple price response".into(),
                    });
                }
                Ok(SpotQuote { prices })
            }
            ProviderId::CoinCap => {
                if !currencies.contains(&Currency::Usd) {
                    return Err(FetchError::Unsupported {
                        provider,
                        what: "non-USD spot quotes".into(),
                    });
                }
                let url = format!("{CAP_BASE}/assets/bitcoin");
                let asset: CapAsset = self.get_json(provider, &url)?;
                let price = parse_price(provider, &asset.data.price_usd)?;
                Ok(SpotQuote {
                    prices: HashMap::from([(Currency::Usd, price)]),
                })
            }
            ProviderId::CoinPaprika => {
                let quotes: Vec<String> = currencies
                    .iter()
                    .map(|c| c.code().to_uppercase())
                    .collect();
                let url = format!(
                    "{PAPRIKA_BASE}/tickers/btc-bitcoin?quotes={}",
                    quotes.join(",")
                );
                let ticker: PaprikaTicker = self.get_json(provider, &url)?;
                let mut prices = HashMap::new();
                for &currency in currencies {
                    if let Some(quote) = ticker.quotes.get(&currency.code().to_uppercase()) {
                        prices.insert(currency, quote.price);
                    }
                }
                if prices.is_empty() {
                    return Err(FetchError::ResponseShape {
                        provider,
                        detail: "no requested quote in ticker response".into(),
                    });
                }
                Ok(SpotQuote { prices })
            }
            ProviderId::Binance => {
                let mut prices = HashMap::new();
                let mut last_err = None;
                for &currency in currencies {
                    let Some(symbol) = binance_symbol(currency) else {
                        continue;
                    };
                    let url = format!("{BINANCE_BASE}/ticker/price?symbol={symbol}");
                    match self
                        .get_json::<BinanceTicker>(provider, &url)
                        .and_then(|ticker| parse_price(provider, &ticker.price))
                    {
                        Ok(price) => {
                            prices.insert(currency, price);
                        }
                        Err(err) => last_err = Some(err),
                    }
                }
                if prices.is_empty() {
                    return Err(last_err.unwrap_or(FetchError::Unsupported {
                        provider,
                        what: "any requested spot market".into(),
                    }));
                }
                Ok(SpotQuote { prices })
            }
            ProviderId::Kraken => {
                let mut prices = HashMap::new();
                let mut last_err = None;
                for &currency in currencies {
                    let pair = kraken_pair(currency);
                    let url = format!("{KRAKEN_BASE}/Ticker?pair={pair}");
                    match self.get_json::<KrakenTicker>(provider, &url) {
                        Ok(ticker) => {
                            if !ticker.error.is_empty() {
                                last_err = Some(FetchError::ResponseShape {
                                    provider,
                                    detail: ticker.error.join("; "),
                                });
                                continue;
                            }
                            let Some(entry) =
                                ticker.result.and_then(|r| r.into_values().next())
                            else {
                                last_err = Some(FetchError::ResponseShape {
                                    provider,
                                    detail: format!("empty result for pair {pair}"),
                                });
                                continue;
                            };
                            let Some(last_trade) = entry.c.first() else {
                                last_err = Some(FetchError::ResponseShape {
                                    provider,
                                    detail: "ticker entry has no last-trade field".into(),
                                });
                                continue;
                            };
                            match parse_price(provider, last_trade) {
                                Ok(price) => {
                                    prices.insert(currency, price);
                                }
                                Err(err) => last_err = Some(err),
                            }
                        }
                        Err(err) => last_err = Some(err),
                    }
                }
                if prices.is_empty() {
                    return Err(last_err.unwrap_or(FetchError::Unsupported {
                        provider,
                        what: "any requested spot market".into(),
                    }));
                }
                Ok(SpotQuote { prices })
            }
        }
    }
}

/// Format a day count the chart endpoints accept: integers bare, sub-day
/// windows with a short fraction.
fn format_days(days: f64) -> String {
    if days.fract() == 0.0 {
        format!("{}", days as u64)
    } else {
        format!("{days:.4}")
    }
}

/// Binance spot symbol for a quote currency; no BTC/JPY market exists.
fn binance_symbol(currency: Currency) -> Option<&'static str> {
    match currency {
        Currency::Usd => Some("BTCUSDT"),
        Currency::Eur => Some("BTCEUR"),
        Currency::Gbp => Some("BTCGBP"),
        Currency::Jpy => None,
    }
}

/// Kraken pair name; Kraken spells bitcoin XBT.
fn kraken_pair(currency: Currency) -> String {
    format!("XBT{}", currency.code().to_uppercase())
}

/// Parse a stringly-typed price field.
fn parse_price(provider: ProviderId, raw: &str) -> Result<f64, FetchError> {
    raw.parse::<f64>().map_err(|e| FetchError::ResponseShape {
        provider,
        detail: format!("bad price '{raw}': {e}"),
    })
}

// ── Provider response dialects ──────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GeckoCoinDetail {
    market_data: Option<GeckoMarketData>,
}

#[derive(Debug, Deserialize)]
struct GeckoMarketData {
    sparkline_7d: Option<GeckoSparkline>,
}

#[derive(Debug, Deserialize)]
struct GeckoSparkline {
    price: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct GeckoMarketChart {
    prices: Vec<(f64, f64)>,
}

#[derive(Debug, Deserialize)]
struct CapHistory {
    data: Vec<CapHistoryPoint>,
}

#[derive(Debug, Deserialize)]
struct CapHistoryPoint {
    #[serde(rename = "priceUsd")]
    price_usd: String,
    time: i64,
}

#[derive(Debug, Deserialize)]
struct CapAsset {
    data: CapAssetData,
}

#[derive(Debug, Deserialize)]
struct CapAssetData {
    #[serde(rename = "priceUsd")]
    price_usd: String,
}

#[derive(Debug, Deserialize)]
struct PaprikaHistoryPoint {
    timestamp: String,
    price: f64,
}

#[derive(Debug, Deserialize)]
struct PaprikaTicker {
    quotes: HashMap<String, PaprikaQuote>,
}

#[derive(Debug, Deserialize)]
struct PaprikaQuote {
    price: f64,
}

#[derive(Debug, Deserialize)]
struct BinanceTicker {
    price: String,
}

#[derive(Debug, Deserialize)]
struct KrakenTicker {
    error: Vec<String>,
    result: Option<HashMap<String, KrakenPair>>,
}

#[derive(Debug, Deserialize)]
struct KrakenPair {
    c: Vec<String>,
}
