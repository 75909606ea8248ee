//! Mock Exchange Client
//!
//! For testing and demo purposes. Serves static close series per symbol and
//! generates random coin boards that mimic the live data shape.

use std::collections::HashMap;

use async_trait::async_trait;
use rand::Rng;

use super::{validate_symbol, validate_window, ExchangeClient};
use crate::error::{ExchangeError, Result};
use crate::model::{CoinBoard, CoinSnapshot, Kline, KlineParams, KlineSeries};

/// Number of records produced when no count is configured
pub const DEFAULT_MOCK_RECORDS: usize = 20;

/// Mock exchange client with static close series
pub struct MockExchangeClient {
    series: HashMap<String, Vec<f64>>,
    healthy: bool,
}

impl Default for MockExchangeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExchangeClient {
    /// Client preloaded with a handful of USDT pairs
    pub fn new() -> Self {
        let series = [
            ("BTCUSDT", vec![95_100.0, 96_250.0, 97_800.0, 97_500.0]),
            ("ETHUSDT", vec![3_390.0, 3_420.5, 3_475.0, 3_450.0]),
            ("SOLUSDT", vec![187.0, 190.2, 193.8, 195.0]),
            ("ADAUSDT", vec![0.96, 0.97, 0.95, 0.95]),
            ("DOGEUSDT", vec![0.34, 0.36, 0.39, 0.38]),
        ]
        .into_iter()
        .map(|(symbol, closes)| (symbol.to_string(), closes))
        .collect();

        Self { series, healthy: true }
    }

    /// Client with no symbols at all
    pub fn empty() -> Self {
        Self {
            series: HashMap::new(),
            healthy: true,
        }
    }

    /// Register (or replace) the close series served for `symbol`
    pub fn with_series(mut self, symbol: impl Into<String>, closes: Vec<f64>) -> Self {
        self.series.insert(symbol.into().to_uppercase(), closes);
        self
    }

    /// Make `test_connection` report the given health
    pub fn with_health(mut self, healthy: bool) -> Self {
        self.healthy = healthy;
        self
    }

    fn klines(&self, symbol: &str, limit: Option<usize>) -> Result<KlineSeries> {
        let closes = self
            .series
            .get(&symbol.to_uppercase())
            .ok_or_else(|| ExchangeError::BadRequest {
                status: 400,
                message: format!("Invalid symbol: {symbol}"),
            })?;

        // Most recent `limit` records, oldest first
        let start = limit.map_or(0, |l| closes.len().saturating_sub(l));
        let klines = closes[start..]
            .iter()
            .enumerate()
            .map(|(i, &close)| Kline {
                open_time: i64::try_from(start + i).ok().map(|n| n.saturating_mul(60_000)),
                open: Some(close),
                high: Some(close),
                low: Some(close),
                close,
                volume: None,
            })
            .collect();

        Ok(KlineSeries::new(symbol, klines))
    }
}

#[async_trait]
impl ExchangeClient for MockExchangeClient {
    async fn test_connection(&self) -> bool {
        self.healthy
    }

    async fn get_latest_close_price(&self, symbol: &str, params: &KlineParams) -> Result<f64> {
        validate_symbol(symbol)?;
        let limit = params.get("limit").and_then(|l| l.parse().ok());
        self.klines(symbol, limit)?.first_close()
    }

    async fn get_change(&self, symbol: &str, interval: &str, duration: u32) -> Result<f64> {
        validate_window(symbol, interval, duration)?;
        self.klines(symbol, Some(duration as usize))?.percent_change()
    }

    async fn get_window_high(&self, symbol: &str, interval: &str, duration: u32) -> Result<f64> {
        validate_window(symbol, interval, duration)?;
        self.klines(symbol, Some(duration as usize))?.highest_high()
    }

    fn name(&self) -> &str {
        "MockExchange"
    }
}

/// Generate `count` random coin records named `coin_0..coin_{count-1}`.
pub fn generate_records(count: usize) -> CoinBoard {
    let mut rng = rand::rng();

    (0..count)
        .map(|i| {
            let magnitude = rng.random::<f64>() * 10.0;
            let change_24 = if rng.random_range(0..=10) % 2 == 0 { magnitude } else { -magnitude };

            let snapshot = CoinSnapshot {
                current_price: rng.random::<f64>() * 20.0,
                ath: 1000.0,
                change_24,
            };
            (format!("coin_{i}"), snapshot)
        })
        .collect()
}

/// Same as [`generate_records`], serialized to JSON the way an API would return it
pub fn generate_records_json(count: usize) -> Result<String> {
    Ok(serde_json::to_string(&generate_records(count))?)
}
