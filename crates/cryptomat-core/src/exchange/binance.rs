//! Binance REST Client
//!
//! Public market-data routes of the Binance spot API:
//! <https://github.com/binance/binance-spot-api-docs/blob/master/rest-api.md>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use super::{validate_symbol, validate_window, ExchangeClient};
use crate::error::{ExchangeError, Result};
use crate::model::{KlineParams, KlineSeries};

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 20;

pub const PATH_PING: &str = "/api/v3/ping";
pub const PATH_KLINES: &str = "/api/v3/klines";

/// Header carrying the API key credential
pub const API_KEY_HEADER: &str = "X-MBX-APIKEY";

/// Binance client configuration
#[derive(Clone, Debug)]
pub struct BinanceConfig {
    /// REST base URL, without trailing path
    pub base_url: String,

    /// API key; empty means no credential header is sent
    pub api_key: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for BinanceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            api_key: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl BinanceConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (`BINANCE_BASE_URL`, `BINANCE_API_KEY`)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("BINANCE_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let api_key = lookup("BINANCE_API_KEY").unwrap_or_default();

        Self {
            base_url,
            api_key,
            ..Default::default()
        }
    }
}

/// Error body returned by Binance on rejected requests
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: i64,
    msg: String,
}

/// Binance spot REST client
#[derive(Clone, Debug)]
pub struct BinanceClient {
    http: Client,
    config: BinanceConfig,
}

impl BinanceClient {
    /// Create a client for `base_url`. Without an explicit key, `BINANCE_API_KEY`
    /// is read once here (empty when unset).
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let api_key = api_key
            .or_else(|| std::env::var("BINANCE_API_KEY").ok())
            .unwrap_or_default();

        Self::from_config(BinanceConfig {
            base_url: base_url.into(),
            api_key,
            ..Default::default()
        })
    }

    /// Create from configuration
    pub fn from_config(config: BinanceConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_config(BinanceConfig::from_env())
    }

    pub fn config(&self) -> &BinanceConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Issue one GET and return the body of a 200 response.
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<String> {
        let url = self.url(path);

        let mut request = self
            .http
            .get(&url)
            .query(query)
            .timeout(Duration::from_secs(self.config.timeout_secs));
        if !self.config.api_key.is_empty() {
            request = request.header(API_KEY_HEADER, &self.config.api_key);
        }

        let response = request.send().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "An error occurred during the GET {} request", url);
            ExchangeError::transport(&url, &e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Failed to read response body");
            ExchangeError::transport(&url, &e)
        })?;

        if status != StatusCode::OK {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| format!("{} (code {})", b.msg, b.code))
                .unwrap_or_else(|_| body.chars().take(200).collect());
            tracing::warn!(url = %url, status = status.as_u16(), "GET {} returned {}", url, status);
            return Err(ExchangeError::from_status(status.as_u16(), message));
        }

        Ok(body)
    }

    /// Probe `path`; `Ok` only on HTTP 200.
    pub async fn ping_at(&self, path: &str) -> Result<()> {
        self.get(path, &[]).await.map(|_| ())
    }

    pub async fn ping(&self) -> Result<()> {
        self.ping_at(PATH_PING).await
    }

    pub async fn test_connection_at(&self, path: &str) -> bool {
        match self.ping_at(path).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Connection test against {} failed: {}", self.url(path), e);
                false
            }
        }
    }

    async fn fetch_json(&self, path: &str, query: &[(String, String)]) -> Result<Value> {
        let body = self.get(path, query).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch and decode a kline array
    pub async fn fetch_klines(&self, symbol: &str, path: &str, query: &[(String, String)]) -> Result<KlineSeries> {
        let value = self.fetch_json(path, query).await?;
        let series = KlineSeries::from_json(symbol, &value)?;

        tracing::debug!(symbol, klines = series.len(), "Fetched klines");
        Ok(series)
    }

    pub async fn latest_close_price_at(&self, symbol: &str, params: &KlineParams, path: &str) -> Result<f64> {
        validate_symbol(symbol)?;
        let value = self.fetch_json(path, &params.to_query(symbol)).await?;
        KlineSeries::first_close_from_json(symbol, &value)
    }

    pub async fn change_at(&self, symbol: &str, interval: &str, duration: u32, path: &str) -> Result<f64> {
        validate_window(symbol, interval, duration)?;
        let series = self.fetch_klines(symbol, path, &window_query(symbol, interval, duration)).await?;
        series.percent_change()
    }

    pub async fn window_high_at(&self, symbol: &str, interval: &str, duration: u32, path: &str) -> Result<f64> {
        validate_window(symbol, interval, duration)?;
        let series = self.fetch_klines(symbol, path, &window_query(symbol, interval, duration)).await?;
        series.highest_high()
    }
}

fn window_query(symbol: &str, interval: &str, duration: u32) -> Vec<(String, String)> {
    KlineParams::empty()
        .with("interval", interval)
        .with("limit", duration.to_string())
        .to_query(symbol)
}

#[async_trait]
impl ExchangeClient for BinanceClient {
    async fn test_connection(&self) -> bool {
        self.test_connection_at(PATH_PING).await
    }

    async fn get_latest_close_price(&self, symbol: &str, params: &KlineParams) -> Result<f64> {
        self.latest_close_price_at(symbol, params, PATH_KLINES).await
    }

    async fn get_change(&self, symbol: &str, interval: &str, duration: u32) -> Result<f64> {
        self.change_at(symbol, interval, duration, PATH_KLINES).await
    }

    async fn get_window_high(&self, symbol: &str, interval: &str, duration: u32) -> Result<f64> {
        self.window_high_at(symbol, interval, duration, PATH_KLINES).await
    }

    fn name(&self) -> &str {
        "Binance"
    }
}
