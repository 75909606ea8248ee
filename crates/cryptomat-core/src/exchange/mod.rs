//! Exchange Integration
//!
//! Abstractions and implementations for cryptocurrency exchanges.

mod binance;
mod mock;

pub use binance::{BinanceClient, BinanceConfig};
pub use mock::{generate_records, generate_records_json, MockExchangeClient, DEFAULT_MOCK_RECORDS};

use async_trait::async_trait;

use crate::error::{ExchangeError, Result};
use crate::model::KlineParams;

/// Exchange client trait (Strategy pattern)
///
/// Implement this for each exchange: Binance, Coinbase, Kraken, etc.
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Check if the exchange answers its liveness route
    async fn test_connection(&self) -> bool;

    /// Close price of the first kline returned for `symbol`
    async fn get_latest_close_price(&self, symbol: &str, params: &KlineParams) -> Result<f64>;

    /// % change between the first and last close of `duration` klines
    async fn get_change(&self, symbol: &str, interval: &str, duration: u32) -> Result<f64>;

    /// Highest price reached over `duration` klines
    async fn get_window_high(&self, symbol: &str, interval: &str, duration: u32) -> Result<f64>;

    /// Exchange name
    fn name(&self) -> &str;
}

pub(crate) fn validate_symbol(symbol: &str) -> Result<()> {
    if symbol.trim().is_empty() {
        return Err(ExchangeError::InvalidInput("symbol must not be empty".into()));
    }
    Ok(())
}

pub(crate) fn validate_window(symbol: &str, interval: &str, duration: u32) -> Result<()> {
    validate_symbol(symbol)?;
    if interval.trim().is_empty() {
        return Err(ExchangeError::InvalidInput("interval must not be empty".into()));
    }
    if duration == 0 {
        return Err(ExchangeError::InvalidInput("duration must be a positive number of klines".into()));
    }
    Ok(())
}
