//! # cryptomat-core
//!
//! Price-query client for cryptocurrency exchange REST APIs.
//!
//! Three operations make up the capability set of every exchange adapter:
//!
//! - **Connectivity check** - does the liveness route answer with HTTP 200
//! - **Latest close price** - close field of the first kline returned
//! - **Windowed % change** - `(last_close - first_close) / first_close * 100`
//!
//! ```text
//!  closes:   100 ── 110 ── 90 ── 99
//!            ▲                    ▲
//!          first               latest     → (99 - 100) / 100 * 100 = -1.00 %
//! ```
//!
//! Every request path returns a [`Result`]; transport failures, HTTP error
//! statuses, empty series and zero baselines each map to their own
//! [`ExchangeError`] variant.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cryptomat_core::exchange::{BinanceClient, ExchangeClient};
//!
//! let client = BinanceClient::from_env();
//! if client.test_connection().await {
//!     let change = client.get_change("BTCUSDT", "1h", 24).await?;
//!     println!("24h: {change:+.2}%");
//! }
//! ```

pub mod error;
pub mod exchange;
pub mod model;

pub use error::{ExchangeError, Result};
pub use exchange::{BinanceClient, BinanceConfig, ExchangeClient, MockExchangeClient};
pub use model::{percent_change, CoinBoard, CoinSnapshot, Kline, KlineParams, KlineSeries};
