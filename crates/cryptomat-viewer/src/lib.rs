//! # cryptomat-viewer
//!
//! Web view over cryptomat price data plus a command-line probe.
//!
//! ## Endpoints
//!
//! - `GET /`          - HTML table of coins (prices and ATH rounded to 2 places)
//! - `GET /api/coins` - The same board as JSON
//! - `GET /health`    - Server and exchange health

pub mod board;
pub mod config;
pub mod handlers;
pub mod render;
pub mod state;

pub use config::{BoardSource, ViewerConfig};
pub use handlers::router;
pub use state::AppState;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing from `RUST_LOG`, falling back to `default_filter`
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
