//! cryptomat viewer HTTP server
//!
//! Axum-based server rendering price data from the mock generator or a live
//! exchange.

use std::sync::Arc;

use cryptomat_core::{BinanceClient, ExchangeClient};
use cryptomat_viewer::{init_tracing, router, AppState, BoardSource, ViewerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    init_tracing("info,tower_http=debug");

    let config = ViewerConfig::from_env()?;

    let exchange: Arc<dyn ExchangeClient> = Arc::new(BinanceClient::from_env());

    if config.source == BoardSource::Exchange {
        if exchange.test_connection().await {
            tracing::info!("✓ Connected to {}", exchange.name());
        } else {
            tracing::warn!("⚠ {} not reachable - live prices will be unavailable", exchange.name());
        }
        tracing::info!("Tracking {} symbols: {}", config.symbols.len(), config.symbols.join(", "));
    } else {
        tracing::info!("Serving {} mock records", config.mock_records);
    }

    let addr = config.bind_addr.clone();
    let app = router(AppState::new(exchange, config));

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("cryptomat viewer running on http://{}", addr);
    tracing::info!("  GET  /           - Coin table");
    tracing::info!("  GET  /api/coins  - Coin board (JSON)");
    tracing::info!("  GET  /health     - Health check");

    axum::serve(listener, app).await?;

    Ok(())
}
