//! HTTP Handlers

use axum::{
    extract::State,
    response::Html,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::board::{self, BoardView};
use crate::render::render_page;
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub source: &'static str,
    pub exchange: String,
    pub exchange_connected: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// Index page with the coin table
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let view = board::collect(&state).await;
    Html(render_page(&view, state.config.source.as_str()))
}

/// Coin board as JSON
pub async fn coins(State(state): State<AppState>) -> Json<BoardView> {
    Json(board::collect(&state).await)
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let exchange_connected = state.exchange.test_connection().await;

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        source: state.config.source.as_str(),
        exchange: state.exchange.name().to_string(),
        exchange_connected,
    })
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/api/coins", get(coins))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use cryptomat_core::MockExchangeClient;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::{BoardSource, ViewerConfig};

    fn app(source: BoardSource, exchange: MockExchangeClient) -> Router {
        let config = ViewerConfig {
            source,
            symbols: vec!["BTCUSDT".into(), "ETHUSDT".into()],
            mock_records: 3,
            ..Default::default()
        };
        router(AppState::new(Arc::new(exchange), config))
    }

    async fn get_body(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_index_mock() {
        let (status, body) = get_body(app(BoardSource::Mock, MockExchangeClient::new()), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Welcome to cryptomat's viewer!"));
        assert!(body.contains("<td>coin_2</td>"));
        assert!(body.contains("<td>1000.00</td>"));
    }

    #[tokio::test]
    async fn test_coins_live() {
        let (status, body) = get_body(app(BoardSource::Exchange, MockExchangeClient::new()), "/api/coins").await;
        assert_eq!(status, StatusCode::OK);

        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["coins"]["BTCUSDT"]["current_price"], 95_100.0);
        assert_eq!(json["coins"]["ETHUSDT"]["ath"], 3_475.0);
        assert!(json["unavailable"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_health_reports_exchange() {
        let (status, body) = get_body(app(BoardSource::Mock, MockExchangeClient::new().with_health(false)), "/health").await;
        assert_eq!(status, StatusCode::OK);

        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["source"], "mock");
        assert_eq!(json["exchange"], "MockExchange");
        assert_eq!(json["exchange_connected"], false);
    }
}
