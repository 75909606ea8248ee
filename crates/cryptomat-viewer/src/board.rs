//! Coin Board
//!
//! Collects the `{name -> {current_price, ath, change_24}}` records the page
//! renders, either from the mock generator or from an exchange adapter.

use futures::future::join_all;
use serde::Serialize;

use cryptomat_core::exchange::generate_records_json;
use cryptomat_core::{CoinBoard, CoinSnapshot, ExchangeClient, KlineParams};

use crate::config::BoardSource;
use crate::state::AppState;

/// Candlestick granularity and count behind the 24h change column
pub const CHANGE_INTERVAL: &str = "1h";
pub const CHANGE_WINDOW: u32 = 24;

/// Monthly klines approximating the all-time high
pub const ATH_INTERVAL: &str = "1M";
pub const ATH_WINDOW: u32 = 1000;

/// A symbol that could not be shown, with the reason
#[derive(Clone, Debug, Serialize)]
pub struct Unavailable {
    pub name: String,
    pub reason: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct BoardView {
    pub coins: CoinBoard,
    pub unavailable: Vec<Unavailable>,
}

/// Build the board for the configured source
pub async fn collect(state: &AppState) -> BoardView {
    match state.config.source {
        BoardSource::Mock => mock_board(state.config.mock_records),
        BoardSource::Exchange => live_board(state.exchange.as_ref(), &state.config.symbols).await,
    }
}

/// Board from the mock generator. Its output is treated as opaque JSON.
pub fn mock_board(count: usize) -> BoardView {
    let parsed = generate_records_json(count)
        .and_then(|json| serde_json::from_str::<CoinBoard>(&json).map_err(Into::into));

    match parsed {
        Ok(coins) => BoardView {
            coins,
            unavailable: Vec::new(),
        },
        Err(e) => {
            tracing::error!("Mock generator produced unusable records: {}", e);
            BoardView {
                coins: CoinBoard::new(),
                unavailable: vec![Unavailable {
                    name: "mock".into(),
                    reason: e.to_string(),
                }],
            }
        }
    }
}

/// Board from live exchange data, one concurrent query set per symbol
pub async fn live_board(exchange: &dyn ExchangeClient, symbols: &[String]) -> BoardView {
    let results = join_all(symbols.iter().map(|symbol| async move {
        (symbol.clone(), snapshot(exchange, symbol).await)
    }))
    .await;

    let mut view = BoardView::default();
    for (name, result) in results {
        match result {
            Ok(snapshot) => {
                view.coins.insert(name, snapshot);
            }
            Err(e) => {
                tracing::warn!(symbol = %name, "Price data unavailable: {}", e);
                view.unavailable.push(Unavailable {
                    name,
                    reason: e.user_message(),
                });
            }
        }
    }
    view
}

async fn snapshot(exchange: &dyn ExchangeClient, symbol: &str) -> cryptomat_core::Result<CoinSnapshot> {
    let params = KlineParams::default();
    let (current_price, change_24, ath) = tokio::try_join!(
        exchange.get_latest_close_price(symbol, &params),
        exchange.get_change(symbol, CHANGE_INTERVAL, CHANGE_WINDOW),
        exchange.get_window_high(symbol, ATH_INTERVAL, ATH_WINDOW),
    )?;

    Ok(CoinSnapshot {
        current_price,
        ath,
        change_24,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cryptomat_core::MockExchangeClient;

    #[test]
    fn test_mock_board() {
        let view = mock_board(4);
        assert_eq!(view.coins.len(), 4);
        assert!(view.unavailable.is_empty());
        assert!(view.coins.contains_key("coin_3"));
    }

    #[tokio::test]
    async fn test_live_board() {
        let exchange = MockExchangeClient::empty()
            .with_series("BTCUSDT", vec![100.0, 120.0, 110.0])
            .with_series("ZEROUSDT", vec![0.0, 1.0]);
        let symbols = vec!["BTCUSDT".to_string(), "ZEROUSDT".to_string(), "NOPEUSDT".to_string()];

        let view = live_board(&exchange, &symbols).await;

        let btc = &view.coins["BTCUSDT"];
        assert_eq!(btc.current_price, 100.0);
        assert_eq!(btc.ath, 120.0);
        assert!((btc.change_24 - 10.0).abs() < 1e-9);

        let names: Vec<&str> = view.unavailable.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["ZEROUSDT", "NOPEUSDT"]);
    }
}
