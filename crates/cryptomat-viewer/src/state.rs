//! Application State

use std::sync::Arc;

use cryptomat_core::ExchangeClient;

use crate::config::ViewerConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Exchange adapter used in live mode and for health reporting
    pub exchange: Arc<dyn ExchangeClient>,

    pub config: Arc<ViewerConfig>,
}

impl AppState {
    pub fn new(exchange: Arc<dyn ExchangeClient>, config: ViewerConfig) -> Self {
        Self {
            exchange,
            config: Arc::new(config),
        }
    }
}
