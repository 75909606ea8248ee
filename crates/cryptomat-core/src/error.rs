//! Error Types for the exchange client

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExchangeError>;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("Exchange unreachable during '{request}': {message}")]
    Unreachable { request: String, message: String },

    #[error("Request '{0}' timed out")]
    Timeout(String),

    #[error("Rate limited by exchange (HTTP {status})")]
    RateLimited { status: u16 },

    #[error("Bad request (HTTP {status}): {message}")]
    BadRequest { status: u16, message: String },

    #[error("Exchange server error (HTTP {status})")]
    Server { status: u16 },

    #[error("Unexpected HTTP status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("No kline data returned for {0}")]
    NoData(String),

    #[error("Malformed kline data: {0}")]
    MalformedKline(String),

    #[error("Invalid baseline price {price} for {symbol}")]
    InvalidBaseline { symbol: String, price: f64 },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ExchangeError {
    /// Build a transport error for the request identified by `request`.
    pub(crate) fn transport(request: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(request.to_string())
        } else {
            Self::Unreachable {
                request: request.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// Map a non-200 status to its error class.
    pub(crate) fn from_status(status: u16, message: String) -> Self {
        match status {
            429 | 418 => Self::RateLimited { status },
            400..=499 => Self::BadRequest { status, message },
            500..=599 => Self::Server { status },
            _ => Self::UnexpectedStatus { status },
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RateLimited { status }
            | Self::BadRequest { status, .. }
            | Self::Server { status }
            | Self::UnexpectedStatus { status } => Some(*status),
            _ => None,
        }
    }

    /// Check if a later attempt could succeed without changing the input
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Unreachable { .. } | Self::Timeout(_) | Self::RateLimited { .. } | Self::Server { .. }
        )
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::Unreachable { .. } => "The exchange is currently unreachable.".into(),
            Self::Timeout(_) => "The exchange did not answer in time.".into(),
            Self::RateLimited { .. } => "Too many requests to the exchange. Please wait a moment.".into(),
            Self::BadRequest { message, .. } => format!("The exchange rejected the request: {message}"),
            Self::Server { .. } => "The exchange reported an internal error.".into(),
            Self::NoData(symbol) => format!("No price data available for {symbol}."),
            Self::InvalidBaseline { symbol, .. } => {
                format!("Cannot compute a change for {symbol}: baseline price is zero.")
            }
            Self::InvalidInput(msg) => format!("Invalid input: {msg}"),
            _ => "An unexpected error occurred.".into(),
        }
    }
}
