//! Viewer Configuration

use std::str::FromStr;

use cryptomat_core::exchange::DEFAULT_MOCK_RECORDS;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_SYMBOLS: &[&str] = &["BTCUSDT", "ETHUSDT", "SOLUSDT"];

/// Where the coin board comes from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoardSource {
    /// Random records from the mock generator
    Mock,
    /// Live prices from the configured exchange client
    Exchange,
}

impl BoardSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Exchange => "binance",
        }
    }
}

impl FromStr for BoardSource {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "binance" | "live" => Ok(Self::Exchange),
            other => anyhow::bail!("unknown VIEWER_SOURCE '{other}' (expected 'mock' or 'binance')"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ViewerConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,

    pub source: BoardSource,

    /// Trading pairs shown in live mode
    pub symbols: Vec<String>,

    /// Number of records generated in mock mode
    pub mock_records: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            source: BoardSource::Mock,
            symbols: DEFAULT_SYMBOLS.iter().map(|s| (*s).to_string()).collect(),
            mock_records: DEFAULT_MOCK_RECORDS,
        }
    }
}

impl ViewerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let bind_addr = lookup("BIND_ADDR").unwrap_or(defaults.bind_addr);
        let source = match lookup("VIEWER_SOURCE") {
            Some(s) => s.parse()?,
            None => defaults.source,
        };
        let symbols = lookup("VIEWER_SYMBOLS")
            .map(|s| parse_symbols(&s))
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.symbols);
        let mock_records = match lookup("MOCK_RECORDS") {
            Some(n) => n
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid MOCK_RECORDS '{n}': {e}"))?,
            None => defaults.mock_records,
        };

        Ok(Self {
            bind_addr,
            source,
            symbols,
            mock_records,
        })
    }
}

fn parse_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8000");
        assert_eq!(config.source, BoardSource::Mock);
        assert_eq!(config.symbols, vec!["BTCUSDT", "ETHUSDT", "SOLUSDT"]);
        assert_eq!(config.mock_records, 20);
    }

    #[test]
    fn test_overrides() {
        let config = ViewerConfig::from_lookup(lookup(&[
            ("BIND_ADDR", "127.0.0.1:9000"),
            ("VIEWER_SOURCE", "Binance"),
            ("VIEWER_SYMBOLS", " btcusdt, ,dogeusdt "),
            ("MOCK_RECORDS", "3"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.source, BoardSource::Exchange);
        assert_eq!(config.symbols, vec!["BTCUSDT", "DOGEUSDT"]);
        assert_eq!(config.mock_records, 3);
    }

    #[test]
    fn test_invalid_values() {
        assert!(ViewerConfig::from_lookup(lookup(&[("VIEWER_SOURCE", "kraken")])).is_err());
        assert!(ViewerConfig::from_lookup(lookup(&[("MOCK_RECORDS", "many")])).is_err());
    }
}
