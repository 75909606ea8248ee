//! Domain Models
//!
//! Kline (candlestick) records as returned by exchange REST APIs, the
//! windowed percentage-change math built on them, and the coin snapshot
//! shape consumed by the display layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::{ExchangeError, Result};

/// Index of the open time within a raw kline record
pub const FIELD_OPEN_TIME: usize = 0;
/// Index of the high price within a raw kline record
pub const FIELD_HIGH: usize = 2;
/// Index of the close price within a raw kline record
pub const FIELD_CLOSE: usize = 4;
/// Index of the volume within a raw kline record
pub const FIELD_VOLUME: usize = 5;

/// Minimum number of fields a record must carry to expose a close price
pub const MIN_KLINE_FIELDS: usize = FIELD_CLOSE + 1;

/// One candlestick: `[open_time, open, high, low, close, volume, ...]`
///
/// Only the close price is required. The other fields are kept when they
/// parse and left as `None` otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Kline {
    /// Bucket start, milliseconds since the Unix epoch
    pub open_time: Option<i64>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    /// Base asset volume
    pub volume: Option<f64>,
}

impl Kline {
    /// Kline carrying only a close price
    pub fn from_close(close: f64) -> Self {
        Self {
            open_time: None,
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
        }
    }

    /// Parse a raw record. Price fields may be JSON strings or numbers.
    pub fn from_fields(fields: &[Value]) -> Result<Self> {
        if fields.len() < MIN_KLINE_FIELDS {
            return Err(ExchangeError::MalformedKline(format!(
                "expected at least {MIN_KLINE_FIELDS} fields, got {}",
                fields.len()
            )));
        }

        let close = numeric_field(&fields[FIELD_CLOSE]).ok_or_else(|| {
            ExchangeError::MalformedKline(format!("close price is not a finite number: {}", fields[FIELD_CLOSE]))
        })?;

        Ok(Self {
            open_time: open_time_field(&fields[FIELD_OPEN_TIME]),
            open: numeric_field(&fields[1]),
            high: numeric_field(&fields[FIELD_HIGH]),
            low: numeric_field(&fields[3]),
            close,
            volume: fields.get(FIELD_VOLUME).and_then(numeric_field),
        })
    }

    /// Parse a raw record given as a JSON value
    pub fn from_value(value: &Value) -> Result<Self> {
        let fields = value
            .as_array()
            .ok_or_else(|| ExchangeError::MalformedKline(format!("record is not an array: {value}")))?;
        Self::from_fields(fields)
    }

    /// Bucket start as a UTC timestamp
    pub fn open_time_utc(&self) -> Option<DateTime<Utc>> {
        self.open_time.and_then(DateTime::from_timestamp_millis)
    }
}

fn numeric_field(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

#[allow(clippy::cast_possible_truncation)]
fn open_time_field(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| numeric_field(value).map(|ms| ms as i64))
}

/// Chronologically ascending klines for one symbol
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KlineSeries {
    pub symbol: String,
    pub klines: Vec<Kline>,
}

impl KlineSeries {
    pub fn new(symbol: impl Into<String>, klines: Vec<Kline>) -> Self {
        Self {
            symbol: symbol.into(),
            klines,
        }
    }

    /// Decode an exchange response body (array of arrays)
    pub fn from_json(symbol: impl Into<String>, body: &Value) -> Result<Self> {
        let records = body.as_array().ok_or_else(|| {
            ExchangeError::MalformedKline(format!("expected an array of klines, got: {body}"))
        })?;

        let klines = records
            .iter()
            .map(Kline::from_value)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self::new(symbol, klines))
    }

    /// Close price of the first record of a response body. Later records are
    /// not parsed.
    pub fn first_close_from_json(symbol: &str, body: &Value) -> Result<f64> {
        let records = body.as_array().ok_or_else(|| {
            ExchangeError::MalformedKline(format!("expected an array of klines, got: {body}"))
        })?;

        let first = records.first().ok_or_else(|| ExchangeError::NoData(symbol.to_string()))?;
        Ok(Kline::from_value(first)?.close)
    }

    pub fn len(&self) -> usize {
        self.klines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.klines.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.klines.iter().map(|k| k.close).collect()
    }

    /// Close price of the first (oldest) record
    pub fn first_close(&self) -> Result<f64> {
        self.klines
            .first()
            .map(|k| k.close)
            .ok_or_else(|| ExchangeError::NoData(self.symbol.clone()))
    }

    /// % change from the first close to the last close
    pub fn percent_change(&self) -> Result<f64> {
        percent_change(&self.symbol, &self.closes())
    }

    /// Highest price within the series. Records without a usable `high`
    /// contribute their close.
    pub fn highest_high(&self) -> Result<f64> {
        self.klines
            .iter()
            .map(|k| k.high.unwrap_or(k.close))
            .reduce(f64::max)
            .ok_or_else(|| ExchangeError::NoData(self.symbol.clone()))
    }
}

/// `(last - first) / first * 100` over a close-price series.
///
/// Intermediate values do not matter. A single close yields 0.
pub fn percent_change(symbol: &str, closes: &[f64]) -> Result<f64> {
    let (Some(&first), Some(&latest)) = (closes.first(), closes.last()) else {
        return Err(ExchangeError::NoData(symbol.to_string()));
    };

    if first == 0.0 {
        return Err(ExchangeError::InvalidBaseline {
            symbol: symbol.to_string(),
            price: first,
        });
    }

    Ok((latest - first) / first * 100.0)
}

/// Query parameters for a klines request.
///
/// `Default` builds a fresh `{interval: "1s"}` every time, so no call can
/// leak state into another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KlineParams(BTreeMap<String, String>);

impl Default for KlineParams {
    fn default() -> Self {
        Self::empty().with("interval", "1s")
    }
}

impl KlineParams {
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Merge in the symbol (the symbol wins over an existing `symbol` key)
    pub fn to_query(&self, symbol: &str) -> Vec<(String, String)> {
        let mut merged = self.0.clone();
        merged.insert("symbol".into(), symbol.to_string());
        merged.into_iter().collect()
    }
}

/// Price summary of a single coin, as shown by the display layer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoinSnapshot {
    /// Latest close price
    pub current_price: f64,

    /// Highest price seen
    pub ath: f64,

    /// 24-hour price change percentage
    pub change_24: f64,
}

/// Coin name → snapshot, ordered by name
pub type CoinBoard = BTreeMap<String, CoinSnapshot>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn series(closes: &[f64]) -> KlineSeries {
        let klines = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Kline {
                open_time: Some(i as i64 * 60_000),
                open: Some(close),
                high: Some(close),
                low: Some(close),
                close,
                volume: None,
            })
            .collect();
        KlineSeries::new("BTCUSDT", klines)
    }

    #[test]
    fn test_parse_binance_record() {
        let raw = json!([1_499_040_000_000_i64, "0.016", "0.80", "0.015", "27000.50", "148976.1", 1_499_644_799_999_i64]);
        let kline = Kline::from_value(&raw).unwrap();
        assert_eq!(kline.close, 27000.50);
        assert_eq!(kline.high, Some(0.80));
        assert_eq!(kline.volume, Some(148_976.1));
        assert_eq!(kline.open_time_utc().unwrap().timestamp(), 1_499_040_000);
    }

    #[test]
    fn test_parse_accepts_numbers_and_string_time() {
        let raw = json!(["0", 1, 2, 3, 4.5]);
        let kline = Kline::from_value(&raw).unwrap();
        assert_eq!(kline.close, 4.5);
        assert_eq!(kline.volume, None);
    }

    #[test]
    fn test_parse_only_requires_close() {
        let body = json!([["...", "1", "2", "3", "27000.50", "5"]]);
        let series = KlineSeries::from_json("BTCUSDT", &body).unwrap();
        assert_eq!(series.first_close().unwrap(), 27000.50);
        assert_eq!(series.klines[0].open_time, None);
        assert_eq!(KlineSeries::first_close_from_json("BTCUSDT", &body).unwrap(), 27000.50);

        let kline = Kline::from_value(&json!([null, "x", {}, [], "10", "n/a"])).unwrap();
        assert_eq!(kline.close, 10.0);
        assert_eq!((kline.open, kline.high, kline.low, kline.volume), (None, None, None, None));
    }

    #[test]
    fn test_parse_float_open_time() {
        let body = json!([[1.7e12, "1", "2", "3", "100", "5"], [1.7e12, "1", "2", "3", "99", "5"]]);
        let series = KlineSeries::from_json("BTCUSDT", &body).unwrap();
        assert_eq!(series.klines[0].open_time, Some(1_700_000_000_000));
        assert!((series.percent_change().unwrap() - -1.0).abs() < 1e-9);
    }

    #[test]
    fn test_first_close_ignores_later_records() {
        let body = json!([[0, "1", "2", "3", "42.5"], ["garbage"]]);
        assert_eq!(KlineSeries::first_close_from_json("BTCUSDT", &body).unwrap(), 42.5);
        assert!(KlineSeries::from_json("BTCUSDT", &body).is_err());
        assert!(matches!(
            KlineSeries::first_close_from_json("BTCUSDT", &json!([])),
            Err(ExchangeError::NoData(_))
        ));
    }

    #[test]
    fn test_parse_rejects_short_record() {
        let raw = json!([0, "1", "2", "3"]);
        assert!(matches!(Kline::from_value(&raw), Err(ExchangeError::MalformedKline(_))));
    }

    #[test]
    fn test_parse_rejects_non_numeric_close() {
        let raw = json!([0, "1", "2", "3", "abc"]);
        assert!(matches!(Kline::from_value(&raw), Err(ExchangeError::MalformedKline(_))));

        let raw = json!([0, "1", "2", "3", "NaN"]);
        assert!(matches!(Kline::from_value(&raw), Err(ExchangeError::MalformedKline(_))));
    }

    #[test]
    fn test_series_rejects_non_array_body() {
        let body = json!({"code": -1121, "msg": "Invalid symbol."});
        assert!(matches!(
            KlineSeries::from_json("BTCUSDT", &body),
            Err(ExchangeError::MalformedKline(_))
        ));
    }

    #[test]
    fn test_change_ignores_intermediate_values() {
        let change = series(&[100.0, 110.0, 90.0, 99.0]).percent_change().unwrap();
        assert!((change - -1.0).abs() < 1e-9);
    }

    #[test]
    fn test_change_single_record_is_zero() {
        assert_eq!(series(&[27_000.5]).percent_change().unwrap(), 0.0);
    }

    #[test]
    fn test_change_empty_is_no_data() {
        assert!(matches!(series(&[]).percent_change(), Err(ExchangeError::NoData(s)) if s == "BTCUSDT"));
        assert!(matches!(series(&[]).first_close(), Err(ExchangeError::NoData(_))));
    }

    #[test]
    fn test_change_zero_baseline() {
        let result = percent_change("DEADUSDT", &[0.0, 5.0]);
        assert!(matches!(result, Err(ExchangeError::InvalidBaseline { ref symbol, price }) if symbol == "DEADUSDT" && price == 0.0));
    }

    #[test]
    fn test_change_can_be_large_and_positive() {
        let change = percent_change("X", &[2.0, 1.0, 10.0]).unwrap();
        assert!((change - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_highest_high() {
        let mut s = series(&[1.0, 2.0, 3.0]);
        s.klines[1].high = Some(42.0);
        assert_eq!(s.highest_high().unwrap(), 42.0);

        s.klines[1].high = None;
        s.klines[2].high = None;
        assert_eq!(s.highest_high().unwrap(), 3.0);
        assert!(series(&[]).highest_high().is_err());
    }

    #[test]
    fn test_default_params_are_fresh() {
        let mut first = KlineParams::default();
        first = first.with("limit", "5");
        let second = KlineParams::default();
        assert_eq!(first.get("limit"), Some("5"));
        assert_eq!(second.get("limit"), None);
        assert_eq!(second.get("interval"), Some("1s"));
    }

    #[test]
    fn test_symbol_overrides_params() {
        let params = KlineParams::default().with("symbol", "ETHUSDT");
        let query = params.to_query("BTCUSDT");
        assert!(query.contains(&("symbol".to_string(), "BTCUSDT".to_string())));
        assert!(query.contains(&("interval".to_string(), "1s".to_string())));
        assert_eq!(query.len(), 2);
    }
}
