//! Raw kline records → typed, ordered bar sequence.
//!
//! The loader is strict about structure (timestamps, presence of fields) and
//! lenient about numeric content: a malformed numeric value degrades to NaN so
//! the per-segment fill pass can patch it later. Duplicate timestamps are NOT
//! removed here; enumerating them is the gap validator's job.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::{Bar, PipelineError};
use crate::utils::parse_kline_time;

/// One bar as it appears in the raw JSON: string timestamps in
/// `YYYY-MM-DD HH:MM:SS` form, numeric fields as JSON numbers or strings.
#[derive(Debug, Clone, Deserialize)]
pub struct RawBarRecord {
    pub open_time: String,
    pub close_time: String,

    #[serde(deserialize_with = "de_flexible_f64")]
    pub open_price: f64,
    #[serde(deserialize_with = "de_flexible_f64")]
    pub high_price: f64,
    #[serde(deserialize_with = "de_flexible_f64")]
    pub low_price: f64,
    #[serde(deserialize_with = "de_flexible_f64")]
    pub close_price: f64,
    #[serde(deserialize_with = "de_flexible_f64")]
    pub volume: f64,
    #[serde(deserialize_with = "de_flexible_f64")]
    pub quote_asset_volume: f64,
    #[serde(deserialize_with = "de_flexible_u64")]
    pub number_of_trades: u64,
    #[serde(deserialize_with = "de_flexible_f64")]
    pub taker_buy_base_asset_volume: f64,
    #[serde(deserialize_with = "de_flexible_f64")]
    pub taker_buy_quote_asset_volume: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumOrStr {
    Num(f64),
    Str(String),
}

fn de_flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = match NumOrStr::deserialize(deserializer)? {
        NumOrStr::Num(n) if n.is_finite() => n,
        NumOrStr::Num(_) => f64::NAN,
        NumOrStr::Str(s) => s.trim().parse::<f64>().unwrap_or(f64::NAN),
    };
    Ok(value)
}

fn de_flexible_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = match NumOrStr::deserialize(deserializer)? {
        NumOrStr::Num(n) if n >= 0.0 && n.is_finite() => n as u64,
        NumOrStr::Num(_) => 0,
        NumOrStr::Str(s) => s.trim().parse::<u64>().unwrap_or(0),
    };
    Ok(value)
}

/// Parse raw records into a sequence sorted ascending by open time.
/// The sort is stable; duplicates survive for the gap validator to report.
pub fn parse_records(records: Vec<RawBarRecord>) -> Result<Vec<Bar>, PipelineError> {
    let mut bars = Vec::with_capacity(records.len());

    for record in records {
        let open_time_ms = parse_kline_time(&record.open_time).ok_or_else(|| {
            PipelineError::Format(format!("unparseable open_time '{}'", record.open_time))
        })?;
        let close_time_ms = parse_kline_time(&record.close_time).ok_or_else(|| {
            PipelineError::Format(format!("unparseable close_time '{}'", record.close_time))
        })?;

        bars.push(Bar {
            open_time_ms,
            close_time_ms,
            open: record.open_price,
            high: record.high_price,
            low: record.low_price,
            close: record.close_price,
            volume: record.volume,
            quote_volume: record.quote_asset_volume,
            trade_count: record.number_of_trades,
            taker_buy_base_volume: record.taker_buy_base_asset_volume,
            taker_buy_quote_volume: record.taker_buy_quote_asset_volume,
        });
    }

    bars.sort_by_key(|b| b.open_time_ms);
    Ok(bars)
}

/// Load a sequence from a JSON file holding an array of raw records.
pub fn load_bars_from_json(path: &Path) -> Result<Vec<Bar>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read input file {}", path.display()))?;
    let records: Vec<RawBarRecord> = serde_json::from_str(&raw)
        .map_err(|e| PipelineError::Format(format!("invalid kline JSON: {}", e)))
        .with_context(|| format!("failed to parse {}", path.display()))?;

    let bars = parse_records(records)?;
    log::info!("Loaded {} bars from {}", bars.len(), path.display());
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_json(open_time: &str, close: &str) -> String {
        format!(
            r#"{{
                "open_time": "{open_time}",
                "open_price": 100.0,
                "high_price": 101.0,
                "low_price": 99.0,
                "close_price": {close},
                "volume": 10.0,
                "close_time": "2021-06-01 13:59:59",
                "quote_asset_volume": "1000.5",
                "number_of_trades": 42,
                "taker_buy_base_asset_volume": 5.0,
                "taker_buy_quote_asset_volume": 500.0
            }}"#
        )
    }

    #[test]
    fn parses_numbers_and_numeric_strings() {
        let json = format!("[{}]", record_json("2021-06-01 13:00:00", "100.5"));
        let records: Vec<RawBarRecord> = serde_json::from_str(&json).unwrap();
        let bars = parse_records(records).unwrap();

        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 100.5);
        assert_eq!(bars[0].quote_volume, 1000.5);
        assert_eq!(bars[0].trade_count, 42);
        assert_eq!(bars[0].open_time_string(), "2021-06-01 13:00:00");
    }

    #[test]
    fn malformed_numeric_becomes_nan() {
        let json = format!("[{}]", record_json("2021-06-01 13:00:00", "\"not-a-number\""));
        let records: Vec<RawBarRecord> = serde_json::from_str(&json).unwrap();
        let bars = parse_records(records).unwrap();
        assert!(bars[0].close.is_nan());
    }

    #[test]
    fn bad_timestamp_is_a_format_error() {
        let json = format!("[{}]", record_json("June 1st 2021", "100.0"));
        let records: Vec<RawBarRecord> = serde_json::from_str(&json).unwrap();
        let err = parse_records(records).unwrap_err();
        assert!(matches!(err, PipelineError::Format(_)));
    }

    #[test]
    fn sorts_ascending_without_deduplicating() {
        let json = format!(
            "[{},{},{}]",
            record_json("2021-06-01 15:00:00", "1.0"),
            record_json("2021-06-01 13:00:00", "2.0"),
            record_json("2021-06-01 13:00:00", "3.0")
        );
        let records: Vec<RawBarRecord> = serde_json::from_str(&json).unwrap();
        let bars = parse_records(records).unwrap();

        assert_eq!(bars.len(), 3);
        assert!(bars[0].open_time_ms <= bars[1].open_time_ms);
        assert!(bars[1].open_time_ms <= bars[2].open_time_ms);
        // Stable sort keeps the duplicates' original relative order.
        assert_eq!(bars[0].close, 2.0);
        assert_eq!(bars[1].close, 3.0);
    }
}
