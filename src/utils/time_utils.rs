use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

/// Exact timestamp format used by the raw kline records and the exported
/// dataset: `YYYY-MM-DD HH:MM:SS`, interpreted as UTC.
pub const KLINE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub struct TimeUtils;

impl TimeUtils {
    pub const MS_IN_S: i64 = 1000;
    pub const MS_IN_MIN: i64 = Self::MS_IN_S * 60;
    pub const MS_IN_5_MIN: i64 = Self::MS_IN_MIN * 5;
    pub const MS_IN_15_MIN: i64 = Self::MS_IN_MIN * 15;
    pub const MS_IN_30_MIN: i64 = Self::MS_IN_MIN * 30;
    pub const MS_IN_H: i64 = Self::MS_IN_MIN * 60;
    pub const MS_IN_4_H: i64 = Self::MS_IN_H * 4;
    pub const MS_IN_D: i64 = Self::MS_IN_H * 24;

    /// Convert an interval in milliseconds to Binance-style shorthand (e.g. `1h`).
    pub fn interval_to_string(interval_ms: i64) -> &'static str {
        match interval_ms {
            Self::MS_IN_MIN => "1m",
            Self::MS_IN_5_MIN => "5m",
            Self::MS_IN_15_MIN => "15m",
            Self::MS_IN_30_MIN => "30m",
            Self::MS_IN_H => "1h",
            Self::MS_IN_4_H => "4h",
            Self::MS_IN_D => "1d",
            _ => "unknown",
        }
    }

    /// Parse Binance-style shorthand into an interval in milliseconds.
    pub fn interval_from_string(s: &str) -> Option<i64> {
        match s {
            "1m" => Some(Self::MS_IN_MIN),
            "5m" => Some(Self::MS_IN_5_MIN),
            "15m" => Some(Self::MS_IN_15_MIN),
            "30m" => Some(Self::MS_IN_30_MIN),
            "1h" => Some(Self::MS_IN_H),
            "4h" => Some(Self::MS_IN_4_H),
            "1d" => Some(Self::MS_IN_D),
            _ => None,
        }
    }
}

/// Parse a `YYYY-MM-DD HH:MM:SS` timestamp (UTC) into epoch milliseconds.
/// Returns None on any format violation; the caller decides the error kind.
pub fn parse_kline_time(s: &str) -> Option<i64> {
    let naive = NaiveDateTime::parse_from_str(s, KLINE_TIME_FORMAT).ok()?;
    let dt: DateTime<Utc> = Utc.from_utc_datetime(&naive);
    Some(dt.timestamp_millis())
}

/// Format epoch milliseconds back into the `YYYY-MM-DD HH:MM:SS` form.
pub fn format_kline_time(epoch_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(epoch_ms) {
        Some(dt) => dt.format(KLINE_TIME_FORMAT).to_string(),
        None => "invalid timestamp".to_string(),
    }
}
