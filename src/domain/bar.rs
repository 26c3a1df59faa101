use serde::{Deserialize, Serialize};

use crate::utils::format_kline_time;

/// One fixed-interval OHLCV kline. Timestamps are epoch milliseconds (UTC);
/// `close_time_ms` sits one tick before the next bar's open
/// (`open_time_ms + interval - 1`).
///
/// Bars are immutable value records. Segments own their bars by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub open_time_ms: i64,
    pub close_time_ms: i64,

    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,

    pub volume: f64,
    pub quote_volume: f64,
    pub trade_count: u64,
    pub taker_buy_base_volume: f64,
    pub taker_buy_quote_volume: f64,
}

impl Bar {
    /// (high + low + close) / 3, the base quantity for MFI.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    pub fn open_time_string(&self) -> String {
        format_kline_time(self.open_time_ms)
    }

    pub fn close_time_string(&self) -> String {
        format_kline_time(self.close_time_ms)
    }
}

/// A maximal run of bars with no timing gaps: each adjacent pair satisfies
/// `open_time[i] - open_time[i-1] == interval_ms` exactly.
///
/// `start_index` is the run's offset within the source sequence, so callers
/// can map segment-relative indices back to the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub id: usize,
    pub start_index: usize,
    pub bars: Vec<Bar>,
}

impl Segment {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_open_time_ms(&self) -> i64 {
        self.bars.first().map(|b| b.open_time_ms).unwrap_or(0)
    }

    pub fn last_open_time_ms(&self) -> i64 {
        self.bars.last().map(|b| b.open_time_ms).unwrap_or(0)
    }
}
