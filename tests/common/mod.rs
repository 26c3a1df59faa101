#![allow(dead_code)]

use kline_dataset::Bar;

pub const HOUR_MS: i64 = 3_600_000;

/// 2021-06-01 00:00:00 UTC
pub const T0: i64 = 1_622_505_600_000;

/// One synthetic bar with a deterministic price wiggle derived from `seed`.
pub fn wiggly_bar(open_time_ms: i64, seed: usize) -> Bar {
    let close = 100.0 + (seed as f64 * 0.37).sin() * 5.0;
    let open = 100.0 + ((seed as f64 - 1.0) * 0.37).sin() * 5.0;
    let high = open.max(close) + 1.0;
    let low = open.min(close) - 1.0;
    let volume = 10.0 + (seed % 7) as f64;
    bar_with(open_time_ms, open, high, low, close, volume)
}

/// One bar with all prices pinned to `price` (zero volatility).
pub fn flat_bar(open_time_ms: i64, price: f64) -> Bar {
    bar_with(open_time_ms, price, price, price, price, 10.0)
}

pub fn bar_with(open_time_ms: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Bar {
    Bar {
        open_time_ms,
        close_time_ms: open_time_ms + HOUR_MS - 1,
        open,
        high,
        low,
        close,
        volume,
        quote_volume: volume * close,
        trade_count: 100,
        taker_buy_base_volume: volume * 0.5,
        taker_buy_quote_volume: volume * close * 0.5,
    }
}

/// `n` strictly-contiguous hourly bars starting at `start_ms`, with seeds
/// offset by `seed_offset` so different runs get different price paths.
pub fn contiguous_bars(start_ms: i64, n: usize, seed_offset: usize) -> Vec<Bar> {
    (0..n)
        .map(|i| wiggly_bar(start_ms + i as i64 * HOUR_MS, i + seed_offset))
        .collect()
}

pub fn flat_bars(start_ms: i64, n: usize, price: f64) -> Vec<Bar> {
    (0..n)
        .map(|i| flat_bar(start_ms + i as i64 * HOUR_MS, price))
        .collect()
}

pub fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
}
