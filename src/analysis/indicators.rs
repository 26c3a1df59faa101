//! The indicator battery: every windowed statistic computed over one segment.
//!
//! All computations are segment-local. A value at row `i` depends only on
//! bars at index `<= warmup + i` within the same segment; nothing here ever
//! looks across a segment boundary or ahead of the current bar.
//!
//! Zero-volatility inputs yield defined boundary values, never NaN: a flat
//! window gives RSI 50, %K/%D 50, Williams %R -50, MFI 50, zero ATR/ADX/CMF,
//! and bands collapsed onto their moving average.

use crate::config::IndicatorSettings;
use crate::data::IndicatorRow;
use crate::domain::{PipelineError, SegmentSeries};
use crate::utils::rolling::{
    ema, rolling_max, rolling_mean, rolling_min, rolling_stddev, rolling_sum, wilder_smooth,
};

const EPS: f64 = f64::EPSILON;

/// Compute the full battery for one segment and trim the warm-up.
///
/// Output length is `series.len() - warmup`; row `i` aligns to the bar at
/// index `warmup + i`. A segment shorter than `warmup + 1` is rejected with
/// `InsufficientData` (callers discard it and continue).
pub fn compute_rows(
    series: &SegmentSeries,
    settings: &IndicatorSettings,
    segment_id: usize,
) -> Result<Vec<IndicatorRow>, PipelineError> {
    let warmup = settings.min_warmup();
    let len = series.len();
    if len < warmup + 1 {
        return Err(PipelineError::InsufficientData {
            segment_id,
            reason: format!("{} bars, need at least {}", len, warmup + 1),
        });
    }

    let close = &series.close_prices;
    let high = &series.high_prices;
    let low = &series.low_prices;
    let volume = &series.volumes;

    let ma7 = rolling_mean(close, settings.ma_windows[0]);
    let ma25 = rolling_mean(close, settings.ma_windows[1]);
    let ma50 = rolling_mean(close, settings.ma_windows[2]);
    let ma99 = rolling_mean(close, settings.ma_windows[3]);

    let tr = true_range(high, low, close);
    let atr = rolling_mean(&tr, settings.atr_window);
    let keltner_mid = rolling_mean(close, settings.atr_window);

    let rsi = relative_strength_index(close, settings.rsi_window);

    let (macd, macd_signal, macd_hist) =
        macd_lines(close, settings.macd_fast, settings.macd_slow, settings.macd_signal);

    let boll_mid = rolling_mean(close, settings.bollinger_window);
    let boll_sd = rolling_stddev(close, settings.bollinger_window);

    let (stoch_k, stoch_d) =
        stochastic(high, low, close, settings.stoch_window, settings.stoch_smooth);

    let (adx, adx_pdi, adx_mdi) = average_directional_index(high, low, close, settings.adx_window);

    let williams = williams_r(high, low, close, settings.williams_window);
    let cmf = chaikin_money_flow(high, low, close, volume, settings.cmf_window);
    let mfi = money_flow_index(high, low, close, volume, settings.mfi_window);

    let ema_fast = ema(close, settings.ema_fast);
    let ema_slow = ema(close, settings.ema_slow);

    let mut rows = Vec::with_capacity(len - warmup);
    for i in warmup..len {
        let bar = series.bar_at(i);

        let row = IndicatorRow {
            open_time: bar.open_time_string(),
            open_price: bar.open,
            high_price: bar.high,
            low_price: bar.low,
            close_price: bar.close,
            volume: bar.volume,
            close_time: bar.close_time_string(),
            quote_asset_volume: bar.quote_volume,
            number_of_trades: bar.trade_count,
            taker_buy_base_asset_volume: bar.taker_buy_base_volume,
            taker_buy_quote_asset_volume: bar.taker_buy_quote_volume,
            ma7: ma7[i],
            ma25: ma25[i],
            ma99: ma99[i],
            atr50: atr[i],
            ma50: ma50[i],
            keltner_upper: keltner_mid[i] + settings.keltner_multiplier * atr[i],
            keltner_lower: keltner_mid[i] - settings.keltner_multiplier * atr[i],
            rsi: rsi[i],
            macd: macd[i],
            macd_signal: macd_signal[i],
            macd_hist: macd_hist[i],
            bollinger_high: boll_mid[i] + settings.bollinger_width * boll_sd[i],
            bollinger_low: boll_mid[i] - settings.bollinger_width * boll_sd[i],
            bollinger_middle: boll_mid[i],
            stochastic_k: stoch_k[i],
            stochastic_d: stoch_d[i],
            adx: adx[i],
            adx_pdi: adx_pdi[i],
            adx_mdi: adx_mdi[i],
            williams_r: williams[i],
            cmf: cmf[i],
            mfi: mfi[i],
            ema12: ema_fast[i],
            ema26: ema_slow[i],
        };

        if let Some(undefined) = first_undefined_field(&row) {
            return Err(PipelineError::InsufficientData {
                segment_id,
                reason: format!("undefined {} at trimmed row {}", undefined, i - warmup),
            });
        }
        rows.push(row);
    }

    Ok(rows)
}

fn first_undefined_field(row: &IndicatorRow) -> Option<&'static str> {
    let checks: [(&'static str, f64); 24] = [
        ("MA7", row.ma7),
        ("MA25", row.ma25),
        ("MA99", row.ma99),
        ("ATR50", row.atr50),
        ("MA50", row.ma50),
        ("Keltner_Upper", row.keltner_upper),
        ("Keltner_Lower", row.keltner_lower),
        ("RSI", row.rsi),
        ("MACD", row.macd),
        ("MACD_Signal", row.macd_signal),
        ("MACD_Hist", row.macd_hist),
        ("Bollinger_High", row.bollinger_high),
        ("Bollinger_Low", row.bollinger_low),
        ("Bollinger_Middle", row.bollinger_middle),
        ("Stochastic_%K", row.stochastic_k),
        ("Stochastic_%D", row.stochastic_d),
        ("ADX", row.adx),
        ("ADX_PDI", row.adx_pdi),
        ("ADX_MDI", row.adx_mdi),
        ("Williams_%R", row.williams_r),
        ("CMF", row.cmf),
        ("MFI", row.mfi),
        ("EMA12", row.ema12),
        ("EMA26", row.ema26),
    ];
    checks
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
}

/// True Range per bar: `max(h - l, |h - prev_c|, |l - prev_c|)`.
/// The first bar has no previous close, so its TR is just `h - l`.
pub fn true_range(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    let len = close.len();
    let mut tr = Vec::with_capacity(len);
    for i in 0..len {
        let hl = high[i] - low[i];
        if i == 0 {
            tr.push(hl);
        } else {
            let prev_close = close[i - 1];
            let hc = (high[i] - prev_close).abs();
            let lc = (low[i] - prev_close).abs();
            tr.push(hl.max(hc).max(lc));
        }
    }
    tr
}

/// RSI with Wilder-smoothed average gain/loss. Defined from index `window`.
pub fn relative_strength_index(close: &[f64], window: usize) -> Vec<f64> {
    let len = close.len();
    let mut gains = vec![f64::NAN; len];
    let mut losses = vec![f64::NAN; len];
    for i in 1..len {
        let change = close[i] - close[i - 1];
        gains[i] = change.max(0.0);
        losses[i] = (-change).max(0.0);
    }

    let avg_gain = wilder_smooth(&gains, window);
    let avg_loss = wilder_smooth(&losses, window);

    let mut out = vec![f64::NAN; len];
    for i in 0..len {
        let (g, l) = (avg_gain[i], avg_loss[i]);
        if !g.is_finite() || !l.is_finite() {
            continue;
        }
        out[i] = if l <= EPS {
            // Zero average loss: flat windows sit at the 50 midpoint,
            // gain-only windows at the 100 ceiling.
            if g <= EPS { 50.0 } else { 100.0 }
        } else {
            100.0 - 100.0 / (1.0 + g / l)
        };
    }
    out
}

/// MACD line, signal line and histogram. The signal EMA seeds on the first
/// `signal` defined MACD values.
pub fn macd_lines(
    close: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let ema_fast = ema(close, fast);
    let ema_slow = ema(close, slow);

    let len = close.len();
    let mut macd = vec![f64::NAN; len];
    for i in 0..len {
        if ema_fast[i].is_finite() && ema_slow[i].is_finite() {
            macd[i] = ema_fast[i] - ema_slow[i];
        }
    }

    let signal_line = ema(&macd, signal);

    let mut hist = vec![f64::NAN; len];
    for i in 0..len {
        if macd[i].is_finite() && signal_line[i].is_finite() {
            hist[i] = macd[i] - signal_line[i];
        }
    }

    (macd, signal_line, hist)
}

/// Stochastic oscillator: raw %K over `window`, %D as its `smooth`-period SMA.
pub fn stochastic(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    window: usize,
    smooth: usize,
) -> (Vec<f64>, Vec<f64>) {
    let len = close.len();
    let highest = rolling_max(high, window);
    let lowest = rolling_min(low, window);

    let mut k = vec![f64::NAN; len];
    for i in 0..len {
        if !highest[i].is_finite() || !lowest[i].is_finite() {
            continue;
        }
        let range = highest[i] - lowest[i];
        k[i] = if range <= EPS {
            // Zero range: the close is at every percentile at once; midpoint.
            50.0
        } else {
            100.0 * (close[i] - lowest[i]) / range
        };
    }

    // %D: SMA of %K, honouring %K's own warm-up.
    let mut d = vec![f64::NAN; len];
    if smooth > 0 {
        let first_k = window.saturating_sub(1);
        for i in (first_k + smooth - 1)..len {
            let sum: f64 = k[i + 1 - smooth..=i].iter().sum();
            d[i] = sum / smooth as f64;
        }
    }

    (k, d)
}

/// ADX with its directional components, by the standard Wilder method:
/// directional movement and true range are Wilder-smoothed over `window`,
/// DI+/DI- come from their ratio, and ADX is the Wilder-smoothed DX.
pub fn average_directional_index(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    window: usize,
) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let len = close.len();
    let mut tr = vec![f64::NAN; len];
    let mut plus_dm = vec![f64::NAN; len];
    let mut minus_dm = vec![f64::NAN; len];

    for i in 1..len {
        let hl = high[i] - low[i];
        let hc = (high[i] - close[i - 1]).abs();
        let lc = (low[i] - close[i - 1]).abs();
        tr[i] = hl.max(hc).max(lc);

        let up_move = high[i] - high[i - 1];
        let down_move = low[i - 1] - low[i];
        plus_dm[i] = if up_move > down_move && up_move > 0.0 { up_move } else { 0.0 };
        minus_dm[i] = if down_move > up_move && down_move > 0.0 { down_move } else { 0.0 };
    }

    let smoothed_tr = wilder_smooth(&tr, window);
    let smoothed_plus = wilder_smooth(&plus_dm, window);
    let smoothed_minus = wilder_smooth(&minus_dm, window);

    let mut plus_di = vec![f64::NAN; len];
    let mut minus_di = vec![f64::NAN; len];
    let mut dx = vec![f64::NAN; len];
    for i in 0..len {
        if !smoothed_tr[i].is_finite() {
            continue;
        }
        let (p, m) = if smoothed_tr[i] <= EPS {
            (0.0, 0.0)
        } else {
            (
                100.0 * smoothed_plus[i] / smoothed_tr[i],
                100.0 * smoothed_minus[i] / smoothed_tr[i],
            )
        };
        plus_di[i] = p;
        minus_di[i] = m;
        dx[i] = if p + m <= EPS {
            0.0
        } else {
            100.0 * (p - m).abs() / (p + m)
        };
    }

    let adx = wilder_smooth(&dx, window);
    (adx, plus_di, minus_di)
}

/// Williams %R: `-100 * (highestHigh - close) / (highestHigh - lowestLow)`.
pub fn williams_r(high: &[f64], low: &[f64], close: &[f64], window: usize) -> Vec<f64> {
    let len = close.len();
    let highest = rolling_max(high, window);
    let lowest = rolling_min(low, window);

    let mut out = vec![f64::NAN; len];
    for i in 0..len {
        if !highest[i].is_finite() || !lowest[i].is_finite() {
            continue;
        }
        let range = highest[i] - lowest[i];
        out[i] = if range <= EPS {
            -50.0
        } else {
            -100.0 * (highest[i] - close[i]) / range
        };
    }
    out
}

/// Chaikin Money Flow: money-flow-volume accumulation over `window`, relative
/// to total volume. A bar with zero range contributes zero multiplier.
pub fn chaikin_money_flow(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: &[f64],
    window: usize,
) -> Vec<f64> {
    let len = close.len();
    let mut mf_volume = Vec::with_capacity(len);
    for i in 0..len {
        let range = high[i] - low[i];
        let multiplier = if range <= EPS {
            0.0
        } else {
            ((close[i] - low[i]) - (high[i] - close[i])) / range
        };
        mf_volume.push(multiplier * volume[i]);
    }

    let mf_sum = rolling_sum(&mf_volume, window);
    let vol_sum = rolling_sum(volume, window);

    let mut out = vec![f64::NAN; len];
    for i in 0..len {
        if !mf_sum[i].is_finite() || !vol_sum[i].is_finite() {
            continue;
        }
        out[i] = if vol_sum[i] <= EPS { 0.0 } else { mf_sum[i] / vol_sum[i] };
    }
    out
}

/// Money Flow Index from typical price and volume-weighted gain/loss ratio.
/// Defined from index `window` (the first typical-price change is at 1).
pub fn money_flow_index(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: &[f64],
    window: usize,
) -> Vec<f64> {
    let len = close.len();
    let mut positive = vec![0.0; len];
    let mut negative = vec![0.0; len];

    let mut prev_tp = (high[0] + low[0] + close[0]) / 3.0;
    for i in 1..len {
        let tp = (high[i] + low[i] + close[i]) / 3.0;
        let raw_flow = tp * volume[i];
        if tp > prev_tp {
            positive[i] = raw_flow;
        } else if tp < prev_tp {
            negative[i] = raw_flow;
        }
        prev_tp = tp;
    }

    let pos_sum = rolling_sum(&positive, window);
    let neg_sum = rolling_sum(&negative, window);

    let mut out = vec![f64::NAN; len];
    // Start at `window` so each window only covers real changes (index >= 1).
    for i in window..len {
        let (p, n) = (pos_sum[i], neg_sum[i]);
        out[i] = if p <= EPS && n <= EPS {
            50.0
        } else if n <= EPS {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + p / n)
        };
    }
    out
}
