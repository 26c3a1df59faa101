//! Indicator battery configuration

use serde::{Deserialize, Serialize};

pub const DEFAULT_KELTNER_MULTIPLIER: f64 = 2.75;

/// Window sizes for every indicator in the battery. Each is overridable, but
/// the exported column labels (`MA7`, `ATR50`, ...) are the dataset schema and
/// do not change with the windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSettings {
    /// Simple moving averages over close (MA7 / MA25 / MA50 / MA99 columns).
    pub ma_windows: [usize; 4],

    /// ATR window; the Keltner mid-line is the SMA over the same window.
    pub atr_window: usize,
    pub keltner_multiplier: f64,

    pub rsi_window: usize,

    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,

    pub bollinger_window: usize,
    /// Band width in standard deviations.
    pub bollinger_width: f64,

    pub stoch_window: usize,
    pub stoch_smooth: usize,

    pub adx_window: usize,
    pub williams_window: usize,
    pub cmf_window: usize,
    pub mfi_window: usize,

    /// Standalone EMA columns (EMA12 / EMA26).
    pub ema_fast: usize,
    pub ema_slow: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            ma_windows: [7, 25, 50, 99],
            atr_window: 50,
            keltner_multiplier: DEFAULT_KELTNER_MULTIPLIER,
            rsi_window: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_window: 20,
            bollinger_width: 2.0,
            stoch_window: 14,
            stoch_smooth: 3,
            adx_window: 14,
            williams_window: 14,
            cmf_window: 20,
            mfi_window: 14,
            ema_fast: 12,
            ema_slow: 26,
        }
    }
}

impl IndicatorSettings {
    /// Number of leading bars in a segment that cannot carry a full row.
    ///
    /// Every indicator's first defined index is bounded by one of the terms
    /// below, so trimming `min_warmup()` rows guarantees no NaN leaks into the
    /// output. With default windows this is 99 (the MA99 lookback).
    pub fn min_warmup(&self) -> usize {
        let candidates = [
            self.ma_windows[0],
            self.ma_windows[1],
            self.ma_windows[2],
            self.ma_windows[3],
            self.atr_window,
            self.rsi_window + 1,
            self.macd_slow + self.macd_signal,
            self.bollinger_window,
            self.stoch_window + self.stoch_smooth,
            self.adx_window * 2,
            self.williams_window,
            self.cmf_window,
            self.mfi_window + 1,
            self.ema_fast,
            self.ema_slow,
        ];
        candidates.into_iter().max().unwrap_or(0)
    }
}
