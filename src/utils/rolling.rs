//! Rolling-window primitives for the indicator battery.
//!
//! Every function here is explicit about its warm-up: output index `i` is
//! defined (finite) once at least `window` inputs are available, and is
//! `f64::NAN` before that. Nothing relies on NaN propagating through
//! arithmetic; callers trim warm-up rows themselves.

use argminmax::ArgMinMax;

/// Simple rolling mean. Defined from index `window - 1`.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let len = values.len();
    let mut out = vec![f64::NAN; len];
    if window == 0 || len < window {
        return out;
    }

    let mut rolling_sum: f64 = values[..window].iter().sum();
    out[window - 1] = rolling_sum / window as f64;

    for i in window..len {
        rolling_sum += values[i] - values[i - window];
        out[i] = rolling_sum / window as f64;
    }
    out
}

/// Rolling sum. Defined from index `window - 1`.
pub fn rolling_sum(values: &[f64], window: usize) -> Vec<f64> {
    let len = values.len();
    let mut out = vec![f64::NAN; len];
    if window == 0 || len < window {
        return out;
    }

    let mut sum: f64 = values[..window].iter().sum();
    out[window - 1] = sum;

    for i in window..len {
        sum += values[i] - values[i - window];
        out[i] = sum;
    }
    out
}

/// Mean and population standard deviation of a slice.
pub fn mean_and_stddev(data: &[f64]) -> (f64, f64) {
    let count = data.len();
    if count == 0 {
        return (0.0, 0.0);
    }

    let sum: f64 = data.iter().sum();
    let mean = sum / count as f64;

    let variance: f64 = data
        .iter()
        .map(|value| {
            let diff = mean - *value;
            diff * diff
        })
        .sum::<f64>()
        / count as f64;

    (mean, variance.sqrt())
}

/// Rolling population standard deviation. Defined from index `window - 1`.
pub fn rolling_stddev(values: &[f64], window: usize) -> Vec<f64> {
    let len = values.len();
    let mut out = vec![f64::NAN; len];
    if window == 0 || len < window {
        return out;
    }
    for i in (window - 1)..len {
        let (_, sd) = mean_and_stddev(&values[i + 1 - window..=i]);
        out[i] = sd;
    }
    out
}

/// Rolling maximum over the trailing `window` values. Defined from `window - 1`.
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    let len = values.len();
    let mut out = vec![f64::NAN; len];
    if window == 0 || len < window {
        return out;
    }
    for i in (window - 1)..len {
        let slice = &values[i + 1 - window..=i];
        let idx: usize = slice.argmax();
        out[i] = slice[idx];
    }
    out
}

/// Rolling minimum over the trailing `window` values. Defined from `window - 1`.
pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    let len = values.len();
    let mut out = vec![f64::NAN; len];
    if window == 0 || len < window {
        return out;
    }
    for i in (window - 1)..len {
        let slice = &values[i + 1 - window..=i];
        let idx: usize = slice.argmin();
        out[i] = slice[idx];
    }
    out
}

/// Exponential moving average, multiplier `2 / (window + 1)`, seeded with the
/// SMA of the first `window` defined inputs.
///
/// Leading NaN warm-up in the input is tolerated: the seed starts at the first
/// finite value. That matters for the MACD signal line, whose input (the MACD
/// line) only becomes defined after the slow EMA's own warm-up.
pub fn ema(values: &[f64], window: usize) -> Vec<f64> {
    let len = values.len();
    let mut out = vec![f64::NAN; len];
    if window == 0 {
        return out;
    }

    let start = match values.iter().position(|v| v.is_finite()) {
        Some(s) => s,
        None => return out,
    };
    if len - start < window {
        return out;
    }

    let seed_end = start + window;
    let seed: f64 = values[start..seed_end].iter().sum::<f64>() / window as f64;
    out[seed_end - 1] = seed;

    let k = 2.0 / (window as f64 + 1.0);
    for i in seed_end..len {
        out[i] = values[i] * k + out[i - 1] * (1.0 - k);
    }
    out
}

/// Wilder smoothing (RMA): seeded with the SMA of the first `window` defined
/// inputs, then `out[i] = (out[i-1] * (window - 1) + values[i]) / window`.
/// Tolerates leading NaN warm-up like [`ema`].
pub fn wilder_smooth(values: &[f64], window: usize) -> Vec<f64> {
    let len = values.len();
    let mut out = vec![f64::NAN; len];
    if window == 0 {
        return out;
    }

    let start = match values.iter().position(|v| v.is_finite()) {
        Some(s) => s,
        None => return out,
    };
    if len - start < window {
        return out;
    }

    let seed_end = start + window;
    let seed: f64 = values[start..seed_end].iter().sum::<f64>() / window as f64;
    out[seed_end - 1] = seed;

    let w = window as f64;
    for i in seed_end..len {
        out[i] = (out[i - 1] * (w - 1.0) + values[i]) / w;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn rolling_mean_small_window() {
        let out = rolling_mean(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert_close(out[2], 2.0);
        assert_close(out[3], 3.0);
        assert_close(out[4], 4.0);
    }

    #[test]
    fn rolling_mean_window_longer_than_input() {
        let out = rolling_mean(&[1.0, 2.0], 3);
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn rolling_extremes() {
        let data = [3.0, 1.0, 4.0, 1.0, 5.0];
        let max = rolling_max(&data, 2);
        let min = rolling_min(&data, 2);
        assert!(max[0].is_nan());
        assert_close(max[1], 3.0);
        assert_close(max[2], 4.0);
        assert_close(max[4], 5.0);
        assert_close(min[1], 1.0);
        assert_close(min[3], 1.0);
    }

    #[test]
    fn stddev_population_convention() {
        // Population stddev of [2, 4] is 1.0 (not the sample value sqrt(2)).
        let (mean, sd) = mean_and_stddev(&[2.0, 4.0]);
        assert_close(mean, 3.0);
        assert_close(sd, 1.0);

        let out = rolling_stddev(&[2.0, 4.0, 4.0, 4.0], 2);
        assert!(out[0].is_nan());
        assert_close(out[1], 1.0);
        assert_close(out[2], 0.0);
    }

    #[test]
    fn ema_seeds_with_sma() {
        let out = ema(&[1.0, 2.0, 3.0, 4.0], 3);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert_close(out[2], 2.0); // SMA seed
        // k = 0.5: 4 * 0.5 + 2 * 0.5 = 3.0
        assert_close(out[3], 3.0);
    }

    #[test]
    fn ema_skips_leading_nan() {
        let out = ema(&[f64::NAN, f64::NAN, 1.0, 2.0, 3.0, 4.0], 3);
        assert!(out[3].is_nan());
        assert_close(out[4], 2.0);
        assert_close(out[5], 3.0);
    }

    #[test]
    fn wilder_smooth_matches_hand_calc() {
        let out = wilder_smooth(&[1.0, 2.0, 3.0, 4.0], 2);
        assert!(out[0].is_nan());
        assert_close(out[1], 1.5); // seed = mean(1, 2)
        assert_close(out[2], (1.5 * 1.0 + 3.0) / 2.0);
        assert_close(out[3], (2.25 * 1.0 + 4.0) / 2.0);
    }
}
