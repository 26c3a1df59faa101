//! Explicit missing-value patching for one segment's columns.
//!
//! The fill is a bounded, documented pass over a single segment, applied once
//! before indicator computation. It never crosses segment boundaries and it
//! never happens implicitly inside a rolling-window call.

use crate::config::FillPolicy;
use crate::domain::{PipelineError, SegmentSeries};

/// Patch NaN cells in `series` according to `policy`.
///
/// `ForwardThenBackward` propagates the nearest earlier value forward, then
/// the nearest later value backward; a column that is entirely NaN cannot be
/// filled and rejects the segment. `Reject` turns any NaN into an immediate
/// `InsufficientData` error.
pub fn fill_missing(
    series: &mut SegmentSeries,
    policy: FillPolicy,
    segment_id: usize,
) -> Result<(), PipelineError> {
    let mut patched = 0usize;

    for column in series.float_columns_mut() {
        let nan_count = column.iter().filter(|v| v.is_nan()).count();
        if nan_count == 0 {
            continue;
        }

        match policy {
            FillPolicy::Reject => {
                return Err(PipelineError::InsufficientData {
                    segment_id,
                    reason: format!("{} missing values with fill policy 'reject'", nan_count),
                });
            }
            FillPolicy::ForwardThenBackward => {
                forward_fill(column);
                backward_fill(column);
                if column.iter().any(|v| v.is_nan()) {
                    return Err(PipelineError::InsufficientData {
                        segment_id,
                        reason: "column is entirely missing, nothing to fill from".to_string(),
                    });
                }
                patched += nan_count;
            }
        }
    }

    if patched > 0 {
        log::warn!(
            "Segment {} contained {} missing values. Filled forward/backward.",
            segment_id,
            patched
        );
    }
    Ok(())
}

fn forward_fill(column: &mut [f64]) {
    let mut last_seen = f64::NAN;
    for value in column.iter_mut() {
        if value.is_nan() {
            *value = last_seen;
        } else {
            last_seen = *value;
        }
    }
}

fn backward_fill(column: &mut [f64]) {
    let mut next_seen = f64::NAN;
    for value in column.iter_mut().rev() {
        if value.is_nan() {
            *value = next_seen;
        } else {
            next_seen = *value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Bar, Segment};

    fn series_with_closes(closes: &[f64]) -> SegmentSeries {
        let bars: Vec<Bar> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar {
                open_time_ms: i as i64 * 3_600_000,
                close_time_ms: i as i64 * 3_600_000 + 3_599_999,
                open: c,
                high: c,
                low: c,
                close: c,
                volume: 1.0,
                quote_volume: 1.0,
                trade_count: 1,
                taker_buy_base_volume: 0.5,
                taker_buy_quote_volume: 0.5,
            })
            .collect();
        SegmentSeries::from_segment(&Segment {
            id: 1,
            start_index: 0,
            bars,
        })
    }

    #[test]
    fn forward_then_backward_patches_interior_and_leading_gaps() {
        let mut series = series_with_closes(&[f64::NAN, 2.0, f64::NAN, f64::NAN, 5.0]);
        fill_missing(&mut series, FillPolicy::ForwardThenBackward, 1).unwrap();
        // Leading NaN back-fills from 2.0, interior NaNs forward-fill from 2.0.
        assert_eq!(series.close_prices, vec![2.0, 2.0, 2.0, 2.0, 5.0]);
    }

    #[test]
    fn fully_missing_column_rejects_the_segment() {
        let mut series = series_with_closes(&[f64::NAN, f64::NAN]);
        let err = fill_missing(&mut series, FillPolicy::ForwardThenBackward, 7).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InsufficientData { segment_id: 7, .. }
        ));
    }

    #[test]
    fn reject_policy_fails_on_any_nan() {
        let mut series = series_with_closes(&[1.0, f64::NAN, 3.0]);
        let err = fill_missing(&mut series, FillPolicy::Reject, 2).unwrap_err();
        assert!(matches!(err, PipelineError::InsufficientData { .. }));

        let mut clean = series_with_closes(&[1.0, 2.0, 3.0]);
        assert!(fill_missing(&mut clean, FillPolicy::Reject, 2).is_ok());
    }
}
