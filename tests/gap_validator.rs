mod common;

use common::{HOUR_MS, T0, contiguous_bars};
use kline_dataset::{PipelineError, validate_sequence};

#[test]
fn empty_sequence_is_an_error() {
    let err = validate_sequence(&[], HOUR_MS).unwrap_err();
    assert_eq!(err, PipelineError::EmptySequence);
}

#[test]
fn perfect_hourly_sequence_is_valid() {
    let bars = contiguous_bars(T0, 200, 0);
    let report = validate_sequence(&bars, HOUR_MS).unwrap();
    assert!(report.is_valid);
    assert!(report.duplicates.is_empty());
    assert!(report.missing.is_empty());
}

#[test]
fn one_duplicate_produces_exactly_one_duplicate_entry() {
    let mut bars = contiguous_bars(T0, 50, 0);
    let dup = bars[10].clone();
    bars.insert(11, dup);

    let report = validate_sequence(&bars, HOUR_MS).unwrap();
    assert!(!report.is_valid);
    assert_eq!(report.duplicates, vec![T0 + 10 * HOUR_MS]);
    assert!(report.missing.is_empty());
}

#[test]
fn one_removed_bar_produces_exactly_its_timestamp_as_missing() {
    let mut bars = contiguous_bars(T0, 50, 0);
    let removed = bars.remove(17);

    let report = validate_sequence(&bars, HOUR_MS).unwrap();
    assert!(!report.is_valid);
    assert!(report.duplicates.is_empty());
    assert_eq!(report.missing, vec![removed.open_time_ms]);
}

#[test]
fn a_multi_hour_hole_enumerates_every_intermediate_timestamp() {
    // Bars at t0..t5, then the next at t9: t6, t7, t8 are missing.
    let mut bars = contiguous_bars(T0, 6, 0);
    bars.extend(contiguous_bars(T0 + 9 * HOUR_MS, 3, 6));

    let report = validate_sequence(&bars, HOUR_MS).unwrap();
    assert_eq!(
        report.missing,
        vec![T0 + 6 * HOUR_MS, T0 + 7 * HOUR_MS, T0 + 8 * HOUR_MS]
    );
}

#[test]
fn duplicates_and_holes_are_reported_together_in_order() {
    let mut bars = contiguous_bars(T0, 20, 0);
    let dup = bars[3].clone();
    bars.insert(4, dup);
    bars.remove(12); // originally index 11 (t11), shifted by the insert

    let report = validate_sequence(&bars, HOUR_MS).unwrap();
    assert!(!report.is_valid);
    assert_eq!(report.duplicates, vec![T0 + 3 * HOUR_MS]);
    assert_eq!(report.missing, vec![T0 + 11 * HOUR_MS]);

    let strings = report.missing_strings();
    assert_eq!(strings.len(), 1);
    assert!(strings[0].ends_with(":00:00"));
}

#[test]
fn report_lists_are_complete_not_truncated() {
    // 30 consecutive missing hours; the report carries all of them.
    let mut bars = contiguous_bars(T0, 5, 0);
    bars.extend(contiguous_bars(T0 + 35 * HOUR_MS, 5, 5));

    let report = validate_sequence(&bars, HOUR_MS).unwrap();
    assert_eq!(report.missing.len(), 30);
    assert_eq!(report.missing[0], T0 + 5 * HOUR_MS);
    assert_eq!(report.missing[29], T0 + 34 * HOUR_MS);
}
