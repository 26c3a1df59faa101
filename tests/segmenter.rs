mod common;

use common::{HOUR_MS, T0, contiguous_bars};
use kline_dataset::{PipelineError, split_contiguous};

#[test]
fn empty_sequence_is_an_error() {
    let err = split_contiguous(&[], HOUR_MS).unwrap_err();
    assert_eq!(err, PipelineError::EmptySequence);
}

#[test]
fn single_bar_yields_a_single_one_bar_segment() {
    let bars = contiguous_bars(T0, 1, 0);
    let segments = split_contiguous(&bars, HOUR_MS).unwrap();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].id, 1);
    assert_eq!(segments[0].start_index, 0);
    assert_eq!(segments[0].bars, bars);
}

#[test]
fn contiguous_input_stays_one_segment() {
    let bars = contiguous_bars(T0, 48, 0);
    let segments = split_contiguous(&bars, HOUR_MS).unwrap();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].len(), 48);
}

#[test]
fn splits_exactly_at_every_cadence_break() {
    // Three runs: 10 bars, 2h hole, 5 bars, 26h hole, 20 bars.
    let mut bars = contiguous_bars(T0, 10, 0);
    let second_start = T0 + 12 * HOUR_MS;
    bars.extend(contiguous_bars(second_start, 5, 10));
    let third_start = second_start + (5 + 26) * HOUR_MS;
    bars.extend(contiguous_bars(third_start, 20, 15));

    let segments = split_contiguous(&bars, HOUR_MS).unwrap();
    assert_eq!(segments.len(), 3);

    let lengths: Vec<usize> = segments.iter().map(|s| s.len()).collect();
    assert_eq!(lengths, vec![10, 5, 20]);

    let ids: Vec<usize> = segments.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let starts: Vec<usize> = segments.iter().map(|s| s.start_index).collect();
    assert_eq!(starts, vec![0, 10, 15]);
}

#[test]
fn partition_is_total_disjoint_and_order_preserving() {
    let mut bars = contiguous_bars(T0, 30, 0);
    bars.extend(contiguous_bars(T0 + 33 * HOUR_MS, 7, 30));
    bars.extend(contiguous_bars(T0 + 41 * HOUR_MS, 1, 40));

    let segments = split_contiguous(&bars, HOUR_MS).unwrap();

    // Reassembling all segments' bars in order reproduces the input bar-for-bar.
    let reassembled: Vec<_> = segments
        .iter()
        .flat_map(|s| s.bars.iter().cloned())
        .collect();
    assert_eq!(reassembled, bars);

    // Boundaries occur only where contiguity breaks.
    for segment in &segments {
        for pair in segment.bars.windows(2) {
            assert_eq!(pair[1].open_time_ms - pair[0].open_time_ms, HOUR_MS);
        }
    }
}

#[test]
fn a_larger_interval_changes_where_runs_break() {
    // Hourly cadence read at a 4h interval: nothing is contiguous.
    let bars = contiguous_bars(T0, 6, 0);
    let segments = split_contiguous(&bars, 4 * HOUR_MS).unwrap();
    assert_eq!(segments.len(), 6);
    assert!(segments.iter().all(|s| s.len() == 1));
}
