//! Splits a sorted bar sequence into maximal contiguous-cadence runs.

use crate::domain::{Bar, PipelineError, Segment};

/// Partition `bars` (sorted ascending by open time) into maximal runs where
/// every adjacent pair is exactly one interval apart.
///
/// The partition is total, disjoint and order-preserving: every input bar
/// lands in exactly one segment, and concatenating the segments reproduces
/// the input bar-for-bar. A single-bar input yields a single one-bar segment.
pub fn split_contiguous(bars: &[Bar], interval_ms: i64) -> Result<Vec<Segment>, PipelineError> {
    if bars.is_empty() {
        return Err(PipelineError::EmptySequence);
    }

    let mut segments: Vec<Segment> = Vec::new();
    let mut current: Vec<Bar> = vec![bars[0].clone()];
    let mut current_start = 0usize;

    for (i, bar) in bars.iter().enumerate().skip(1) {
        let previous_open = bars[i - 1].open_time_ms;
        if bar.open_time_ms - previous_open == interval_ms {
            current.push(bar.clone());
        } else {
            segments.push(Segment {
                id: segments.len() + 1,
                start_index: current_start,
                bars: std::mem::take(&mut current),
            });
            current.push(bar.clone());
            current_start = i;
        }
    }

    // The final run is always closed.
    segments.push(Segment {
        id: segments.len() + 1,
        start_index: current_start,
        bars: current,
    });

    log::info!("Total segments found: {}", segments.len());
    Ok(segments)
}
