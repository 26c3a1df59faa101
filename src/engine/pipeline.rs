//! Pipeline orchestration: loader output in, artifacts + manifest out.
//!
//! Segments are independent units of work, so the indicator battery runs
//! across them on the rayon pool; results are collected back in segment
//! order. A segment's output is all-or-nothing: it either yields a complete
//! artifact or it is discarded with a reason in the manifest.

use rayon::prelude::*;

use crate::analysis::{fill_missing, indicators, split_contiguous};
use crate::config::PipelineConfig;
use crate::data::{DiscardedSegment, RunManifest, SegmentArtifact};
use crate::domain::{Bar, PipelineError, Segment, SegmentSeries};
use crate::utils::format_kline_time;

enum SegmentOutcome {
    Accepted(SegmentArtifact),
    Discarded(DiscardedSegment),
}

/// Run segmentation + indicator computation over a loaded sequence.
///
/// Structural errors (empty input) abort the run; a too-short or unfillable
/// segment only discards that segment.
pub fn run_pipeline(
    bars: &[Bar],
    config: &PipelineConfig,
) -> Result<(Vec<SegmentArtifact>, RunManifest), PipelineError> {
    let segments = split_contiguous(bars, config.interval_ms)?;
    let min_len = config.min_segment_len();

    let outcomes: Vec<SegmentOutcome> = segments
        .par_iter()
        .map(|segment| process_segment(segment, min_len, config))
        .collect();

    let mut artifacts = Vec::new();
    let mut discarded = Vec::new();
    let mut records_after = 0usize;

    for outcome in outcomes {
        match outcome {
            SegmentOutcome::Accepted(artifact) => {
                records_after += artifact.records.len();
                artifacts.push(artifact);
            }
            SegmentOutcome::Discarded(d) => {
                log::warn!("Segment {} discarded: {}", d.segment_id, d.reason);
                discarded.push(d);
            }
        }
    }

    let manifest = RunManifest {
        accepted_segments: artifacts.len(),
        discarded_segments: discarded,
        records_before_trim: bars.len(),
        records_after_trim: records_after,
    };

    log::info!(
        "Pipeline complete: {} segments accepted, {} discarded, {} records emitted",
        manifest.accepted_segments,
        manifest.discarded_segments.len(),
        manifest.records_after_trim
    );

    Ok((artifacts, manifest))
}

fn process_segment(
    segment: &Segment,
    min_len: usize,
    config: &PipelineConfig,
) -> SegmentOutcome {
    if segment.len() < min_len {
        return SegmentOutcome::Discarded(DiscardedSegment {
            segment_id: segment.id,
            bar_count: segment.len(),
            reason: format!("insufficient length ({} < {})", segment.len(), min_len),
        });
    }

    let mut series = SegmentSeries::from_segment(segment);
    if let Err(e) = fill_missing(&mut series, config.fill_policy, segment.id) {
        return SegmentOutcome::Discarded(discard_from_error(segment, e));
    }

    match indicators::compute_rows(&series, &config.indicators, segment.id) {
        Ok(records) => {
            let start_time = records
                .first()
                .map(|r| r.open_time.clone())
                .unwrap_or_else(|| format_kline_time(segment.first_open_time_ms()));
            let end_time = records
                .last()
                .map(|r| r.close_time.clone())
                .unwrap_or_else(|| format_kline_time(segment.last_open_time_ms()));

            SegmentOutcome::Accepted(SegmentArtifact {
                segment_id: segment.id,
                start_time,
                end_time,
                records,
            })
        }
        Err(e) => SegmentOutcome::Discarded(discard_from_error(segment, e)),
    }
}

fn discard_from_error(segment: &Segment, error: PipelineError) -> DiscardedSegment {
    let reason = match error {
        PipelineError::InsufficientData { reason, .. } => reason,
        other => other.to_string(),
    };
    DiscardedSegment {
        segment_id: segment.id,
        bar_count: segment.len(),
        reason,
    }
}
