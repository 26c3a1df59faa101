//! Duplicate/missing-timestamp detection over a full bar sequence.
//!
//! Gaps are a normal, reportable result, never an error. The validator does
//! not depend on segmentation and never mutates the sequence, so it can run
//! concurrently with the indicator pipeline over the same bars.

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::domain::{Bar, PipelineError};
use crate::utils::format_kline_time;

/// Structured account of duplicate and missing timestamps in a sequence.
/// The `missing` list is complete; truncating it for display is a
/// presentation concern left to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GapReport {
    pub is_valid: bool,
    /// Open times seen more than once, one entry per extra occurrence.
    pub duplicates: Vec<i64>,
    /// Every absent open time between the observed min and max, at interval
    /// steps, in ascending order.
    pub missing: Vec<i64>,
}

impl GapReport {
    pub fn duplicate_strings(&self) -> Vec<String> {
        self.duplicates.iter().map(|&ts| format_kline_time(ts)).collect()
    }

    pub fn missing_strings(&self) -> Vec<String> {
        self.missing.iter().map(|&ts| format_kline_time(ts)).collect()
    }
}

/// Validate a sorted sequence against the fixed sampling interval.
///
/// Linear scan: a zero delta records a duplicate; any delta other than one
/// interval synthesizes every intermediate missing timestamp
/// (`previous + interval`, `previous + 2 * interval`, ...).
pub fn validate_sequence(bars: &[Bar], interval_ms: i64) -> Result<GapReport, PipelineError> {
    if bars.is_empty() {
        return Err(PipelineError::EmptySequence);
    }

    let mut duplicates = Vec::new();
    let mut missing = Vec::new();

    for (prev, current) in bars.iter().tuple_windows() {
        let delta = current.open_time_ms - prev.open_time_ms;
        if delta == interval_ms {
            continue;
        }
        if delta == 0 {
            duplicates.push(current.open_time_ms);
            continue;
        }

        let mut expected = prev.open_time_ms + interval_ms;
        while expected < current.open_time_ms {
            missing.push(expected);
            expected += interval_ms;
        }
    }

    let is_valid = duplicates.is_empty() && missing.is_empty();
    if !is_valid {
        log::warn!(
            "Sequence has {} duplicate and {} missing timestamps",
            duplicates.len(),
            missing.len()
        );
    }

    Ok(GapReport {
        is_valid,
        duplicates,
        missing,
    })
}
