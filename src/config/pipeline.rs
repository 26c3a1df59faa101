//! Pipeline configuration

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::IndicatorSettings;
use crate::utils::TimeUtils;

/// What to do with NaN cells found inside a segment before indicator
/// computation. Should not occur with validated input, but malformed numeric
/// fields degrade to NaN at load time instead of aborting the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum FillPolicy {
    /// Propagate the nearest earlier value forward, then the nearest later
    /// value backward. Whole-column gaps remain and reject the segment.
    ForwardThenBackward,
    /// Any NaN rejects the segment outright.
    Reject,
}

/// The master pipeline configuration shared by the segmenter, the indicator
/// engine and the gap validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Sampling interval between consecutive bars.
    pub interval_ms: i64,

    /// Minimum bars a segment needs to survive. Defaults to one more than the
    /// warm-up, so at least one row comes out of every accepted segment.
    pub min_segment_len: Option<usize>,

    pub fill_policy: FillPolicy,

    pub indicators: IndicatorSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            interval_ms: TimeUtils::MS_IN_H,
            min_segment_len: None,
            fill_policy: FillPolicy::ForwardThenBackward,
            indicators: IndicatorSettings::default(),
        }
    }
}

impl PipelineConfig {
    pub fn min_segment_len(&self) -> usize {
        self.min_segment_len
            .unwrap_or_else(|| self.indicators.min_warmup() + 1)
    }
}
