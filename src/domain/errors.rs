use std::{error::Error, fmt};

/// Error kinds for the dataset pipeline.
///
/// `Format` and `EmptySequence` are fatal for the unit being processed.
/// `InsufficientData` is recoverable: the offending segment is skipped with a
/// warning and the pipeline continues. Gap findings (duplicates, missing
/// timestamps) are never errors; they travel in a `GapReport`.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Unparseable timestamp or malformed record.
    Format(String),
    /// No input bars at all.
    EmptySequence,
    /// A segment too short for the warm-up, or with unfillable internal gaps.
    InsufficientData { segment_id: usize, reason: String },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PipelineError::Format(msg) => write!(f, "Format error: {}", msg),
            PipelineError::EmptySequence => write!(f, "Empty sequence: nothing to process"),
            PipelineError::InsufficientData { segment_id, reason } => {
                write!(f, "Segment {} has insufficient data: {}", segment_id, reason)
            }
        }
    }
}

impl Error for PipelineError {}
