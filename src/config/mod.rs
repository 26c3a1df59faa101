mod indicators;
mod pipeline;

pub use indicators::{DEFAULT_KELTNER_MULTIPLIER, IndicatorSettings};
pub use pipeline::{FillPolicy, PipelineConfig};
