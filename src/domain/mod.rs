// Domain types and value objects
mod bar;
mod errors;
mod series;

// Re-export commonly used types
pub use bar::{Bar, Segment};
pub use errors::PipelineError;
pub use series::SegmentSeries;
