// Core algorithms: segmentation, gap validation, fill, indicator battery
pub mod fill;
pub mod gap_validator;
pub mod indicators;
pub mod segmenter;

pub use fill::fill_missing;
pub use gap_validator::{GapReport, validate_sequence};
pub use segmenter::split_contiguous;
