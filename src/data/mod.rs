mod export;
mod loader;

pub use export::{
    DiscardedSegment, IndicatorRow, RunManifest, SegmentArtifact, write_combined_file,
    write_segment_files,
};
pub use loader::{RawBarRecord, load_bars_from_json, parse_records};
