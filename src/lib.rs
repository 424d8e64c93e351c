//! FastGeneviz - Stacked layout of genomic annotation tracks
//!
//! Assigns genomic intervals (genes, transcripts, features) to vertical
//! levels so that nothing sharing a level overlaps, and turns the result
//! into renderer-agnostic shapes.
//!
//! # Features
//!
//! - First-fit decreasing height packing with per-level span indices
//! - Grouped layout: exons of a transcript share one level
//! - Label-aware spacing through a pluggable `LabelMeasure`
//! - BED/GTF readers with gzip and bzip2 support
//! - Parallel layout of many regions with rayon
//!
//! # Example
//!
//! ```
//! use fast_geneviz::core::{pack, Interval};
//!
//! let intervals = vec![
//!     Interval::new(0, 100, 1.0, "a"),
//!     Interval::new(50, 150, 1.0, "b"),
//!     Interval::new(100, 200, 1.0, "c"),
//! ];
//! let packed = pack(intervals, 0.05).unwrap();
//! assert_eq!(packed.len(), 2);
//! assert_eq!(packed.offsets, vec![0.0, 1.05]);
//! ```

pub mod core;
pub mod formats;
pub mod tracks;

// Re-export commonly used types
pub use core::{
    merge_intervals, pack, stack, stack_grouped, GenevizError, GenomicIndex, Interval,
    LabelMeasure, LayoutError, Orientation, Region, StackOptions, Strand,
};
pub use formats::FeatureRecord;
pub use tracks::{
    layout_tracks, DrawContext, FeatureSet, FeatureTrack, GeneTrack, Shape, Track, TrackLayout,
};
