//! Core layout functionality
//!
//! This module contains the interval indices, the FFDH level packer,
//! the grouped layout and the interval merge utility.

mod error;
mod group;
mod index;
mod interval;
pub mod io;
mod merge;
mod pack;

pub use error::{
    GenevizError, LayoutError, LayoutResult, MeasureError, RegionParseError, Result,
};
pub use group::{
    stack, stack_grouped, Extent, LabelMeasure, Labeler, StackOptions, Stacked, StackedLayout,
};
pub use index::{GenomicIndex, GenomicInterval, SpanIndex};
pub use interval::{point_span, spans_overlap, Interval, Orientation, Region, Strand};
pub use io::{detect_compression, open_annotation, ByteLineIterator, CompressionFormat};
pub use merge::{merge_intervals, MergeIntervals};
pub use pack::{level_offsets, pack, Level, PackedLevels};
