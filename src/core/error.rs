//! Error types for FastGeneviz
//!
//! Defines all error types used throughout the library.

use thiserror::Error;

/// Main error type for FastGeneviz operations
#[derive(Debug, Error)]
pub enum GenevizError {
    /// Layout engine errors
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Region string errors
    #[error("Region error: {0}")]
    Region(#[from] RegionParseError),

    /// BED parsing errors
    #[error("BED parse error: {0}")]
    Bed(#[from] crate::formats::BedParseError),

    /// GTF parsing errors
    #[error("GTF parse error: {0}")]
    Gtf(#[from] crate::formats::GtfParseError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Worker pool could not be created
    #[error("Failed to create thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Errors raised by the packer and the grouped layout
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Malformed interval: start after end, or a NaN/negative/infinite height
    #[error("Invalid interval: start={start}, end={end}, height={height}")]
    InvalidInterval { start: i64, end: i64, height: f64 },

    /// Spacing must be finite and non-negative
    #[error("Invalid spacing: {0}")]
    InvalidSpacing(f64),

    /// The label backend returned a non-finite extent
    #[error("Label measurement returned a non-finite extent for '{label}'")]
    InvalidExtent { label: String },

    /// Failure reported by the label-measurement backend
    #[error(transparent)]
    Measure(#[from] MeasureError),
}

/// Error reported by a label-measurement backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Label measurement failed: {0}")]
pub struct MeasureError(pub String);

/// Errors that can occur while parsing a `chrom:start-end` region
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionParseError {
    /// Missing ':' separator
    #[error("Missing ':' in region '{0}'")]
    MissingColon(String),

    /// Missing '-' separator
    #[error("Missing '-' in region '{0}'")]
    MissingDash(String),

    /// Empty chromosome name
    #[error("Empty chromosome in region '{0}'")]
    EmptyChrom(String),

    /// Failed to parse a coordinate
    #[error("Invalid coordinate '{value}' in region '{region}'")]
    InvalidCoordinate { region: String, value: String },

    /// start > end
    #[error("Invalid coordinate range: start ({start}) > end ({end})")]
    InvalidRange { start: u64, end: u64 },
}

/// Result type alias for FastGeneviz operations
pub type Result<T> = std::result::Result<T, GenevizError>;

/// Result type alias for layout operations
pub type LayoutResult<T> = std::result::Result<T, LayoutError>;
