//! Annotation formats
//!
//! Readers for BED and GTF/GFF annotation files, producing `FeatureRecord`s,
//! and writers for merged intervals and laid-out tracks.

pub mod bed;
pub mod gtf;
mod record;
pub mod tsv;

pub use bed::{merge_records, read_bed, BedParseError, BedRecordView};
pub use gtf::{read_gtf, GtfParseError, GtfRecordView};
pub use record::{FeatureRecord, MAX_COORD};
pub use tsv::{write_bed3, write_layout};

use std::path::Path;

/// Read a BED file (plain, gzip or bzip2)
pub fn read_bed_file<P: AsRef<Path>>(path: P, expand_blocks: bool) -> Result<Vec<FeatureRecord>, BedParseError> {
    let reader = crate::core::open_annotation(path)?;
    read_bed(reader, expand_blocks)
}

/// Read a GTF/GFF file (plain, gzip or bzip2)
pub fn read_gtf_file<P: AsRef<Path>>(path: P, feature: Option<&str>) -> Result<Vec<FeatureRecord>, GtfParseError> {
    let reader = crate::core::open_annotation(path)?;
    read_gtf(reader, feature)
}
