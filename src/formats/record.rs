//! Annotation records shared by all readers and tracks

use crate::core::{Interval, Strand};
use std::collections::HashMap;

/// Largest coordinate a record can carry; layout works in `i64`
pub const MAX_COORD: u64 = i64::MAX as u64;

/// A genomic feature with free-form attributes
///
/// Coordinates are 0-based half-open. Tracks refer to group, label and
/// hue values by attribute key (`name`, `gene_id`, `transcript_id`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
    pub strand: Option<Strand>,
    pub attributes: HashMap<String, String>,
}

impl FeatureRecord {
    pub fn new(chrom: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
            strand: None,
            attributes: HashMap::new(),
        }
    }

    pub fn with_strand(mut self, strand: Option<Strand>) -> Self {
        self.strand = strand;
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Attribute value by key
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|s| s.as_str())
    }

    /// Layout interval for this record
    ///
    /// Coordinates past `MAX_COORD` saturate; the readers reject them.
    pub fn to_interval<P>(&self, height: f64, payload: P) -> Interval<P> {
        Interval::new(layout_coord(self.start), layout_coord(self.end), height, payload)
    }
}

#[inline]
fn layout_coord(pos: u64) -> i64 {
    i64::try_from(pos).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_interval_saturates() {
        let record = FeatureRecord::new("chr1", MAX_COORD, u64::MAX);
        let interval = record.to_interval(1.0, ());
        assert_eq!((interval.start, interval.end), (i64::MAX, i64::MAX));

        let record = FeatureRecord::new("chr1", 10, 20);
        let interval = record.to_interval(1.0, ());
        assert_eq!((interval.start, interval.end), (10, 20));
    }
}
