//! GTF/GFF reader
//!
//! GTF uses 1-based closed coordinates; records are converted to 0-based
//! half-open spans. Attributes (`gene_id "G1"; transcript_id "T1";`) are
//! kept on the record, as are the source and feature type.

use crate::core::{ByteLineIterator, Strand};
use crate::formats::bed::{is_header_line, split_fields};
use crate::formats::record::MAX_COORD;
use crate::formats::FeatureRecord;
use std::io::BufRead;

/// GTF/GFF parse error
#[derive(Debug, thiserror::Error)]
pub enum GtfParseError {
    #[error("Empty line")]
    EmptyLine,

    #[error("Too few fields: expected {expected}, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("Invalid UTF-8 in field: {0}")]
    InvalidUtf8(&'static str),

    #[error("Invalid number in field {0}: {1}")]
    InvalidNumber(&'static str, String),

    #[error("Invalid coordinate range: start ({start}) > end ({end})")]
    InvalidRange { start: u64, end: u64 },

    #[error("Coordinate {0} exceeds the supported maximum")]
    CoordinateOutOfRange(u64),

    #[error("Invalid strand: {0}")]
    InvalidStrand(String),

    #[error("Line {line}: {source}")]
    AtLine {
        line: usize,
        source: Box<GtfParseError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Zero-copy GTF/GFF record view for parsing
/// Fields: seqname, source, feature, start, end, score, strand, frame, attributes
pub struct GtfRecordView<'a> {
    /// Sequence name (chromosome)
    pub seqname: &'a str,
    /// Source field
    pub source: &'a str,
    /// Feature type
    pub feature: &'a str,
    /// Start position (1-based)
    pub start: u64,
    /// End position (1-based, inclusive)
    pub end: u64,
    /// Strand
    pub strand: Option<Strand>,
    /// Attributes field
    pub attributes: &'a str,
}

impl<'a> GtfRecordView<'a> {
    /// Parse a GTF/GFF line
    /// GTF has exactly 9 tab-separated fields
    pub fn parse(line: &'a [u8]) -> Result<Self, GtfParseError> {
        if line.is_empty() {
            return Err(GtfParseError::EmptyLine);
        }

        let field_bounds = split_fields(line);
        if field_bounds.len() < 9 {
            return Err(GtfParseError::TooFewFields {
                expected: 9,
                found: field_bounds.len(),
            });
        }

        let get_field = |idx: usize, name: &'static str| -> Result<&'a str, GtfParseError> {
            let (start, end) = field_bounds[idx];
            std::str::from_utf8(&line[start..end]).map_err(|_| GtfParseError::InvalidUtf8(name))
        };

        let seqname = get_field(0, "seqname")?;
        let source = get_field(1, "source")?;
        let feature = get_field(2, "feature")?;

        let start_str = get_field(3, "start")?;
        let start: u64 = start_str
            .parse()
            .map_err(|_| GtfParseError::InvalidNumber("start", start_str.to_string()))?;

        let end_str = get_field(4, "end")?;
        let end: u64 = end_str
            .parse()
            .map_err(|_| GtfParseError::InvalidNumber("end", end_str.to_string()))?;

        if start == 0 || start > end {
            return Err(GtfParseError::InvalidRange { start, end });
        }
        if end > MAX_COORD {
            return Err(GtfParseError::CoordinateOutOfRange(end));
        }

        let strand_char = get_field(6, "strand")?;
        let strand = match strand_char {
            "+" => Some(Strand::Plus),
            "-" => Some(Strand::Minus),
            "." | "?" => None,
            _ => return Err(GtfParseError::InvalidStrand(strand_char.to_string())),
        };

        let attributes = get_field(8, "attributes")?;

        Ok(Self {
            seqname,
            source,
            feature,
            start,
            end,
            strand,
            attributes,
        })
    }

    /// Get the feature size (end - start + 1 for 1-based coordinates)
    pub fn size(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Iterate `(key, value)` attribute pairs
    ///
    /// Accepts GTF (`key "value";`) and GFF3 (`key=value;`) styles.
    pub fn attribute_pairs(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.attributes
            .split(';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .filter_map(|entry| {
                let (key, value) = match entry.split_once('=') {
                    Some((key, value)) if !key.contains(' ') => (key, value),
                    _ => entry.split_once(|c: char| c.is_ascii_whitespace())?,
                };
                Some((key.trim(), value.trim().trim_matches('"')))
            })
    }

    /// Get a single attribute value
    pub fn attribute(&self, key: &str) -> Option<&'a str> {
        self.attribute_pairs().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Convert into an owned 0-based half-open record
    pub fn to_record(&self) -> FeatureRecord {
        let mut record = FeatureRecord::new(self.seqname, self.start - 1, self.end)
            .with_strand(self.strand)
            .with_attr("source", self.source)
            .with_attr("feature", self.feature);
        for (key, value) in self.attribute_pairs() {
            record.attributes.insert(key.to_string(), value.to_string());
        }
        record
    }
}

/// Read GTF records, optionally keeping only one feature type (e.g. "exon")
pub fn read_gtf<R: BufRead>(reader: R, feature: Option<&str>) -> Result<Vec<FeatureRecord>, GtfParseError> {
    let mut lines = ByteLineIterator::new(reader);
    let mut records = Vec::new();
    let mut skipped = 0;

    while let Some(next) = lines.next_line() {
        let (line_no, line) = next?;
        if is_header_line(line) {
            continue;
        }

        let view = GtfRecordView::parse(line).map_err(|e| GtfParseError::AtLine {
            line: line_no,
            source: Box::new(e),
        })?;

        if feature.map_or(true, |f| f == view.feature) {
            records.push(view.to_record());
        } else {
            skipped += 1;
        }
    }

    log::debug!(
        "Read {} GTF records ({} skipped by feature type)",
        records.len(),
        skipped
    );
    Ok(records)
}
