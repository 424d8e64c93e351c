//! BED format reader
//!
//! Handles BED3/BED6/BED12 records with zero-copy parsing. BED12 records
//! can be expanded into one feature per block, sharing the record name.

use crate::core::{merge_intervals, ByteLineIterator, Strand};
use crate::formats::record::MAX_COORD;
use crate::formats::FeatureRecord;
use memchr::memchr;
use std::io::BufRead;

/// Zero-copy BED record view for parsing
/// Only parses coordinate fields immediately, other fields are kept as byte slices
pub struct BedRecordView<'a> {
    /// Original line bytes
    line: &'a [u8],
    /// Chromosome name
    pub chrom: &'a str,
    /// Start position (0-based)
    pub start: u64,
    /// End position
    pub end: u64,
    /// Field boundaries (start, end) for lazy access
    field_bounds: Vec<(usize, usize)>,
}

impl<'a> BedRecordView<'a> {
    /// Parse a BED line with minimal allocation
    /// Only parses chrom, start, end immediately
    pub fn parse(line: &'a [u8]) -> Result<Self, BedParseError> {
        if line.is_empty() {
            return Err(BedParseError::EmptyLine);
        }

        let field_bounds = split_fields(line);

        // Need at least 3 fields (BED3)
        if field_bounds.len() < 3 {
            return Err(BedParseError::TooFewFields {
                expected: 3,
                found: field_bounds.len(),
            });
        }

        let field = |idx: usize, name: &'static str| -> Result<&'a str, BedParseError> {
            let (start, end) = field_bounds[idx];
            std::str::from_utf8(&line[start..end]).map_err(|_| BedParseError::InvalidUtf8(name))
        };

        let chrom = field(0, "chrom")?;

        let start_str = field(1, "start")?;
        let start: u64 = start_str
            .parse()
            .map_err(|_| BedParseError::InvalidNumber("start", start_str.to_string()))?;

        let end_str = field(2, "end")?;
        let end: u64 = end_str
            .parse()
            .map_err(|_| BedParseError::InvalidNumber("end", end_str.to_string()))?;

        if start > end {
            return Err(BedParseError::InvalidRange { start, end });
        }
        if end > MAX_COORD {
            return Err(BedParseError::CoordinateOutOfRange(end));
        }

        Ok(Self {
            line,
            chrom,
            start,
            end,
            field_bounds,
        })
    }

    /// Get the number of fields
    pub fn field_count(&self) -> usize {
        self.field_bounds.len()
    }

    /// Get field as string slice (lazy access)
    pub fn field(&self, index: usize) -> Option<&'a str> {
        self.field_bounds
            .get(index)
            .and_then(|(start, end)| std::str::from_utf8(&self.line[*start..*end]).ok())
    }

    /// Get name field (field 3) if present
    pub fn name(&self) -> Option<&'a str> {
        self.field(3)
    }

    /// Get score field (field 4) if present
    pub fn score(&self) -> Option<&'a str> {
        self.field(4)
    }

    /// Get strand field (field 5) if present
    pub fn strand(&self) -> Option<Strand> {
        self.field(5).and_then(Strand::from_field)
    }

    /// Get item_rgb (field 8) if present
    pub fn item_rgb(&self) -> Option<&'a str> {
        self.field(8)
    }

    /// Check if this is a BED12 record
    pub fn is_bed12(&self) -> bool {
        self.field_count() >= 12
    }

    /// Absolute block spans of a BED12 record
    ///
    /// Returns `Ok(None)` for records with fewer than 12 fields.
    pub fn blocks(&self) -> Result<Option<Vec<(u64, u64)>>, BedParseError> {
        if !self.is_bed12() {
            return Ok(None);
        }

        let count: usize = self
            .field(9)
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| BedParseError::InvalidBlocks("blockCount".to_string()))?;
        let sizes = parse_list(self.field(10).unwrap_or(""))?;
        let starts = parse_list(self.field(11).unwrap_or(""))?;

        if sizes.len() < count || starts.len() < count {
            return Err(BedParseError::InvalidBlocks(format!(
                "expected {} blocks, found {} sizes and {} starts",
                count,
                sizes.len(),
                starts.len()
            )));
        }

        let blocks = starts
            .iter()
            .zip(&sizes)
            .take(count)
            .map(|(&offset, &size)| {
                let start = self.start.checked_add(offset).filter(|&s| s <= MAX_COORD);
                match start.and_then(|s| s.checked_add(size).filter(|&e| e <= MAX_COORD)) {
                    Some(end) => Ok((end - size, end)),
                    None => Err(BedParseError::CoordinateOutOfRange(self.start.saturating_add(offset))),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(blocks))
    }

    /// Convert into an owned record, keeping name/score/item_rgb as attributes
    pub fn to_record(&self) -> FeatureRecord {
        let mut record = FeatureRecord::new(self.chrom, self.start, self.end).with_strand(self.strand());
        for (key, value) in [
            ("name", self.name()),
            ("score", self.score()),
            ("item_rgb", self.item_rgb()),
        ] {
            if let Some(value) = value.filter(|v| !v.is_empty() && *v != ".") {
                record = record.with_attr(key, value);
            }
        }
        record
    }
}

/// Find tab-separated field boundaries using memchr
pub(crate) fn split_fields(line: &[u8]) -> Vec<(usize, usize)> {
    let mut field_bounds = Vec::with_capacity(12);
    let mut start_pos = 0;

    while let Some(tab_pos) = memchr(b'\t', &line[start_pos..]) {
        let end_pos = start_pos + tab_pos;
        field_bounds.push((start_pos, end_pos));
        start_pos = end_pos + 1;
    }
    // Last field
    field_bounds.push((start_pos, line.len()));

    field_bounds
}

/// Parse a comma-separated list such as "10,20,30,"
fn parse_list(s: &str) -> Result<Vec<u64>, BedParseError> {
    s.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse()
                .map_err(|_| BedParseError::InvalidBlocks(format!("invalid value '{}'", v)))
        })
        .collect()
}

/// BED parsing error
#[derive(Debug, thiserror::Error)]
pub enum BedParseError {
    #[error("Empty line")]
    EmptyLine,

    #[error("Too few fields: expected at least {expected}, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("Invalid UTF-8 in field: {0}")]
    InvalidUtf8(&'static str),

    #[error("Invalid number in field {0}: {1}")]
    InvalidNumber(&'static str, String),

    #[error("Invalid coordinate range: start ({start}) > end ({end})")]
    InvalidRange { start: u64, end: u64 },

    #[error("Coordinate {0} exceeds the supported maximum")]
    CoordinateOutOfRange(u64),

    #[error("Invalid BED12 blocks: {0}")]
    InvalidBlocks(String),

    #[error("Line {line}: {source}")]
    AtLine {
        line: usize,
        source: Box<BedParseError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Check whether a line carries no record (blank, comment, track or browser line)
pub(crate) fn is_header_line(line: &[u8]) -> bool {
    line.iter().all(|b| b.is_ascii_whitespace())
        || line.starts_with(b"#")
        || line.starts_with(b"track")
        || line.starts_with(b"browser")
}

/// Read all records of a BED stream
///
/// With `expand_blocks`, each BED12 record becomes one feature per block;
/// the blocks keep the record's attributes so they can be grouped by name.
pub fn read_bed<R: BufRead>(reader: R, expand_blocks: bool) -> Result<Vec<FeatureRecord>, BedParseError> {
    let mut lines = ByteLineIterator::new(reader);
    let mut records = Vec::new();

    while let Some(next) = lines.next_line() {
        let (line_no, line) = next?;
        if is_header_line(line) {
            continue;
        }

        let at_line = |e: BedParseError| BedParseError::AtLine {
            line: line_no,
            source: Box::new(e),
        };

        let view = BedRecordView::parse(line).map_err(at_line)?;
        let record = view.to_record();

        match view.blocks().map_err(at_line)? {
            Some(blocks) if expand_blocks => {
                records.extend(blocks.into_iter().map(|(start, end)| FeatureRecord {
                    start,
                    end,
                    ..record.clone()
                }));
            }
            _ => records.push(record),
        }
    }

    log::debug!("Read {} BED records from {} lines", records.len(), lines.lines_read());
    Ok(records)
}

/// Merge overlapping records per chromosome
///
/// Chromosomes keep their order of first appearance; merged records carry
/// coordinates only.
pub fn merge_records(records: &[FeatureRecord]) -> Vec<FeatureRecord> {
    let mut chroms: Vec<&str> = Vec::new();
    let mut spans: std::collections::HashMap<&str, Vec<(u64, u64)>> = std::collections::HashMap::new();

    for record in records {
        spans
            .entry(record.chrom.as_str())
            .or_insert_with(|| {
                chroms.push(record.chrom.as_str());
                Vec::new()
            })
            .push((record.start, record.end));
    }

    let mut merged = Vec::new();
    for chrom in chroms {
        if let Some(pairs) = spans.remove(chrom) {
            merged.extend(
                merge_intervals(pairs).map(|(start, end)| FeatureRecord::new(chrom, start, end)),
            );
        }
    }

    log::debug!("Merged {} records into {}", records.len(), merged.len());
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bed3() {
        let view = BedRecordView::parse(b"chr1\t100\t200").unwrap();
        assert_eq!(view.chrom, "chr1");
        assert_eq!(view.start, 100);
        assert_eq!(view.end, 200);
        assert_eq!(view.field_count(), 3);
        assert!(view.name().is_none());
        assert!(view.strand().is_none());
    }

    #[test]
    fn test_parse_bed6() {
        let view = BedRecordView::parse(b"chr2\t0\t50\tgeneA\t960\t-").unwrap();
        assert_eq!(view.name(), Some("geneA"));
        assert_eq!(view.score(), Some("960"));
        assert_eq!(view.strand(), Some(Strand::Minus));

        let record = view.to_record();
        assert_eq!(record.attr("name"), Some("geneA"));
        assert_eq!(record.attr("score"), Some("960"));
        assert_eq!(record.strand, Some(Strand::Minus));
    }

    #[test]
    fn test_coordinates_past_i64_rejected() {
        assert!(matches!(
            BedRecordView::parse(b"chr1\t0\t9223372036854775808"),
            Err(BedParseError::CoordinateOutOfRange(9_223_372_036_854_775_808))
        ));
        assert!(BedRecordView::parse(b"chr1\t0\t9223372036854775807").is_ok());

        let line = b"chr1\t9223372036854775000\t9223372036854775100\tx\t0\t+\t0\t0\t0\t1\t10,\t1000,";
        let view = BedRecordView::parse(line).unwrap();
        assert!(matches!(view.blocks(), Err(BedParseError::CoordinateOutOfRange(_))));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(BedRecordView::parse(b""), Err(BedParseError::EmptyLine)));
        assert!(matches!(
            BedRecordView::parse(b"chr1\t100"),
            Err(BedParseError::TooFewFields { expected: 3, found: 2 })
        ));
        assert!(matches!(
            BedRecordView::parse(b"chr1\tx\t200"),
            Err(BedParseError::InvalidNumber("start", _))
        ));
        assert!(matches!(
            BedRecordView::parse(b"chr1\t300\t200"),
            Err(BedParseError::InvalidRange { start: 300, end: 200 })
        ));
    }

    #[test]
    fn test_bed12_blocks() {
        let line = b"chr1\t1000\t2000\ttx1\t0\t+\t1000\t2000\t0\t3\t100,200,100,\t0,400,900,";
        let view = BedRecordView::parse(line).unwrap();
        assert!(view.is_bed12());
        assert_eq!(
            view.blocks().unwrap(),
            Some(vec![(1000, 1100), (1400, 1600), (1900, 2000)])
        );
    }

    #[test]
    fn test_read_bed_skips_headers() {
        let data: &[u8] = b"track name=test\n# comment\nchr1\t10\t20\ta\n\nchr1\t30\t40\tb\n";
        let records = read_bed(data, false).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].attr("name"), Some("b"));
    }

    #[test]
    fn test_read_bed_expands_blocks() {
        let data: &[u8] = b"chr1\t1000\t2000\ttx1\t0\t+\t1000\t2000\t0\t2\t100,100\t0,900\n";
        let records = read_bed(data, true).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!((records[0].start, records[0].end), (1000, 1100));
        assert_eq!((records[1].start, records[1].end), (1900, 2000));
        assert!(records.iter().all(|r| r.attr("name") == Some("tx1")));

        let whole = read_bed(data, false).unwrap();
        assert_eq!(whole.len(), 1);
    }

    #[test]
    fn test_merge_records_per_chrom() {
        let records = vec![
            FeatureRecord::new("chr2", 10, 20),
            FeatureRecord::new("chr1", 30, 40),
            FeatureRecord::new("chr2", 15, 25),
            FeatureRecord::new("chr1", 0, 5),
        ];
        let spans: Vec<_> = merge_records(&records)
            .into_iter()
            .map(|r| (r.chrom, r.start, r.end))
            .collect();
        assert_eq!(
            spans,
            vec![
                ("chr2".to_string(), 10, 25),
                ("chr1".to_string(), 0, 5),
                ("chr1".to_string(), 30, 40),
            ]
        );
    }

    #[test]
    fn test_read_bed_reports_line() {
        let data: &[u8] = b"chr1\t10\t20\nchr1\tbad\t20\n";
        match read_bed(data, false) {
            Err(BedParseError::AtLine { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
