//! Layout intervals and genomic coordinates
//!
//! Layout spans are half-open `[start, end)`. Two spans overlap iff
//! `a.start < b.end && b.start < a.end`, so touching spans do not overlap.
//! A zero-length span `[p, p)` is treated as the point `[p, p + 1)`.

use crate::core::error::{LayoutError, RegionParseError};
use std::str::FromStr;

/// A span to be laid out, with the vertical space it needs
#[derive(Debug, Clone, PartialEq)]
pub struct Interval<P> {
    /// Start position (inclusive)
    pub start: i64,
    /// End position (exclusive)
    pub end: i64,
    /// Vertical space required by the item
    pub height: f64,
    /// Reference back to the record being laid out
    pub payload: P,
}

impl<P> Interval<P> {
    pub fn new(start: i64, end: i64, height: f64, payload: P) -> Self {
        Self { start, end, height, payload }
    }

    /// Span length (`end - start`)
    ///
    /// Unsigned so that spans wider than `i64::MAX` do not overflow.
    pub fn len(&self) -> u64 {
        self.end.abs_diff(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Span used for overlap tests, with zero-length spans widened to a point
    pub fn overlap_span(&self) -> (i64, i64) {
        point_span(self.start, self.end)
    }

    /// Check that the interval is well formed
    ///
    /// Requires `start <= end` and a finite, non-negative height.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.start > self.end || !self.height.is_finite() || self.height < 0.0 {
            return Err(LayoutError::InvalidInterval {
                start: self.start,
                end: self.end,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Replace the payload, keeping the geometry
    pub fn with_payload<Q>(&self, payload: Q) -> Interval<Q> {
        Interval {
            start: self.start,
            end: self.end,
            height: self.height,
            payload,
        }
    }
}

/// Widen a zero-length span to a single position
#[inline]
pub fn point_span(start: i64, end: i64) -> (i64, i64) {
    if start == end {
        (start, start.saturating_add(1))
    } else {
        (start, end)
    }
}

/// Check whether two half-open spans overlap
///
/// # Examples
/// ```
/// use fast_geneviz::core::spans_overlap;
/// assert!(!spans_overlap((10, 20), (20, 30)));
/// assert!(spans_overlap((10, 20), (19, 30)));
/// assert!(spans_overlap((5, 5), (0, 10)));
/// ```
#[inline]
pub fn spans_overlap(a: (i64, i64), b: (i64, i64)) -> bool {
    let (a_start, a_end) = point_span(a.0, a.1);
    let (b_start, b_end) = point_span(b.0, b.1);
    a_start < b_end && b_start < a_end
}

/// Strand orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Strand {
    #[default]
    Plus,
    Minus,
}

impl Strand {
    /// Parse strand from char
    ///
    /// # Examples
    /// ```
    /// use fast_geneviz::core::Strand;
    /// assert_eq!(Strand::from_char('+'), Some(Strand::Plus));
    /// assert_eq!(Strand::from_char('-'), Some(Strand::Minus));
    /// assert_eq!(Strand::from_char('.'), None);
    /// ```
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Strand::Plus),
            '-' => Some(Strand::Minus),
            _ => None,
        }
    }

    /// Parse strand from a column value ("+", "-", "1", "-1")
    pub fn from_field(s: &str) -> Option<Self> {
        match s {
            "+" | "1" => Some(Strand::Plus),
            "-" | "-1" => Some(Strand::Minus),
            _ => None,
        }
    }

    /// Convert to char
    pub fn to_char(&self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
        }
    }

    /// Numeric direction along the genomic axis (1 or -1)
    pub fn sign(&self) -> f64 {
        match self {
            Strand::Plus => 1.0,
            Strand::Minus => -1.0,
        }
    }
}

impl std::fmt::Display for Strand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Direction of the displayed genomic axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Orientation {
    /// Coordinates increase left to right
    #[default]
    Forward,
    /// Coordinates decrease left to right
    Reversed,
}

impl Orientation {
    pub fn is_reversed(&self) -> bool {
        matches!(self, Orientation::Reversed)
    }
}

/// A genomic region to draw: `chrom:start-end`, 0-based half-open
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Region {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

impl Region {
    pub fn new(chrom: impl Into<String>, start: u64, end: u64) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
        }
    }

    /// Region length in bases
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl FromStr for Region {
    type Err = RegionParseError;

    /// Parse `chr1:1,000-2,000`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (chrom, range) = s
            .rsplit_once(':')
            .ok_or_else(|| RegionParseError::MissingColon(s.to_string()))?;
        if chrom.is_empty() {
            return Err(RegionParseError::EmptyChrom(s.to_string()));
        }
        let (start, end) = range
            .split_once('-')
            .ok_or_else(|| RegionParseError::MissingDash(s.to_string()))?;

        let parse = |value: &str| -> Result<u64, RegionParseError> {
            value.replace(',', "").parse().map_err(|_| {
                RegionParseError::InvalidCoordinate {
                    region: s.to_string(),
                    value: value.to_string(),
                }
            })
        };
        let start = parse(start)?;
        let end = parse(end)?;
        if start > end {
            return Err(RegionParseError::InvalidRange { start, end });
        }

        Ok(Region::new(chrom, start, end))
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}
