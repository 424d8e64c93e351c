//! First-Fit Decreasing Height (FFDH) level packing
//!
//! The packing algorithm:
//! 1. Sort intervals by decreasing height, then decreasing span length
//! 2. Place each interval in the first level it does not overlap
//! 3. Open a new level when no existing level accepts it
//! 4. Stack levels bottom-up: `offset(k+1) = offset(k) + (height(k) + spacing)`
//!
//! FFDH is a greedy heuristic; it never re-balances levels once assigned.

use crate::core::error::{LayoutError, LayoutResult};
use crate::core::index::SpanIndex;
use crate::core::interval::Interval;
use log::debug;
use std::cmp::Ordering;

/// One lane of mutually non-overlapping intervals
#[derive(Debug, Clone)]
pub struct Level<P> {
    members: Vec<Interval<P>>,
    occupancy: SpanIndex,
}

impl<P> Level<P> {
    fn with_first(interval: Interval<P>) -> Self {
        let mut occupancy = SpanIndex::new();
        occupancy.insert(interval.start, interval.end);
        Self {
            members: vec![interval],
            occupancy,
        }
    }

    /// Check whether the span would collide with a member of this level
    pub fn overlaps(&self, start: i64, end: i64) -> bool {
        self.occupancy.overlaps(start, end)
    }

    fn push(&mut self, interval: Interval<P>) {
        self.occupancy.insert(interval.start, interval.end);
        self.members.push(interval);
    }

    /// Members in placement order
    pub fn members(&self) -> &[Interval<P>] {
        &self.members
    }

    pub fn into_members(self) -> Vec<Interval<P>> {
        self.members
    }

    /// Tallest member height
    pub fn height(&self) -> f64 {
        self.members.iter().map(|iv| iv.height).fold(0.0, f64::max)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Result of packing: levels in creation order with their heights and offsets
#[derive(Debug, Clone)]
pub struct PackedLevels<P> {
    pub levels: Vec<Level<P>>,
    pub level_heights: Vec<f64>,
    pub offsets: Vec<f64>,
}

impl<P> PackedLevels<P> {
    /// Number of levels
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Top of the highest level (`offset + height`), 0 when empty
    pub fn extent(&self) -> f64 {
        self.offsets
            .iter()
            .zip(&self.level_heights)
            .map(|(offset, height)| offset + height)
            .fold(0.0, f64::max)
    }

    /// Flatten into `(interval, level, offset)` triples, level by level
    pub fn into_assignments(self) -> impl Iterator<Item = (Interval<P>, usize, f64)> {
        self.levels
            .into_iter()
            .zip(self.offsets)
            .enumerate()
            .flat_map(|(level_idx, (level, offset))| {
                level
                    .into_members()
                    .into_iter()
                    .map(move |iv| (iv, level_idx, offset))
            })
    }
}

/// Pack intervals into levels using First-Fit Decreasing Height
///
/// All intervals and the spacing are validated before any placement work;
/// a malformed input fails with `LayoutError`.
///
/// # Example
/// ```
/// use fast_geneviz::core::{pack, Interval};
///
/// let packed = pack(
///     vec![
///         Interval::new(10, 20, 1.0, "a"),
///         Interval::new(15, 25, 1.0, "b"),
///         Interval::new(20, 30, 1.0, "c"),
///     ],
///     0.5,
/// ).unwrap();
///
/// assert_eq!(packed.len(), 2);
/// assert_eq!(packed.offsets, vec![0.0, 1.5]);
/// ```
pub fn pack<P>(intervals: Vec<Interval<P>>, spacing: f64) -> LayoutResult<PackedLevels<P>> {
    if !spacing.is_finite() || spacing < 0.0 {
        return Err(LayoutError::InvalidSpacing(spacing));
    }
    for interval in &intervals {
        interval.validate()?;
    }

    let total = intervals.len();
    let mut sorted = intervals;
    sorted.sort_by(ffdh_order);

    let mut levels: Vec<Level<P>> = Vec::new();

    for interval in sorted {
        match levels
            .iter_mut()
            .find(|level| !level.overlaps(interval.start, interval.end))
        {
            Some(level) => level.push(interval),
            None => levels.push(Level::with_first(interval)),
        }
    }

    let level_heights: Vec<f64> = levels.iter().map(Level::height).collect();
    let offsets = level_offsets(&level_heights, spacing);

    debug!("Packed {} intervals into {} levels", total, levels.len());

    Ok(PackedLevels {
        levels,
        level_heights,
        offsets,
    })
}

/// Sort key: taller first, then longer, then leftmost
fn ffdh_order<P>(a: &Interval<P>, b: &Interval<P>) -> Ordering {
    b.height
        .total_cmp(&a.height)
        .then_with(|| b.len().cmp(&a.len()))
        .then_with(|| a.start.cmp(&b.start))
        .then_with(|| a.end.cmp(&b.end))
}

/// Cumulative level offsets starting at 0
///
/// `offset(k+1) = offset(k) + (height(k) + spacing)`.
pub fn level_offsets(level_heights: &[f64], spacing: f64) -> Vec<f64> {
    let mut offsets = Vec::with_capacity(level_heights.len());
    let mut offset = 0.0;
    for height in level_heights {
        offsets.push(offset);
        offset += height + spacing;
    }
    offsets
}
