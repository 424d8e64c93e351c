//! Grouped layout on top of the level packer
//!
//! Members of a group (exons of a transcript, transcripts of a gene) are
//! packed as one bounding interval and share the resulting offset.

use crate::core::error::{LayoutError, LayoutResult, MeasureError};
use crate::core::interval::{Interval, Orientation};
use crate::core::pack::pack;
use log::debug;
use std::collections::HashMap;
use std::hash::Hash;

/// Bounding box of a rendered label, in data coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub x0: f64,
    pub x1: f64,
    pub y0: f64,
    pub y1: f64,
}

impl Extent {
    /// Build an extent from two corners in any order
    pub fn new(x0: f64, x1: f64, y0: f64, y1: f64) -> Self {
        let (x0, x1) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (y0, y1) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        Self { x0, x1, y0, y1 }
    }

    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.x1.is_finite()
    }
}

/// Measures the rendered extent of a label anchored at a data position
///
/// Implemented by the rendering backend. The probe may need a live drawing
/// surface, so it takes `&mut self`.
pub trait LabelMeasure {
    fn measure(&mut self, anchor_x: f64, anchor_y: f64, text: &str) -> Result<Extent, MeasureError>;
}

impl<F> LabelMeasure for F
where
    F: FnMut(f64, f64, &str) -> Result<Extent, MeasureError>,
{
    fn measure(&mut self, anchor_x: f64, anchor_y: f64, text: &str) -> Result<Extent, MeasureError> {
        self(anchor_x, anchor_y, text)
    }
}

/// Label lookup plus the backend used to size labels
pub struct Labeler<'a, P> {
    pub label_of: &'a dyn Fn(&Interval<P>) -> Option<String>,
    pub measure: &'a mut dyn LabelMeasure,
}

impl<P> std::fmt::Debug for Labeler<'_, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Labeler").finish_non_exhaustive()
    }
}

/// Options shared by every layout pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackOptions {
    /// Vertical gap between consecutive levels
    pub spacing: f64,
    /// Direction of the display axis (decides which edge a label extends)
    pub orientation: Orientation,
}

impl Default for StackOptions {
    fn default() -> Self {
        Self {
            spacing: 0.05,
            orientation: Orientation::Forward,
        }
    }
}

/// An input interval with its assigned level and vertical offset
#[derive(Debug, Clone, PartialEq)]
pub struct Stacked<P> {
    pub interval: Interval<P>,
    pub level: usize,
    pub y_offset: f64,
}

/// Stacked intervals in input order, with the packed level geometry
#[derive(Debug, Clone)]
pub struct StackedLayout<P> {
    pub items: Vec<Stacked<P>>,
    pub level_heights: Vec<f64>,
    pub level_offsets: Vec<f64>,
}

impl<P> StackedLayout<P> {
    /// Number of levels used
    pub fn level_count(&self) -> usize {
        self.level_heights.len()
    }

    /// Top of the highest stacked item, 0 when empty
    pub fn extent(&self) -> f64 {
        self.items
            .iter()
            .map(|s| s.y_offset + s.interval.height)
            .fold(0.0, f64::max)
    }
}

/// Stack intervals individually (every interval is its own group)
pub fn stack<P>(
    intervals: Vec<Interval<P>>,
    labeler: Option<Labeler<'_, P>>,
    options: &StackOptions,
) -> LayoutResult<StackedLayout<P>> {
    stack_grouped(intervals, |_| None::<()>, labeler, options)
}

/// Stack intervals so that members of a group share one level
///
/// 1. Partition by `group_key_of`; intervals without a key stand alone
/// 2. Build one bounding interval per group (min start, max end, max height)
/// 3. Extend its leading edge by the measured label of the first member
/// 4. Pack the bounding intervals
/// 5. Give each member its group's level and offset
///
/// The label backend is called once per group. Its failures are returned
/// unchanged as `LayoutError::Measure`.
pub fn stack_grouped<P, K, G>(
    intervals: Vec<Interval<P>>,
    group_key_of: G,
    mut labeler: Option<Labeler<'_, P>>,
    options: &StackOptions,
) -> LayoutResult<StackedLayout<P>>
where
    K: Eq + Hash,
    G: Fn(&Interval<P>) -> Option<K>,
{
    for interval in &intervals {
        interval.validate()?;
    }

    // Partition by key, groups ordered by first appearance
    let mut group_ids: HashMap<K, usize> = HashMap::new();
    let mut first_member: Vec<usize> = Vec::new();
    let mut group_of: Vec<usize> = Vec::with_capacity(intervals.len());
    let mut bounds: Vec<Interval<usize>> = Vec::new();

    for (idx, interval) in intervals.iter().enumerate() {
        let group = match group_key_of(interval) {
            Some(key) => *group_ids.entry(key).or_insert(first_member.len()),
            None => first_member.len(),
        };

        if group == first_member.len() {
            first_member.push(idx);
            bounds.push(interval.with_payload(group));
        } else {
            let bound = &mut bounds[group];
            bound.start = bound.start.min(interval.start);
            bound.end = bound.end.max(interval.end);
            bound.height = bound.height.max(interval.height);
        }
        group_of.push(group);
    }

    if let Some(labeler) = labeler.as_mut() {
        for (bound, &first) in bounds.iter_mut().zip(&first_member) {
            if let Some(text) = (labeler.label_of)(&intervals[first]) {
                extend_for_label(bound, &text, &mut *labeler.measure, options.orientation)?;
            }
        }
    }

    let group_count = bounds.len();
    let packed = pack(bounds, options.spacing)?;
    let level_heights = packed.level_heights.clone();
    let level_offsets = packed.offsets.clone();

    let mut placement = vec![(0usize, 0.0f64); group_count];
    for (bound, level, offset) in packed.into_assignments() {
        placement[bound.payload] = (level, offset);
    }

    debug!(
        "Stacked {} intervals in {} groups onto {} levels",
        group_of.len(),
        group_count,
        level_heights.len()
    );

    let items = intervals
        .into_iter()
        .zip(group_of)
        .map(|(interval, group)| {
            let (level, y_offset) = placement[group];
            Stacked {
                interval,
                level,
                y_offset,
            }
        })
        .collect();

    Ok(StackedLayout {
        items,
        level_heights,
        level_offsets,
    })
}

/// Widen the leading edge of a bounding interval to cover its label
fn extend_for_label<M>(
    bound: &mut Interval<usize>,
    text: &str,
    measure: &mut M,
    orientation: Orientation,
) -> LayoutResult<()>
where
    M: LabelMeasure + ?Sized,
{
    let anchor = match orientation {
        Orientation::Forward => bound.start,
        Orientation::Reversed => bound.end,
    };

    let extent = measure.measure(anchor as f64, 0.0, text)?;
    if !extent.is_finite() {
        return Err(LayoutError::InvalidExtent {
            label: text.to_string(),
        });
    }

    match orientation {
        Orientation::Forward => bound.start = bound.start.min(extent.x0.floor() as i64),
        Orientation::Reversed => bound.end = bound.end.max(extent.x1.ceil() as i64),
    }
    Ok(())
}
