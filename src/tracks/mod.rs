//! Annotation tracks
//!
//! Tracks select the records of a region, run the layout engine and emit a
//! renderer-agnostic list of shapes and label anchors. Drawing the shapes
//! is left to the caller.

mod batch;
mod colormap;
mod coverage;
mod dataset;
mod feature;
mod gene;
mod label;
mod rug;
mod splice;

pub use batch::{layout_regions, BatchOptions};
pub use colormap::{ColorMap, Palette};
pub use coverage::{depth_runs, CoverageTrack, CoverageTrackConfig, DepthRun};
pub use dataset::FeatureSet;
pub use feature::{FeatureTrack, FeatureTrackConfig};
pub use gene::{Collapse, GeneTrack, GeneTrackConfig};
pub use label::MonospaceMeasure;
pub use rug::{RugTrack, RugTrackConfig};
pub use splice::{SpliceTrack, SpliceTrackConfig};

use crate::core::{LabelMeasure, LayoutResult, Orientation, Region};

/// Default color for features without a hue
pub const DEFAULT_COLOR: &str = "dimgrey";

/// A drawable primitive in data coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Undirected feature box
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: String,
    },
    /// Directed feature, pointing from `x` towards `x + dx` along `y`
    Arrow {
        x: f64,
        y: f64,
        dx: f64,
        width: f64,
        head_width: f64,
        head_length: f64,
        color: String,
    },
    /// Connector between consecutive members of a group
    Junction { points: Vec<(f64, f64)>, color: String },
    /// Cubic bezier control points of a splice arc
    Arc { vertices: [(f64, f64); 4], color: String },
    /// Vertical rug tick
    Tick { x: f64, y0: f64, y1: f64, color: String },
    /// Stepped depth profile, optionally filled down to zero
    Profile {
        points: Vec<(f64, f64)>,
        fill: bool,
        color: String,
    },
}

impl Shape {
    /// Short name used in tabular output
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Rect { .. } => "rect",
            Shape::Arrow { .. } => "arrow",
            Shape::Junction { .. } => "junction",
            Shape::Arc { .. } => "arc",
            Shape::Tick { .. } => "tick",
            Shape::Profile { .. } => "profile",
        }
    }

    pub fn color(&self) -> &str {
        match self {
            Shape::Rect { color, .. }
            | Shape::Arrow { color, .. }
            | Shape::Junction { color, .. }
            | Shape::Arc { color, .. }
            | Shape::Tick { color, .. }
            | Shape::Profile { color, .. } => color,
        }
    }
}

/// Text anchored at a data position, right-aligned before the feature
#[derive(Debug, Clone, PartialEq)]
pub struct LabelAnchor {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

/// Everything needed to draw one track over one region
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackLayout {
    pub shapes: Vec<Shape>,
    pub labels: Vec<LabelAnchor>,
    /// Upper limit of the y axis, in data units
    pub y_limit: f64,
    /// Relative height of the track within a figure
    pub height: f64,
}

/// Per-call drawing context
pub struct DrawContext<'m> {
    pub orientation: Orientation,
    /// Label sizing backend; without one, labels do not take up space
    pub measure: Option<&'m mut dyn LabelMeasure>,
}

impl<'m> DrawContext<'m> {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            measure: None,
        }
    }

    pub fn with_measure(mut self, measure: &'m mut dyn LabelMeasure) -> Self {
        self.measure = Some(measure);
        self
    }
}

impl std::fmt::Debug for DrawContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawContext")
            .field("orientation", &self.orientation)
            .field("measure", &self.measure.is_some())
            .finish()
    }
}

/// A track that can be laid out over a genomic region
pub trait Track {
    /// Compute shapes, labels and height for the region
    fn layout(&self, region: &Region, ctx: &mut DrawContext<'_>) -> LayoutResult<TrackLayout>;

    /// Height of the track within the region
    fn height(&self, region: &Region, ctx: &mut DrawContext<'_>) -> LayoutResult<f64> {
        Ok(self.layout(region, ctx)?.height)
    }
}

/// Lay out several tracks sharing one genomic axis
///
/// Returns one layout per track and the height ratios of the stack.
pub fn layout_tracks(
    tracks: &[&dyn Track],
    region: &Region,
    ctx: &mut DrawContext<'_>,
) -> LayoutResult<(Vec<TrackLayout>, Vec<f64>)> {
    let layouts = tracks
        .iter()
        .map(|track| track.layout(region, ctx))
        .collect::<LayoutResult<Vec<_>>>()?;
    let ratios = layouts.iter().map(|layout| layout.height).collect();
    Ok((layouts, ratios))
}
