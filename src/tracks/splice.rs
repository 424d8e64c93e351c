//! Splice junction arcs

use crate::core::{LayoutResult, Region};
use crate::formats::FeatureRecord;
use crate::tracks::{DrawContext, FeatureSet, Shape, Track, TrackLayout, DEFAULT_COLOR};
use log::warn;

/// A cubic bezier through these control points peaks at 3/4 of their height
const BEZIER_PEAK: f64 = 0.75;

#[derive(Debug, Clone, PartialEq)]
pub struct SpliceTrackConfig {
    /// Attribute holding the junction read count
    pub score: String,
    /// Relative height of the track within a figure
    pub height: f64,
    pub color: String,
}

impl Default for SpliceTrackConfig {
    fn default() -> Self {
        Self {
            score: "score".to_string(),
            height: 1.0,
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

/// One arc per junction, peaking at the junction score
#[derive(Debug, Clone)]
pub struct SpliceTrack {
    data: FeatureSet,
    config: SpliceTrackConfig,
}

impl SpliceTrack {
    pub fn new(data: FeatureSet, config: SpliceTrackConfig) -> Self {
        Self { data, config }
    }

    /// Junction read count, or `None` when missing or not a finite count
    fn score_of(&self, record: &FeatureRecord) -> Option<f64> {
        let raw = record.attr(&self.config.score);
        match raw.and_then(|s| s.trim().parse::<f64>().ok()) {
            Some(score) if score.is_finite() && score >= 0.0 => Some(score),
            _ => {
                warn!(
                    "Skipping junction {}:{}-{}: invalid {} {:?}",
                    record.chrom, record.start, record.end, self.config.score, raw
                );
                None
            }
        }
    }
}

impl Track for SpliceTrack {
    fn layout(&self, region: &Region, _ctx: &mut DrawContext<'_>) -> LayoutResult<TrackLayout> {
        let mut y_limit: f64 = 0.0;
        let shapes = self
            .data
            .search(region)
            .into_iter()
            .filter_map(|r| {
                let score = self.score_of(r)?;
                y_limit = y_limit.max(score);

                let (start, end) = (r.start as f64, r.end as f64);
                let peak = score / BEZIER_PEAK;
                Some(Shape::Arc {
                    vertices: [(start, 0.0), (start, peak), (end, peak), (end, 0.0)],
                    color: self.config.color.clone(),
                })
            })
            .collect();

        Ok(TrackLayout {
            shapes,
            labels: Vec::new(),
            y_limit,
            height: self.config.height,
        })
    }
}
