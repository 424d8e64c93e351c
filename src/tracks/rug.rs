//! Rug track: one tick per position

use crate::core::{LayoutResult, Region};
use crate::tracks::{
    ColorMap, DrawContext, FeatureSet, Palette, Shape, Track, TrackLayout, DEFAULT_COLOR,
};

#[derive(Debug, Clone, PartialEq)]
pub struct RugTrackConfig {
    pub hue: Option<String>,
    pub hue_order: Option<Vec<String>>,
    pub palette: Palette,
    pub height: f64,
    pub color: String,
}

impl Default for RugTrackConfig {
    fn default() -> Self {
        Self {
            hue: None,
            hue_order: None,
            palette: Palette::default(),
            height: 1.0,
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

/// Ticks at the `start` of each record
#[derive(Debug, Clone)]
pub struct RugTrack {
    data: FeatureSet,
    config: RugTrackConfig,
    color_map: ColorMap,
}

impl RugTrack {
    pub fn new(data: FeatureSet, config: RugTrackConfig) -> Self {
        let color_map = match config.hue.as_deref() {
            Some(hue) => ColorMap::build(
                data.records().iter().filter_map(|r| r.attr(hue)),
                &config.palette,
                config.hue_order.as_deref(),
            ),
            None => ColorMap::default(),
        };
        Self {
            data,
            config,
            color_map,
        }
    }
}

impl Track for RugTrack {
    fn layout(&self, region: &Region, _ctx: &mut DrawContext<'_>) -> LayoutResult<TrackLayout> {
        let height = self.config.height;
        let shapes = self
            .data
            .search(region)
            .into_iter()
            .filter(|r| r.start > region.start && r.start < region.end)
            .map(|r| {
                let color = self
                    .config
                    .hue
                    .as_deref()
                    .and_then(|hue| r.attr(hue))
                    .and_then(|value| self.color_map.get(value))
                    .unwrap_or(&self.config.color);
                Shape::Tick {
                    x: r.start as f64,
                    y0: 0.0,
                    y1: height,
                    color: color.to_string(),
                }
            })
            .collect();

        Ok(TrackLayout {
            shapes,
            labels: Vec::new(),
            y_limit: height,
            height,
        })
    }
}
