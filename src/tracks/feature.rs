//! Generic feature track
//!
//! Draws the records of a region as boxes or strand arrows, stacked so
//! that overlapping features (or groups of features) never share a level.

use crate::core::{stack_grouped, Interval, LayoutResult, Labeler, Region, StackOptions, StackedLayout};
use crate::formats::FeatureRecord;
use crate::tracks::{
    ColorMap, DrawContext, FeatureSet, LabelAnchor, Palette, Shape, Track, TrackLayout,
    DEFAULT_COLOR,
};
use log::debug;
use std::collections::HashMap;

/// Feature track settings
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTrackConfig {
    /// Attribute whose value joins features into one group
    pub group: Option<String>,
    /// Attribute drawn as label before each feature or group
    pub label: Option<String>,
    /// Attribute used to color features
    pub hue: Option<String>,
    /// Order of hue values (default: first appearance)
    pub hue_order: Option<Vec<String>>,
    pub palette: Palette,
    /// Draw boxes and bend the group junctions by strand instead of
    /// drawing arrows
    pub strand_junctions: bool,
    /// Height of each feature
    pub height: f64,
    /// Vertical gap between levels
    pub spacing: f64,
    /// Color of features without a hue and of junctions
    pub color: String,
}

impl Default for FeatureTrackConfig {
    fn default() -> Self {
        Self {
            group: None,
            label: None,
            hue: None,
            hue_order: None,
            palette: Palette::default(),
            strand_junctions: false,
            height: 1.0,
            spacing: 0.05,
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FeatureTrack {
    data: FeatureSet,
    config: FeatureTrackConfig,
    color_map: ColorMap,
}

impl FeatureTrack {
    /// Create a track, coloring by the hue values found in `data`
    pub fn new(data: FeatureSet, config: FeatureTrackConfig) -> Self {
        let color_map = match config.hue.as_deref() {
            Some(hue) => ColorMap::build(
                data.records().iter().filter_map(|r| r.attr(hue)),
                &config.palette,
                config.hue_order.as_deref(),
            ),
            None => ColorMap::default(),
        };
        Self::with_color_map(data, config, color_map)
    }

    /// Create a track with a precomputed color map
    pub fn with_color_map(data: FeatureSet, config: FeatureTrackConfig, color_map: ColorMap) -> Self {
        Self {
            data,
            config,
            color_map,
        }
    }

    /// Create a track of fixed-width features centered on single positions
    ///
    /// Each record's `start` is taken as its position.
    pub fn from_positions(records: Vec<FeatureRecord>, width: u64, config: FeatureTrackConfig) -> Self {
        let half = width / 2;
        let data = records
            .into_iter()
            .map(|record| FeatureRecord {
                start: record.start.saturating_sub(half),
                end: record.start.saturating_add(half),
                ..record
            })
            .collect();
        Self::new(data, config)
    }

    pub fn data(&self) -> &FeatureSet {
        &self.data
    }

    pub fn config(&self) -> &FeatureTrackConfig {
        &self.config
    }

    pub fn color_map(&self) -> &ColorMap {
        &self.color_map
    }

    /// Select and stack the records of a region
    ///
    /// Item payloads index into the returned records.
    pub fn stack(
        &self,
        region: &Region,
        ctx: &mut DrawContext<'_>,
    ) -> LayoutResult<(Vec<&FeatureRecord>, StackedLayout<usize>)> {
        let records = self.data.search(region);
        let intervals = records
            .iter()
            .enumerate()
            .map(|(i, record)| record.to_interval(self.config.height, i))
            .collect();

        let options = StackOptions {
            spacing: self.config.spacing,
            orientation: ctx.orientation,
        };

        let label_key = self.config.label.as_deref();
        let label_of = |interval: &Interval<usize>| {
            label_key
                .and_then(|key| records[interval.payload].attr(key))
                .map(str::to_string)
        };
        let labeler = match (label_key, ctx.measure.as_deref_mut()) {
            (Some(_), Some(measure)) => Some(Labeler {
                label_of: &label_of,
                measure,
            }),
            _ => None,
        };

        let group_key = self.config.group.as_deref();
        let stacked = stack_grouped(
            intervals,
            |interval| group_key.and_then(|key| records[interval.payload].attr(key)),
            labeler,
            &options,
        )?;

        Ok((records, stacked))
    }

    fn color_of(&self, record: &FeatureRecord) -> &str {
        self.config
            .hue
            .as_deref()
            .and_then(|hue| record.attr(hue))
            .and_then(|value| self.color_map.get(value))
            .unwrap_or(&self.config.color)
    }

    fn feature_shape(&self, record: &FeatureRecord, y: f64) -> Shape {
        let height = self.config.height;
        let color = self.color_of(record).to_string();
        let (start, end) = (record.start as f64, record.end as f64);

        match record.strand {
            Some(strand) if !self.config.strand_junctions => {
                let (x, dx) = if strand.sign() > 0.0 {
                    (start, end - start)
                } else {
                    (end, start - end)
                };
                Shape::Arrow {
                    x,
                    y: y + 0.5 * height,
                    dx,
                    width: 0.5 * height,
                    head_width: 0.9 * height,
                    head_length: dx.abs() * 0.5,
                    color,
                }
            }
            _ => Shape::Rect {
                x: start,
                y,
                width: end - start,
                height,
                color,
            },
        }
    }

    /// One segment between each pair of consecutive members, by start
    fn junctions(&self, members: &[(&FeatureRecord, f64)], shapes: &mut Vec<Shape>) {
        let mut sorted = members.to_vec();
        sorted.sort_by_key(|(record, _)| record.start);

        let Some(&(first, first_y)) = sorted.first() else {
            return;
        };
        let y = first_y + 0.5 * self.config.height;
        let bend = match first.strand {
            Some(strand) if self.config.strand_junctions => Some(0.25 * self.config.height * strand.sign()),
            _ => None,
        };

        for pair in sorted.windows(2) {
            let (x0, x1) = (pair[0].0.end as f64, pair[1].0.start as f64);
            let points = match bend {
                Some(offset) => vec![(x0, y), ((x0 + x1) / 2.0, y + offset), (x1, y)],
                None => vec![(x0, y), (x1, y)],
            };
            shapes.push(Shape::Junction {
                points,
                color: self.config.color.clone(),
            });
        }
    }

    /// Label at the leading edge of a group, text from its first member
    fn label_anchor(
        &self,
        members: &[(&FeatureRecord, f64)],
        reversed: bool,
    ) -> Option<LabelAnchor> {
        let key = self.config.label.as_deref()?;
        let &(first, y) = members.first()?;
        let text = first.attr(key)?;

        let x = if reversed {
            members.iter().map(|(r, _)| r.end).max()?
        } else {
            members.iter().map(|(r, _)| r.start).min()?
        };

        Some(LabelAnchor {
            x: x as f64,
            y: y + 0.5 * self.config.height,
            text: text.to_string(),
        })
    }
}

impl Track for FeatureTrack {
    fn layout(&self, region: &Region, ctx: &mut DrawContext<'_>) -> LayoutResult<TrackLayout> {
        let (records, stacked) = self.stack(region, ctx)?;
        let reversed = ctx.orientation.is_reversed();

        let placed: Vec<(&FeatureRecord, f64)> = stacked
            .items
            .iter()
            .map(|item| (records[item.interval.payload], item.y_offset))
            .collect();

        let mut shapes: Vec<Shape> = placed
            .iter()
            .map(|&(record, y)| self.feature_shape(record, y))
            .collect();
        let mut labels = Vec::new();

        match self.config.group.as_deref() {
            Some(key) => {
                for members in group_members(&placed, key) {
                    self.junctions(&members, &mut shapes);
                    labels.extend(self.label_anchor(&members, reversed));
                }
            }
            None => {
                for member in &placed {
                    labels.extend(self.label_anchor(std::slice::from_ref(member), reversed));
                }
            }
        }

        let height = stacked.extent() + self.config.spacing;
        debug!(
            "Laid out {} features of {} on {} levels",
            placed.len(),
            region,
            stacked.level_count()
        );

        Ok(TrackLayout {
            shapes,
            labels,
            y_limit: height,
            height,
        })
    }
}

/// Split placed records by group attribute, in order of first appearance
///
/// Records without the attribute form their own group.
fn group_members<'r>(
    placed: &[(&'r FeatureRecord, f64)],
    key: &str,
) -> Vec<Vec<(&'r FeatureRecord, f64)>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<(&FeatureRecord, f64)>> = Vec::new();

    for &(record, y) in placed {
        let slot = match record.attr(key) {
            Some(value) => *index.entry(value).or_insert(groups.len()),
            None => groups.len(),
        };
        if slot == groups.len() {
            groups.push(Vec::new());
        }
        groups[slot].push((record, y));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Orientation, Strand};
    use crate::tracks::MonospaceMeasure;

    fn region() -> Region {
        Region::new("chr1", 0, 1000)
    }

    fn exon(start: u64, end: u64, tx: &str) -> FeatureRecord {
        FeatureRecord::new("chr1", start, end).with_attr("transcript_id", tx)
    }

    fn grouped_config() -> FeatureTrackConfig {
        FeatureTrackConfig {
            group: Some("transcript_id".to_string()),
            label: Some("transcript_id".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_single_features_as_rects() {
        let track = FeatureTrack::new(
            FeatureSet::new(vec![
                FeatureRecord::new("chr1", 100, 200),
                FeatureRecord::new("chr1", 150, 250),
            ]),
            FeatureTrackConfig::default(),
        );

        let layout = track
            .layout(&region(), &mut DrawContext::new(Orientation::Forward))
            .unwrap();

        assert_eq!(
            layout.shapes[1],
            Shape::Rect {
                x: 150.0,
                y: 1.05,
                width: 100.0,
                height: 1.0,
                color: "dimgrey".to_string(),
            }
        );
        assert!((layout.height - 2.1).abs() < 1e-12);
        assert!(layout.labels.is_empty());
    }

    #[test]
    fn test_arrows_follow_strand() {
        let track = FeatureTrack::new(
            FeatureSet::new(vec![
                FeatureRecord::new("chr1", 100, 200).with_strand(Some(Strand::Plus)),
                FeatureRecord::new("chr1", 300, 400).with_strand(Some(Strand::Minus)),
            ]),
            FeatureTrackConfig::default(),
        );

        let layout = track
            .layout(&region(), &mut DrawContext::new(Orientation::Forward))
            .unwrap();

        match &layout.shapes[0] {
            Shape::Arrow { x, dx, y, width, head_width, head_length, .. } => {
                assert_eq!((*x, *dx, *y), (100.0, 100.0, 0.5));
                assert_eq!((*width, *head_width, *head_length), (0.5, 0.9, 50.0));
            }
            other => panic!("expected arrow, got {:?}", other),
        }
        match &layout.shapes[1] {
            Shape::Arrow { x, dx, .. } => assert_eq!((*x, *dx), (400.0, -100.0)),
            other => panic!("expected arrow, got {:?}", other),
        }
    }

    #[test]
    fn test_group_shares_level_with_junctions() {
        let track = FeatureTrack::new(
            FeatureSet::new(vec![
                exon(500, 600, "T1"),
                exon(100, 200, "T1"),
                exon(150, 450, "T2"),
            ]),
            FeatureTrackConfig {
                label: None,
                ..grouped_config()
            },
        );

        let (_, stacked) = track
            .stack(&region(), &mut DrawContext::new(Orientation::Forward))
            .unwrap();
        assert_eq!(stacked.items[0].y_offset, stacked.items[1].y_offset);
        assert_ne!(stacked.items[0].level, stacked.items[2].level);

        let layout = track
            .layout(&region(), &mut DrawContext::new(Orientation::Forward))
            .unwrap();
        let junctions: Vec<_> = layout
            .shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Junction { points, .. } => Some(points.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(junctions, vec![vec![(200.0, 0.5), (500.0, 0.5)]]);
    }

    #[test]
    fn test_stranded_junctions_bend() {
        let track = FeatureTrack::new(
            FeatureSet::new(vec![
                exon(100, 200, "T1").with_strand(Some(Strand::Minus)),
                exon(300, 400, "T1").with_strand(Some(Strand::Minus)),
            ]),
            FeatureTrackConfig {
                strand_junctions: true,
                label: None,
                ..grouped_config()
            },
        );

        let layout = track
            .layout(&region(), &mut DrawContext::new(Orientation::Forward))
            .unwrap();

        assert!(matches!(layout.shapes[0], Shape::Rect { .. }));
        assert_eq!(
            layout.shapes[2],
            Shape::Junction {
                points: vec![(200.0, 0.5), (250.0, 0.25), (300.0, 0.5)],
                color: "dimgrey".to_string(),
            }
        );
    }

    #[test]
    fn test_group_label_anchor() {
        let track = FeatureTrack::new(
            FeatureSet::new(vec![exon(500, 600, "T1"), exon(100, 200, "T1")]),
            grouped_config(),
        );

        let forward = track
            .layout(&region(), &mut DrawContext::new(Orientation::Forward))
            .unwrap();
        assert_eq!(
            forward.labels,
            vec![LabelAnchor {
                x: 100.0,
                y: 0.5,
                text: "T1".to_string()
            }]
        );

        let reversed = track
            .layout(&region(), &mut DrawContext::new(Orientation::Reversed))
            .unwrap();
        assert_eq!(reversed.labels[0].x, 600.0);
    }

    #[test]
    fn test_labels_take_space_with_measure() {
        // T2 would fit after T1 on one level, but its label reaches into T1
        let data = FeatureSet::new(vec![exon(0, 100, "T1"), exon(110, 200, "T2")]);
        let track = FeatureTrack::new(data, grouped_config());

        let without = track
            .layout(&region(), &mut DrawContext::new(Orientation::Forward))
            .unwrap();
        assert!((without.height - 1.05).abs() < 1e-12);

        let mut measure = MonospaceMeasure::new(10.0, 5.0, Orientation::Forward);
        let mut ctx = DrawContext::new(Orientation::Forward).with_measure(&mut measure);
        let with = track.layout(&region(), &mut ctx).unwrap();
        assert!((with.height - 2.1).abs() < 1e-12);
    }

    #[test]
    fn test_hue_colors() {
        let track = FeatureTrack::new(
            FeatureSet::new(vec![
                FeatureRecord::new("chr1", 0, 10).with_attr("kind", "a"),
                FeatureRecord::new("chr1", 20, 30).with_attr("kind", "b"),
                FeatureRecord::new("chr1", 40, 50),
            ]),
            FeatureTrackConfig {
                hue: Some("kind".to_string()),
                palette: Palette::new(["red", "blue"]),
                ..Default::default()
            },
        );

        let layout = track
            .layout(&region(), &mut DrawContext::new(Orientation::Forward))
            .unwrap();
        let colors: Vec<_> = layout.shapes.iter().map(Shape::color).collect();
        assert_eq!(colors, vec!["red", "blue", "dimgrey"]);
    }

    #[test]
    fn test_empty_region_height_is_spacing() {
        let track = FeatureTrack::new(FeatureSet::default(), FeatureTrackConfig::default());
        let height = track
            .height(&region(), &mut DrawContext::new(Orientation::Forward))
            .unwrap();
        assert_eq!(height, 0.05);
    }

    #[test]
    fn test_from_positions() {
        let track = FeatureTrack::from_positions(
            vec![
                FeatureRecord::new("chr1", 100, 100),
                FeatureRecord::new("chr1", 2, 2),
            ],
            10,
            FeatureTrackConfig::default(),
        );
        let records = track.data().records();
        assert_eq!((records[0].start, records[0].end), (95, 105));
        assert_eq!((records[1].start, records[1].end), (0, 7));
    }

    #[test]
    fn test_measure_failure_propagates() {
        let track = FeatureTrack::new(FeatureSet::new(vec![exon(0, 10, "T1")]), grouped_config());
        let mut failing = |_: f64, _: f64, _: &str| -> Result<crate::core::Extent, crate::core::MeasureError> {
            Err(crate::core::MeasureError("no surface".to_string()))
        };
        let mut ctx = DrawContext::new(Orientation::Forward).with_measure(&mut failing);
        assert!(matches!(
            track.layout(&region(), &mut ctx),
            Err(crate::core::LayoutError::Measure(_))
        ));
    }
}
