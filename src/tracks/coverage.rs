//! Read coverage: per-base depth over the region
//!
//! Depth is computed from the sorted start/end events of the reads, so the
//! cost depends on the number of reads rather than the region width.
//! Spliced reads should be loaded block by block so that introns do not
//! count towards depth.

use crate::core::{LayoutResult, Region};
use crate::formats::FeatureRecord;
use crate::tracks::{DrawContext, FeatureSet, Shape, Track, TrackLayout, DEFAULT_COLOR};
use log::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct CoverageTrackConfig {
    /// Relative height of the track within a figure
    pub height: f64,
    /// Fill the area under the depth profile
    pub fill: bool,
    pub color: String,
}

impl Default for CoverageTrackConfig {
    fn default() -> Self {
        Self {
            height: 1.0,
            fill: true,
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

/// Bases `[start, end)` sharing one depth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthRun {
    pub start: u64,
    pub end: u64,
    pub depth: u32,
}

/// Depth runs tiling `[region.start, region.end)`
///
/// Reads are clipped to the region; zero-length reads cover one base.
/// Neighbouring runs always differ in depth.
pub fn depth_runs<'a, I>(reads: I, region: &Region) -> Vec<DepthRun>
where
    I: IntoIterator<Item = &'a FeatureRecord>,
{
    let mut events: Vec<(u64, i64)> = Vec::new();
    for read in reads {
        let end = if read.start == read.end {
            read.end.saturating_add(1)
        } else {
            read.end
        };
        let (start, end) = (read.start.max(region.start), end.min(region.end));
        if start < end {
            events.push((start, 1));
            events.push((end, -1));
        }
    }
    events.sort_unstable();

    let mut runs: Vec<DepthRun> = Vec::new();
    let mut push_run = |start: u64, end: u64, depth: i64| {
        if start >= end {
            return;
        }
        let depth = depth.max(0) as u32;
        match runs.last_mut() {
            Some(last) if last.depth == depth => last.end = end,
            _ => runs.push(DepthRun { start, end, depth }),
        }
    };

    let mut pos = region.start;
    let mut depth = 0i64;
    for (at, delta) in events {
        push_run(pos, at, depth);
        pos = pos.max(at);
        depth += delta;
    }
    push_run(pos, region.end, depth);

    runs
}

/// Depth profile of the reads overlapping the region
#[derive(Debug, Clone)]
pub struct CoverageTrack {
    data: FeatureSet,
    config: CoverageTrackConfig,
}

impl CoverageTrack {
    pub fn new(data: FeatureSet, config: CoverageTrackConfig) -> Self {
        Self { data, config }
    }

    pub fn config(&self) -> &CoverageTrackConfig {
        &self.config
    }

    pub fn depth_runs(&self, region: &Region) -> Vec<DepthRun> {
        depth_runs(self.data.search(region), region)
    }
}

impl Track for CoverageTrack {
    fn layout(&self, region: &Region, _ctx: &mut DrawContext<'_>) -> LayoutResult<TrackLayout> {
        let runs = self.depth_runs(region);
        let max_depth = runs.iter().map(|run| run.depth).max().unwrap_or(0);
        debug!("Coverage over {}: {} runs, max depth {}", region, runs.len(), max_depth);

        let shapes = if runs.is_empty() {
            Vec::new()
        } else {
            let points = runs
                .iter()
                .flat_map(|run| {
                    let y = f64::from(run.depth);
                    [(run.start as f64, y), (run.end as f64, y)]
                })
                .collect();
            vec![Shape::Profile {
                points,
                fill: self.config.fill,
                color: self.config.color.clone(),
            }]
        };

        Ok(TrackLayout {
            shapes,
            labels: Vec::new(),
            y_limit: f64::from(max_depth),
            height: self.config.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Orientation;

    fn run(start: u64, end: u64, depth: u32) -> DepthRun {
        DepthRun { start, end, depth }
    }

    fn reads(spans: &[(u64, u64)]) -> Vec<FeatureRecord> {
        spans.iter().map(|&(s, e)| FeatureRecord::new("chr1", s, e)).collect()
    }

    #[test]
    fn test_overlapping_reads() {
        let reads = reads(&[(10, 30), (20, 40), (25, 35)]);
        let runs = depth_runs(&reads, &Region::new("chr1", 0, 50));

        assert_eq!(
            runs,
            vec![
                run(0, 10, 0),
                run(10, 20, 1),
                run(20, 25, 2),
                run(25, 30, 3),
                run(30, 35, 2),
                run(35, 40, 1),
                run(40, 50, 0),
            ]
        );
    }

    #[test]
    fn test_touching_reads_keep_depth() {
        let reads = reads(&[(10, 20), (20, 30)]);
        let runs = depth_runs(&reads, &Region::new("chr1", 10, 30));
        assert_eq!(runs, vec![run(10, 30, 1)]);
    }

    #[test]
    fn test_reads_clipped_to_region() {
        let reads = reads(&[(0, 100), (90, 200), (150, 150)]);
        let runs = depth_runs(&reads, &Region::new("chr1", 50, 160));

        assert_eq!(
            runs,
            vec![run(50, 90, 1), run(90, 100, 2), run(100, 150, 1), run(150, 151, 2), run(151, 160, 1)]
        );
    }

    #[test]
    fn test_empty_region_has_no_runs() {
        let reads = reads(&[(0, 100)]);
        assert!(depth_runs(&reads, &Region::new("chr1", 40, 40)).is_empty());
    }

    #[test]
    fn test_spliced_blocks_leave_gap() {
        let reads = vec![
            FeatureRecord::new("chr1", 100, 150).with_attr("name", "r1"),
            FeatureRecord::new("chr1", 400, 450).with_attr("name", "r1"),
            FeatureRecord::new("chr2", 100, 450).with_attr("name", "r2"),
        ];
        let track = CoverageTrack::new(FeatureSet::new(reads), CoverageTrackConfig::default());

        assert_eq!(
            track.depth_runs(&Region::new("chr1", 100, 450)),
            vec![run(100, 150, 1), run(150, 400, 0), run(400, 450, 1)]
        );
    }

    #[test]
    fn test_layout_profile() {
        let track = CoverageTrack::new(
            FeatureSet::new(reads(&[(10, 30), (20, 40)])),
            CoverageTrackConfig {
                height: 2.0,
                fill: false,
                ..Default::default()
            },
        );

        let layout = track
            .layout(&Region::new("chr1", 10, 40), &mut DrawContext::new(Orientation::Forward))
            .unwrap();

        assert_eq!(
            layout.shapes,
            vec![Shape::Profile {
                points: vec![(10.0, 1.0), (20.0, 1.0), (20.0, 2.0), (30.0, 2.0), (30.0, 1.0), (40.0, 1.0)],
                fill: false,
                color: "dimgrey".to_string(),
            }]
        );
        assert_eq!(layout.y_limit, 2.0);
        assert_eq!(layout.height, 2.0);
        assert!(layout.labels.is_empty());
    }

    #[test]
    fn test_no_reads_is_flat() {
        let track = CoverageTrack::new(FeatureSet::new(Vec::new()), CoverageTrackConfig::default());
        let layout = track
            .layout(&Region::new("chr1", 0, 10), &mut DrawContext::new(Orientation::Forward))
            .unwrap();

        assert_eq!(layout.y_limit, 0.0);
        assert_eq!(layout.height, 1.0);
        assert!(matches!(&layout.shapes[..], [Shape::Profile { points, .. }] if points.len() == 2));
    }
}
