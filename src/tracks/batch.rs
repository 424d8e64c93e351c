//! Parallel layout of one track over many regions

use crate::core::{LayoutError, Orientation, Region, Result};
use crate::tracks::{DrawContext, MonospaceMeasure, Track, TrackLayout};
use log::info;
use rayon::prelude::*;

/// Options for `layout_regions`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchOptions {
    pub orientation: Orientation,
    /// Characters across the plot width used to size labels; `None`
    /// lays out without label space
    pub label_columns: Option<f64>,
    /// Worker threads (0 = rayon default)
    pub threads: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::Forward,
            label_columns: Some(100.0),
            threads: 0,
        }
    }
}

/// Lay out a track over each region in parallel
///
/// Every region gets its own label measure; layouts are returned in
/// region order.
pub fn layout_regions<T>(track: &T, regions: &[Region], options: &BatchOptions) -> Result<Vec<TrackLayout>>
where
    T: Track + Sync + ?Sized,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads)
        .build()?;

    let layouts = pool.install(|| {
        regions
            .par_iter()
            .map(|region| layout_one(track, region, options))
            .collect::<std::result::Result<Vec<_>, LayoutError>>()
    })?;

    info!(
        "Laid out {} regions ({} shapes)",
        layouts.len(),
        layouts.iter().map(|l| l.shapes.len()).sum::<usize>()
    );
    Ok(layouts)
}

fn layout_one<T>(track: &T, region: &Region, options: &BatchOptions) -> std::result::Result<TrackLayout, LayoutError>
where
    T: Track + ?Sized,
{
    match options.label_columns {
        Some(columns) => {
            let mut measure = MonospaceMeasure::for_region(region, columns, options.orientation);
            let mut ctx = DrawContext::new(options.orientation).with_measure(&mut measure);
            track.layout(region, &mut ctx)
        }
        None => track.layout(region, &mut DrawContext::new(options.orientation)),
    }
}
