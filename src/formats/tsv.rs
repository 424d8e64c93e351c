//! Tab-separated output of track layouts
//!
//! One block per region:
//!
//! ```text
//! #region  chr1:1000-2000
//! #height  2.1
//! #ylim    2.1
//! rect     x  y  width  height  color
//! arrow    x  y  dx  width  head_width  head_length  color
//! junction color  x0,y0;x1,y1[;x2,y2]
//! arc      color  x0,y0;x1,y1;x2,y2;x3,y3
//! tick     x  y0  y1  color
//! profile  color  fill  x0,y0;x1,y1;...
//! label    x  y  text
//! ```

use crate::core::Region;
use crate::formats::FeatureRecord;
use crate::tracks::{Shape, TrackLayout};
use std::io::{self, Write};

fn points(points: &[(f64, f64)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{},{}", x, y))
        .collect::<Vec<_>>()
        .join(";")
}

/// Write one region block
pub fn write_layout<W: Write>(writer: &mut W, region: &Region, layout: &TrackLayout) -> io::Result<()> {
    writeln!(writer, "#region\t{}", region)?;
    writeln!(writer, "#height\t{}", layout.height)?;
    writeln!(writer, "#ylim\t{}", layout.y_limit)?;

    for shape in &layout.shapes {
        match shape {
            Shape::Rect {
                x,
                y,
                width,
                height,
                color,
            } => writeln!(writer, "rect\t{}\t{}\t{}\t{}\t{}", x, y, width, height, color)?,
            Shape::Arrow {
                x,
                y,
                dx,
                width,
                head_width,
                head_length,
                color,
            } => writeln!(
                writer,
                "arrow\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                x, y, dx, width, head_width, head_length, color
            )?,
            Shape::Junction { points: p, color } => {
                writeln!(writer, "junction\t{}\t{}", color, points(p))?
            }
            Shape::Arc { vertices, color } => writeln!(writer, "arc\t{}\t{}", color, points(vertices))?,
            Shape::Tick { x, y0, y1, color } => writeln!(writer, "tick\t{}\t{}\t{}\t{}", x, y0, y1, color)?,
            Shape::Profile {
                points: p,
                fill,
                color,
            } => writeln!(writer, "profile\t{}\t{}\t{}", color, fill, points(p))?,
        }
    }

    for label in &layout.labels {
        writeln!(writer, "label\t{}\t{}\t{}", label.x, label.y, label.text)?;
    }
    Ok(())
}

/// Write BED3 lines
pub fn write_bed3<W: Write>(writer: &mut W, records: &[FeatureRecord]) -> io::Result<()> {
    for record in records {
        writeln!(writer, "{}\t{}\t{}", record.chrom, record.start, record.end)?;
    }
    Ok(())
}
