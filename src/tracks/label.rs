//! Character-count label sizing

use crate::core::{Extent, LabelMeasure, MeasureError, Orientation, Region};

/// Sizes labels as a fixed number of data units per character
///
/// Labels are drawn right-aligned before their anchor, separated by
/// `padding`. On a reversed axis "before" means towards larger coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    /// Data units per character
    pub char_width: f64,
    /// Gap between the label and its anchor, in data units
    pub padding: f64,
    pub orientation: Orientation,
    /// Label height in y units
    pub line_height: f64,
}

impl MonospaceMeasure {
    pub fn new(char_width: f64, padding: f64, orientation: Orientation) -> Self {
        Self {
            char_width,
            padding,
            orientation,
            line_height: 1.0,
        }
    }

    /// Measure for a region rendered `columns` characters wide
    pub fn for_region(region: &Region, columns: f64, orientation: Orientation) -> Self {
        let char_width = region.len().max(1) as f64 / columns;
        Self::new(char_width, char_width, orientation)
    }
}

impl LabelMeasure for MonospaceMeasure {
    fn measure(&mut self, anchor_x: f64, anchor_y: f64, text: &str) -> Result<Extent, MeasureError> {
        if !(self.char_width.is_finite() && self.char_width >= 0.0) {
            return Err(MeasureError(format!(
                "invalid character width {}",
                self.char_width
            )));
        }

        let width = text.chars().count() as f64 * self.char_width;
        let (x0, x1) = match self.orientation {
            Orientation::Forward => {
                let x1 = anchor_x - self.padding;
                (x1 - width, x1)
            }
            Orientation::Reversed => {
                let x0 = anchor_x + self.padding;
                (x0, x0 + width)
            }
        };
        let half = self.line_height / 2.0;
        Ok(Extent::new(x0, x1, anchor_y - half, anchor_y + half))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_extends_left() {
        let mut m = MonospaceMeasure::new(10.0, 5.0, Orientation::Forward);
        let e = m.measure(100.0, 0.0, "abc").unwrap();
        assert_eq!((e.x0, e.x1), (65.0, 95.0));
        assert_eq!((e.y0, e.y1), (-0.5, 0.5));
    }

    #[test]
    fn test_reversed_extends_right() {
        let mut m = MonospaceMeasure::new(10.0, 5.0, Orientation::Reversed);
        let e = m.measure(100.0, 0.0, "abc").unwrap();
        assert_eq!((e.x0, e.x1), (105.0, 135.0));
    }

    #[test]
    fn test_for_region() {
        let region = Region::new("chr1", 1000, 2000);
        let m = MonospaceMeasure::for_region(&region, 100.0, Orientation::Forward);
        assert_eq!(m.char_width, 10.0);
        assert_eq!(m.padding, 10.0);
    }

    #[test]
    fn test_invalid_width() {
        let mut m = MonospaceMeasure::new(f64::NAN, 0.0, Orientation::Forward);
        assert!(m.measure(0.0, 0.0, "x").is_err());
    }
}
