//! Hue to color mapping

use std::collections::HashMap;

/// Colors assigned to hue values, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette(Vec<String>);

impl Palette {
    pub fn new<I, S>(colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(colors.into_iter().map(Into::into).collect())
    }

    pub fn colors(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new([
            "#4c72b0", "#dd8452", "#55a868", "#c44e52", "#8172b3", "#937860", "#da8bc3",
            "#8c8c8c", "#ccb974", "#64b5cd",
        ])
    }
}

/// Mapping from hue values to palette colors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorMap {
    order: Vec<String>,
    colors: HashMap<String, String>,
}

impl ColorMap {
    /// Assign colors to hue values
    ///
    /// Values are taken in `order` when given, else by first appearance.
    /// The palette is cycled when there are more values than colors. An
    /// empty palette yields an empty map.
    pub fn build<'a, I>(values: I, palette: &Palette, order: Option<&[String]>) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let order: Vec<String> = match order {
            Some(order) => order.to_vec(),
            None => {
                let mut seen = Vec::<String>::new();
                for value in values {
                    if !seen.iter().any(|v| v == value) {
                        seen.push(value.to_string());
                    }
                }
                seen
            }
        };

        if palette.is_empty() {
            return Self::default();
        }

        let colors = order
            .iter()
            .zip(palette.colors().iter().cycle())
            .map(|(value, color)| (value.clone(), color.clone()))
            .collect();

        Self { order, colors }
    }

    /// Color for a hue value
    pub fn get(&self, value: &str) -> Option<&str> {
        self.colors.get(value).map(String::as_str)
    }

    /// `(value, color)` pairs in legend order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.order
            .iter()
            .filter_map(|value| Some((value.as_str(), self.get(value)?)))
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
