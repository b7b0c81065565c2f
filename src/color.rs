use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::CenterTable;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Center type → marker colour
// ---------------------------------------------------------------------------

/// Assigns each center type in a table its own marker colour.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map over the distinct center types of `table`.
    pub fn for_center_types(table: &CenterTable) -> Self {
        let types: BTreeSet<&str> = table
            .records
            .iter()
            .map(|r| r.center_type.as_str())
            .collect();
        let palette = generate_palette(types.len());

        ColorMap {
            mapping: types
                .into_iter()
                .zip(palette)
                .map(|(t, c)| (t.to_string(), c))
                .collect(),
            default_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, center_type: &str) -> Color32 {
        self.mapping
            .get(center_type)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Legend entries (type label → colour) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping.iter().map(|(t, c)| (t.clone(), *c)).collect()
    }
}
