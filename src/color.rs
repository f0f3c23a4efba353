use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::canonical_species;

/// Fill used for every box in the box plot.
pub const BOX_FILL: Color32 = Color32::from_rgb(0x69, 0xb3, 0xa2);

/// Fixed categorical colours, keyed by the bare species name.
const SPECIES_COLORS: [(&str, Color32); 3] = [
    ("setosa", Color32::from_rgb(0x1f, 0x77, 0xb4)),
    ("versicolor", Color32::from_rgb(0xff, 0x7f, 0x0e)),
    ("virginica", Color32::from_rgb(0x2c, 0xa0, 0x2c)),
];

// ---------------------------------------------------------------------------
// Fallback palette for labels outside the fixed three
// ---------------------------------------------------------------------------

const FALLBACK_SATURATION: f32 = 0.75;
const FALLBACK_LIGHTNESS: f32 = 0.55;

/// `n` colours on evenly spaced hues, for species labels the fixed palette
/// does not know (hybrids, misspellings, other datasets).
pub fn generate_palette(n: usize) -> Vec<Color32> {
    let step = 360.0 / n.max(1) as f32;
    (0..n)
        .map(|i| {
            let rgb: Srgb = Hsl::new(i as f32 * step, FALLBACK_SATURATION, FALLBACK_LIGHTNESS).into_color();
            let [r, g, b] = [rgb.red, rgb.green, rgb.blue].map(|c| (c * 255.0).round() as u8);
            Color32::from_rgb(r, g, b)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: species label → Color32
// ---------------------------------------------------------------------------

/// Maps species labels to colours. The three Iris species always get the
/// fixed palette; any other label draws from a generated one.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new<S: AsRef<str>>(labels: &[S]) -> Self {
        let unknown: Vec<&str> = labels
            .iter()
            .map(|l| l.as_ref())
            .filter(|l| fixed_color(l).is_none())
            .collect();
        let mut generated = generate_palette(unknown.len()).into_iter();

        let mut mapping = BTreeMap::new();
        for label in labels {
            let label = label.as_ref();
            if mapping.contains_key(label) {
                continue;
            }
            let color = fixed_color(label)
                .or_else(|| generated.next())
                .unwrap_or(Color32::GRAY);
            mapping.insert(label.to_string(), color);
        }

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a species label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .or_else(|| fixed_color(label))
            .unwrap_or(self.default_color)
    }
}

fn fixed_color(label: &str) -> Option<Color32> {
    let name = canonical_species(label);
    SPECIES_COLORS
        .iter()
        .find(|(species, _)| *species == name)
        .map(|(_, c)| *c)
}
