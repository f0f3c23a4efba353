use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::data::model::{DatasetVariant, NumericField};

/// Space around the plotting area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Outer size and margins of one chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub margin: Margin,
}

impl Frame {
    /// Width of the plotting area inside the margins.
    pub fn inner_width(&self) -> f64 {
        self.width - self.margin.left - self.margin.right
    }

    /// Height of the plotting area inside the margins.
    pub fn inner_height(&self) -> f64 {
        self.height - self.margin.top - self.margin.bottom
    }
}

/// Legend anchor relative to the scatter plot's inner area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegendConfig {
    pub x: f64,
    pub y: f64,
    pub row_height: f64,
}

/// Everything the layout step needs besides the data itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub scatter: Frame,
    pub boxplot: Frame,
    /// Inner and outer padding of the species bands, as a fraction of a step.
    pub band_padding: f64,
    pub point_radius: f64,
    /// Added to the upper bound of the scatter x domain to leave legend room.
    pub scatter_x_pad: f64,
    pub legend: LegendConfig,
    /// Approximate number of ticks per linear axis.
    pub tick_count: usize,
    /// Field summarized in the box plot.
    pub boxplot_field: NumericField,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::for_variant(DatasetVariant::Lowercase)
    }
}

impl ChartConfig {
    /// Layout presets matching the two dataset layouts.
    pub fn for_variant(variant: DatasetVariant) -> Self {
        match variant {
            DatasetVariant::Lowercase => {
                let frame = Frame {
                    width: 500.0,
                    height: 400.0,
                    margin: Margin {
                        top: 20.0,
                        right: 30.0,
                        bottom: 50.0,
                        left: 60.0,
                    },
                };
                ChartConfig {
                    scatter: frame,
                    boxplot: frame,
                    band_padding: 0.2,
                    point_radius: 5.0,
                    scatter_x_pad: 0.0,
                    legend: LegendConfig {
                        x: frame.inner_width() - 80.0,
                        y: 0.0,
                        row_height: 20.0,
                    },
                    tick_count: 10,
                    boxplot_field: NumericField::PetalLength,
                }
            }
            DatasetVariant::Capitalized => {
                let scatter = Frame {
                    width: 1000.0,
                    height: 500.0,
                    margin: Margin {
                        top: 20.0,
                        right: 150.0,
                        bottom: 50.0,
                        left: 60.0,
                    },
                };
                let boxplot = Frame {
                    margin: Margin {
                        right: 30.0,
                        ..scatter.margin
                    },
                    ..scatter
                };
                ChartConfig {
                    scatter,
                    boxplot,
                    band_padding: 0.2,
                    point_radius: 5.0,
                    scatter_x_pad: 0.5,
                    legend: LegendConfig {
                        x: scatter.inner_width() + 20.0,
                        y: 0.0,
                        row_height: 20.0,
                    },
                    tick_count: 10,
                    boxplot_field: NumericField::PetalLength,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ConfigOverride – user settings layered over a preset
// ---------------------------------------------------------------------------

/// A partial config read from JSON. Only the keys present in the file are
/// applied, so the layout preset of whatever dataset gets loaded still
/// supplies everything else.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigOverride(JsonValue);

impl ConfigOverride {
    /// Parse and check an override against the default preset.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(text).context("parsing config JSON")?;
        if !value.is_object() {
            bail!("config must be a JSON object");
        }
        let overlay = ConfigOverride(value);
        overlay.apply(ChartConfig::default())?;
        Ok(overlay)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// `base` with every key of the override written over it.
    pub fn apply(&self, base: ChartConfig) -> Result<ChartConfig> {
        let mut merged = serde_json::to_value(base).context("encoding base config")?;
        merge_json(&mut merged, &self.0);
        serde_json::from_value(merged).context("applying config override")
    }
}

/// Objects merge key by key; anything else replaces the base value.
fn merge_json(base: &mut JsonValue, overlay: &JsonValue) {
    match (base, overlay) {
        (JsonValue::Object(base), JsonValue::Object(overlay)) => {
            for (key, value) in overlay {
                merge_json(base.entry(key.clone()).or_insert(JsonValue::Null), value);
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_dimensions() {
        let cfg = ChartConfig::for_variant(DatasetVariant::Lowercase);
        assert_eq!(cfg.scatter.inner_width(), 410.0);
        assert_eq!(cfg.scatter.inner_height(), 330.0);
        assert_eq!(cfg.legend.x, 330.0);
    }

    #[test]
    fn test_capitalized_preset() {
        let cfg = ChartConfig::for_variant(DatasetVariant::Capitalized);
        assert_eq!(cfg.scatter.inner_width(), 790.0);
        assert_eq!(cfg.boxplot.inner_width(), 910.0);
        assert_eq!(cfg.legend.x, 810.0);
        assert_eq!(cfg.scatter_x_pad, 0.5);
    }

    #[test]
    fn test_override_keeps_preset_for_missing_keys() {
        let overlay =
            ConfigOverride::from_json_str(r#"{ "band_padding": 0.1, "boxplot_field": "PetalWidth" }"#).unwrap();
        let cfg = overlay
            .apply(ChartConfig::for_variant(DatasetVariant::Capitalized))
            .unwrap();
        assert_eq!(cfg.band_padding, 0.1);
        assert_eq!(cfg.boxplot_field, NumericField::PetalWidth);
        assert_eq!(cfg.scatter, ChartConfig::for_variant(DatasetVariant::Capitalized).scatter);
        assert_eq!(cfg.scatter_x_pad, 0.5);
    }

    #[test]
    fn test_override_merges_nested_keys() {
        let overlay = ConfigOverride::from_json_str(r#"{ "scatter": { "margin": { "right": 100 } } }"#).unwrap();
        let cfg = overlay.apply(ChartConfig::default()).unwrap();
        assert_eq!(cfg.scatter.margin.right, 100.0);
        assert_eq!(cfg.scatter.margin.left, 60.0);
        assert_eq!(cfg.scatter.width, 500.0);
    }

    #[test]
    fn test_override_rejects_bad_input() {
        assert!(ConfigOverride::from_json_str("[1, 2]").is_err());
        assert!(ConfigOverride::from_json_str(r#"{ "tick_count": "many" }"#).is_err());
    }
}
