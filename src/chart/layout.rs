//! Turns a dataset into pixel-space primitives for the two charts.
//!
//! All coordinates are relative to the top-left corner of a chart's inner
//! plotting area; the renderer adds the frame margins.

use std::collections::BTreeMap;

use eframe::egui::Color32;

use super::scale::{BandScale, LinearScale};
use crate::color::ColorMap;
use crate::config::{ChartConfig, Frame};
use crate::data::model::{IrisDataset, NumericField};
use crate::error::{DataFormatError, Result};
use crate::stats::{QuartileSummary, summarize_by_species};

// ---------------------------------------------------------------------------
// Scatter plot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PlotPoint {
    pub x: f64,
    pub y: f64,
    pub color: Color32,
    pub species: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: Color32,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone)]
pub struct ScatterChart {
    pub frame: Frame,
    /// Petal length → horizontal position.
    pub x: LinearScale,
    /// Petal width → vertical position (inverted range).
    pub y: LinearScale,
    pub points: Vec<PlotPoint>,
    pub legend: Vec<LegendEntry>,
}

pub fn scatter(dataset: &IrisDataset, config: &ChartConfig, colors: &ColorMap) -> Result<ScatterChart> {
    if dataset.is_empty() {
        return Err(DataFormatError::EmptyDataset);
    }
    let frame = config.scatter;

    let x_domain = LinearScale::extent(&dataset.values(NumericField::PetalLength), config.scatter_x_pad)?;
    let y_domain = LinearScale::extent(&dataset.values(NumericField::PetalWidth), 0.0)?;
    let x = LinearScale::new(x_domain, (0.0, frame.inner_width()))?;
    let y = LinearScale::new(y_domain, (frame.inner_height(), 0.0))?;

    let points = dataset
        .records
        .iter()
        .map(|r| PlotPoint {
            x: x.map(r.petal_length),
            y: y.map(r.petal_width),
            color: colors.color_for(&r.species),
            species: r.species.clone(),
        })
        .collect();

    let legend = legend_entries(dataset.variant.species_domain(), config, colors);

    Ok(ScatterChart {
        frame,
        x,
        y,
        points,
        legend,
    })
}

/// One legend row per label, stacked downwards from the configured anchor.
pub fn legend_entries<S: AsRef<str>>(labels: &[S], config: &ChartConfig, colors: &ColorMap) -> Vec<LegendEntry> {
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| LegendEntry {
            label: label.as_ref().to_string(),
            color: colors.color_for(label.as_ref()),
            x: config.legend.x,
            y: config.legend.y + i as f64 * config.legend.row_height,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Box plot
// ---------------------------------------------------------------------------

/// Pixel geometry of one species' box. `box_top` is the mapped Q3 and sits
/// above `box_bottom` (mapped Q1) on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    pub x: f64,
    pub width: f64,
    pub center_x: f64,
    pub box_top: f64,
    pub box_bottom: f64,
    pub whisker_top: f64,
    pub whisker_bottom: f64,
    pub median_y: f64,
    pub summary: QuartileSummary,
}

#[derive(Debug, Clone)]
pub struct BoxPlotChart {
    pub frame: Frame,
    pub field: NumericField,
    pub x: BandScale,
    pub y: LinearScale,
    pub boxes: BTreeMap<String, BoxGeometry>,
}

pub fn boxplot(dataset: &IrisDataset, field: NumericField, config: &ChartConfig) -> Result<BoxPlotChart> {
    if dataset.is_empty() {
        return Err(DataFormatError::EmptyDataset);
    }
    let frame = config.boxplot;

    let x = BandScale::new(
        dataset.variant.species_domain(),
        (0.0, frame.inner_width()),
        config.band_padding,
    );
    let y_domain = LinearScale::extent(&dataset.values(field), 0.0)?;
    let y = LinearScale::new(y_domain, (frame.inner_height(), 0.0))?;

    let mut boxes = BTreeMap::new();
    for (species, summary) in summarize_by_species(&dataset.records, field)? {
        let Some(left) = x.band_start(&species) else {
            log::warn!("species '{species}' is not on the {} axis; skipped", dataset.variant);
            continue;
        };
        let geometry = box_geometry(left, x.bandwidth(), &y, summary);
        log::debug!("{species}: box {geometry:?}");
        boxes.insert(species, geometry);
    }

    Ok(BoxPlotChart {
        frame,
        field,
        x,
        y,
        boxes,
    })
}

pub fn box_geometry(left: f64, width: f64, y: &LinearScale, summary: QuartileSummary) -> BoxGeometry {
    BoxGeometry {
        x: left,
        width,
        center_x: left + width / 2.0,
        box_top: y.map(summary.q3),
        box_bottom: y.map(summary.q1),
        whisker_top: y.map(summary.upper_whisker()),
        whisker_bottom: y.map(summary.lower_whisker()),
        median_y: y.map(summary.median),
        summary,
    }
}

// ---------------------------------------------------------------------------
// Render pass
// ---------------------------------------------------------------------------

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct Charts {
    pub scatter: ScatterChart,
    pub boxplot: BoxPlotChart,
}

pub fn render_pass(dataset: &IrisDataset, config: &ChartConfig) -> Result<Charts> {
    let mut labels: Vec<String> = dataset
        .variant
        .species_domain()
        .iter()
        .map(|s| s.to_string())
        .collect();
    for s in &dataset.species {
        if !labels.contains(s) {
            labels.push(s.clone());
        }
    }
    let colors = ColorMap::new(&labels);

    let scatter = scatter(dataset, config, &colors)?;
    let boxplot = boxplot(dataset, config.boxplot_field, config)?;
    log::debug!(
        "layout: {} points, {} boxes",
        scatter.points.len(),
        boxplot.boxes.len()
    );
    Ok(Charts { scatter, boxplot })
}
