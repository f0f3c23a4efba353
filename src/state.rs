use std::path::Path;

use crate::chart::layout::{Charts, render_pass};
use crate::config::{ChartConfig, ConfigOverride};
use crate::data::model::{IrisDataset, NumericField};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<IrisDataset>,

    /// Layout settings: the loaded dataset's variant preset with
    /// `config_override` applied on top.
    pub config: ChartConfig,

    /// User settings from a config file, re-applied on every load.
    pub config_override: Option<ConfigOverride>,

    /// Geometry for the current dataset and config (cached).
    pub charts: Option<Charts>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Start with a config file layered over the default preset. The same
    /// layer is re-applied on top of each loaded dataset's own preset.
    pub fn with_override(overlay: ConfigOverride) -> Self {
        let mut state = Self {
            config_override: Some(overlay),
            ..Self::default()
        };
        state.config = state.preset_with_override(ChartConfig::default());
        state
    }

    fn preset_with_override(&mut self, preset: ChartConfig) -> ChartConfig {
        let Some(overlay) = &self.config_override else {
            return preset;
        };
        match overlay.apply(preset.clone()) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Ignoring config override: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
                preset
            }
        }
    }

    /// Load a data file and make it current. Errors land in `status_message`.
    pub fn load(&mut self, path: &Path) {
        match crate::data::loader::load_file(path) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} records ({} layout) with species {:?}",
                    dataset.len(),
                    dataset.variant,
                    dataset.species
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and lay out both charts.
    pub fn set_dataset(&mut self, dataset: IrisDataset) {
        self.status_message = None;
        // The field picked in the panel outlives the preset swap.
        let field = self.config.boxplot_field;
        self.config = self.preset_with_override(ChartConfig::for_variant(dataset.variant));
        self.config.boxplot_field = field;
        self.dataset = Some(dataset);
        self.relayout();
    }

    /// Switch the field summarized by the box plot.
    pub fn set_boxplot_field(&mut self, field: NumericField) {
        if self.config.boxplot_field != field {
            self.config.boxplot_field = field;
            self.relayout();
        }
    }

    /// Recompute `charts` after a data or config change.
    pub fn relayout(&mut self) {
        let Some(ds) = &self.dataset else {
            self.charts = None;
            return;
        };
        match render_pass(ds, &self.config) {
            Ok(charts) => self.charts = Some(charts),
            Err(e) => {
                log::error!("Layout failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.charts = None;
            }
        }
    }
}
