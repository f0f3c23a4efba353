use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::color::ColorMap;
use crate::data::model::NumericField;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – box plot settings and per-species statistics
// ---------------------------------------------------------------------------

/// Render the left statistics panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Statistics");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };
    let species = dataset.species.clone();

    // ---- Box plot field selector ----
    ui.strong("Box plot field");
    let current = state.config.boxplot_field;
    let mut chosen = current;
    egui::ComboBox::from_id_salt("boxplot_field")
        .selected_text(current.to_string())
        .show_ui(ui, |ui: &mut Ui| {
            for field in NumericField::ALL {
                ui.selectable_value(&mut chosen, field, field.to_string());
            }
        });
    if chosen != current {
        state.set_boxplot_field(chosen);
    }
    ui.separator();

    let Some(charts) = &state.charts else {
        return;
    };
    let colors = ColorMap::new(&species);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("quartiles")
                .striped(true)
                .num_columns(7)
                .show(ui, |ui: &mut Ui| {
                    for heading in ["Species", "n", "Min", "Q1", "Median", "Q3", "Max"] {
                        ui.strong(heading);
                    }
                    ui.end_row();

                    for (label, geometry) in &charts.boxplot.boxes {
                        let s = geometry.summary;
                        ui.label(RichText::new(label).color(colors.color_for(label)));
                        ui.label(s.count.to_string());
                        for v in [s.min, s.q1, s.median, s.q3, s.max] {
                            ui.label(format!("{v:.3}"));
                        }
                        ui.end_row();
                    }
                });

            ui.add_space(8.0);
            let field = charts.boxplot.field;
            for (label, geometry) in &charts.boxplot.boxes {
                let s = geometry.summary;
                let outliers = state.dataset.as_ref().map_or(0, |ds| {
                    ds.records
                        .iter()
                        .filter(|r| r.species == *label && s.is_outlier(field.value(r)))
                        .count()
                });
                ui.label(format!(
                    "{label}: IQR {:.3}, whiskers [{:.3}, {:.3}], {outliers} outside",
                    s.iqr,
                    s.lower_whisker(),
                    s.upper_whisker()
                ));
            }

            ui.add_space(8.0);
            ui.strong("Axes");
            let (x_lo, x_hi) = charts.scatter.x.domain();
            let (y_lo, y_hi) = charts.scatter.y.domain();
            ui.label(format!("Scatter x: [{x_lo:.2}, {x_hi:.2}]  y: [{y_lo:.2}, {y_hi:.2}]"));
            let (b_lo, b_hi) = charts.boxplot.y.domain();
            ui.label(format!(
                "Box plot y: [{b_lo:.2}, {b_hi:.2}]  band {:.1}px of {:.1}px step",
                charts.boxplot.x.bandwidth(),
                charts.boxplot.x.step()
            ));
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records, {} species ({} layout)",
                ds.len(),
                ds.species.len(),
                ds.variant
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open Iris data")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}
