mod app;
mod chart;
mod color;
mod config;
mod data;
mod error;
mod state;
mod stats;
mod ui;

use std::path::PathBuf;

use app::IrisChartsApp;
use config::ConfigOverride;
use eframe::egui;
use state::AppState;

/// Usage: `iris-charts [DATA_FILE] [CONFIG_JSON]`
fn main() -> eframe::Result {
    env_logger::init();

    let mut args = std::env::args_os().skip(1).map(PathBuf::from);
    let data_path = args.next();
    let config_path = args.next();

    let mut state = match config_path {
        Some(path) => match ConfigOverride::from_json_file(&path) {
            Ok(overlay) => AppState::with_override(overlay),
            Err(e) => {
                log::error!("{e:#}");
                AppState {
                    status_message: Some(format!("Error: {e:#}")),
                    ..AppState::default()
                }
            }
        },
        None => AppState::default(),
    };
    if let Some(path) = data_path {
        state.load(&path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 1150.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Iris Charts",
        options,
        Box::new(|_cc| Ok(Box::new(IrisChartsApp::new(state)))),
    )
}
