#![deny(missing_docs)]

//! Entry point for the egui-based SortingHat UI.
#![cfg_attr(
    all(not(debug_assertions), target_os = "windows"),
    windows_subsystem = "windows"
)]
use eframe::egui;
use sortinghat::config;
use sortinghat::egui_app::ui::{EguiApp, MIN_VIEWPORT_SIZE};
use sortinghat::logging;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = logging::init() {
        eprintln!("Logging disabled: {err}");
    }

    let loaded = config::load_or_default();
    let mut viewport = egui::ViewportBuilder::default().with_min_inner_size(MIN_VIEWPORT_SIZE);
    if let Ok(cfg) = &loaded {
        viewport = viewport.with_inner_size(EguiApp::initial_window_size(&cfg.sorting));
    }

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "SortingHat",
        native_options,
        Box::new(move |_cc| match loaded {
            Ok(cfg) => Ok(Box::new(EguiApp::new(cfg))),
            Err(err) => {
                tracing::error!(error = %err, "Failed to load config");
                Ok(Box::new(LaunchError {
                    message: format!("Failed to load config: {err}"),
                }))
            }
        }),
    )?;
    Ok(())
}

/// Minimal fallback app to display initialization errors.
struct LaunchError {
    message: String,
}

impl eframe::App for LaunchError {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("Failed to start UI");
                ui.label(&self.message);
            });
        });
    }
}
