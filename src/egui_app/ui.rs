//! egui renderer for the sorting tool.

mod setup_panel;
mod sorting_view;
mod status_bar;
pub mod style;

use eframe::egui::{self, TextureHandle};

use crate::config::{AppConfig, SortingOptions};
use crate::egui_app::controller::EguiController;
use crate::egui_app::state::Screen;

/// Smallest window the layout still works in.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(480.0, 320.0);
/// Room taken by the header row and status bar around the display.
const CHROME_HEIGHT: f32 = 72.0;

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: EguiController,
    visuals_set: bool,
    frame_tex: Option<TextureHandle>,
    /// Key of the frame currently uploaded to `frame_tex`.
    shown_frame: Option<(u64, usize)>,
}

impl EguiApp {
    pub fn new(config: AppConfig) -> Self {
        Self {
            controller: EguiController::from_config(config),
            visuals_set: false,
            frame_tex: None,
            shown_frame: None,
        }
    }

    /// Window size that fits two panes of the configured size.
    pub fn initial_window_size(options: &SortingOptions) -> egui::Vec2 {
        egui::vec2(
            options.pane_width as f32 * 2.0,
            options.pane_height as f32 + CHROME_HEIGHT,
        )
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        let events = ctx.input(|i| i.events.clone());
        self.controller.handle_events(&events);
        status_bar::render(self, ctx);
        let screen = self.controller.ui.screen;
        egui::CentralPanel::default().show(ctx, |ui| match screen {
            Screen::Setup => setup_panel::render(self, ui),
            Screen::Sorting => sorting_view::render(self, ui),
            Screen::Finished => sorting_view::render_finished(self, ui),
        });
    }
}
