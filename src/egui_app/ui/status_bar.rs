use eframe::egui::{self, Frame, RichText};

use super::{EguiApp, style};

pub(super) fn render(app: &mut EguiApp, ctx: &egui::Context) {
    let palette = style::palette();
    egui::TopBottomPanel::bottom("status_bar")
        .frame(Frame::new().fill(palette.bg_primary))
        .show(ctx, |ui| {
            let status = &app.controller.ui.status;
            ui.horizontal(|ui| {
                ui.add_space(8.0);
                ui.painter().circle_filled(
                    ui.cursor().min + egui::vec2(9.0, 11.0),
                    9.0,
                    status.badge_color,
                );
                ui.add_space(24.0);
                ui.label(RichText::new(&status.badge_label).color(palette.text_primary));
                ui.separator();
                let response = ui.label(RichText::new(&status.text).color(palette.text_primary));
                if !status.log.is_empty() {
                    response.on_hover_text(status.log_text());
                }
            });
        });
}
