use std::time::Instant;

use eframe::egui::{
    self, Align2, Color32, FontId, RichText, Sense, TextureHandle, TextureId, TextureOptions,
};

use super::{EguiApp, style};
use crate::playback::PaneSize;
use crate::session::SortCommand;

pub(super) fn render(app: &mut EguiApp, ui: &mut egui::Ui) {
    render_header(app, ui);
    let available = ui.available_size();
    let pane = PaneSize::from_available(available.x, available.y);
    let now = Instant::now();
    let painter = ui.painter().clone();
    app.controller.prepare_frames(
        pane,
        |text, size| {
            let galley =
                painter.layout_no_wrap(text.to_owned(), FontId::proportional(size), Color32::WHITE);
            (galley.size().x, galley.size().y)
        },
        now,
    );
    app.controller.tick(now);

    let Some(texture) = upload_frame(app, ui.ctx()) else {
        return;
    };
    let pane = app.controller.pane().unwrap_or(pane);
    let size = egui::vec2(pane.width as f32 * 2.0, pane.height as f32);
    let (rect, _) = ui.allocate_exact_size(size, Sense::hover());
    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    painter.image(texture, rect, uv, Color32::WHITE);

    if let Some(legend) = app.controller.legend() {
        let font = FontId::proportional(legend.font_size);
        for (line, (x, y)) in legend.lines.iter().zip(legend.anchors(pane)) {
            painter.text(
                rect.min + egui::vec2(x, y),
                Align2::CENTER_BOTTOM,
                line,
                font.clone(),
                style::legend_text(),
            );
        }
    }

    if let Some(delay) = app.controller.until_next_frame(now) {
        ui.ctx().request_repaint_after(delay);
    }
}

pub(super) fn render_finished(app: &mut EguiApp, ui: &mut egui::Ui) {
    app.frame_tex = None;
    app.shown_frame = None;
    let undo_key = app.controller.config().sorting.undo_key.to_ascii_uppercase();
    let can_undo = app.controller.ui.sorting.can_undo;
    ui.vertical_centered(|ui| {
        ui.add_space(48.0);
        ui.heading("Done processing samples");
        ui.add_space(12.0);
        if can_undo {
            ui.label(format!("Press {undo_key} to undo the last move."));
            if ui.button("Undo").clicked() {
                app.controller.apply_command(SortCommand::Undo);
            }
        }
        if ui.button("Back to setup").clicked() {
            app.controller.return_to_setup();
        }
    });
}

fn render_header(app: &mut EguiApp, ui: &mut egui::Ui) {
    let palette = style::palette();
    let view = app.controller.ui.sorting.clone();
    ui.horizontal(|ui| {
        ui.label(RichText::new(&view.progress_label).color(palette.accent_ice));
        ui.separator();
        ui.label(RichText::new(&view.sample_label).color(palette.text_muted));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Back to setup").clicked() {
                app.controller.return_to_setup();
            }
            if ui
                .add_enabled(view.can_undo, egui::Button::new("Undo"))
                .clicked()
            {
                app.controller.apply_command(SortCommand::Undo);
            }
        });
    });
}

/// Upload the current frame, reusing the texture when only its pixels change.
fn upload_frame(app: &mut EguiApp, ctx: &egui::Context) -> Option<TextureId> {
    let Some((key, image)) = app.controller.current_frame() else {
        app.frame_tex = None;
        app.shown_frame = None;
        return None;
    };
    if app.shown_frame != Some(key) {
        match app.frame_tex.as_mut() {
            Some(tex) if tex.size() == image.size => {
                tex.set(image.clone(), TextureOptions::LINEAR);
            }
            _ => {
                app.frame_tex =
                    Some(ctx.load_texture("sample_frame", image.clone(), TextureOptions::LINEAR));
            }
        }
        app.shown_frame = Some(key);
    }
    app.frame_tex.as_ref().map(TextureHandle::id)
}
