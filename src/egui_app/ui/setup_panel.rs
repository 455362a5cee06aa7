use eframe::egui::{self, RichText};

use super::{EguiApp, style};

pub(super) fn render(app: &mut EguiApp, ui: &mut egui::Ui) {
    let palette = style::palette();
    ui.add_space(12.0);
    ui.heading("SortingHat");
    ui.label(
        RichText::new("Sort LabGym behavior examples into category folders.")
            .color(palette.text_muted),
    );
    ui.add_space(12.0);
    let undo_key = app.controller.config().sorting.undo_key;
    egui::Grid::new("setup_grid")
        .num_columns(3)
        .spacing([8.0, 8.0])
        .show(ui, |ui| {
            ui.label("Input folder");
            ui.add(
                egui::TextEdit::singleline(&mut app.controller.ui.setup.input_dir)
                    .desired_width(420.0),
            );
            if ui.button("Browse…").clicked() {
                app.controller.pick_input_dir_via_dialog();
            }
            ui.end_row();

            ui.label("Output folder");
            ui.add(
                egui::TextEdit::singleline(&mut app.controller.ui.setup.output_dir)
                    .desired_width(420.0),
            );
            if ui.button("Browse…").clicked() {
                app.controller.pick_output_dir_via_dialog();
            }
            ui.end_row();

            ui.label("Categories");
            ui.add(
                egui::TextEdit::singleline(&mut app.controller.ui.setup.legend)
                    .hint_text("category1{key1}, category2{key2}")
                    .desired_width(420.0),
            );
            ui.label(
                RichText::new(format!("name{{key}}; {undo_key} is undo")).color(palette.text_muted),
            );
            ui.end_row();
        });
    ui.add_space(12.0);
    if ui.button("Start sorting").clicked() {
        app.controller.start_session();
    }
}
