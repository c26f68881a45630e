//! Toolbar rendering for `CloudApp`.
//!
//! Draws the title, the Cloud/List toggle and a one-line batch summary.

use interest_cloud::render::ViewMode;

use super::CloudApp;

impl CloudApp {
    /// Render the top toolbar strip.
    pub fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(4.0);
            ui.strong("Interests");
            ui.separator();

            let next = self.view_mode.toggle();
            let toggle_label = match next {
                ViewMode::Cloud => "\u{25CE} Show cloud",
                ViewMode::List => "\u{2630} Show list",
            };
            if ui
                .add_enabled(
                    self.data.is_some(),
                    egui::Button::new(toggle_label).min_size(egui::vec2(110.0, 24.0)),
                )
                .clicked()
            {
                self.toggle_view();
            }

            if let Some(ref data) = self.data {
                ui.separator();
                let top = data
                    .list_order()
                    .first()
                    .and_then(|&i| data.get(i))
                    .map(|it| it.label.as_str())
                    .unwrap_or("-");
                ui.label(format!("{} items \u{00B7} top: {}", data.len(), top));
            }

            if let Some(err) = self.error_summary() {
                ui.separator();
                ui.colored_label(egui::Color32::from_rgb(255, 80, 80), err);
            }
        });
    }
}
