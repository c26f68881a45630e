//! Main viewport rendering for `CloudApp`.
//!
//! `draw_content` dispatches on the view mode:
//! - Cloud: per-frame tick, pointer picking, painter-projected labels
//! - List: a striped grid over the rows cached with the batch

use interest_cloud::render::camera::{pick, CameraParams};
use interest_cloud::render::cursor::{CursorStyle, CursorSurface};
use interest_cloud::render::list::ranked_rows;
use interest_cloud::render::style::Color;
use interest_cloud::render::ViewMode;

use super::CloudApp;

const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(14, 16, 24);

fn to_color32(c: Color, alpha_mul: f32) -> egui::Color32 {
    let ch = |v: f32| (v.clamp(0.0, 1.0) * 255.0) as u8;
    egui::Color32::from_rgba_unmultiplied(ch(c[0]), ch(c[1]), ch(c[2]), ch(c[3] * alpha_mul))
}

fn to_screen(rect: egui::Rect, ndc: [f32; 2]) -> egui::Pos2 {
    egui::pos2(
        rect.center().x + ndc[0] * rect.width() * 0.5,
        rect.center().y + ndc[1] * rect.height() * 0.5,
    )
}

impl CloudApp {
    /// Render the main content area.
    pub fn draw_content(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        self.sync_data();

        if self.data.is_none() {
            ui.centered_and_justified(|ui| {
                ui.colored_label(egui::Color32::GRAY, "No interests to show");
            });
            return;
        }

        match self.view_mode {
            ViewMode::Cloud => self.draw_cloud(ui, ctx),
            ViewMode::List => self.draw_list(ui),
        }
    }

    fn draw_cloud(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        self.ensure_mounted();

        let now = std::time::Instant::now();
        let dt = (now - self.last_frame_time).as_secs_f32().min(0.1);
        self.last_frame_time = now;

        let response = ui.allocate_response(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;
        let aspect = rect.width() / rect.height().max(1.0);

        // Drag to orbit, scroll to dolly
        if response.dragged() {
            let delta = response.drag_delta();
            self.camera.orbit(delta.x, delta.y);
            self.cam_dragging = true;
        } else {
            self.cam_dragging = false;
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll.abs() > 0.1 {
                self.camera.zoom(scroll);
            }
        }
        if !self.cam_dragging && self.hovered.is_none() {
            self.camera.auto_rotate(dt, self.config.auto_rotate_speed);
        }

        let camera: CameraParams = self.camera;
        let Some(controller) = self.controller.as_mut() else {
            return;
        };

        // Hover: pick against last frame's layout, then transition
        let pointer = response
            .hover_pos()
            .filter(|_| !self.cam_dragging)
            .map(|p| {
                [
                    (p.x - rect.center().x) / (rect.width() * 0.5),
                    (p.y - rect.center().y) / (rect.height() * 0.5),
                ]
            });
        let picked = pointer.and_then(|ndc| pick(&controller.frame(), &camera, aspect, ndc));
        if picked != self.hovered {
            if let Some(old) = self.hovered {
                controller.pointer_leave(old);
            }
            if let Some(new) = picked {
                controller.pointer_enter(new);
            }
            self.hovered = picked;
        }

        controller.tick(dt);

        // Far labels first so near ones paint over them
        let frame = controller.frame();
        let mut projected: Vec<_> = frame
            .iter()
            .filter_map(|item| camera.project(item.position, aspect).map(|p| (item, p)))
            .collect();
        projected.sort_by(|a, b| b.1.depth.total_cmp(&a.1.depth));

        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, BACKGROUND);

        let half_h = rect.height() * 0.5;
        let near = camera.distance - self.config.sphere_radius;
        let far = camera.distance + self.config.sphere_radius;

        for (item, proj) in &projected {
            // Back of the sphere fades out
            let depth_t = ((proj.depth - near) / (far - near).max(1e-3)).clamp(0.0, 1.0);
            let alpha = 1.0 - depth_t * 0.65;
            let world_size = item.font_size * item.scale;
            let font_px = (world_size * proj.ndc_per_unit * half_h).clamp(6.0, 96.0);

            painter.text(
                to_screen(rect, proj.ndc),
                egui::Align2::CENTER_CENTER,
                item.label,
                egui::FontId::proportional(font_px),
                to_color32(item.color, alpha),
            );
        }

        // Icon badges on top of everything
        for item in &frame {
            let (Some(icon), Some(anchor)) = (item.icon, item.icon_anchor) else {
                continue;
            };
            let Some(proj) = camera.project(anchor, aspect) else {
                continue;
            };
            let name = icon.rsplit('/').next().unwrap_or(icon);
            let galley = painter.layout_no_wrap(
                format!("\u{1F5BC} {}", name),
                egui::FontId::proportional(13.0),
                egui::Color32::WHITE,
            );
            let badge = egui::Rect::from_center_size(to_screen(rect, proj.ndc), galley.size());
            painter.rect_filled(badge.expand(5.0), 6.0, egui::Color32::from_black_alpha(200));
            painter.rect_stroke(
                badge.expand(5.0),
                6.0,
                egui::Stroke::new(1.0, to_color32(item.color, 1.0)),
            );
            painter.galley(badge.min, galley, egui::Color32::WHITE);
        }

        if self.cursor.style() == CursorStyle::Pointer {
            ctx.set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        ctx.request_repaint();
    }

    fn draw_list(&mut self, ui: &mut egui::Ui) {
        let Some(data) = self.data.clone() else {
            return;
        };
        let rows = ranked_rows(&data);

        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("ranked_interests")
                .striped(true)
                .num_columns(4)
                .spacing([24.0, 6.0])
                .show(ui, |ui| {
                    ui.strong("#");
                    ui.strong("Icon");
                    ui.strong("Interest");
                    ui.strong("Count");
                    ui.end_row();

                    for row in &rows {
                        let color = to_color32(self.palette.base_color(row.rank), 1.0);
                        ui.colored_label(color, row.rank.to_string());
                        ui.label(egui::RichText::new(row.icon).monospace().small());
                        ui.colored_label(color, row.label);
                        ui.label(row.count.to_string());
                        ui.end_row();
                    }
                });
        });
    }
}
