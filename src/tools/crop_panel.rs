use eframe::egui;
use rfd::{MessageDialog, MessageLevel};
use tracing::warn;

use super::{CanvasInput, ImageTool};
use crate::crop_tool::CropTool;
use crate::fields::FieldId;
use crate::handle::Handle;
use crate::host::{SceneItem, SharedHost};

impl ImageTool for CropTool {
    fn name(&self) -> &'static str {
        "Crop"
    }

    fn bind_host(&mut self, host: SharedHost) {
        CropTool::bind_host(self, host);
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        self.follow_zoom();

        ui.add_enabled_ui(self.is_active(), |ui| {
            for (id, label) in [(FieldId::Width, "Width:"), (FieldId::Height, "Height:")] {
                ui.horizontal(|ui| {
                    ui.label(label);
                    let mut value = self.field_value(id);
                    let range = self.fields().field(id).range();
                    if ui
                        .add(egui::DragValue::new(&mut value).range(range).suffix(" px"))
                        .changed()
                    {
                        self.set_field(id, value);
                    }
                });
            }
        });

        if ui
            .add_enabled(!self.is_active(), egui::Button::new("Start Crop"))
            .clicked()
        {
            self.start_crop();
        }
        if ui
            .add_enabled(self.is_active(), egui::Button::new("Apply Crop"))
            .on_hover_text("Click & drag on the image to adjust")
            .clicked()
        {
            if let Err(e) = self.apply_crop() {
                warn!("{}", e);
                MessageDialog::new()
                    .set_level(MessageLevel::Warning)
                    .set_title(e.title())
                    .set_description(e.to_string())
                    .show();
            }
        }
        if ui
            .add_enabled(self.is_active(), egui::Button::new("Cancel Crop"))
            .clicked()
        {
            self.cancel_crop();
        }

        let mut locked = self.aspect_locked();
        if ui.checkbox(&mut locked, "Maintain aspect ratio").changed() {
            self.set_aspect_locked(locked);
        }
    }

    fn canvas_input(&mut self, input: &CanvasInput) -> Option<egui::CursorIcon> {
        self.follow_zoom();
        if !self.is_active() {
            return None;
        }

        if let Some(pos) = input.drag_started {
            self.begin_drag(pos);
        }
        if let Some(pos) = input.dragged_to {
            self.drag_to(pos);
        }
        if input.drag_stopped {
            self.end_drag();
        }

        let pos = input.dragged_to.or(input.hover)?;
        let crop = self.crop_rect()?;
        if crop.is_interacting() && crop.active_handle() == Handle::None {
            return Some(egui::CursorIcon::Grabbing);
        }
        if crop.hit_test(pos) == Handle::None && !crop.is_interacting() {
            return crop
                .bounding_rect()
                .contains(pos)
                .then_some(egui::CursorIcon::Move);
        }
        Some(self.cursor_at(pos))
    }

    fn paint_item(&self, painter: &egui::Painter, item: SceneItem, offset: egui::Vec2) {
        let (Some(crop), Some(mask)) = (self.crop_rect(), self.mask()) else {
            return;
        };
        match item {
            SceneItem::Mask(side) => {
                let fill = egui::Color32::from_black_alpha(self.settings().mask_alpha);
                for (_, piece) in mask.visible_pieces().filter(|(s, _)| *s == side) {
                    painter.rect_filled(piece.translate(offset), 0.0, fill);
                }
            }
            SceneItem::CropFrame => {
                painter.rect_stroke(
                    crop.rect().translate(offset),
                    0.0,
                    egui::Stroke::new(self.settings().frame_stroke, egui::Color32::WHITE),
                );
                let handle_stroke = egui::Stroke::new(1.0, egui::Color32::BLACK);
                for (_, handle_rect) in crop.handle_rects() {
                    let handle_rect = handle_rect.translate(offset);
                    painter.rect_filled(handle_rect, 0.0, egui::Color32::WHITE);
                    painter.rect_stroke(handle_rect, 0.0, handle_stroke);
                }
            }
        }
    }
}
