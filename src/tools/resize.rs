use eframe::egui;
use image::imageops::FilterType;
use tracing::{debug, warn};

use super::ImageTool;
use crate::config::CropSettings;
use crate::fields::{FieldId, SpinField};
use crate::host::SharedHost;

/// Scale the whole image to an exact pixel size.
pub struct ResizeTool {
    host: Option<SharedHost>,
    width: SpinField,
    height: SpinField,
    keep_aspect: bool,
    source_size: Option<(u32, u32)>,
}

impl Default for ResizeTool {
    fn default() -> Self {
        Self::with_settings(CropSettings::default())
    }
}

impl ResizeTool {
    pub fn with_settings(settings: CropSettings) -> Self {
        Self {
            host: None,
            width: SpinField::new(settings.field_range.clone()),
            height: SpinField::new(settings.field_range),
            keep_aspect: true,
            source_size: None,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width.value(), self.height.value())
    }

    pub fn keep_aspect(&self) -> bool {
        self.keep_aspect
    }

    pub fn set_keep_aspect(&mut self, keep: bool) {
        self.keep_aspect = keep;
    }

    /// A user edit of one target dimension. With the aspect kept, the other
    /// one follows the current image's ratio.
    pub fn set_field(&mut self, id: FieldId, value: u32) {
        let changed = match id {
            FieldId::Width => self.width.set_value(value),
            FieldId::Height => self.height.set_value(value),
        };
        if !changed || !self.keep_aspect {
            return;
        }
        let Some((w, h)) = self.source_size else {
            return;
        };
        let ratio = w as f64 / h as f64;
        match id {
            FieldId::Width => {
                let height = (self.width.value() as f64 / ratio).round() as u32;
                self.height.set_value_silently(height);
            }
            FieldId::Height => {
                let width = (self.height.value() as f64 * ratio).round() as u32;
                self.width.set_value_silently(width);
            }
        }
    }

    /// Reset the targets to the image size whenever the image dimensions
    /// change under the tool.
    pub fn sync_with_image(&mut self) {
        let Some(host) = &self.host else {
            return;
        };
        let size = host.borrow().image().map(|image| (image.width(), image.height()));
        if size == self.source_size {
            return;
        }
        self.source_size = size;
        if let Some((w, h)) = size {
            self.width.set_value_silently(w);
            self.height.set_value_silently(h);
        }
    }

    /// Resample the image to the target size. Returns false when there is
    /// nothing to resize or a crop session is running.
    pub fn apply(&mut self) -> bool {
        let Some(host) = self.host.clone() else {
            return false;
        };
        let (width, height) = self.size();
        let resized = {
            let host = host.borrow();
            if host.crop_in_progress() {
                warn!("resize refused while a crop is in progress");
                return false;
            }
            let Some(image) = host.image() else {
                return false;
            };
            image.resize_exact(width, height, FilterType::Lanczos3)
        };
        debug!(width, height, "image resized");
        {
            let mut host = host.borrow_mut();
            host.replace_image(resized);
            host.request_repaint();
        }
        self.sync_with_image();
        true
    }
}

impl ImageTool for ResizeTool {
    fn name(&self) -> &'static str {
        "Resize"
    }

    fn bind_host(&mut self, host: SharedHost) {
        self.host = Some(host);
        self.sync_with_image();
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        self.sync_with_image();
        let enabled = self
            .host
            .as_ref()
            .is_some_and(|host| {
                let host = host.borrow();
                host.image().is_some() && !host.crop_in_progress()
            });

        ui.add_enabled_ui(enabled, |ui| {
            for (id, label) in [(FieldId::Width, "Width:"), (FieldId::Height, "Height:")] {
                ui.horizontal(|ui| {
                    ui.label(label);
                    let field = match id {
                        FieldId::Width => &self.width,
                        FieldId::Height => &self.height,
                    };
                    let range = field.range();
                    let mut value = field.value();
                    if ui
                        .add(egui::DragValue::new(&mut value).range(range).suffix(" px"))
                        .changed()
                    {
                        self.set_field(id, value);
                    }
                });
            }
            ui.checkbox(&mut self.keep_aspect, "Maintain aspect ratio");
            if ui.button("Apply Resize").clicked() {
                self.apply();
            }
        });
    }
}
