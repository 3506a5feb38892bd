use eframe::egui;
use tracing::debug;

use super::ImageTool;
use crate::config::CropSettings;
use crate::host::SharedHost;

/// Zoom in/out, fit to the viewport, or reset to 100 %.
#[derive(Default)]
pub struct ZoomTool {
    host: Option<SharedHost>,
    settings: CropSettings,
}

impl ZoomTool {
    pub fn with_settings(settings: CropSettings) -> Self {
        Self {
            host: None,
            settings,
        }
    }

    pub fn zoom_in(&mut self) {
        self.update(|zoom, step| zoom * step);
    }

    pub fn zoom_out(&mut self) {
        self.update(|zoom, step| zoom / step);
    }

    pub fn zoom_100(&mut self) {
        self.update(|_, _| 1.0);
    }

    pub fn zoom_fit(&mut self) {
        let Some(host) = &self.host else {
            return;
        };
        let fit = {
            let host = host.borrow();
            let Some(image) = host.image() else {
                return;
            };
            let viewport = host.viewport_size();
            (viewport.x / image.width() as f32).min(viewport.y / image.height() as f32)
        };
        self.update(|_, _| fit);
    }

    fn update(&mut self, next: impl FnOnce(f32, f32) -> f32) {
        let Some(host) = &self.host else {
            return;
        };
        let mut host = host.borrow_mut();
        let zoom = self.settings.clamp_zoom(next(host.zoom_factor(), self.settings.zoom_step));
        if zoom != host.zoom_factor() {
            debug!(zoom, "zoom changed");
            host.set_zoom_factor(zoom);
        }
    }
}

impl ImageTool for ZoomTool {
    fn name(&self) -> &'static str {
        "Zoom"
    }

    fn bind_host(&mut self, host: SharedHost) {
        self.host = Some(host);
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        let zoom = self.host.as_ref().map(|h| h.borrow().zoom_factor()).unwrap_or(1.0);
        ui.horizontal(|ui| {
            if ui.button("🔍 +").clicked() {
                self.zoom_in();
            }
            if ui.button("🔍 -").clicked() {
                self.zoom_out();
            }
            if ui.button("Fit").clicked() {
                self.zoom_fit();
            }
            if ui.button("100%").clicked() {
                self.zoom_100();
            }
        });
        ui.label(format!("{:.0}%", zoom * 100.0));
    }
}
