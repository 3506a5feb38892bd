use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use eframe::egui;
use rfd::{MessageDialog, MessageLevel};
use tracing::warn;

use crate::config::CropSettings;
use crate::crop_tool::CropTool;
use crate::error::CropError;
use crate::host::{CropHost, EditorHost};
use crate::tools::{CanvasInput, ResizeTool, RotateFlipTool, ToolRegistry, ZoomTool};

const PADDING: f32 = 20.0;
const IMAGE_FILTER: &[&str] = &["png", "jpg", "jpeg", "bmp"];

pub struct ImageCropper {
    settings: CropSettings,
    host: Rc<RefCell<EditorHost>>,
    tools: ToolRegistry,
    texture: Option<egui::TextureHandle>,
    texture_generation: u64,
}

impl ImageCropper {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::with_settings(CropSettings::default())
    }

    pub fn with_settings(settings: CropSettings) -> Self {
        let host = EditorHost::new().into_shared();
        let tools = build_tools(&settings, &host);
        Self {
            settings,
            host,
            tools,
            texture: None,
            texture_generation: 0,
        }
    }

    fn open(&mut self, path: &Path) {
        if let Err(e) = self.host.borrow_mut().open(path) {
            report(&e);
            return;
        }
        // Fresh tools: a crop session never outlives its image.
        self.tools = build_tools(&self.settings, &self.host);
    }

    fn load_texture(&mut self, ctx: &egui::Context) {
        let host = self.host.borrow();
        if host.generation() == self.texture_generation {
            return;
        }
        self.texture_generation = host.generation();
        self.texture = host.image().map(|image| {
            let size = [image.width() as _, image.height() as _];
            let image_buffer = image.to_rgba8();
            let pixels = image_buffer.as_flat_samples();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            ctx.load_texture("image", color_image, egui::TextureOptions::LINEAR)
        });
    }

    fn file_buttons(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Open Image").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Image", IMAGE_FILTER)
                    .pick_file()
                {
                    self.open(&path);
                }
            }

            let has_image = self.host.borrow().image().is_some();
            if ui
                .add_enabled(has_image, egui::Button::new("Save Image"))
                .clicked()
            {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Image", IMAGE_FILTER)
                    .save_file()
                {
                    if let Err(e) = self.host.borrow().save(&path) {
                        report(&e);
                    }
                }
            }
        });
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        let Some(texture) = self.texture.clone() else {
            ui.centered_and_justified(|ui| ui.label("Open or drop an image to start."));
            return;
        };

        self.host
            .borrow_mut()
            .set_viewport_size(ui.available_size() - egui::vec2(PADDING * 2.0, PADDING * 2.0));
        let canvas = self.host.borrow().canvas_rect();

        egui::ScrollArea::both().show(ui, |ui| {
            let total_size = canvas.size() + egui::vec2(PADDING * 2.0, PADDING * 2.0);
            let (target_rect, response) = ui.allocate_exact_size(total_size, egui::Sense::drag());
            let painter = ui.painter_at(target_rect);
            let image_rect = egui::Rect::from_min_size(
                target_rect.min + egui::vec2(PADDING, PADDING),
                canvas.size(),
            );

            painter.image(
                texture.id(),
                image_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );

            // Canvas coordinates have their origin at the image's top-left.
            let offset = image_rect.min.to_vec2();
            let to_canvas = |pos: egui::Pos2| pos - offset;
            let input = CanvasInput {
                hover: response.hover_pos().map(to_canvas),
                drag_started: response
                    .drag_started()
                    .then(|| ui.input(|i| i.pointer.press_origin()))
                    .flatten()
                    .map(to_canvas),
                dragged_to: response
                    .dragged()
                    .then(|| response.interact_pointer_pos())
                    .flatten()
                    .map(to_canvas),
                drag_stopped: response.drag_stopped(),
            };
            if let Some(cursor) = self.tools.canvas_input(&input) {
                ui.ctx().set_cursor_icon(cursor);
            }

            let scene = self.host.borrow().scene().to_vec();
            for item in scene {
                self.tools.paint_item(&painter, item, offset);
            }
        });
    }
}

impl eframe::App for ImageCropper {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle dropped files
        let dropped = ctx.input(|i| i.raw.dropped_files.first().and_then(|f| f.path.clone()));
        if let Some(path) = dropped {
            self.open(&path);
        }

        egui::SidePanel::left("tools")
            .resizable(false)
            .show(ctx, |ui| {
                self.file_buttons(ui);
                ui.separator();
                self.tools.show_controls(ui);
            });

        self.load_texture(ctx);
        egui::CentralPanel::default().show(ctx, |ui| self.canvas(ui));

        if self.host.borrow_mut().take_repaint_request() {
            self.load_texture(ctx);
            ctx.request_repaint();
        }
    }
}

fn build_tools(settings: &CropSettings, host: &Rc<RefCell<EditorHost>>) -> ToolRegistry {
    let mut tools = ToolRegistry::new();
    tools.register(Box::new(ZoomTool::with_settings(settings.clone())), host.clone());
    tools.register(Box::new(CropTool::with_settings(settings.clone())), host.clone());
    tools.register(Box::new(ResizeTool::with_settings(settings.clone())), host.clone());
    tools.register(Box::new(RotateFlipTool::default()), host.clone());
    tools
}

fn report(error: &CropError) {
    warn!("{}", error);
    MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(error.title())
        .set_description(error.to_string())
        .show();
}
