//! The editor side the tools talk to: source image, zoom, and the scene the
//! overlays live in.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use eframe::egui;
use image::DynamicImage;
use tracing::{debug, info};

use crate::error::CropError;
use crate::mask::MaskSide;

/// Overlay placed on the canvas by a tool. Painted in insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneItem {
    Mask(MaskSide),
    CropFrame,
}

pub trait CropHost {
    fn image(&self) -> Option<&DynamicImage>;

    /// Swap in a new current image.
    fn replace_image(&mut self, image: DynamicImage);

    fn zoom_factor(&self) -> f32;

    fn set_zoom_factor(&mut self, zoom: f32);

    /// The displayed image in display units, with its origin at (0, 0).
    fn canvas_rect(&self) -> egui::Rect;

    /// Space available for the canvas, used to fit the image.
    fn viewport_size(&self) -> egui::Vec2;

    fn request_repaint(&mut self);

    fn add_to_scene(&mut self, item: SceneItem);

    fn remove_from_scene(&mut self, item: SceneItem);

    fn scene_contains(&self, item: SceneItem) -> bool;

    /// True while a crop session has its frame on the canvas. Tools that
    /// replace the whole image refuse to run meanwhile.
    fn crop_in_progress(&self) -> bool {
        self.scene_contains(SceneItem::CropFrame)
    }
}

pub type SharedHost = Rc<RefCell<dyn CropHost>>;

/// In-memory host used by the desktop shell.
#[derive(Debug)]
pub struct EditorHost {
    image: Option<DynamicImage>,
    path: Option<PathBuf>,
    zoom: f32,
    viewport: egui::Vec2,
    scene: Vec<SceneItem>,
    repaint_requested: bool,
    generation: u64,
}

impl Default for EditorHost {
    fn default() -> Self {
        Self {
            image: None,
            path: None,
            zoom: 1.0,
            viewport: egui::vec2(800.0, 600.0),
            scene: Vec::new(),
            repaint_requested: false,
            generation: 0,
        }
    }
}

impl EditorHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(image: DynamicImage) -> Self {
        let mut host = Self::default();
        host.replace_image(image);
        host
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn into_shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    pub fn open(&mut self, path: &Path) -> Result<(), CropError> {
        let image = image::open(path).map_err(|source| CropError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), width = image.width(), height = image.height(), "image opened");
        self.scene.clear();
        self.zoom = 1.0;
        self.path = Some(path.to_path_buf());
        self.replace_image(image);
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), CropError> {
        let Some(image) = &self.image else {
            return Ok(());
        };
        image.save(path).map_err(|source| CropError::ImageSave {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "image saved");
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn scene(&self) -> &[SceneItem] {
        &self.scene
    }

    pub fn set_viewport_size(&mut self, size: egui::Vec2) {
        self.viewport = size;
    }

    /// Bumped every time the image is replaced.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn take_repaint_request(&mut self) -> bool {
        std::mem::take(&mut self.repaint_requested)
    }
}

impl CropHost for EditorHost {
    fn image(&self) -> Option<&DynamicImage> {
        self.image.as_ref()
    }

    fn replace_image(&mut self, image: DynamicImage) {
        debug!(width = image.width(), height = image.height(), "current image replaced");
        self.image = Some(image);
        self.generation += 1;
        self.repaint_requested = true;
    }

    fn zoom_factor(&self) -> f32 {
        self.zoom
    }

    fn set_zoom_factor(&mut self, zoom: f32) {
        self.zoom = zoom;
        self.repaint_requested = true;
    }

    fn canvas_rect(&self) -> egui::Rect {
        let Some(image) = &self.image else {
            return egui::Rect::ZERO;
        };
        let size = egui::vec2(
            (image.width() as f32 * self.zoom).round(),
            (image.height() as f32 * self.zoom).round(),
        );
        egui::Rect::from_min_size(egui::Pos2::ZERO, size)
    }

    fn viewport_size(&self) -> egui::Vec2 {
        self.viewport
    }

    fn request_repaint(&mut self) {
        self.repaint_requested = true;
    }

    fn add_to_scene(&mut self, item: SceneItem) {
        if !self.scene.contains(&item) {
            self.scene.push(item);
        }
    }

    fn remove_from_scene(&mut self, item: SceneItem) {
        self.scene.retain(|existing| *existing != item);
    }

    fn scene_contains(&self, item: SceneItem) -> bool {
        self.scene.contains(&item)
    }
}
