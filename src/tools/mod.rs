//! Tools shown in the side panel.
//!
//! Each tool is bound to the shared host once, draws its own controls, and
//! may take pointer input over the canvas or paint the scene items it owns.

use eframe::egui;

use crate::host::{SceneItem, SharedHost};

mod crop_panel;
mod resize;
mod rotate_flip;
mod zoom;

pub use resize::ResizeTool;
pub use rotate_flip::{Orientation, RotateFlipTool};
pub use zoom::ZoomTool;

/// Pointer activity over the canvas for one frame, in canvas coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CanvasInput {
    pub hover: Option<egui::Pos2>,
    pub drag_started: Option<egui::Pos2>,
    pub dragged_to: Option<egui::Pos2>,
    pub drag_stopped: bool,
}

pub trait ImageTool {
    fn name(&self) -> &'static str;

    fn bind_host(&mut self, host: SharedHost);

    fn show_controls(&mut self, ui: &mut egui::Ui);

    /// Returns the cursor to show when the tool wants pointer feedback.
    fn canvas_input(&mut self, _input: &CanvasInput) -> Option<egui::CursorIcon> {
        None
    }

    /// Paint `item` if this tool owns it. `offset` maps canvas to screen.
    fn paint_item(&self, _painter: &egui::Painter, _item: SceneItem, _offset: egui::Vec2) {}
}

/// The tools of one editor window, in panel order.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn ImageTool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, mut tool: Box<dyn ImageTool>, host: SharedHost) {
        tool.bind_host(host);
        self.tools.push(tool);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    pub fn show_controls(&mut self, ui: &mut egui::Ui) {
        for tool in &mut self.tools {
            egui::CollapsingHeader::new(tool.name())
                .default_open(true)
                .show(ui, |ui| tool.show_controls(ui));
        }
    }

    /// Offer `input` to every tool; the first cursor request wins.
    pub fn canvas_input(&mut self, input: &CanvasInput) -> Option<egui::CursorIcon> {
        let mut cursor = None;
        for tool in &mut self.tools {
            let wanted = tool.canvas_input(input);
            cursor = cursor.or(wanted);
        }
        cursor
    }

    pub fn paint_item(&self, painter: &egui::Painter, item: SceneItem, offset: egui::Vec2) {
        for tool in &self.tools {
            tool.paint_item(painter, item, offset);
        }
    }
}
