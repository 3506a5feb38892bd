//! Dimming overlay for the area outside the crop rectangle.

use eframe::egui;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MaskSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl MaskSide {
    pub const ALL: [MaskSide; 4] = [MaskSide::Top, MaskSide::Bottom, MaskSide::Left, MaskSide::Right];
}

/// Four rectangles that together cover `canvas` minus the crop rectangle.
///
/// Top and bottom span the full canvas width; left and right fill the band
/// between them at the crop rectangle's height. Pieces can come out with a
/// negative extent when the crop rectangle pokes past the canvas; those are
/// treated as empty.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OcclusionMask {
    pub top: egui::Rect,
    pub bottom: egui::Rect,
    pub left: egui::Rect,
    pub right: egui::Rect,
}

impl OcclusionMask {
    pub fn compute(canvas: egui::Rect, crop: egui::Rect) -> Self {
        let c = canvas;
        let r = crop;
        Self {
            top: xywh(c.left(), c.top(), c.width(), r.top() - c.top()),
            bottom: xywh(c.left(), r.bottom(), c.width(), c.bottom() - r.bottom()),
            left: xywh(c.left(), r.top(), r.left() - c.left(), r.height()),
            right: xywh(r.right(), r.top(), c.right() - r.right(), r.height()),
        }
    }

    pub fn piece(&self, side: MaskSide) -> egui::Rect {
        match side {
            MaskSide::Top => self.top,
            MaskSide::Bottom => self.bottom,
            MaskSide::Left => self.left,
            MaskSide::Right => self.right,
        }
    }

    /// Pieces with a positive area, ready to be filled.
    pub fn visible_pieces(&self) -> impl Iterator<Item = (MaskSide, egui::Rect)> + '_ {
        MaskSide::ALL
            .into_iter()
            .map(|side| (side, self.piece(side)))
            .filter(|(_, rect)| rect.width() > 0.0 && rect.height() > 0.0)
    }
}

fn xywh(x: f32, y: f32, w: f32, h: f32) -> egui::Rect {
    egui::Rect::from_min_size(egui::pos2(x, y), egui::vec2(w, h))
}
