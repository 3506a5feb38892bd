//! Crop session orchestration.
//!
//! [`CropTool`] owns at most one [`CropRect`] at a time together with its
//! [`OcclusionMask`], keeps the width/height fields (image pixels) in step
//! with the rectangle (display units), and performs the final clipped crop
//! against the host's image.
//!
//! Every programmatic field write is silent and every field-driven rectangle
//! write happens with the rectangle's notifications blocked, so neither side
//! can bounce an update back into the handler that produced it.

use eframe::egui;
use tracing::{debug, warn};

use crate::config::CropSettings;
use crate::crop_rect::{CropRect, RectEvent};
use crate::error::CropError;
use crate::fields::{DimensionFields, FieldId};
use crate::host::{SceneItem, SharedHost};
use crate::mask::{MaskSide, OcclusionMask};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
}

/// Integer rectangle in image pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl PixelRect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self { x, y, width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn intersect(&self, other: &PixelRect) -> PixelRect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        PixelRect::new(
            x,
            y,
            right.saturating_sub(x).max(0),
            bottom.saturating_sub(y).max(0),
        )
    }

    fn right(&self) -> i64 {
        self.x.saturating_add(self.width)
    }

    fn bottom(&self) -> i64 {
        self.y.saturating_add(self.height)
    }
}

#[derive(Debug)]
struct Session {
    rect: CropRect,
    mask: OcclusionMask,
    zoom: f32,
}

pub struct CropTool {
    settings: CropSettings,
    host: Option<SharedHost>,
    session: Option<Session>,
    fields: DimensionFields,
    aspect_locked: bool,
}

impl Default for CropTool {
    fn default() -> Self {
        Self::new()
    }
}

impl CropTool {
    pub fn new() -> Self {
        Self::with_settings(CropSettings::default())
    }

    pub fn with_settings(settings: CropSettings) -> Self {
        Self {
            fields: DimensionFields::new(settings.field_range.clone()),
            settings,
            host: None,
            session: None,
            aspect_locked: false,
        }
    }

    pub fn bind_host(&mut self, host: SharedHost) {
        self.host = Some(host);
    }

    pub fn settings(&self) -> &CropSettings {
        &self.settings
    }

    pub fn state(&self) -> SessionState {
        if self.session.is_some() {
            SessionState::Active
        } else {
            SessionState::Idle
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn crop_rect(&self) -> Option<&CropRect> {
        self.session.as_ref().map(|s| &s.rect)
    }

    pub fn mask(&self) -> Option<&OcclusionMask> {
        self.session.as_ref().map(|s| &s.mask)
    }

    pub fn fields(&self) -> &DimensionFields {
        &self.fields
    }

    pub fn field_value(&self, id: FieldId) -> u32 {
        self.fields.value(id)
    }

    pub fn aspect_locked(&self) -> bool {
        self.aspect_locked
    }

    /// Begin a session covering the whole canvas. Ignored without a host, an
    /// image, or when a session is already running.
    pub fn start_crop(&mut self) {
        let Some(host) = self.host.clone() else {
            return;
        };
        if self.session.is_some() {
            return;
        }
        let (canvas, zoom) = {
            let host = host.borrow();
            if host.image().is_none() {
                return;
            }
            (host.canvas_rect(), host.zoom_factor())
        };

        let mut rect = CropRect::new(canvas, self.settings.handle_size);
        rect.set_aspect_locked(self.aspect_locked);
        let mask = OcclusionMask::compute(canvas, rect.rect());
        {
            let mut host = host.borrow_mut();
            for side in MaskSide::ALL {
                host.add_to_scene(SceneItem::Mask(side));
            }
            host.add_to_scene(SceneItem::CropFrame);
            host.request_repaint();
        }
        self.session = Some(Session { rect, mask, zoom });
        debug!(?canvas, aspect_locked = self.aspect_locked, "crop started");

        self.dispatch_rect_events();
        self.update_fields_from_rect();
    }

    /// Drop the session and its overlays. Safe to call when idle.
    pub fn cancel_crop(&mut self) {
        let Some(_session) = self.session.take() else {
            return;
        };
        if let Some(host) = &self.host {
            let mut host = host.borrow_mut();
            host.remove_from_scene(SceneItem::CropFrame);
            for side in MaskSide::ALL {
                host.remove_from_scene(SceneItem::Mask(side));
            }
            host.request_repaint();
        }
        debug!("crop session closed");
    }

    /// Crop the host image to the rectangle's top-left and the field sizes,
    /// clipped to the image. An empty result leaves the session running.
    pub fn apply_crop(&mut self) -> Result<(), CropError> {
        let (Some(host), Some(session)) = (self.host.clone(), self.session.as_ref()) else {
            debug!("apply crop: no active session");
            return Ok(());
        };

        let origin = session.rect.rect().min;
        let cropped = {
            let host = host.borrow();
            let Some(image) = host.image() else {
                return Ok(());
            };
            let zoom = host.zoom_factor();
            let candidate = PixelRect::new(
                (origin.x / zoom).round() as i64,
                (origin.y / zoom).round() as i64,
                self.fields.width.value() as i64,
                self.fields.height.value() as i64,
            );
            let bounds = PixelRect::new(0, 0, image.width() as i64, image.height() as i64);
            let clipped = candidate.intersect(&bounds);
            debug!(?candidate, ?clipped, zoom, "apply crop");

            if clipped.is_empty() {
                warn!(?candidate, "crop area lies outside the image");
                return Err(CropError::InvalidCropArea {
                    x: candidate.x,
                    y: candidate.y,
                    width: candidate.width,
                    height: candidate.height,
                });
            }
            image.crop_imm(
                clipped.x as u32,
                clipped.y as u32,
                clipped.width as u32,
                clipped.height as u32,
            )
        };

        host.borrow_mut().replace_image(cropped);
        self.cancel_crop();
        host.borrow_mut().request_repaint();
        Ok(())
    }

    /// Checkbox state; applied to the rectangle now and to future sessions.
    pub fn set_aspect_locked(&mut self, locked: bool) {
        self.aspect_locked = locked;
        if let Some(session) = self.session.as_mut() {
            session.rect.set_aspect_locked(locked);
        }
        self.dispatch_rect_events();
    }

    /// Rescale the rectangle when the host zoom changed under a running
    /// session, so it keeps covering the same image pixels.
    pub fn follow_zoom(&mut self) {
        let (Some(host), Some(session)) = (&self.host, self.session.as_mut()) else {
            return;
        };
        let zoom = host.borrow().zoom_factor();
        if zoom == session.zoom || session.zoom <= 0.0 {
            return;
        }
        let scale = zoom / session.zoom;
        session.zoom = zoom;
        let r = session.rect.rect();
        session.rect.set_rect(egui::Rect::from_min_max(
            egui::pos2(r.min.x * scale, r.min.y * scale),
            egui::pos2(r.max.x * scale, r.max.y * scale),
        ));
        debug!(zoom, "crop rect rescaled for new zoom");
        self.dispatch_rect_events();
    }

    /// Replace the rectangle (display units) as if the user had dragged it there.
    pub fn set_crop_rect(&mut self, rect: egui::Rect) {
        if let Some(session) = self.session.as_mut() {
            session.rect.set_rect(rect);
        }
        self.dispatch_rect_events();
    }

    pub fn cursor_at(&self, pos: egui::Pos2) -> egui::CursorIcon {
        self.crop_rect()
            .map(|rect| rect.cursor_at(pos))
            .unwrap_or(egui::CursorIcon::Default)
    }

    pub fn begin_drag(&mut self, pos: egui::Pos2) -> bool {
        self.session
            .as_mut()
            .is_some_and(|session| session.rect.begin_interaction(pos))
    }

    pub fn drag_to(&mut self, pos: egui::Pos2) {
        if let Some(session) = self.session.as_mut() {
            session.rect.continue_interaction(pos);
        }
        self.dispatch_rect_events();
    }

    pub fn end_drag(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.rect.end_interaction();
        }
    }

    /// A user edit of one of the dimension fields, in image pixels.
    pub fn set_field(&mut self, id: FieldId, value: u32) {
        if self.session.is_none() {
            return;
        }
        self.fields.edit(id, value);
        for sender in self.fields.take_pending() {
            self.update_rect_from_fields(sender);
        }
    }

    fn update_rect_from_fields(&mut self, sender: FieldId) {
        let Some(host) = self.host.clone() else {
            return;
        };
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let zoom = host.borrow().zoom_factor();
        let mut width = self.fields.width.value() as f32;
        let mut height = self.fields.height.value() as f32;
        let current = session.rect.rect();

        if self.aspect_locked && current.width() > 0.0 && current.height() > 0.0 {
            let ratio = current.width() / current.height();
            match sender {
                FieldId::Width => {
                    height = width / ratio;
                    self.fields.height.set_value_silently(height.round() as u32);
                }
                FieldId::Height => {
                    width = height * ratio;
                    self.fields.width.set_value_silently(width.round() as u32);
                }
            }
        }

        let next = egui::Rect::from_min_size(current.min, egui::vec2(width * zoom, height * zoom));
        let was_blocked = session.rect.block_signals(true);
        session.rect.set_rect(next);
        session.rect.block_signals(was_blocked);
        debug!(?sender, ?next, "crop rect resized from fields");

        self.update_mask();
    }

    fn dispatch_rect_events(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let events = session.rect.take_events();
        let mut moved = false;
        let mut resized = false;
        for event in events {
            match event {
                RectEvent::XChanged | RectEvent::YChanged => moved = true,
                RectEvent::WidthChanged | RectEvent::HeightChanged => resized = true,
                RectEvent::AspectLockChanged(locked) => debug!(locked, "aspect lock changed"),
            }
        }
        if moved || resized {
            self.update_mask();
        }
        if resized {
            self.update_fields_from_rect();
        }
    }

    fn update_fields_from_rect(&mut self) {
        let (Some(host), Some(session)) = (&self.host, &self.session) else {
            return;
        };
        let zoom = host.borrow().zoom_factor();
        let rect = session.rect.rect();
        self.fields.set_silently(
            (rect.width() / zoom).round() as u32,
            (rect.height() / zoom).round() as u32,
        );
    }

    fn update_mask(&mut self) {
        let (Some(host), Some(session)) = (&self.host, self.session.as_mut()) else {
            return;
        };
        let canvas = host.borrow().canvas_rect();
        session.mask = OcclusionMask::compute(canvas, session.rect.rect());
        host.borrow_mut().request_repaint();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use image::DynamicImage;

    use super::*;
    use crate::host::{CropHost, EditorHost};

    fn rect(x: f32, y: f32, w: f32, h: f32) -> egui::Rect {
        egui::Rect::from_min_size(egui::pos2(x, y), egui::vec2(w, h))
    }

    fn tool_with(width: u32, height: u32, zoom: f32) -> (CropTool, Rc<RefCell<EditorHost>>) {
        let host = EditorHost::with_image(DynamicImage::new_rgba8(width, height))
            .with_zoom(zoom)
            .into_shared();
        let mut tool = CropTool::new();
        tool.bind_host(host.clone());
        (tool, host)
    }

    #[test]
    fn pixel_rect_intersection() {
        let image = PixelRect::new(0, 0, 100, 100);
        assert_eq!(
            PixelRect::new(90, 90, 50, 50).intersect(&image),
            PixelRect::new(90, 90, 10, 10)
        );
        assert!(PixelRect::new(200, 200, 50, 50).intersect(&image).is_empty());
        assert!(PixelRect::new(-60, 0, 50, 50).intersect(&image).is_empty());
        assert_eq!(
            PixelRect::new(-10, -10, 50, 50).intersect(&image),
            PixelRect::new(0, 0, 40, 40)
        );
        assert!(PixelRect::new(i64::MAX, i64::MAX, 50, 50).intersect(&image).is_empty());
        assert!(PixelRect::new(i64::MIN, 0, 50, 50).intersect(&image).is_empty());
    }

    #[test]
    fn start_covers_the_canvas_and_populates_the_scene() {
        let (mut tool, host) = tool_with(800, 600, 1.0);
        tool.start_crop();

        assert_eq!(tool.state(), SessionState::Active);
        assert_eq!(tool.crop_rect().map(|r| r.rect()), Some(rect(0.0, 0.0, 800.0, 600.0)));
        assert_eq!(tool.field_value(FieldId::Width), 800);
        assert_eq!(tool.field_value(FieldId::Height), 600);
        assert_eq!(tool.mask().map(|m| m.visible_pieces().count()), Some(0));
        assert_eq!(host.borrow().scene().len(), 5);
        assert_eq!(host.borrow().scene().last(), Some(&SceneItem::CropFrame));
    }

    #[test]
    fn start_is_ignored_without_image_host_or_when_active() {
        let mut tool = CropTool::new();
        tool.start_crop();
        assert_eq!(tool.state(), SessionState::Idle);

        let host = EditorHost::new().into_shared();
        tool.bind_host(host.clone());
        tool.start_crop();
        assert_eq!(tool.state(), SessionState::Idle);

        host.borrow_mut().replace_image(DynamicImage::new_rgba8(50, 40));
        tool.start_crop();
        tool.set_crop_rect(rect(5.0, 5.0, 10.0, 10.0));
        tool.start_crop();
        assert_eq!(tool.crop_rect().map(|r| r.rect()), Some(rect(5.0, 5.0, 10.0, 10.0)));
    }

    #[test]
    fn cancel_tears_down_and_is_idempotent() {
        let (mut tool, host) = tool_with(64, 64, 1.0);
        tool.start_crop();
        tool.cancel_crop();
        tool.cancel_crop();
        assert_eq!(tool.state(), SessionState::Idle);
        assert!(tool.crop_rect().is_none());
        assert!(tool.mask().is_none());
        assert!(host.borrow().scene().is_empty());
    }

    #[test]
    fn fields_follow_the_rect_in_image_pixels() {
        let (mut tool, _host) = tool_with(1000, 800, 0.5);
        tool.start_crop();
        assert_eq!(tool.field_value(FieldId::Width), 1000);

        tool.set_crop_rect(rect(50.0, 50.0, 200.0, 150.0));
        assert_eq!(tool.field_value(FieldId::Width), 400);
        assert_eq!(tool.field_value(FieldId::Height), 300);
    }

    #[test]
    fn mask_tracks_every_rect_change() {
        let (mut tool, _host) = tool_with(400, 300, 1.0);
        tool.start_crop();
        tool.set_crop_rect(rect(100.0, 50.0, 100.0, 100.0));
        let mask = *tool.mask().unwrap();
        assert_eq!(mask.top, rect(0.0, 0.0, 400.0, 50.0));
        assert_eq!(mask.right, rect(200.0, 50.0, 200.0, 100.0));

        tool.set_field(FieldId::Width, 150);
        assert_eq!(tool.mask().unwrap().right, rect(250.0, 50.0, 150.0, 100.0));
    }

    #[test]
    fn locked_width_edit_rebalances_height_once() {
        let (mut tool, _host) = tool_with(800, 600, 1.0);
        tool.start_crop();
        tool.set_crop_rect(rect(10.0, 20.0, 200.0, 100.0));
        tool.set_aspect_locked(true);

        tool.set_field(FieldId::Width, 300);
        assert_eq!(tool.field_value(FieldId::Height), 150);
        assert_eq!(tool.crop_rect().unwrap().rect(), rect(10.0, 20.0, 300.0, 150.0));
        assert!(tool.fields.take_pending().is_empty());

        tool.set_field(FieldId::Height, 50);
        assert_eq!(tool.field_value(FieldId::Width), 100);
        assert_eq!(tool.crop_rect().unwrap().rect(), rect(10.0, 20.0, 100.0, 50.0));
    }

    #[test]
    fn unlocked_field_edit_keeps_the_other_dimension() {
        let (mut tool, _host) = tool_with(800, 600, 2.0);
        tool.start_crop();
        tool.set_crop_rect(rect(40.0, 40.0, 200.0, 100.0));
        tool.set_field(FieldId::Height, 75);
        assert_eq!(tool.field_value(FieldId::Width), 100);
        assert_eq!(tool.crop_rect().unwrap().rect(), rect(40.0, 40.0, 200.0, 150.0));
    }

    #[test]
    fn same_field_value_changes_nothing() {
        let (mut tool, host) = tool_with(300, 200, 1.0);
        tool.start_crop();
        tool.set_crop_rect(rect(10.0, 10.0, 120.5, 80.0));
        host.borrow_mut().take_repaint_request();

        let before = tool.crop_rect().unwrap().rect();
        let width = tool.field_value(FieldId::Width);
        tool.set_field(FieldId::Width, width);
        assert_eq!(tool.crop_rect().unwrap().rect(), before);
        assert!(!host.borrow_mut().take_repaint_request());
    }

    #[test]
    fn field_edits_are_ignored_while_idle() {
        let (mut tool, _host) = tool_with(300, 200, 1.0);
        tool.set_field(FieldId::Width, 42);
        assert_eq!(tool.field_value(FieldId::Width), 1);
    }

    #[test]
    fn aspect_lock_state_carries_into_new_sessions() {
        let (mut tool, _host) = tool_with(300, 200, 1.0);
        tool.set_aspect_locked(true);
        tool.start_crop();
        let crop = tool.crop_rect().unwrap();
        assert!(crop.aspect_locked());
        assert_eq!(crop.locked_ratio(), Some(1.5));
    }

    #[test]
    fn zoom_change_rescales_the_session() {
        let (mut tool, host) = tool_with(1000, 800, 1.0);
        tool.start_crop();
        tool.set_crop_rect(rect(100.0, 100.0, 200.0, 100.0));
        host.borrow_mut().set_zoom_factor(0.5);
        tool.follow_zoom();

        assert_eq!(tool.crop_rect().unwrap().rect(), rect(50.0, 50.0, 100.0, 50.0));
        assert_eq!(tool.field_value(FieldId::Width), 200);
        assert_eq!(tool.field_value(FieldId::Height), 100);
        assert_eq!(tool.mask().unwrap().bottom, rect(0.0, 100.0, 500.0, 300.0));
    }

    #[test]
    fn round_trip_through_fields_stays_within_a_unit() {
        for zoom in [0.37_f32, 0.5, 1.0, 1.75, 3.3] {
            let (mut tool, _host) = tool_with(2000, 2000, zoom);
            tool.start_crop();
            for (w, h) in [(123.4_f32, 77.7_f32), (10.0, 999.9), (333.3, 1.6)] {
                tool.set_crop_rect(rect(0.0, 0.0, w, h));
                let back_w = tool.field_value(FieldId::Width) as f32 * zoom;
                let back_h = tool.field_value(FieldId::Height) as f32 * zoom;
                assert!((back_w - w).abs() <= 1.0 + zoom / 2.0, "{zoom}: {w} -> {back_w}");
                assert!((back_h - h).abs() <= 1.0 + zoom / 2.0, "{zoom}: {h} -> {back_h}");
            }
        }
    }

    #[test]
    fn apply_replaces_the_image_and_ends_the_session() {
        let (mut tool, host) = tool_with(100, 100, 1.0);
        tool.start_crop();
        tool.set_crop_rect(rect(90.0, 90.0, 50.0, 50.0));
        tool.apply_crop().unwrap();

        let host = host.borrow();
        let image = host.image().unwrap();
        assert_eq!((image.width(), image.height()), (10, 10));
        assert_eq!(tool.state(), SessionState::Idle);
        assert!(host.scene().is_empty());
    }

    #[test]
    fn apply_outside_the_image_keeps_the_session() {
        let (mut tool, host) = tool_with(100, 100, 1.0);
        tool.start_crop();
        tool.set_crop_rect(rect(200.0, 200.0, 50.0, 50.0));
        let err = tool.apply_crop().unwrap_err();
        assert!(matches!(err, CropError::InvalidCropArea { x: 200, y: 200, .. }));
        assert_eq!(tool.state(), SessionState::Active);
        assert_eq!(host.borrow().image().map(|i| i.width()), Some(100));
    }

    #[test]
    fn apply_far_beyond_the_canvas_reports_invalid_area() {
        let (mut tool, host) = tool_with(100, 100, 1.0);
        tool.start_crop();
        tool.set_crop_rect(rect(1e20, 1e20, 50.0, 50.0));
        let err = tool.apply_crop().unwrap_err();
        assert!(matches!(err, CropError::InvalidCropArea { x: i64::MAX, y: i64::MAX, .. }));
        assert_eq!(tool.state(), SessionState::Active);
        assert_eq!(host.borrow().generation(), 1);
    }

    #[test]
    fn apply_converts_display_origin_through_zoom() {
        let (mut tool, host) = tool_with(1000, 800, 0.5);
        tool.start_crop();
        tool.set_crop_rect(rect(50.0, 25.0, 200.0, 150.0));
        tool.apply_crop().unwrap();
        let host = host.borrow();
        let image = host.image().unwrap();
        assert_eq!((image.width(), image.height()), (400, 300));
    }

    #[test]
    fn apply_while_idle_is_a_no_op() {
        let (mut tool, host) = tool_with(10, 10, 1.0);
        assert!(tool.apply_crop().is_ok());
        assert_eq!(host.borrow().generation(), 1);
    }
}
