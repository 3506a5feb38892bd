//! The draggable crop rectangle.
//!
//! [`CropRect`] owns one rectangle in display space and resolves pointer
//! interactions against it: hit testing the eight handles, resizing the edges
//! a handle controls, moving the whole rectangle, and keeping a locked aspect
//! ratio. Every geometry change is reported as a [`RectEvent`], and only for
//! the fields that actually changed.

use eframe::egui;
use tracing::trace;

use crate::handle::Handle;

/// Change notification raised by [`CropRect`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RectEvent {
    XChanged,
    YChanged,
    WidthChanged,
    HeightChanged,
    AspectLockChanged(bool),
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum DragTarget {
    Resize(Handle),
    Move,
}

#[derive(Debug)]
pub struct CropRect {
    rect: egui::Rect,
    handle_size: f32,
    aspect_locked: bool,
    locked_ratio: Option<f32>,
    drag: Option<DragTarget>,
    last_pointer: egui::Pos2,
    signals_blocked: bool,
    events: Vec<RectEvent>,
}

impl CropRect {
    pub fn new(rect: egui::Rect, handle_size: f32) -> Self {
        Self {
            rect: normalized(rect),
            handle_size,
            aspect_locked: false,
            locked_ratio: None,
            drag: None,
            last_pointer: egui::Pos2::ZERO,
            signals_blocked: false,
            events: Vec::new(),
        }
    }

    pub fn rect(&self) -> egui::Rect {
        self.rect
    }

    pub fn handle_size(&self) -> f32 {
        self.handle_size
    }

    /// The rectangle grown by half a handle on every side, i.e. everything a
    /// pointer press can land on.
    pub fn bounding_rect(&self) -> egui::Rect {
        self.rect.expand(self.handle_size / 2.0)
    }

    pub fn handle_rect(&self, handle: Handle) -> egui::Rect {
        egui::Rect::from_center_size(handle.anchor(self.rect), egui::Vec2::splat(self.handle_size))
    }

    pub fn handle_rects(&self) -> [(Handle, egui::Rect); 8] {
        Handle::RESIZE.map(|handle| (handle, self.handle_rect(handle)))
    }

    pub fn hit_test(&self, pos: egui::Pos2) -> Handle {
        Handle::RESIZE
            .into_iter()
            .find(|handle| self.handle_rect(*handle).contains(pos))
            .unwrap_or(Handle::None)
    }

    /// Cursor to show while hovering `pos`.
    pub fn cursor_at(&self, pos: egui::Pos2) -> egui::CursorIcon {
        match self.drag {
            Some(DragTarget::Resize(handle)) => handle.cursor(),
            _ => self.hit_test(pos).cursor(),
        }
    }

    pub fn aspect_locked(&self) -> bool {
        self.aspect_locked
    }

    /// Ratio enforced while dragging, if the lock is on and the rectangle had
    /// a usable shape when it was captured.
    pub fn locked_ratio(&self) -> Option<f32> {
        if self.aspect_locked {
            self.locked_ratio
        } else {
            None
        }
    }

    pub fn set_aspect_locked(&mut self, locked: bool) {
        if self.aspect_locked == locked {
            return;
        }
        self.aspect_locked = locked;
        self.capture_ratio();
        self.emit(RectEvent::AspectLockChanged(locked));
    }

    /// Replace the rectangle. Notifies only the fields that differ.
    pub fn set_rect(&mut self, rect: egui::Rect) {
        self.replace(normalized(rect));
        self.capture_ratio();
    }

    pub fn active_handle(&self) -> Handle {
        match self.drag {
            Some(DragTarget::Resize(handle)) => handle,
            _ => Handle::None,
        }
    }

    pub fn is_interacting(&self) -> bool {
        self.drag.is_some()
    }

    /// Start a drag at `pos`. A press on a handle resizes, a press anywhere
    /// else on the rectangle moves it. Returns false when `pos` misses the
    /// rectangle entirely.
    pub fn begin_interaction(&mut self, pos: egui::Pos2) -> bool {
        let handle = self.hit_test(pos);
        self.drag = if handle != Handle::None {
            Some(DragTarget::Resize(handle))
        } else if self.bounding_rect().contains(pos) {
            Some(DragTarget::Move)
        } else {
            None
        };
        self.last_pointer = pos;
        trace!(?pos, drag = ?self.drag, "crop rect interaction started");
        self.drag.is_some()
    }

    pub fn continue_interaction(&mut self, pos: egui::Pos2) {
        let Some(target) = self.drag else {
            return;
        };
        let delta = pos - self.last_pointer;
        self.last_pointer = pos;
        if delta == egui::Vec2::ZERO {
            return;
        }

        let next = match target {
            DragTarget::Move => self.rect.translate(delta),
            DragTarget::Resize(handle) => {
                let next = self.resized(handle, delta);
                // Past the opposite edge the pointer now holds the mirrored handle.
                let flipped = handle.mirrored(next.min.x > next.max.x, next.min.y > next.max.y);
                self.drag = Some(DragTarget::Resize(flipped));
                next
            }
        };
        trace!(?target, ?delta, ?next, "crop rect dragged");
        self.replace(normalized(next));
    }

    pub fn end_interaction(&mut self) {
        self.drag = None;
    }

    /// Suppress notifications until unblocked. Returns the previous state.
    pub fn block_signals(&mut self, blocked: bool) -> bool {
        std::mem::replace(&mut self.signals_blocked, blocked)
    }

    /// Drain pending notifications in the order they were raised.
    pub fn take_events(&mut self) -> Vec<RectEvent> {
        std::mem::take(&mut self.events)
    }

    fn resized(&self, handle: Handle, delta: egui::Vec2) -> egui::Rect {
        let mut r = self.rect;
        match handle {
            Handle::TopLeft => r.min += delta,
            Handle::Top => r.min.y += delta.y,
            Handle::TopRight => {
                r.min.y += delta.y;
                r.max.x += delta.x;
            }
            Handle::Right => r.max.x += delta.x,
            Handle::BottomRight => r.max += delta,
            Handle::Bottom => r.max.y += delta.y,
            Handle::BottomLeft => {
                r.min.x += delta.x;
                r.max.y += delta.y;
            }
            Handle::Left => r.min.x += delta.x,
            Handle::None => {}
        }

        let Some(ratio) = self.locked_ratio() else {
            return r;
        };

        let moves_top = matches!(handle, Handle::TopLeft | Handle::TopRight);
        let moves_left = matches!(handle, Handle::TopLeft | Handle::BottomLeft);
        if handle.is_corner() {
            // The axis that moved more drives; the other follows from the
            // ratio while the opposite corner stays anchored.
            if delta.x.abs() > delta.y.abs() {
                let height = r.width() / ratio;
                if moves_top {
                    r.min.y = r.max.y - height;
                } else {
                    r.max.y = r.min.y + height;
                }
            } else {
                let width = r.height() * ratio;
                if moves_left {
                    r.min.x = r.max.x - width;
                } else {
                    r.max.x = r.min.x + width;
                }
            }
        } else {
            match handle {
                Handle::Top | Handle::Bottom => r.max.x = r.min.x + r.height() * ratio,
                Handle::Left | Handle::Right => r.max.y = r.min.y + r.width() / ratio,
                _ => {}
            }
        }
        r
    }

    fn replace(&mut self, next: egui::Rect) {
        let prev = self.rect;
        if prev == next {
            return;
        }
        self.rect = next;

        if next.min.x != prev.min.x {
            self.emit(RectEvent::XChanged);
        }
        if next.min.y != prev.min.y {
            self.emit(RectEvent::YChanged);
        }
        if next.width() != prev.width() {
            self.emit(RectEvent::WidthChanged);
        }
        if next.height() != prev.height() {
            self.emit(RectEvent::HeightChanged);
        }
    }

    fn capture_ratio(&mut self) {
        self.locked_ratio = if self.aspect_locked && self.rect.width() > 0.0 && self.rect.height() > 0.0 {
            Some(self.rect.width() / self.rect.height())
        } else {
            None
        };
    }

    fn emit(&mut self, event: RectEvent) {
        if !self.signals_blocked {
            self.events.push(event);
        }
    }
}

/// Sort the corners so `min <= max` on both axes.
pub fn normalized(rect: egui::Rect) -> egui::Rect {
    egui::Rect::from_two_pos(rect.min, rect.max)
}
