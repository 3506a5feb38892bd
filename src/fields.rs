//! Width/height fields that drive the crop rectangle in image pixels.

use std::ops::RangeInclusive;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldId {
    Width,
    Height,
}

/// Integer input with a clamped range and blockable change notification.
#[derive(Clone, Debug)]
pub struct SpinField {
    value: u32,
    range: RangeInclusive<u32>,
    blocked: bool,
}

impl SpinField {
    pub fn new(range: RangeInclusive<u32>) -> Self {
        Self {
            value: *range.start(),
            range,
            blocked: false,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn range(&self) -> RangeInclusive<u32> {
        self.range.clone()
    }

    /// Store `value`, clamped into range. Returns true when the stored value
    /// changed and notifications are not blocked.
    pub fn set_value(&mut self, value: u32) -> bool {
        let clamped = value.clamp(*self.range.start(), *self.range.end());
        if clamped == self.value {
            return false;
        }
        self.value = clamped;
        !self.blocked
    }

    /// Store `value` with notifications suppressed for the write.
    pub fn set_value_silently(&mut self, value: u32) {
        let was = self.block_signals(true);
        self.set_value(value);
        self.block_signals(was);
    }

    pub fn block_signals(&mut self, blocked: bool) -> bool {
        std::mem::replace(&mut self.blocked, blocked)
    }
}

/// The pair of dimension fields shown next to the canvas.
#[derive(Clone, Debug)]
pub struct DimensionFields {
    pub width: SpinField,
    pub height: SpinField,
    pending: Vec<FieldId>,
}

impl DimensionFields {
    pub fn new(range: RangeInclusive<u32>) -> Self {
        Self {
            width: SpinField::new(range.clone()),
            height: SpinField::new(range),
            pending: Vec::new(),
        }
    }

    pub fn field(&self, id: FieldId) -> &SpinField {
        match id {
            FieldId::Width => &self.width,
            FieldId::Height => &self.height,
        }
    }

    pub fn field_mut(&mut self, id: FieldId) -> &mut SpinField {
        match id {
            FieldId::Width => &mut self.width,
            FieldId::Height => &mut self.height,
        }
    }

    pub fn value(&self, id: FieldId) -> u32 {
        self.field(id).value()
    }

    /// A user edit: queues a change notification when the value moved.
    pub fn edit(&mut self, id: FieldId, value: u32) {
        if self.field_mut(id).set_value(value) {
            self.pending.push(id);
        }
    }

    /// Write both fields without raising any notification.
    pub fn set_silently(&mut self, width: u32, height: u32) {
        self.width.set_value_silently(width);
        self.height.set_value_silently(height);
    }

    pub fn take_pending(&mut self) -> Vec<FieldId> {
        std::mem::take(&mut self.pending)
    }
}
