//! Tunables shared by the crop and zoom tools.

use std::ops::RangeInclusive;

/// Settings for a crop session and the surrounding tools.
#[derive(Clone, Debug, PartialEq)]
pub struct CropSettings {
    /// Side length of the square hit region around each handle, in display units.
    pub handle_size: f32,
    /// Alpha of the dimming mask outside the crop rectangle.
    pub mask_alpha: u8,
    /// Stroke width of the crop frame.
    pub frame_stroke: f32,
    /// Accepted range of the width/height fields, in image pixels.
    pub field_range: RangeInclusive<u32>,
    /// Multiplicative step used by zoom in/out.
    pub zoom_step: f32,
    pub zoom_range: RangeInclusive<f32>,
}

impl Default for CropSettings {
    fn default() -> Self {
        Self {
            handle_size: 8.0,
            mask_alpha: 127,
            frame_stroke: 2.0,
            field_range: 1..=10_000,
            zoom_step: 1.2,
            zoom_range: 0.1..=5.0,
        }
    }
}

impl CropSettings {
    pub fn with_handle_size(mut self, size: f32) -> Self {
        self.handle_size = size.max(1.0);
        self
    }

    pub fn with_mask_alpha(mut self, alpha: u8) -> Self {
        self.mask_alpha = alpha;
        self
    }

    pub fn with_field_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.field_range = range;
        self
    }

    pub fn with_zoom_range(mut self, range: RangeInclusive<f32>) -> Self {
        self.zoom_range = range;
        self
    }

    /// Clamp a zoom factor into the configured range.
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        zoom.clamp(*self.zoom_range.start(), *self.zoom_range.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spin_box_limits() {
        let settings = CropSettings::default();
        assert_eq!(settings.handle_size, 8.0);
        assert_eq!(settings.field_range, 1..=10_000);
        assert_eq!(settings.mask_alpha, 127);
    }

    #[test]
    fn clamp_zoom_respects_range() {
        let settings = CropSettings::default().with_zoom_range(0.5..=2.0);
        assert_eq!(settings.clamp_zoom(0.1), 0.5);
        assert_eq!(settings.clamp_zoom(1.5), 1.5);
        assert_eq!(settings.clamp_zoom(9.0), 2.0);
    }

    #[test]
    fn handle_size_never_collapses() {
        let settings = CropSettings::default().with_handle_size(0.0);
        assert_eq!(settings.handle_size, 1.0);
    }
}
