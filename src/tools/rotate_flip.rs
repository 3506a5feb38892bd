use eframe::egui;
use image::DynamicImage;
use tracing::{debug, warn};

use super::ImageTool;
use crate::host::SharedHost;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    RotateLeft,
    RotateRight,
    FlipHorizontal,
    FlipVertical,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::RotateLeft,
        Orientation::RotateRight,
        Orientation::FlipHorizontal,
        Orientation::FlipVertical,
    ];

    pub fn apply(self, image: &DynamicImage) -> DynamicImage {
        match self {
            Orientation::RotateLeft => image.rotate270(),
            Orientation::RotateRight => image.rotate90(),
            Orientation::FlipHorizontal => image.fliph(),
            Orientation::FlipVertical => image.flipv(),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Orientation::RotateLeft => "↺ 90°",
            Orientation::RotateRight => "↻ 90°",
            Orientation::FlipHorizontal => "Flip Horizontal",
            Orientation::FlipVertical => "Flip Vertical",
        }
    }
}

/// Quarter turns and mirror flips of the whole image.
#[derive(Default)]
pub struct RotateFlipTool {
    host: Option<SharedHost>,
}

impl RotateFlipTool {
    /// Returns false when there is no image or a crop session is running.
    pub fn transform(&mut self, orientation: Orientation) -> bool {
        let Some(host) = &self.host else {
            return false;
        };
        let next = {
            let host = host.borrow();
            if host.crop_in_progress() {
                warn!(?orientation, "transform refused while a crop is in progress");
                return false;
            }
            let Some(image) = host.image() else {
                return false;
            };
            orientation.apply(image)
        };
        debug!(?orientation, "image transformed");
        let mut host = host.borrow_mut();
        host.replace_image(next);
        host.request_repaint();
        true
    }
}

impl ImageTool for RotateFlipTool {
    fn name(&self) -> &'static str {
        "Rotate & Flip"
    }

    fn bind_host(&mut self, host: SharedHost) {
        self.host = Some(host);
    }

    fn show_controls(&mut self, ui: &mut egui::Ui) {
        let enabled = self.host.as_ref().is_some_and(|host| {
            let host = host.borrow();
            host.image().is_some() && !host.crop_in_progress()
        });
        let [left, right, flip_h, flip_v] = Orientation::ALL;

        ui.add_enabled_ui(enabled, |ui| {
            let mut clicked = None;
            ui.horizontal(|ui| {
                for orientation in [left, right] {
                    if ui.button(orientation.label()).clicked() {
                        clicked = Some(orientation);
                    }
                }
            });
            for orientation in [flip_h, flip_v] {
                if ui.button(orientation.label()).clicked() {
                    clicked = Some(orientation);
                }
            }
            if let Some(orientation) = clicked {
                self.transform(orientation);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::*;
    use crate::crop_tool::CropTool;
    use crate::host::{CropHost, EditorHost};

    /// 3×2 image whose pixels encode their own coordinates.
    fn sample() -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_fn(3, 2, |x, y| {
            Rgba([x as u8, y as u8, 0, 255])
        }))
    }

    fn pixel(image: &DynamicImage, x: u32, y: u32) -> [u8; 2] {
        let p = image.to_rgba8().get_pixel(x, y).0;
        [p[0], p[1]]
    }

    #[test]
    fn quarter_turns_swap_dimensions() {
        let right = Orientation::RotateRight.apply(&sample());
        assert_eq!((right.width(), right.height()), (2, 3));
        // Clockwise: the old top-left lands top-right.
        assert_eq!(pixel(&right, 1, 0), [0, 0]);

        let left = Orientation::RotateLeft.apply(&sample());
        assert_eq!((left.width(), left.height()), (2, 3));
        assert_eq!(pixel(&left, 0, 2), [0, 0]);
    }

    #[test]
    fn flips_mirror_one_axis() {
        let h = Orientation::FlipHorizontal.apply(&sample());
        assert_eq!(pixel(&h, 0, 0), [2, 0]);
        let v = Orientation::FlipVertical.apply(&sample());
        assert_eq!(pixel(&v, 0, 0), [0, 1]);
    }

    #[test]
    fn transform_replaces_the_host_image() {
        let host = EditorHost::with_image(sample()).into_shared();
        let mut tool = RotateFlipTool::default();
        tool.bind_host(host.clone());
        assert!(tool.transform(Orientation::RotateRight));
        assert_eq!(host.borrow().image().map(|i| (i.width(), i.height())), Some((2, 3)));
        assert_eq!(host.borrow().generation(), 2);
    }

    #[test]
    fn transform_waits_for_a_running_crop() {
        let host = EditorHost::with_image(sample()).into_shared();
        let mut tool = RotateFlipTool::default();
        tool.bind_host(host.clone());
        let mut crop = CropTool::new();
        crop.bind_host(host.clone());
        crop.start_crop();

        assert!(!tool.transform(Orientation::FlipVertical));
        assert_eq!(host.borrow().generation(), 1);

        crop.cancel_crop();
        assert!(tool.transform(Orientation::FlipVertical));
    }

    #[test]
    fn without_image_nothing_happens() {
        let host = EditorHost::new().into_shared();
        let mut tool = RotateFlipTool::default();
        tool.bind_host(host.clone());
        assert!(!tool.transform(Orientation::RotateLeft));
        assert!(host.borrow().image().is_none());
    }
}
