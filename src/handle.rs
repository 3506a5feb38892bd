use eframe::egui;

/// Hit-test zone on the crop rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Handle {
    #[default]
    None, // Moving / nothing
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl Handle {
    /// The eight resize handles in hit-test priority order.
    pub const RESIZE: [Handle; 8] = [
        Handle::TopLeft,
        Handle::Top,
        Handle::TopRight,
        Handle::Right,
        Handle::BottomRight,
        Handle::Bottom,
        Handle::BottomLeft,
        Handle::Left,
    ];

    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Handle::TopLeft | Handle::TopRight | Handle::BottomLeft | Handle::BottomRight
        )
    }

    /// Where this handle sits on `rect`. `None` maps to the center.
    pub fn anchor(self, rect: egui::Rect) -> egui::Pos2 {
        match self {
            Handle::None => rect.center(),
            Handle::TopLeft => rect.left_top(),
            Handle::Top => rect.center_top(),
            Handle::TopRight => rect.right_top(),
            Handle::Right => rect.right_center(),
            Handle::BottomRight => rect.right_bottom(),
            Handle::Bottom => rect.center_bottom(),
            Handle::BottomLeft => rect.left_bottom(),
            Handle::Left => rect.left_center(),
        }
    }

    /// The handle that ends up under the pointer after the rectangle turns
    /// inside out along the given axes.
    pub fn mirrored(self, horizontal: bool, vertical: bool) -> Handle {
        let h = if horizontal {
            match self {
                Handle::TopLeft => Handle::TopRight,
                Handle::TopRight => Handle::TopLeft,
                Handle::Left => Handle::Right,
                Handle::Right => Handle::Left,
                Handle::BottomLeft => Handle::BottomRight,
                Handle::BottomRight => Handle::BottomLeft,
                other => other,
            }
        } else {
            self
        };
        if !vertical {
            return h;
        }
        match h {
            Handle::TopLeft => Handle::BottomLeft,
            Handle::BottomLeft => Handle::TopLeft,
            Handle::Top => Handle::Bottom,
            Handle::Bottom => Handle::Top,
            Handle::TopRight => Handle::BottomRight,
            Handle::BottomRight => Handle::TopRight,
            other => other,
        }
    }

    /// Pointer affordance for this handle.
    pub fn cursor(self) -> egui::CursorIcon {
        match self {
            Handle::TopLeft | Handle::BottomRight => egui::CursorIcon::ResizeNwSe,
            Handle::Top | Handle::Bottom => egui::CursorIcon::ResizeVertical,
            Handle::TopRight | Handle::BottomLeft => egui::CursorIcon::ResizeNeSw,
            Handle::Left | Handle::Right => egui::CursorIcon::ResizeHorizontal,
            Handle::None => egui::CursorIcon::Default,
        }
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Handle::None => "none",
            Handle::TopLeft => "top-left",
            Handle::Top => "top",
            Handle::TopRight => "top-right",
            Handle::Right => "right",
            Handle::BottomRight => "bottom-right",
            Handle::Bottom => "bottom",
            Handle::BottomLeft => "bottom-left",
            Handle::Left => "left",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_and_edges_get_matching_cursors() {
        assert_eq!(Handle::TopLeft.cursor(), egui::CursorIcon::ResizeNwSe);
        assert_eq!(Handle::BottomRight.cursor(), egui::CursorIcon::ResizeNwSe);
        assert_eq!(Handle::TopRight.cursor(), egui::CursorIcon::ResizeNeSw);
        assert_eq!(Handle::BottomLeft.cursor(), egui::CursorIcon::ResizeNeSw);
        assert_eq!(Handle::Top.cursor(), egui::CursorIcon::ResizeVertical);
        assert_eq!(Handle::Left.cursor(), egui::CursorIcon::ResizeHorizontal);
        assert_eq!(Handle::None.cursor(), egui::CursorIcon::Default);
    }

    #[test]
    fn anchors_sit_on_the_border() {
        let rect = egui::Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(100.0, 50.0));
        assert_eq!(Handle::TopLeft.anchor(rect), egui::pos2(10.0, 20.0));
        assert_eq!(Handle::Top.anchor(rect), egui::pos2(60.0, 20.0));
        assert_eq!(Handle::Right.anchor(rect), egui::pos2(110.0, 45.0));
        assert_eq!(Handle::BottomLeft.anchor(rect), egui::pos2(10.0, 70.0));
        assert!(Handle::RESIZE.iter().all(|h| *h != Handle::None));
    }

    #[test]
    fn mirroring_swaps_the_flipped_sides() {
        assert_eq!(Handle::Right.mirrored(true, false), Handle::Left);
        assert_eq!(Handle::Right.mirrored(false, true), Handle::Right);
        assert_eq!(Handle::Top.mirrored(true, false), Handle::Top);
        assert_eq!(Handle::BottomRight.mirrored(true, true), Handle::TopLeft);
        assert_eq!(Handle::TopRight.mirrored(false, true), Handle::BottomRight);
        assert_eq!(Handle::None.mirrored(true, true), Handle::None);
    }
}
