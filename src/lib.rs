//! Interactive crop-rectangle engine with an eframe front end.
//!
//! The geometry lives in [`crop_rect`] (handles, dragging, aspect lock) and
//! knows nothing about images. [`crop_tool`] drives a crop session against a
//! [`host::CropHost`]: it keeps the dimming [`mask`] and the pixel-size
//! [`fields`] in step with the rectangle and cuts the final sub-image.

pub mod app;
pub mod config;
pub mod crop_rect;
pub mod crop_tool;
pub mod error;
pub mod fields;
pub mod handle;
pub mod host;
pub mod mask;
pub mod tools;

pub use config::CropSettings;
pub use crop_rect::{CropRect, RectEvent};
pub use crop_tool::{CropTool, PixelRect, SessionState};
pub use error::CropError;
pub use fields::FieldId;
pub use handle::Handle;
pub use host::{CropHost, EditorHost, SceneItem, SharedHost};
pub use mask::{MaskSide, OcclusionMask};
