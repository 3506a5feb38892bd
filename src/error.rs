use std::path::PathBuf;

/// Errors surfaced to the user by the cropper.
#[derive(Debug, thiserror::Error)]
pub enum CropError {
    /// The crop rectangle, clipped to the image, has no area.
    #[error("Invalid crop area selected ({width}x{height} at {x},{y}).")]
    InvalidCropArea {
        x: i64,
        y: i64,
        width: i64,
        height: i64,
    },

    #[error("Failed to open image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to save image {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl CropError {
    /// Short title for a warning dialog.
    pub fn title(&self) -> &'static str {
        match self {
            CropError::InvalidCropArea { .. } => "Crop Error",
            CropError::ImageLoad { .. } => "Open Error",
            CropError::ImageSave { .. } => "Save Error",
        }
    }
}
