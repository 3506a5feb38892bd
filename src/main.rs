#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use eframe::egui;
use image_cropper::app::ImageCropper;
use tracing_subscriber::EnvFilter;

fn main() -> eframe::Result {
    // IMAGE_CROPPER_LOG controls the log level, default "info"
    let filter =
        EnvFilter::try_from_env("IMAGE_CROPPER_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1000.0, 700.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Image Cropper",
        options,
        Box::new(|cc| Ok(Box::new(ImageCropper::new(cc)))),
    )
}
