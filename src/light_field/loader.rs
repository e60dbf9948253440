//! Light-field loading module
//!
//! Reads tiled captures and disparity maps from disk and assembles them into a
//! [`LightFieldVideo`](crate::light_field::model::LightFieldVideo). Decoding is
//! delegated to a [`CaptureReader`] so other raster sources can be plugged in.

mod directory_loader;
mod image_reader;
mod reader;
pub mod tiling;
pub mod types;

#[cfg(test)]
mod tests;

pub use directory_loader::{LightFieldLoader, list_image_files};
pub use image_reader::ImageCaptureReader;
pub use reader::CaptureReader;
pub use tiling::split_capture;
pub use types::{LoadConfig, LoadConfigBuilder};
