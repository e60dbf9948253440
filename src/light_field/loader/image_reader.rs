//! Capture reader backed by the `image` crate.

use image::{GrayImage, RgbImage};
use tracing::debug;

use crate::light_field::common::error::{LightFieldError, Result};
use crate::light_field::loader::reader::CaptureReader;

/// Decodes any raster format the `image` crate was built with (PNG, JPEG, BMP, TIFF,
/// PNM). Colour inputs are converted to the requested channel layout.
pub struct ImageCaptureReader;

impl CaptureReader for ImageCaptureReader {
    fn read_capture(&self, data: &[u8]) -> Result<RgbImage> {
        debug!("Decoding capture, {} bytes", data.len());

        let decoded = image::load_from_memory(data)
            .map_err(|e| LightFieldError::DecodeError(e.to_string()))?;

        debug!("Decoded capture: {}x{}", decoded.width(), decoded.height());
        Ok(decoded.to_rgb8())
    }

    fn read_disparity(&self, data: &[u8]) -> Result<GrayImage> {
        debug!("Decoding disparity map, {} bytes", data.len());

        let decoded = image::load_from_memory(data)
            .map_err(|e| LightFieldError::DecodeError(e.to_string()))?;

        Ok(decoded.to_luma8())
    }
}
