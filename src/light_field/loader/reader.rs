use image::{GrayImage, RgbImage};

use crate::light_field::common::error::Result;

pub trait CaptureReader {
    /// Decodes one tiled light-field capture to 8-bit RGB.
    fn read_capture(&self, data: &[u8]) -> Result<RgbImage>;

    /// Decodes one disparity map to single-channel 8-bit.
    fn read_disparity(&self, data: &[u8]) -> Result<GrayImage>;
}
