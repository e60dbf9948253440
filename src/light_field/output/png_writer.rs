use std::io::Write;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use tracing::debug;

use crate::light_field::common::error::{LightFieldError, Result};
use crate::light_field::model::RenderedFrame;
use crate::light_field::output::types::OutputConfig;
use crate::light_field::output::writer::StillWriter;

pub struct PngStillWriter;

impl StillWriter for PngStillWriter {
    fn write_still(&self, frame: &RenderedFrame, output: &mut dyn Write, _config: &OutputConfig) -> Result<()> {
        debug!("Encoding PNG image: {}x{}", frame.width(), frame.height());

        PngEncoder::new(output)
            .write_image(
                frame.image.as_raw(),
                frame.width(),
                frame.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| LightFieldError::EncodeError(e.to_string()))
    }
}
