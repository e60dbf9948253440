use std::io::Write;
use tracing::debug;
use crate::light_field::common::error::{Result, LightFieldError};
use crate::light_field::model::RenderedFrame;
use crate::light_field::output::types::{OutputConfig, TiffCompression};
use crate::light_field::output::writer::StillWriter;

pub struct TiffStillWriter;

impl StillWriter for TiffStillWriter {
    fn write_still(&self, frame: &RenderedFrame, output: &mut dyn Write, config: &OutputConfig) -> Result<()> {
        debug!("Encoding TIFF image: {}x{}", frame.width(), frame.height());

        // The TIFF encoder needs Seek, so encode into memory first.
        let mut buffer = Vec::new();

        let compression = match config.compression {
            TiffCompression::None => tiff::encoder::Compression::Uncompressed,
            TiffCompression::Lzw => tiff::encoder::Compression::Lzw,
            TiffCompression::DeflateFast => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Balanced),
            TiffCompression::DeflateBest => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Best),
        };

        let mut encoder = tiff::encoder::TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| LightFieldError::EncodeError(e.to_string()))?
            .with_compression(compression);

        if let Some(predictor_val) = config.predictor {
            let predictor = match predictor_val {
                2 => tiff::tags::Predictor::Horizontal,
                _ => tiff::tags::Predictor::None,
            };
            encoder = encoder.with_predictor(predictor);
        }

        encoder.write_image::<tiff::encoder::colortype::RGB8>(
            frame.width(),
            frame.height(),
            frame.image.as_raw(),
        ).map_err(|e| LightFieldError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("TIFF encoding complete");
        Ok(())
    }
}
