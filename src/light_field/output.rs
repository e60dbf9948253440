//! Output module
//!
//! Encodes rendered frames as stills (PNG, TIFF) and sequences (MJPEG AVI or a numbered
//! image directory).

mod image_dir_writer;
mod mjpeg_writer;
mod png_writer;
mod tiff_writer;
pub mod types;
mod writer;


use std::path::Path;

use tracing::info;

use crate::light_field::common::error::{LightFieldError, Result};
use crate::light_field::model::RenderedFrame;

pub use image_dir_writer::ImageDirectoryWriter;
pub use mjpeg_writer::MjpegAviWriter;
pub use png_writer::PngStillWriter;
pub use tiff_writer::TiffStillWriter;
pub use types::{OutputConfig, OutputConfigBuilder, StillFormat, TiffCompression};
pub use writer::{SequenceWriter, StillWriter};

/// Writes `frame` to `path` in the format selected by `config`.
pub fn write_still_file<P: AsRef<Path>>(
    frame: &RenderedFrame,
    path: P,
    config: &OutputConfig,
) -> Result<()> {
    let path = path.as_ref();
    info!(output = %path.display(), format = ?config.format, "Writing still");

    let mut file = std::fs::File::create(path).map_err(|e| {
        LightFieldError::OutputWriteError(format!("{}: {}", path.display(), e))
    })?;

    match config.format {
        StillFormat::Png => PngStillWriter.write_still(frame, &mut file, config),
        StillFormat::Tiff => TiffStillWriter.write_still(frame, &mut file, config),
    }
}
