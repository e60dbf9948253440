use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use tracing::{debug, info, instrument};

use crate::light_field::common::error::{LightFieldError, Result};
use crate::light_field::model::RenderedFrame;
use crate::light_field::output::png_writer::PngStillWriter;
use crate::light_field::output::types::OutputConfig;
use crate::light_field::output::writer::{SequenceWriter, StillWriter};

/// Writes a sequence as `frame_0000.png`, `frame_0001.png`, ... inside a directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageDirectoryWriter;

impl ImageDirectoryWriter {
    pub fn frame_file_name(index: usize) -> String {
        format!("frame_{index:04}.png")
    }
}

impl SequenceWriter for ImageDirectoryWriter {
    #[instrument(skip(self, frames), fields(frames = frames.len()))]
    fn write_sequence(&self, frames: &[RenderedFrame], path: &Path) -> Result<()> {
        if frames.is_empty() {
            return Err(LightFieldError::EmptySequence("no frames to write".to_string()));
        }
        std::fs::create_dir_all(path)
            .map_err(|e| LightFieldError::OutputWriteError(format!("{}: {}", path.display(), e)))?;

        let config = OutputConfig::default();
        for (index, frame) in frames.iter().enumerate() {
            let file_path = path.join(Self::frame_file_name(index));
            let file = File::create(&file_path).map_err(|e| {
                LightFieldError::OutputWriteError(format!("{}: {}", file_path.display(), e))
            })?;
            let mut writer = BufWriter::new(file);
            PngStillWriter.write_still(frame, &mut writer, &config)?;
            debug!(file = %file_path.display(), "Frame written");
        }

        info!(dir = %path.display(), "Wrote {} frames", frames.len());
        Ok(())
    }
}
