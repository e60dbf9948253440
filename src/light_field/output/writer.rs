use std::io::Write;
use std::path::Path;

use crate::light_field::common::error::Result;
use crate::light_field::model::RenderedFrame;
use crate::light_field::output::types::OutputConfig;

pub trait StillWriter {
    fn write_still(&self, frame: &RenderedFrame, output: &mut dyn Write, config: &OutputConfig) -> Result<()>;
}

pub trait SequenceWriter {
    /// Writes `frames` in order to `path`.
    fn write_sequence(&self, frames: &[RenderedFrame], path: &Path) -> Result<()>;
}
