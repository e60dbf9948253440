use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::light_field::common::error::{LightFieldError, Result};
use crate::light_field::common::timing::Timer;
use crate::light_field::loader::image_reader::ImageCaptureReader;
use crate::light_field::loader::reader::CaptureReader;
use crate::light_field::loader::tiling::split_capture;
use crate::light_field::loader::types::LoadConfig;
use crate::light_field::model::{DisparityMap, LightFieldFrame, LightFieldVideo, ViewGrid};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tif", "tiff", "ppm", "pgm"];

pub struct LightFieldLoader<R: CaptureReader> {
    reader: R,
    config: LoadConfig,
}

impl LightFieldLoader<ImageCaptureReader> {
    pub fn new(config: LoadConfig) -> Self {
        Self {
            reader: ImageCaptureReader,
            config,
        }
    }
}

impl<R: CaptureReader> LightFieldLoader<R> {
    pub fn with_custom(reader: R, config: LoadConfig) -> Self {
        Self { reader, config }
    }

    pub fn config(&self) -> &LoadConfig {
        &self.config
    }

    /// Loads `<root>/<capture_dir_name>` and `<root>/<disparity_dir_name>`.
    pub fn load_dir<P: AsRef<Path>>(&self, root: P) -> Result<LightFieldVideo> {
        let root = root.as_ref();
        self.load_dirs(
            root.join(&self.config.capture_dir_name),
            root.join(&self.config.disparity_dir_name),
        )
    }

    /// Loads every image of `capture_dir` as a frame and every image of `disparity_dir`
    /// as a disparity map. Sorted file names give the temporal order.
    #[instrument(skip(self, capture_dir, disparity_dir))]
    pub fn load_dirs<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        capture_dir: P,
        disparity_dir: Q,
    ) -> Result<LightFieldVideo> {
        let grid = ViewGrid::new(self.config.grid_size)?;
        let capture_dir = capture_dir.as_ref();
        let disparity_dir = disparity_dir.as_ref();

        info!(
            captures = %capture_dir.display(),
            disparity = %disparity_dir.display(),
            grid = grid.size(),
            "Loading light-field video"
        );

        let timer = Timer::start("load_frames");
        let frames = {
            let _span = tracing::info_span!("load_frames").entered();
            list_image_files(capture_dir)?
                .iter()
                .map(|path| self.load_frame(path, grid))
                .collect::<Result<Vec<_>>>()?
        };
        let (name, duration) = timer.stop();
        info!("{}: {} frames in {:.3}ms", name, frames.len(), duration.as_secs_f64() * 1000.0);

        let timer = Timer::start("load_disparity");
        let disparity = {
            let _span = tracing::info_span!("load_disparity").entered();
            list_image_files(disparity_dir)?
                .iter()
                .map(|path| self.load_disparity(path))
                .collect::<Result<Vec<_>>>()?
        };
        let (name, duration) = timer.stop();
        info!("{}: {} maps in {:.3}ms", name, disparity.len(), duration.as_secs_f64() * 1000.0);

        LightFieldVideo::new(grid, frames, disparity)
    }

    pub fn load_frame(&self, path: &Path, grid: ViewGrid) -> Result<LightFieldFrame> {
        debug!(path = %path.display(), "Parsing capture");
        let data = read_file(path)?;
        let capture = self.reader.read_capture(&data).map_err(|e| with_path(e, path))?;
        split_capture(&capture, grid)
    }

    pub fn load_disparity(&self, path: &Path) -> Result<DisparityMap> {
        debug!(path = %path.display(), "Loading disparity map");
        let data = read_file(path)?;
        self.reader.read_disparity(&data).map_err(|e| with_path(e, path))
    }
}

/// Image files directly inside `dir`, sorted by file name.
pub fn list_image_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| LightFieldError::InputReadError(format!("{}: {}", dir.display(), e)))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
        if path.is_file() && is_image {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    if files.is_empty() {
        return Err(LightFieldError::EmptySequence(format!(
            "no images in {}",
            dir.display()
        )));
    }
    Ok(files)
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| LightFieldError::InputReadError(format!("{}: {}", path.display(), e)))
}

fn with_path(error: LightFieldError, path: &Path) -> LightFieldError {
    match error {
        LightFieldError::DecodeError(msg) => {
            LightFieldError::DecodeError(format!("{}: {}", path.display(), msg))
        }
        other => other,
    }
}
