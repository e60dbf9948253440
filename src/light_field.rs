//! Light-field video refocusing
//!
//! Loads a sequence of plenoptic captures (a square grid of sub-aperture views per frame
//! plus a disparity map), refocuses frames synthetically after capture, renders focus
//! sweeps and tracks points between frames.

pub mod common;
pub mod loader;
pub mod model;
pub mod output;
pub mod refocus;
pub mod sweep;
pub mod tracking;

#[cfg(test)]
pub(crate) mod synthetic;

pub use common::{LightFieldError, PipelineTimings, Result};

pub use model::{
    DisparityMap, GridCoord, LightFieldFrame, LightFieldVideo, PointF, RenderedFrame,
    SubApertureView, ViewGrid,
};

pub use loader::{CaptureReader, ImageCaptureReader, LightFieldLoader, LoadConfig};

pub use refocus::Refocuser;

pub use sweep::{FocusSweep, SweepConfig, SweepMode};

pub use tracking::{CorrespondenceEstimator, PointTracker, PyramidalLucasKanade, TrackOutcome};

pub use output::{
    ImageDirectoryWriter, MjpegAviWriter, OutputConfig, SequenceWriter, StillFormat,
    TiffCompression, write_still_file,
};
