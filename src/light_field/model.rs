//! Light-field data model
//!
//! Grid geometry, sub-aperture views, frames and the loaded video sequence with its
//! view and disparity addressing.

pub mod grid;
pub mod types;
mod video;

pub use grid::{DEFAULT_GRID_SIZE, GridCoord, ViewGrid};
pub use types::{
    DisparityMap, LightFieldFrame, PointF, RenderedFrame, SubApertureView, to_display,
};
pub use video::{LightFieldVideo, MAX_DISPARITY, MIN_DISPARITY, decode_disparity};
