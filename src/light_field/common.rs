//! Common utilities module
//!
//! This module contains shared utilities used across the light-field pipeline.

pub mod error;
pub mod timing;

pub use error::{LightFieldError, Result};
pub use timing::{PipelineTimings, StepTiming, Timer};
