//! Focus sweep module
//!
//! Renders a "focus rack": a sequence of frames with the focal plane moved linearly
//! across a range of focus offsets.

mod sequencer;
pub mod types;

pub use sequencer::FocusSweep;
pub use types::{SweepConfig, SweepConfigBuilder, SweepMode};
