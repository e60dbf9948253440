//! Synthetic-aperture refocusing
//!
//! Realigns every sub-aperture view of a frame to a chosen focal plane and fuses them
//! into one image, optionally weighting views by their distance from the grid centre to
//! emulate a smaller lens aperture.

pub mod aperture;
pub mod realign;
mod accumulator;
mod refocuser;


pub use accumulator::{Weighting, accumulate};
pub use aperture::{ApertureWeights, aperture_weights, validate_aperture};
pub use realign::{focal_shift, realign_view};
pub use refocuser::Refocuser;
