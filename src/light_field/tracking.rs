//! Temporal point tracking
//!
//! Follows a point of a frame's reference view into the next frame, so focus can stay on
//! a moving subject. Correspondence estimation sits behind [`CorrespondenceEstimator`];
//! the default is a pyramidal Lucas-Kanade tracker.

mod estimator;
mod lucas_kanade;
mod tracker;
pub mod types;

pub use estimator::CorrespondenceEstimator;
pub use lucas_kanade::PyramidalLucasKanade;
pub use tracker::PointTracker;
pub use types::TrackOutcome;
