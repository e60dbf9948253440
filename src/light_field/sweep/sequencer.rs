use tracing::{debug, info, instrument};

use crate::light_field::common::error::Result;
use crate::light_field::common::timing::{PipelineTimings, Timer};
use crate::light_field::model::RenderedFrame;
use crate::light_field::refocus::Refocuser;
use crate::light_field::sweep::types::{SweepConfig, SweepMode};

/// Drives a [`Refocuser`] across a linear range of focus offsets.
pub struct FocusSweep<'a> {
    refocuser: Refocuser<'a>,
    config: SweepConfig,
}

impl<'a> FocusSweep<'a> {
    pub fn new(refocuser: Refocuser<'a>, config: SweepConfig) -> Self {
        Self { refocuser, config }
    }

    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Focus offset of every step, in render order.
    pub fn alphas(&self) -> Vec<f32> {
        (0..self.config.samples)
            .map(|n| self.config.alpha_at(n))
            .collect()
    }

    /// Video frame refocused at step `n`.
    pub fn frame_for_step(&self, n: usize) -> usize {
        match self.config.mode {
            SweepMode::FixedFrame => 0,
            SweepMode::AdvancingFrame => {
                let last = self.refocuser.video().frame_count().saturating_sub(1);
                n.min(last)
            }
        }
    }

    /// Renders every step in order. Stops at the first failed render; an aperture
    /// outside [0, 1] fails on the first step.
    #[instrument(skip(self), fields(samples = self.config.samples, mode = ?self.config.mode))]
    pub fn run(&self) -> Result<Vec<RenderedFrame>> {
        self.run_with_timings().map(|(frames, _)| frames)
    }

    pub fn run_with_timings(&self) -> Result<(Vec<RenderedFrame>, PipelineTimings)> {
        info!(
            alpha_start = self.config.alpha_start,
            alpha_end = self.config.alpha_end,
            aperture = self.config.aperture,
            "Starting focus sweep"
        );

        let mut timings = PipelineTimings::new();
        let mut frames = Vec::with_capacity(self.config.samples);

        for (n, alpha) in self.alphas().into_iter().enumerate() {
            let frame_id = self.frame_for_step(n);
            debug!(step = n, frame_id, alpha, "Rendering sweep step");

            let timer = Timer::start(format!("render_{n:04}"));
            frames.push(self.refocuser.render(frame_id, alpha, self.config.aperture)?);
            timer.record_into(&mut timings);
        }

        info!(
            frames = frames.len(),
            total_ms = timings.total_duration().as_secs_f64() * 1000.0,
            "Focus sweep complete"
        );
        Ok((frames, timings))
    }
}
