//! Focus sweep configuration types

/// Which video frame each sweep step refocuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepMode {
    /// Always refocus frame 0
    #[default]
    FixedFrame,
    /// Step `n` refocuses frame `n`, holding the last frame once the video runs out
    AdvancingFrame,
}

/// Configuration for a focus sweep
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Number of rendered frames
    pub samples: usize,
    /// Focus offset of the first sample
    pub alpha_start: f32,
    /// Upper bound of the sweep; the last sample stops one step short of it
    pub alpha_end: f32,
    /// Aperture for every render, must lie in [0, 1]
    pub aperture: f32,
    pub mode: SweepMode,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            samples: 117,
            alpha_start: -3.0,
            alpha_end: 3.0,
            aperture: 1.0,
            mode: SweepMode::FixedFrame,
        }
    }
}

impl SweepConfig {
    pub fn builder() -> SweepConfigBuilder {
        SweepConfigBuilder::default()
    }

    /// Spacing between consecutive focus offsets, `(end - start) / samples`.
    pub fn step(&self) -> f32 {
        if self.samples == 0 {
            return 0.0;
        }
        (self.alpha_end - self.alpha_start) / self.samples as f32
    }

    /// Focus offset of sweep step `n`.
    pub fn alpha_at(&self, n: usize) -> f32 {
        self.alpha_start + self.step() * n as f32
    }
}

/// Builder for SweepConfig
#[derive(Default)]
pub struct SweepConfigBuilder {
    samples: Option<usize>,
    alpha_start: Option<f32>,
    alpha_end: Option<f32>,
    aperture: Option<f32>,
    mode: Option<SweepMode>,
}

impl SweepConfigBuilder {
    pub fn samples(mut self, samples: usize) -> Self {
        self.samples = Some(samples);
        self
    }

    pub fn alpha_range(mut self, start: f32, end: f32) -> Self {
        self.alpha_start = Some(start);
        self.alpha_end = Some(end);
        self
    }

    pub fn aperture(mut self, aperture: f32) -> Self {
        self.aperture = Some(aperture);
        self
    }

    pub fn mode(mut self, mode: SweepMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn build(self) -> SweepConfig {
        let default = SweepConfig::default();
        SweepConfig {
            samples: self.samples.unwrap_or(default.samples),
            alpha_start: self.alpha_start.unwrap_or(default.alpha_start),
            alpha_end: self.alpha_end.unwrap_or(default.alpha_end),
            aperture: self.aperture.unwrap_or(default.aperture),
            mode: self.mode.unwrap_or(default.mode),
        }
    }
}
