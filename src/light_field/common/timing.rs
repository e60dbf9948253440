//! Wall-clock timings of loading and sweep steps.
//!
//! A sweep records one step per rendered sample (`render_0000`, `render_0001`, ...); the
//! loader records one per stage. Steps may repeat a name; per-name totals are kept
//! alongside the ordered list.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: String,
    pub duration: Duration,
}

/// Ordered step durations of one run.
#[derive(Debug, Default)]
pub struct PipelineTimings {
    steps: Vec<StepTiming>,
    totals: HashMap<String, Duration>,
}

impl PipelineTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_step(&mut self, name: impl Into<String>, duration: Duration) {
        let name = name.into();
        *self.totals.entry(name.clone()).or_default() += duration;
        self.steps.push(StepTiming { name, duration });
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    /// Summed duration of every step recorded under `name`.
    pub fn get_step(&self, name: &str) -> Option<Duration> {
        self.totals.get(name).copied()
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    /// Mean step duration, zero when nothing was recorded.
    pub fn mean_duration(&self) -> Duration {
        match u32::try_from(self.steps.len()) {
            Ok(0) | Err(_) => Duration::ZERO,
            Ok(count) => self.total_duration() / count,
        }
    }

    /// The longest single step; the first one wins a tie.
    pub fn slowest_step(&self) -> Option<&StepTiming> {
        self.steps
            .iter()
            .reduce(|slowest, step| if step.duration > slowest.duration { step } else { slowest })
    }

    /// Table of every step with its share of the total, followed by total, mean and the
    /// slowest step.
    pub fn summary(&self, title: &str) -> String {
        let total = self.total_duration();
        let total_secs = total.as_secs_f64();
        let mut out = String::new();

        let _ = writeln!(out, "{title}");
        let _ = writeln!(out, "{:-<60}", "");
        for step in &self.steps {
            let share = if total_secs > 0.0 {
                step.duration.as_secs_f64() / total_secs * 100.0
            } else {
                0.0
            };
            let _ = writeln!(out, "{:<30} {:>12.3}ms ({:>5.1}%)", step.name, millis(step.duration), share);
        }
        let _ = writeln!(out, "{:-<60}", "");
        let _ = writeln!(out, "{:<30} {:>12.3}ms", "Total", millis(total));
        let _ = writeln!(out, "{:<30} {:>12.3}ms", "Mean per step", millis(self.mean_duration()));
        if let Some(slowest) = self.slowest_step() {
            let _ = writeln!(out, "{:<30} {:>12.3}ms ({})", "Slowest", millis(slowest.duration), slowest.name);
        }
        out
    }

    pub fn print_summary(&self) {
        println!("\n{}", self.summary("Sweep timings:"));
    }
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Measures one named step.
pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    pub fn stop(self) -> (String, Duration) {
        (self.name, self.start.elapsed())
    }

    /// Stops the timer and records the step in `timings`, returning its duration.
    pub fn record_into(self, timings: &mut PipelineTimings) -> Duration {
        let (name, duration) = self.stop();
        timings.add_step(name, duration);
        duration
    }
}
