//! Time-based spin trajectory: a randomized total rotation eased out over
//! a fixed duration, sampled once per frame.

use std::time::{Duration, Instant};

use rand::Rng;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);

const MIN_TURNS: f64 = 5.0;
const EXTRA_TURNS: f64 = 3.0;

/// Total additional rotation for one spin: 5 to 8 cosmetic full turns plus
/// a uniform final offset in `[0, 360)`. Only the offset decides where the
/// wheel comes to rest, so the resting angle is uniform regardless of the
/// starting rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinPlan {
    pub total_rotation_deg: f64,
}

impl SpinPlan {
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::from_draws(rng.random_range(0.0..1.0), rng.random_range(0.0..1.0))
    }

    /// Builds a plan from the two uniform draws directly; the first picks
    /// the turn count, the second the final offset.
    pub fn from_draws(turns: f64, offset: f64) -> Self {
        Self {
            total_rotation_deg: (MIN_TURNS + turns * EXTRA_TURNS) * 360.0 + offset * 360.0,
        }
    }
}

/// Cubic ease-out: fast start, smooth deceleration into the stop.
pub fn ease_out_cubic(progress: f64) -> f64 {
    1.0 - (1.0 - progress).powi(3)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Rotating(f64),
    /// Terminal rotation. Delivered exactly once per spin.
    Finished(f64),
    /// The spin already completed or was cancelled; nothing to report.
    Done,
}

#[derive(Debug)]
pub struct SpinAnimator {
    start_rotation_deg: f64,
    plan: SpinPlan,
    duration: Duration,
    started_at: Instant,
    completed: bool,
    cancelled: bool,
}

impl SpinAnimator {
    pub fn begin(
        previous_rotation_deg: f64,
        plan: SpinPlan,
        duration: Duration,
        now: Instant,
    ) -> Self {
        Self {
            start_rotation_deg: previous_rotation_deg,
            plan,
            duration,
            started_at: now,
            completed: false,
            cancelled: false,
        }
    }

    /// Rotation at a given normalized progress. Monotonic in `progress`,
    /// so the wheel never runs backwards during a spin.
    pub fn rotation_at(&self, progress: f64) -> f64 {
        self.start_rotation_deg
            + self.plan.total_rotation_deg * ease_out_cubic(progress.clamp(0.0, 1.0))
    }

    pub fn sample(&mut self, now: Instant) -> Sample {
        if self.cancelled || self.completed {
            return Sample::Done;
        }
        let elapsed = now.duration_since(self.started_at);
        let progress = (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0);
        if progress >= 1.0 {
            self.completed = true;
            Sample::Finished(self.rotation_at(1.0))
        } else {
            Sample::Rotating(self.rotation_at(progress))
        }
    }

    /// Stops sampling before completion; no `Finished` sample will fire
    /// afterwards, so a torn-down session sees no late side effects.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn is_live(&self) -> bool {
        !self.cancelled && !self.completed
    }
}
