//! Gait phasing shared by all legs of a creature.
//!
//! Legs never talk to each other. They are staggered by a phase offset on a
//! single clock: leg `i` of `n` sits at `t + 2πi/n`.

use std::f32::consts::{FRAC_PI_2, TAU};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Evenly spaced phase offsets `{0, 2π/n, …, 2π(n-1)/n}`.
pub fn phase_offsets(leg_count: usize) -> Result<Vec<f32>> {
    if leg_count == 0 {
        return Err(ConfigError::NoLegs);
    }
    let spacing = TAU / leg_count as f32;
    Ok((0..leg_count).map(|i| spacing * i as f32).collect())
}

/// Shared gait clock. `t = elapsed * step_speed`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaitClock {
    elapsed: f32,
    pub step_speed: f32,
}

impl GaitClock {
    pub fn new(step_speed: f32) -> Self {
        Self {
            elapsed: 0.0,
            step_speed,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn time(&self) -> f32 {
        self.elapsed * self.step_speed
    }

    /// Instantaneous phase of a leg with `offset`.
    pub fn phase(&self, offset: f32) -> f32 {
        self.time() + offset
    }
}

/// Which strategy moves the feet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GaitModel {
    /// Planted feet that step when they drift too far (see [`crate::step`]).
    #[default]
    Discrete,
    /// Feet swept continuously by [`PhaseGait`] around their resting spot.
    Procedural,
}

/// Continuous phase-driven foot motion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseGait {
    pub stride_length: f32,
    pub step_height: f32,
}

impl PhaseGait {
    /// Forward/back displacement: `sin(phase) * stride / 2`.
    pub fn horizontal(&self, phase: f32) -> f32 {
        phase.sin() * self.stride_length * 0.5
    }

    /// Lift during half of the cycle, peaking where `horizontal` crosses zero
    /// moving forward.
    pub fn lift(&self, phase: f32) -> f32 {
        (phase - FRAC_PI_2).cos().max(0.0) * self.step_height
    }
}

/// True during the half of the cycle in which the leg may swing.
///
/// Matches the window where [`PhaseGait::lift`] is positive.
pub fn swing_window_open(phase: f32) -> bool {
    phase.sin() > 0.0
}
