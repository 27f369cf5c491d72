//! Foot stepping state machine.
//!
//! A foot is either planted or in the air moving toward a target. A step
//! lasts a fixed duration; the foot eases across with smoothstep and lifts
//! along a half-sine arc.

use std::f32::consts::PI;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{non_negative, positive, Result};
use crate::math::{lerp_vec, smoothstep};
use crate::placement::needs_step;

/// What a step in flight does when the planner moves its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetargetPolicy {
    /// Finish toward the target captured at lift-off.
    #[default]
    Hold,
    /// Chase the newest target every tick.
    Follow,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepState {
    Planted,
    Stepping {
        start: Vector3<f32>,
        target: Vector3<f32>,
        /// Fraction of the step completed, in [0, 1).
        progress: f32,
    },
}

/// Transition reported by [`Stepper::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepEvent {
    None,
    Lifted,
    Landed,
    /// Lifted and landed in the same tick (`dt >= duration`).
    Skipped,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepParams {
    pub trigger_distance: f32,
    pub height: f32,
    /// Seconds. Must be positive.
    pub duration: f32,
    pub retarget: RetargetPolicy,
}

impl StepParams {
    pub fn validate(&self) -> Result<()> {
        non_negative("step_trigger_distance", self.trigger_distance)?;
        non_negative("step_height", self.height)?;
        positive("step_duration", self.duration)?;
        Ok(())
    }
}

/// Vertical lift at `progress`: zero at both ends, `height` at the middle.
pub fn arc_height(progress: f32, height: f32) -> f32 {
    (progress.clamp(0.0, 1.0) * PI).sin() * height
}

#[derive(Clone, Debug)]
pub struct Stepper {
    params: StepParams,
    state: StepState,
    foot: Vector3<f32>,
}

impl Stepper {
    pub fn new(params: StepParams, foot: Vector3<f32>) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            params,
            state: StepState::Planted,
            foot,
        })
    }

    pub fn params(&self) -> &StepParams {
        &self.params
    }

    pub fn state(&self) -> StepState {
        self.state
    }

    pub fn foot(&self) -> Vector3<f32> {
        self.foot
    }

    pub fn is_stepping(&self) -> bool {
        matches!(self.state, StepState::Stepping { .. })
    }

    pub fn progress(&self) -> Option<f32> {
        match self.state {
            StepState::Planted => None,
            StepState::Stepping { progress, .. } => Some(progress),
        }
    }

    /// Replace the foot position, e.g. after IK pulled it back to max reach.
    ///
    /// Only applies while planted; a foot in the air is owned by its arc.
    pub fn set_planted_foot(&mut self, foot: Vector3<f32>) {
        if !self.is_stepping() {
            self.foot = foot;
        }
    }

    /// True when a planted foot is far enough from `target` to step.
    pub fn wants_step(&self, target: &Vector3<f32>) -> bool {
        !self.is_stepping() && needs_step(&self.foot, target, self.params.trigger_distance)
    }

    /// Lift off toward `target`, if planted.
    pub fn begin(&mut self, target: Vector3<f32>) -> bool {
        if self.is_stepping() {
            return false;
        }
        self.state = StepState::Stepping {
            start: self.foot,
            target,
            progress: 0.0,
        };
        true
    }

    /// Advance a step in flight by `dt`. `target` is the planner's current
    /// target and only matters under [`RetargetPolicy::Follow`].
    pub fn advance(&mut self, target: &Vector3<f32>, dt: f32, up: &Vector3<f32>) -> StepEvent {
        let StepState::Stepping {
            start,
            target: captured,
            progress,
        } = self.state
        else {
            return StepEvent::None;
        };

        let goal = match self.params.retarget {
            RetargetPolicy::Hold => captured,
            RetargetPolicy::Follow => *target,
        };
        let progress = progress + dt.max(0.0) / self.params.duration;

        if progress >= 1.0 {
            // overshoot is dropped, the next step starts from zero
            self.foot = goal;
            self.state = StepState::Planted;
            return StepEvent::Landed;
        }

        self.foot = lerp_vec(&start, &goal, smoothstep(progress)) + up * arc_height(progress, self.params.height);
        self.state = StepState::Stepping {
            start,
            target: goal,
            progress,
        };
        StepEvent::None
    }

    /// One tick of the full machine: lift if the target drifted past the
    /// trigger distance, then advance.
    pub fn update(&mut self, target: &Vector3<f32>, dt: f32, up: &Vector3<f32>) -> StepEvent {
        self.update_gated(target, dt, up, |_| true)
    }

    /// [`update`](Self::update), but a planted foot that wants to step only
    /// lifts when `may_lift` agrees.
    pub fn update_gated<F>(&mut self, target: &Vector3<f32>, dt: f32, up: &Vector3<f32>, may_lift: F) -> StepEvent
    where
        F: FnOnce(&Self) -> bool,
    {
        let lifted = self.wants_step(target) && may_lift(self) && self.begin(*target);
        match (lifted, self.advance(target, dt, up)) {
            (true, StepEvent::Landed) => StepEvent::Skipped,
            (true, _) => StepEvent::Lifted,
            (false, event) => event,
        }
    }
}
