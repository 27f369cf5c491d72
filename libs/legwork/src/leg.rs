use std::fmt::Display;

use log::{debug, trace};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::body::BodySnapshot;
use crate::config::{GaitSettings, LegConfig};
use crate::error::Result;
use crate::gait::{swing_window_open, GaitClock, GaitModel, PhaseGait};
use crate::ground::GroundQuery;
use crate::ik::{self, BendHint, Reach};
use crate::math::lerp_vec;
use crate::placement::FootPlanner;
use crate::step::{StepEvent, StepState, Stepper};
use crate::visual::LegPose;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    #[default]
    Right,
}

impl Side {
    /// Even legs on the right, odd legs on the left.
    pub fn from_index(index: usize) -> Self {
        if index % 2 == 0 {
            Side::Right
        } else {
            Side::Left
        }
    }

    /// Sign of the body-local x coordinate on this side.
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// One leg: fixed geometry plus the foot/knee/step state it owns.
#[derive(Clone, Debug)]
pub struct Leg {
    index: usize,
    config: LegConfig,
    planner: FootPlanner,
    stepper: Stepper,
    /// Smoothed foot of the procedural gait.
    swept_foot: Vector3<f32>,
    target: Vector3<f32>,
    hip: Vector3<f32>,
    knee: Vector3<f32>,
    foot: Vector3<f32>,
    reach: Reach,
}

impl Leg {
    /// Build a leg with its foot resting `body_target_height` below the hip.
    pub fn new(index: usize, config: LegConfig, body: &BodySnapshot, settings: &GaitSettings) -> Result<Self> {
        config.validate().map_err(|e| e.for_leg(index))?;
        let hip = body.hip(index);
        let resting = hip - body.up.into_inner() * settings.body_target_height;
        let planner = FootPlanner::new(config.foot_offset(), settings.ray_height, resting);
        let stepper = Stepper::new(config.step_params(), resting).map_err(|e| e.for_leg(index))?;

        let mut leg = Self {
            index,
            config,
            planner,
            stepper,
            swept_foot: resting,
            target: resting,
            hip,
            knee: hip,
            foot: resting,
            reach: Reach::Solved,
        };
        leg.solve(body, resting);
        Ok(leg)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn side(&self) -> Side {
        self.config.side
    }

    pub fn config(&self) -> &LegConfig {
        &self.config
    }

    pub fn hip(&self) -> Vector3<f32> {
        self.hip
    }

    pub fn knee(&self) -> Vector3<f32> {
        self.knee
    }

    pub fn foot(&self) -> Vector3<f32> {
        self.foot
    }

    pub fn target(&self) -> Vector3<f32> {
        self.target
    }

    pub fn reach(&self) -> Reach {
        self.reach
    }

    pub fn grounded(&self) -> bool {
        self.planner.grounded()
    }

    pub fn step_state(&self) -> StepState {
        self.stepper.state()
    }

    pub fn is_stepping(&self) -> bool {
        self.stepper.is_stepping()
    }

    pub fn pose(&self) -> LegPose {
        LegPose {
            hip: self.hip,
            knee: self.knee,
            foot: self.foot,
        }
    }

    /// Instantaneous gait phase on `clock`.
    pub fn phase(&self, clock: &GaitClock) -> f32 {
        clock.phase(self.config.phase_offset)
    }


    /// Run one tick: plan, step, solve.
    pub fn update<G: GroundQuery + ?Sized>(
        &mut self,
        body: &BodySnapshot,
        ground: &G,
        clock: &GaitClock,
        dt: f32,
        settings: &GaitSettings,
    ) -> LegPose {
        self.hip = body.hip(self.index);
        let phase = self.phase(clock);
        let up = body.up.into_inner();

        let desired = match settings.model {
            GaitModel::Discrete => {
                self.target = self.planner.compute_target(self.index, body, ground).target;

                let target = self.target;
                let gate = |stepper: &Stepper| may_lift(stepper, phase, &target, settings);
                match self.stepper.update_gated(&target, dt, &up, gate) {
                    StepEvent::Lifted => debug!("leg {}: lifted toward {:?}", self.index, target),
                    StepEvent::Landed => debug!("leg {}: landed at {:?}", self.index, self.stepper.foot()),
                    StepEvent::Skipped => debug!("leg {}: stepped in a single tick, dt {dt}", self.index),
                    StepEvent::None => {}
                }
                self.stepper.foot()
            }
            GaitModel::Procedural => {
                let gait = PhaseGait {
                    stride_length: settings.stride_length,
                    step_height: self.config.step_height,
                };
                let resting = self.hip - up * settings.body_target_height;
                self.target = resting + body.forward.into_inner() * gait.horizontal(phase) + up * gait.lift(phase);
                let t = (dt * settings.smoothing).clamp(0.0, 1.0);
                self.swept_foot = lerp_vec(&self.swept_foot, &self.target, t);
                self.swept_foot
            }
        };

        self.solve(body, desired);
        self.pose()
    }

    fn solve(&mut self, body: &BodySnapshot, desired: Vector3<f32>) {
        let hint = BendHint::new(body.up, body.right, self.config.side);
        let solution = ik::solve(
            &self.hip,
            &desired,
            self.config.upper_length,
            self.config.lower_length,
            &hint,
        );

        if solution.reach == Reach::Stretched {
            trace!("leg {}: target out of reach, clamped to {:?}", self.index, solution.foot);
            // the owned foot is dragged to max reach, except mid-arc
            self.stepper.set_planted_foot(solution.foot);
            self.swept_foot = solution.foot;
        }

        self.knee = solution.knee;
        self.foot = solution.foot;
        self.reach = solution.reach;
    }
}

/// Whether a planted foot that wants to step may lift at `phase`.
fn may_lift(stepper: &Stepper, phase: f32, target: &Vector3<f32>, settings: &GaitSettings) -> bool {
    if !settings.phase_gating || swing_window_open(phase) {
        return true;
    }
    // out of phase, but far enough behind that waiting would strand it
    let drift = (target - stepper.foot()).norm();
    drift > settings.force_step_factor * stepper.params().trigger_distance
}
