//! Creature and leg parameters.
//!
//! Everything here is fixed at construction. A [`CreatureConfig`] describes a
//! whole creature the way a level designer thinks about it (leg count, total
//! leg length, upper/lower ratio); [`CreatureConfig::leg_configs`] expands it
//! into one validated [`LegConfig`] per leg.

use std::path::Path;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{finite3, non_negative, positive, ConfigError, Result};
use crate::gait::{phase_offsets, GaitModel};
use crate::leg::Side;
use crate::step::{RetargetPolicy, StepParams};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegConfig {
    pub side: Side,
    pub upper_length: f32,
    pub lower_length: f32,
    /// Body-local hip attachment (x right, y up, z forward).
    pub hip_offset: [f32; 3],
    /// Body-local offset of the foot target, rotated by yaw only.
    pub foot_offset: [f32; 3],
    pub step_trigger_distance: f32,
    pub step_height: f32,
    /// Seconds.
    pub step_duration: f32,
    /// Radians on the shared gait clock.
    pub phase_offset: f32,
    pub retarget: RetargetPolicy,
}

impl Default for LegConfig {
    fn default() -> Self {
        Self {
            side: Side::Right,
            upper_length: 1.0,
            lower_length: 1.0,
            hip_offset: [0.5, -0.5, 0.0],
            foot_offset: [1.4, 0.0, 0.0],
            step_trigger_distance: 0.6,
            step_height: 0.5,
            step_duration: 0.25,
            phase_offset: 0.0,
            retarget: RetargetPolicy::Hold,
        }
    }
}

impl LegConfig {
    pub fn validate(&self) -> Result<()> {
        positive("upper_length", self.upper_length)?;
        positive("lower_length", self.lower_length)?;
        positive("step_duration", self.step_duration)?;
        non_negative("step_trigger_distance", self.step_trigger_distance)?;
        non_negative("step_height", self.step_height)?;
        finite3("hip_offset", self.hip_offset)?;
        finite3("foot_offset", self.foot_offset)?;
        if !self.phase_offset.is_finite() {
            return Err(ConfigError::NonFinite { field: "phase_offset" });
        }
        Ok(())
    }

    pub fn max_reach(&self) -> f32 {
        self.upper_length + self.lower_length
    }

    pub fn hip_offset(&self) -> Vector3<f32> {
        Vector3::from(self.hip_offset)
    }

    pub fn foot_offset(&self) -> Vector3<f32> {
        Vector3::from(self.foot_offset)
    }

    pub fn step_params(&self) -> StepParams {
        StepParams {
            trigger_distance: self.step_trigger_distance,
            height: self.step_height,
            duration: self.step_duration,
            retarget: self.retarget,
        }
    }
}

/// Creature-wide gait behaviour, shared by every leg.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaitSettings {
    pub model: GaitModel,
    /// Gait clock rate; phase advances `step_speed` radians per second.
    pub step_speed: f32,
    /// Only lift legs inside their swing window.
    pub phase_gating: bool,
    /// Lift regardless of phase beyond `force_step_factor * trigger distance`.
    pub force_step_factor: f32,
    /// Upward bias of the ground cast above the foot offset point.
    pub ray_height: f32,
    /// Resting foot distance below the hip.
    pub body_target_height: f32,
    /// Full stride of the procedural gait.
    pub stride_length: f32,
    /// Exponential smoothing rate of the procedural gait, per second.
    pub smoothing: f32,
}

impl GaitSettings {
    pub fn validate(&self) -> Result<()> {
        // a gated leg waits for its window; a stopped clock never opens it
        if self.phase_gating {
            positive("step_speed", self.step_speed)?;
        } else {
            non_negative("step_speed", self.step_speed)?;
        }
        positive("force_step_factor", self.force_step_factor)?;
        non_negative("ray_height", self.ray_height)?;
        non_negative("body_target_height", self.body_target_height)?;
        non_negative("stride_length", self.stride_length)?;
        non_negative("smoothing", self.smoothing)?;
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatureConfig {
    pub leg_count: usize,
    /// Hip to foot, fully extended.
    pub leg_length: f32,
    /// Share of `leg_length` taken by the upper segment.
    pub upper_leg_ratio: f32,
    /// Hip of leg 0; odd legs mirror x.
    pub hip_offset: [f32; 3],
    /// Front-to-back distance over which leg pairs are spread.
    pub body_length: f32,
    /// Lateral distance of the foot targets from the body center.
    pub foot_spread: f32,
    /// Forward shift of the foot targets relative to their hips.
    pub foot_forward: f32,
    pub step_height: f32,
    /// Stride of the procedural gait.
    pub step_length: f32,
    pub step_speed: f32,
    pub step_duration: f32,
    pub step_trigger_distance: f32,
    pub body_target_height: f32,
    pub ray_height: f32,
    pub retarget: RetargetPolicy,
    pub gait: GaitModel,
    pub phase_gating: bool,
    pub force_step_factor: f32,
    pub smoothing: f32,
}

impl Default for CreatureConfig {
    fn default() -> Self {
        Self {
            leg_count: 2,
            leg_length: 2.0,
            upper_leg_ratio: 0.5,
            hip_offset: [0.5, -0.5, 0.0],
            body_length: 0.0,
            foot_spread: 1.4,
            foot_forward: 0.0,
            step_height: 0.5,
            step_length: 1.0,
            step_speed: 2.0,
            step_duration: 0.25,
            step_trigger_distance: 0.6,
            body_target_height: 1.2,
            ray_height: 1.0,
            retarget: RetargetPolicy::Hold,
            gait: GaitModel::Discrete,
            phase_gating: true,
            force_step_factor: 2.0,
            smoothing: 15.0,
        }
    }
}

impl CreatureConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.leg_count == 0 {
            return Err(ConfigError::NoLegs);
        }
        positive("leg_length", self.leg_length)?;
        if !(self.upper_leg_ratio > 0.0 && self.upper_leg_ratio < 1.0) {
            return Err(ConfigError::UpperRatio(self.upper_leg_ratio));
        }
        finite3("hip_offset", self.hip_offset)?;
        non_negative("body_length", self.body_length)?;
        non_negative("foot_spread", self.foot_spread)?;
        if !self.foot_forward.is_finite() {
            return Err(ConfigError::NonFinite { field: "foot_forward" });
        }
        non_negative("step_height", self.step_height)?;
        positive("step_duration", self.step_duration)?;
        non_negative("step_trigger_distance", self.step_trigger_distance)?;
        self.gait_settings().validate()
    }

    pub fn upper_length(&self) -> f32 {
        self.leg_length * self.upper_leg_ratio
    }

    pub fn lower_length(&self) -> f32 {
        self.leg_length * (1.0 - self.upper_leg_ratio)
    }

    pub fn gait_settings(&self) -> GaitSettings {
        GaitSettings {
            model: self.gait,
            step_speed: self.step_speed,
            phase_gating: self.phase_gating,
            force_step_factor: self.force_step_factor,
            ray_height: self.ray_height,
            body_target_height: self.body_target_height,
            stride_length: self.step_length,
            smoothing: self.smoothing,
        }
    }

    /// Expand into per-leg parameters.
    ///
    /// Legs alternate right/left (even indices on the right). Consecutive
    /// pairs are spread front to back over `body_length`, and phases are
    /// spaced evenly over the cycle.
    pub fn leg_configs(&self) -> Result<Vec<LegConfig>> {
        self.validate()?;
        let phases = phase_offsets(self.leg_count)?;
        let pairs = self.leg_count.div_ceil(2);
        let [hip_x, hip_y, hip_z] = self.hip_offset;

        phases
            .into_iter()
            .enumerate()
            .map(|(i, phase_offset)| {
                let side = Side::from_index(i);
                let pair = i / 2;
                let z = if pairs > 1 {
                    hip_z + self.body_length * (0.5 - pair as f32 / (pairs - 1) as f32)
                } else {
                    hip_z
                };
                let leg = LegConfig {
                    side,
                    upper_length: self.upper_length(),
                    lower_length: self.lower_length(),
                    hip_offset: [hip_x.abs() * side.sign(), hip_y, z],
                    foot_offset: [self.foot_spread * side.sign(), 0.0, z + self.foot_forward],
                    step_trigger_distance: self.step_trigger_distance,
                    step_height: self.step_height,
                    step_duration: self.step_duration,
                    phase_offset,
                    retarget: self.retarget,
                };
                leg.validate().map_err(|e| e.for_leg(i))?;
                Ok(leg)
            })
            .collect()
    }
}
