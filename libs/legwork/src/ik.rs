//! Two-bone inverse kinematics.
//!
//! Given a hip, a desired foot and two fixed segment lengths, find the knee.
//! Targets out of reach are clamped rather than rejected, and targets closer
//! than the segments can fold to get an on-line approximation, so a solve
//! always returns finite positions.

use nalgebra::{Unit, Vector3};

use crate::leg::Side;
use crate::math::{clamp_cos, rotate_about_axis, AXIS_EPSILON};

/// How the target related to the leg's reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Reach {
    /// A real triangle exists; both segment lengths are exact.
    #[default]
    Solved,
    /// Target beyond full extension. The foot was pulled back to max reach.
    Stretched,
    /// Target closer than `|upper - lower|`. The knee sits on the hip->foot
    /// line; only the upper segment length is exact.
    Folded,
}

/// Orientation inputs that decide which way the knee bends.
///
/// The knee rises toward `body_up`, out of the plane through hip, foot and
/// up. For a foot out on its own side that already puts the knee outward on
/// both sides, since `cross(hip->foot, up)` mirrors with the foot. A leg
/// hanging straight along up has no such plane and swings its knee out
/// along `body_right` toward its `side`.
#[derive(Clone, Copy, Debug)]
pub struct BendHint {
    pub body_up: Unit<Vector3<f32>>,
    /// Used when hip->foot is parallel to `body_up`.
    pub body_right: Unit<Vector3<f32>>,
    pub side: Side,
}

impl BendHint {
    pub fn new(body_up: Unit<Vector3<f32>>, body_right: Unit<Vector3<f32>>, side: Side) -> Self {
        Self {
            body_up,
            body_right,
            side,
        }
    }

    /// Axis the hip->foot direction is rotated about to reach the knee.
    pub fn bend_axis(&self, hip_to_foot: &Vector3<f32>) -> Vector3<f32> {
        if let Some(axis) = Unit::try_new(hip_to_foot.cross(&*self.body_up), AXIS_EPSILON) {
            return axis.into_inner();
        }
        let outward = self.body_right.into_inner() * self.side.sign();
        Unit::try_new(hip_to_foot.cross(&outward), AXIS_EPSILON)
            .map(Unit::into_inner)
            .unwrap_or_else(|| self.body_right.into_inner())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IkSolution {
    pub knee: Vector3<f32>,
    /// Equal to the requested foot unless `reach` is [`Reach::Stretched`].
    pub foot: Vector3<f32>,
    pub reach: Reach,
}

pub fn solve(
    hip: &Vector3<f32>,
    foot: &Vector3<f32>,
    upper: f32,
    lower: f32,
    hint: &BendHint,
) -> IkSolution {
    let hip_to_foot = foot - hip;
    let distance = hip_to_foot.norm();
    let max_reach = upper + lower;

    // hip and foot coincide: no direction to work with, hang the knee down
    let direction = if distance > AXIS_EPSILON {
        hip_to_foot / distance
    } else {
        -hint.body_up.into_inner()
    };

    if distance > max_reach {
        return IkSolution {
            knee: hip + direction * upper,
            foot: hip + direction * max_reach,
            reach: Reach::Stretched,
        };
    }

    if distance < (upper - lower).abs() || distance <= AXIS_EPSILON {
        return IkSolution {
            knee: hip + direction * upper,
            foot: *foot,
            reach: Reach::Folded,
        };
    }

    // law of cosines, angle at the hip between hip->foot and hip->knee
    let cos_hip = (distance * distance + upper * upper - lower * lower) / (2.0 * distance * upper);
    let angle = clamp_cos(cos_hip).acos();

    let axis = hint.bend_axis(&hip_to_foot);
    let knee_offset = rotate_about_axis(&(direction * upper), &axis, angle)
        // axis degenerate on both paths: straight leg is still a valid triangle edge
        .unwrap_or(direction * upper);

    IkSolution {
        knee: hip + knee_offset,
        foot: *foot,
        reach: Reach::Solved,
    }
}
