//! The creature body as seen by the legs.
//!
//! Bodies are owned by the host. Once per tick the controller reads one into a
//! [`BodySnapshot`] and every leg works from that copy.

use nalgebra::{Unit, UnitQuaternion, Vector3};

use crate::math::{yaw_rotation, AXIS_EPSILON};

pub trait BodyProvider {
    fn position(&self) -> Vector3<f32>;
    fn yaw_degrees(&self) -> f32;
    fn up_vector(&self) -> Vector3<f32>;
    fn forward_vector(&self) -> Vector3<f32>;
    /// Hip attachment for `leg_index`, in body-local coordinates
    /// (x right, y up, z forward).
    fn hip_offset_for(&self, leg_index: usize) -> Vector3<f32>;
}

/// A plain body transform that also stores its hip layout.
#[derive(Clone, Debug)]
pub struct BodyPose {
    pub position: Vector3<f32>,
    pub yaw_degrees: f32,
    pub hip_offsets: Vec<Vector3<f32>>,
}

impl BodyPose {
    pub fn new(position: Vector3<f32>, yaw_degrees: f32, hip_offsets: Vec<Vector3<f32>>) -> Self {
        Self {
            position,
            yaw_degrees,
            hip_offsets,
        }
    }

    /// Move along the current heading.
    pub fn advance(&mut self, distance: f32) {
        self.position += self.forward_vector() * distance;
    }

    /// Turn about world up, wrapping into [0, 360).
    pub fn turn(&mut self, degrees: f32) {
        self.yaw_degrees = (self.yaw_degrees + degrees).rem_euclid(360.0);
    }
}

impl BodyProvider for BodyPose {
    fn position(&self) -> Vector3<f32> {
        self.position
    }

    fn yaw_degrees(&self) -> f32 {
        self.yaw_degrees
    }

    fn up_vector(&self) -> Vector3<f32> {
        Vector3::y()
    }

    fn forward_vector(&self) -> Vector3<f32> {
        yaw_rotation(self.yaw_degrees) * Vector3::z()
    }

    fn hip_offset_for(&self, leg_index: usize) -> Vector3<f32> {
        self.hip_offsets.get(leg_index).copied().unwrap_or_else(Vector3::zeros)
    }
}

/// Read-only view of the body for one tick.
#[derive(Clone, Debug)]
pub struct BodySnapshot {
    pub position: Vector3<f32>,
    pub yaw_degrees: f32,
    pub up: Unit<Vector3<f32>>,
    pub forward: Unit<Vector3<f32>>,
    pub right: Unit<Vector3<f32>>,
    pub orientation: UnitQuaternion<f32>,
    /// World-space hip positions, one per leg.
    pub hips: Vec<Vector3<f32>>,
}

impl BodySnapshot {
    pub fn capture<B: BodyProvider + ?Sized>(body: &B, leg_count: usize) -> Self {
        let position = body.position();
        let yaw_degrees = body.yaw_degrees();
        let up = Unit::try_new(body.up_vector(), AXIS_EPSILON).unwrap_or_else(Vector3::y_axis);
        let forward = Unit::try_new(body.forward_vector(), AXIS_EPSILON)
            .filter(|f| f.cross(&*up).norm() > AXIS_EPSILON)
            .unwrap_or_else(|| Unit::new_normalize(yaw_rotation(yaw_degrees) * Vector3::z()));

        // local +z -> forward, +y -> up
        let orientation = UnitQuaternion::face_towards(&*forward, &*up);
        let right = Unit::new_normalize(orientation * Vector3::x());

        let hips = (0..leg_count)
            .map(|i| position + orientation * body.hip_offset_for(i))
            .collect();

        Self {
            position,
            yaw_degrees,
            up,
            forward,
            right,
            orientation,
            hips,
        }
    }

    pub fn hip(&self, leg_index: usize) -> Vector3<f32> {
        self.hips.get(leg_index).copied().unwrap_or(self.position)
    }

    /// Rotate a body-local offset by yaw only and anchor it at the body.
    pub fn yawed_offset(&self, offset: &Vector3<f32>) -> Vector3<f32> {
        self.position + yaw_rotation(self.yaw_degrees) * offset
    }
}
