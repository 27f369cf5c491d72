//! Where each foot wants to be.
//!
//! Every tick a leg's fixed offset is swung around with the body's yaw, lifted
//! by a small bias and dropped onto the ground. If the ground can't be found
//! the last good target is kept.

use log::{debug, warn};
use nalgebra::Vector3;

use crate::body::BodySnapshot;
use crate::ground::GroundQuery;

/// Result of a planning pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub target: Vector3<f32>,
    /// False when the ground query missed and `target` is the held one.
    pub grounded: bool,
}

/// Per-leg planner state.
#[derive(Clone, Debug)]
pub struct FootPlanner {
    /// Body-local, horizontal offset from the body center to the foot target.
    pub foot_offset: Vector3<f32>,
    /// How far above the offset point the downward cast starts.
    pub ray_height: f32,
    target: Vector3<f32>,
    grounded: bool,
}

impl FootPlanner {
    pub fn new(foot_offset: Vector3<f32>, ray_height: f32, initial_target: Vector3<f32>) -> Self {
        Self {
            foot_offset,
            ray_height,
            target: initial_target,
            grounded: true,
        }
    }

    pub fn target(&self) -> Vector3<f32> {
        self.target
    }

    pub fn grounded(&self) -> bool {
        self.grounded
    }

    /// Point the downward cast starts from for this body pose.
    pub fn cast_origin(&self, body: &BodySnapshot) -> Vector3<f32> {
        body.yawed_offset(&self.foot_offset) + Vector3::y() * self.ray_height
    }

    pub fn compute_target<G: GroundQuery + ?Sized>(
        &mut self,
        leg_index: usize,
        body: &BodySnapshot,
        ground: &G,
    ) -> Placement {
        let origin = self.cast_origin(body);
        match ground.cast_down(&origin) {
            Some(hit) if hit.point.iter().all(|c| c.is_finite()) => {
                if !self.grounded {
                    debug!("leg {leg_index}: ground found again at {:?}", hit.point);
                }
                self.target = hit.point;
                self.grounded = true;
            }
            _ => {
                if self.grounded {
                    warn!("leg {leg_index}: no ground below {origin:?}, holding last target");
                }
                self.grounded = false;
            }
        }
        Placement {
            target: self.target,
            grounded: self.grounded,
        }
    }
}

/// A planted foot must step once it drifts more than `trigger_distance` from
/// its target.
pub fn needs_step(foot: &Vector3<f32>, target: &Vector3<f32>, trigger_distance: f32) -> bool {
    (target - foot).norm() > trigger_distance
}
