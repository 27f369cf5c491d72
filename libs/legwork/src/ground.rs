//! Ground height queries.
//!
//! The core never owns terrain. Hosts plug in whatever they have (a physics
//! raycast, a height field, a flat plane) through [`GroundQuery`].

use nalgebra::Vector3;

/// Result of a single downward cast.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundHit {
    pub point: Vector3<f32>,
    /// Distance travelled from the cast origin to `point`.
    pub distance: f32,
}

pub trait GroundQuery {
    /// Cast straight down (-Y) from `origin`. `None` means no ground was found.
    fn cast_down(&self, origin: &Vector3<f32>) -> Option<GroundHit>;
}

impl<F> GroundQuery for F
where
    F: Fn(&Vector3<f32>) -> Option<GroundHit>,
{
    fn cast_down(&self, origin: &Vector3<f32>) -> Option<GroundHit> {
        self(origin)
    }
}

/// Infinite horizontal plane at `height`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatGround {
    pub height: f32,
}

impl FlatGround {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl GroundQuery for FlatGround {
    fn cast_down(&self, origin: &Vector3<f32>) -> Option<GroundHit> {
        let distance = origin.y - self.height;
        if distance < 0.0 {
            // origin is below the plane, the cast can't see it
            return None;
        }
        Some(GroundHit {
            point: Vector3::new(origin.x, self.height, origin.z),
            distance,
        })
    }
}

/// Ground that is never found.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoGround;

impl GroundQuery for NoGround {
    fn cast_down(&self, _origin: &Vector3<f32>) -> Option<GroundHit> {
        None
    }
}
