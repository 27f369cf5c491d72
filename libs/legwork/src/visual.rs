//! Outputs for whoever draws the legs.
//!
//! The core only produces joint positions. [`SegmentTransform`] turns a pair
//! of joints into the center/direction/length a capsule or line renderer
//! wants, and [`DebugObserver`] receives gizmo-style markers on request.

use nalgebra::{Unit, Vector3};

use crate::math::midpoint;

/// Segments shorter than this are not worth drawing.
pub const MIN_SEGMENT_LENGTH: f32 = 0.01;

/// Joint positions of one leg after a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegPose {
    pub hip: Vector3<f32>,
    pub knee: Vector3<f32>,
    pub foot: Vector3<f32>,
}

impl LegPose {
    pub fn upper_segment(&self) -> Option<SegmentTransform> {
        SegmentTransform::between(&self.hip, &self.knee)
    }

    pub fn lower_segment(&self) -> Option<SegmentTransform> {
        SegmentTransform::between(&self.knee, &self.foot)
    }

    pub fn is_finite(&self) -> bool {
        [self.hip, self.knee, self.foot]
            .iter()
            .all(|v| v.iter().all(|c| c.is_finite()))
    }
}

/// Placement of a segment primitive: centered between its joints, its long
/// axis along `direction`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentTransform {
    pub center: Vector3<f32>,
    pub direction: Unit<Vector3<f32>>,
    pub length: f32,
}

impl SegmentTransform {
    pub fn between(from: &Vector3<f32>, to: &Vector3<f32>) -> Option<Self> {
        let span = to - from;
        let length = span.norm();
        if length <= MIN_SEGMENT_LENGTH {
            return None;
        }
        Some(Self {
            center: midpoint(from, to),
            direction: Unit::new_unchecked(span / length),
            length,
        })
    }
}

/// Receives every leg's pose once per tick, after solving.
pub trait VisualSink {
    fn apply(&mut self, leg_index: usize, pose: &LegPose);
}

impl<F> VisualSink for F
where
    F: FnMut(usize, &LegPose),
{
    fn apply(&mut self, leg_index: usize, pose: &LegPose) {
        self(leg_index, pose)
    }
}

/// Collects poses, indexed by leg.
impl VisualSink for Vec<LegPose> {
    fn apply(&mut self, leg_index: usize, pose: &LegPose) {
        if leg_index >= self.len() {
            self.resize(leg_index + 1, *pose);
        }
        self[leg_index] = *pose;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugMarker {
    Target,
    Foot,
    Knee,
    Hip,
}

impl DebugMarker {
    pub fn color(self) -> [f32; 3] {
        match self {
            DebugMarker::Target => [1.0, 0.92, 0.016],
            DebugMarker::Foot => [0.0, 1.0, 1.0],
            DebugMarker::Knee => [1.0, 0.0, 0.0],
            DebugMarker::Hip => [0.0, 1.0, 0.0],
        }
    }

    pub fn radius(self) -> f32 {
        match self {
            DebugMarker::Target | DebugMarker::Foot => 0.1,
            DebugMarker::Knee | DebugMarker::Hip => 0.08,
        }
    }
}

/// Read-only debug drawing hook. Both methods default to doing nothing.
pub trait DebugObserver {
    fn marker(&mut self, _leg_index: usize, _kind: DebugMarker, _position: &Vector3<f32>) {}
    fn line(&mut self, _leg_index: usize, _from: &Vector3<f32>, _to: &Vector3<f32>) {}
}
