//! Small geometry helpers shared by the solver, planner and stepper.

use nalgebra::{Unit, UnitQuaternion, Vector3};

/// Axes shorter than this are treated as degenerate.
pub const AXIS_EPSILON: f32 = 1e-6;

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub fn lerp_vec(a: &Vector3<f32>, b: &Vector3<f32>, t: f32) -> Vector3<f32> {
    a + (b - a) * t
}

/// Hermite ease `3t² - 2t³`, input clamped to [0, 1].
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Clamp a cosine before `acos` so float drift can't produce NaN.
#[inline]
pub fn clamp_cos(x: f32) -> f32 {
    x.clamp(-1.0, 1.0)
}

pub fn midpoint(a: &Vector3<f32>, b: &Vector3<f32>) -> Vector3<f32> {
    (a + b) * 0.5
}

pub fn distance(a: &Vector3<f32>, b: &Vector3<f32>) -> f32 {
    (b - a).norm()
}

/// Height of an isosceles triangle: `h = sqrt(a² - b²/4)`.
///
/// `side` is the length of the two equal sides, `base` the third side. A base
/// longer than `2 * side` has no triangle and yields zero.
pub fn isosceles_height(side: f32, base: f32) -> f32 {
    (side * side - base * base / 4.0).max(0.0).sqrt()
}

/// Knee for two equal segments: raise the hip/foot midpoint along `up` by the
/// isosceles height.
pub fn isosceles_knee(
    hip: &Vector3<f32>,
    foot: &Vector3<f32>,
    segment_length: f32,
    up: &Vector3<f32>,
) -> Vector3<f32> {
    let base = distance(hip, foot);
    midpoint(hip, foot) + up * isosceles_height(segment_length, base)
}

/// Rotate `v` by `angle` radians about `axis` (right-handed).
///
/// Returns `None` when `axis` is too short to define a rotation.
pub fn rotate_about_axis(v: &Vector3<f32>, axis: &Vector3<f32>, angle: f32) -> Option<Vector3<f32>> {
    let axis = Unit::try_new(*axis, AXIS_EPSILON)?;
    Some(UnitQuaternion::from_axis_angle(&axis, angle) * v)
}

/// Rotation about world up (+Y) by `yaw_degrees`.
pub fn yaw_rotation(yaw_degrees: f32) -> UnitQuaternion<f32> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), yaw_degrees.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_midpoint_and_distance() {
        let a = Vector3::new(0.0, 0.0, 0.0);
        let b = Vector3::new(2.0, 4.0, -6.0);
        assert_eq!(midpoint(&a, &b), Vector3::new(1.0, 2.0, -3.0));
        assert!((distance(&a, &b) - 56.0f32.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_isosceles_height() {
        // 3-4-5 triangle mirrored: sides 5, base 6 -> height 4
        assert!((isosceles_height(5.0, 6.0) - 4.0).abs() < EPS);
        assert_eq!(isosceles_height(1.0, 3.0), 0.0);
    }

    #[test]
    fn test_isosceles_knee_sits_above_midpoint() {
        let hip = Vector3::new(0.0, 0.0, 0.0);
        let foot = Vector3::new(1.5, 0.0, 0.0);
        let knee = isosceles_knee(&hip, &foot, 1.0, &Vector3::y());
        assert!((knee.x - 0.75).abs() < EPS);
        assert!((knee.y - (1.0f32 - 0.5625).sqrt()).abs() < EPS);
        assert!((distance(&hip, &knee) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_rotate_about_axis() {
        let v = Vector3::x();
        let r = rotate_about_axis(&v, &Vector3::z(), std::f32::consts::FRAC_PI_2).unwrap();
        assert!((r - Vector3::y()).norm() < EPS);
        assert!(rotate_about_axis(&v, &Vector3::zeros(), 1.0).is_none());
    }

    #[test]
    fn test_yaw_rotation_turns_forward_to_right() {
        let r = yaw_rotation(90.0) * Vector3::z();
        assert!((r - Vector3::x()).norm() < EPS);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 0.25), 3.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        let v = lerp_vec(&Vector3::zeros(), &Vector3::new(4.0, -8.0, 2.0), 0.5);
        assert_eq!(v, Vector3::new(2.0, -4.0, 1.0));
    }

    #[test]
    fn test_smoothstep_endpoints() {
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(1.0), 1.0);
        assert_eq!(smoothstep(0.5), 0.5);
        assert_eq!(smoothstep(-3.0), 0.0);
        assert_eq!(smoothstep(7.0), 1.0);
        assert!(smoothstep(0.25) < 0.25);
    }

    #[test]
    fn test_clamp_cos() {
        assert_eq!(clamp_cos(1.0000001), 1.0);
        assert_eq!(clamp_cos(-2.0), -1.0);
        assert!(clamp_cos(1.0000001).acos().is_finite());
    }
}
