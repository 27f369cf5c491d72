use legwork::ik::{self, BendHint};
use legwork::step::{arc_height, StepEvent, StepParams, Stepper};
use legwork::{
    gait, BodyPose, CreatureConfig, FlatGround, LegController, Reach, RetargetPolicy, Side, StepState,
};
use nalgebra::Vector3;
use proptest::prelude::*;

prop_compose! {
    fn arb_point()(
        x in -10.0f32..10.0,
        y in -10.0f32..10.0,
        z in -10.0f32..10.0
    ) -> Vector3<f32> {
        Vector3::new(x, y, z)
    }
}

prop_compose! {
    fn arb_direction()(
        theta in 0.0f32..std::f32::consts::PI,
        phi in 0.0f32..std::f32::consts::TAU
    ) -> Vector3<f32> {
        Vector3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin())
    }
}

prop_compose! {
    fn arb_segments()(
        upper in 0.2f32..3.0,
        lower in 0.2f32..3.0
    ) -> (f32, f32) {
        (upper, lower)
    }
}

fn arb_side() -> impl Strategy<Value = Side> {
    prop_oneof![Just(Side::Left), Just(Side::Right)]
}

fn hint(side: Side) -> BendHint {
    BendHint::new(Vector3::y_axis(), Vector3::x_axis(), side)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn test_reachable_targets_keep_segment_lengths(
        hip in arb_point(),
        dir in arb_direction(),
        (upper, lower) in arb_segments(),
        t in 0.0f32..1.0,
        side in arb_side()
    ) {
        let min = (upper - lower).abs() + 0.01;
        let max = upper + lower - 0.01;
        let distance = min + (max - min) * t;
        let foot = hip + dir * distance;

        let solution = ik::solve(&hip, &foot, upper, lower, &hint(side));
        prop_assert_eq!(solution.reach, Reach::Solved);
        prop_assert!(((solution.knee - hip).norm() - upper).abs() < 1e-4,
            "upper segment {} != {}", (solution.knee - hip).norm(), upper);
        prop_assert!(((foot - solution.knee).norm() - lower).abs() < 1e-4,
            "lower segment {} != {}", (foot - solution.knee).norm(), lower);
    }

    #[test]
    fn test_stretched_foot_lies_on_ray_at_full_reach(
        hip in arb_point(),
        dir in arb_direction(),
        (upper, lower) in arb_segments(),
        extra in 0.01f32..10.0
    ) {
        let foot = hip + dir * (upper + lower + extra);
        let solution = ik::solve(&hip, &foot, upper, lower, &hint(Side::Right));

        prop_assert_eq!(solution.reach, Reach::Stretched);
        let reached = solution.foot - hip;
        prop_assert!((reached.norm() - (upper + lower)).abs() < 1e-4);
        prop_assert!((reached.normalize().dot(&dir) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_arc_is_zero_at_ends_and_symmetric(
        height in 0.01f32..5.0,
        p in 0.0f32..0.49
    ) {
        prop_assert_eq!(arc_height(0.0, height), 0.0);
        prop_assert!(arc_height(1.0, height).abs() < 1e-5);

        let before = arc_height(0.5 - p, height);
        let after = arc_height(0.5 + p, height);
        prop_assert!(before > 0.0);
        prop_assert!((before - after).abs() < 1e-5 * height.max(1.0));
    }

    #[test]
    fn test_step_lands_exactly_on_target(
        duration in 0.05f32..2.0,
        dt in 0.001f32..0.1,
        target in arb_point()
    ) {
        prop_assume!(target.norm() > 0.7);
        let params = StepParams {
            trigger_distance: 0.6,
            height: 0.5,
            duration,
            retarget: RetargetPolicy::Hold,
        };
        let mut stepper = Stepper::new(params, Vector3::zeros()).unwrap();
        let up = Vector3::y();

        let first = stepper.update(&target, dt, &up);
        prop_assert!(matches!(first, StepEvent::Lifted | StepEvent::Skipped));

        let limit = (duration / dt).ceil() as usize + 2;
        let mut ticks = 1;
        while stepper.is_stepping() && ticks < limit {
            stepper.update(&target, dt, &up);
            ticks += 1;
        }
        prop_assert_eq!(stepper.state(), StepState::Planted);
        prop_assert_eq!(stepper.foot(), target);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_phase_offsets_are_distinct_and_even(n in 1usize..64) {
        let offsets = gait::phase_offsets(n).unwrap();
        prop_assert_eq!(offsets.len(), n);
        for (i, offset) in offsets.iter().enumerate() {
            let expected = std::f32::consts::TAU * i as f32 / n as f32;
            prop_assert!((offset - expected).abs() < 1e-4, "leg {} offset {} != {}", i, offset, expected);
        }
        for pair in offsets.windows(2) {
            prop_assert!(pair[1] > pair[0]);
        }
        prop_assert!(offsets[n - 1] < std::f32::consts::TAU);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_walking_body_never_produces_nan(
        leg_count in 1usize..9,
        speed in 0.0f32..4.0,
        turn in -90.0f32..90.0
    ) {
        let config = CreatureConfig { leg_count, body_length: 1.0, ..Default::default() };
        let hips = config.leg_configs().unwrap().iter().map(|l| l.hip_offset()).collect();
        let mut body = BodyPose::new(Vector3::new(0.0, 1.7, 0.0), 0.0, hips);
        let mut controller = LegController::new(&config, &body).unwrap();
        let ground = FlatGround::new(0.0);
        let dt = 1.0 / 60.0;

        for _ in 0..240 {
            body.advance(speed * dt);
            body.turn(turn * dt);
            controller.update(&body, &ground, dt);
            for leg in controller.legs() {
                let pose = leg.pose();
                prop_assert!(pose.is_finite());
                prop_assert!((pose.foot - pose.hip).norm() <= leg.config().max_reach() + 1e-4);
            }
        }
    }
}
