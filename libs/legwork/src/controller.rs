//! Many legs against one body.
//!
//! [`LegController`] owns the legs and the shared gait clock. Each tick it
//! captures the body once, advances the clock once, and runs every leg against
//! that same snapshot, so the legs never observe each other mid-update.

use log::info;

use crate::body::{BodyProvider, BodySnapshot};
use crate::config::{CreatureConfig, GaitSettings, LegConfig};
use crate::error::{ConfigError, Result};
use crate::gait::GaitClock;
use crate::ground::GroundQuery;
use crate::ik::Reach;
use crate::leg::Leg;
use crate::visual::{DebugMarker, DebugObserver, LegPose, VisualSink};

pub struct LegController {
    legs: Vec<Leg>,
    clock: GaitClock,
    settings: GaitSettings,
}

impl LegController {
    pub fn new<B: BodyProvider + ?Sized>(config: &CreatureConfig, body: &B) -> Result<Self> {
        let legs = config.leg_configs()?;
        Self::from_legs(legs, config.gait_settings(), body)
    }

    /// Build from hand-made leg parameters.
    pub fn from_legs<B: BodyProvider + ?Sized>(
        configs: Vec<LegConfig>,
        settings: GaitSettings,
        body: &B,
    ) -> Result<Self> {
        if configs.is_empty() {
            return Err(ConfigError::NoLegs);
        }
        settings.validate()?;
        for (i, leg) in configs.iter().enumerate() {
            leg.validate().map_err(|e| e.for_leg(i))?;
        }

        let snapshot = BodySnapshot::capture(body, configs.len());
        let legs: Vec<Leg> = configs
            .into_iter()
            .enumerate()
            .map(|(i, config)| Leg::new(i, config, &snapshot, &settings))
            .collect::<Result<_>>()?;

        info!(
            "leg controller ready: {} legs, {:?} gait, step speed {}",
            legs.len(),
            settings.model,
            settings.step_speed
        );

        Ok(Self {
            legs,
            clock: GaitClock::new(settings.step_speed),
            settings,
        })
    }

    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    pub fn leg(&self, index: usize) -> Option<&Leg> {
        self.legs.get(index)
    }

    pub fn clock(&self) -> &GaitClock {
        &self.clock
    }

    pub fn settings(&self) -> &GaitSettings {
        &self.settings
    }

    pub fn poses(&self) -> Vec<LegPose> {
        self.legs.iter().map(Leg::pose).collect()
    }

    /// Legs currently in the air.
    pub fn stepping_count(&self) -> usize {
        self.legs.iter().filter(|l| l.is_stepping()).count()
    }

    /// Legs whose last solve had to clamp the foot.
    pub fn stretched_count(&self) -> usize {
        self.legs.iter().filter(|l| l.reach() == Reach::Stretched).count()
    }

    fn begin_tick<B: BodyProvider + ?Sized>(&mut self, body: &B, dt: f32) -> BodySnapshot {
        self.clock.advance(dt);
        BodySnapshot::capture(body, self.legs.len())
    }

    /// One simulation tick.
    pub fn update<B, G>(&mut self, body: &B, ground: &G, dt: f32)
    where
        B: BodyProvider + ?Sized,
        G: GroundQuery + ?Sized,
    {
        let snapshot = self.begin_tick(body, dt);
        let clock = self.clock;
        let settings = self.settings;
        for leg in &mut self.legs {
            leg.update(&snapshot, ground, &clock, dt, &settings);
        }
    }

    /// [`update`](Self::update), then hand every pose to `sink`.
    pub fn update_with<B, G, S>(&mut self, body: &B, ground: &G, dt: f32, sink: &mut S)
    where
        B: BodyProvider + ?Sized,
        G: GroundQuery + ?Sized,
        S: VisualSink + ?Sized,
    {
        self.update(body, ground, dt);
        for leg in &self.legs {
            sink.apply(leg.index(), &leg.pose());
        }
    }

    /// [`update`](Self::update) with legs spread across the rayon pool.
    #[cfg(feature = "parallel")]
    pub fn update_parallel<B, G>(&mut self, body: &B, ground: &G, dt: f32)
    where
        B: BodyProvider + ?Sized,
        G: GroundQuery + Sync + ?Sized,
    {
        use rayon::prelude::*;

        let snapshot = self.begin_tick(body, dt);
        let clock = self.clock;
        let settings = self.settings;
        self.legs.par_iter_mut().for_each(|leg| {
            leg.update(&snapshot, ground, &clock, dt, &settings);
        });
    }

    /// Emit debug markers and segment lines for the current state.
    pub fn observe<O: DebugObserver + ?Sized>(&self, observer: &mut O) {
        for leg in &self.legs {
            let i = leg.index();
            observer.marker(i, DebugMarker::Target, &leg.target());
            observer.marker(i, DebugMarker::Foot, &leg.foot());
            observer.marker(i, DebugMarker::Knee, &leg.knee());
            observer.marker(i, DebugMarker::Hip, &leg.hip());
            observer.line(i, &leg.hip(), &leg.knee());
            observer.line(i, &leg.knee(), &leg.foot());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    use crate::body::BodyPose;
    use crate::gait::GaitModel;
    use crate::ground::FlatGround;
    use nalgebra::Vector3;

    fn creature(config: &CreatureConfig) -> (BodyPose, LegController) {
        let legs = config.leg_configs().unwrap();
        let hips = legs.iter().map(|l| l.hip_offset()).collect();
        let body = BodyPose::new(Vector3::new(0.0, 1.7, 0.0), 0.0, hips);
        let controller = LegController::new(config, &body).unwrap();
        (body, controller)
    }

    #[derive(Default)]
    struct Counter {
        markers: usize,
        lines: usize,
    }

    impl DebugObserver for Counter {
        fn marker(&mut self, _: usize, _: DebugMarker, _: &Vector3<f32>) {
            self.markers += 1;
        }
        fn line(&mut self, _: usize, _: &Vector3<f32>, _: &Vector3<f32>) {
            self.lines += 1;
        }
    }

    #[test]
    fn test_new_rejects_empty_leg_list() {
        let body = BodyPose::new(Vector3::zeros(), 0.0, Vec::new());
        let settings = CreatureConfig::default().gait_settings();
        assert!(matches!(
            LegController::from_legs(Vec::new(), settings, &body),
            Err(ConfigError::NoLegs)
        ));
    }

    #[test]
    fn test_from_legs_reports_bad_leg() {
        let body = BodyPose::new(Vector3::zeros(), 0.0, Vec::new());
        let settings = CreatureConfig::default().gait_settings();
        let bad = LegConfig {
            upper_length: 0.0,
            ..Default::default()
        };
        let err = LegController::from_legs(vec![LegConfig::default(), bad], settings, &body)
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::Leg { index: 1, .. }));
    }

    #[test]
    fn test_from_legs_rejects_bad_gait_settings() {
        let config = CreatureConfig {
            gait: GaitModel::Procedural,
            ..Default::default()
        };
        let body = BodyPose::new(Vector3::new(0.0, 1.7, 0.0), 0.0, Vec::new());
        let settings = GaitSettings {
            smoothing: f32::NAN,
            ..config.gait_settings()
        };
        let legs = config.leg_configs().unwrap();
        assert!(matches!(
            LegController::from_legs(legs, settings, &body),
            Err(ConfigError::NonFinite { field: "smoothing" })
        ));
    }

    #[test]
    fn test_drifted_legs_lift_within_half_a_cycle() {
        let (body, mut controller) = creature(&CreatureConfig::default());
        let ground = FlatGround::new(0.0);
        let dt = 1.0 / 60.0;
        controller.update(&body, &ground, dt);

        // feet start under the hips, targets sit 0.9 further out; leg 1 is
        // past the trigger but short of a forced step, and out of phase
        let waiting = &controller.legs()[1];
        let drift = (waiting.foot() - waiting.target()).norm();
        let trigger = waiting.config().step_trigger_distance;
        assert!(drift > trigger);
        assert!(drift < controller.settings().force_step_factor * trigger);
        assert!(!waiting.is_stepping());

        let half_cycle = PI / controller.settings().step_speed;
        let ticks = (half_cycle / dt).ceil() as usize + 2;
        let mut lifted = vec![false; controller.legs().len()];
        for _ in 0..ticks {
            controller.update(&body, &ground, dt);
            for (seen, leg) in lifted.iter_mut().zip(controller.legs()) {
                *seen |= leg.is_stepping();
            }
        }
        assert_eq!(lifted, vec![true, true]);
    }

    #[test]
    fn test_clock_advances_once_per_tick() {
        let config = CreatureConfig {
            leg_count: 6,
            ..Default::default()
        };
        let (body, mut controller) = creature(&config);
        controller.update(&body, &FlatGround::new(0.0), 0.5);
        assert_eq!(controller.clock().elapsed(), 0.5);
    }

    #[test]
    fn test_sink_sees_every_leg() {
        let config = CreatureConfig {
            leg_count: 4,
            ..Default::default()
        };
        let (body, mut controller) = creature(&config);
        let mut poses: Vec<LegPose> = Vec::new();
        controller.update_with(&body, &FlatGround::new(0.0), 1.0 / 60.0, &mut poses);
        assert_eq!(poses.len(), 4);
        assert_eq!(poses, controller.poses());
    }

    #[test]
    fn test_observer_gets_four_markers_and_two_lines_per_leg() {
        let (_, controller) = creature(&CreatureConfig::default());
        let mut counter = Counter::default();
        controller.observe(&mut counter);
        assert_eq!(counter.markers, 8);
        assert_eq!(counter.lines, 4);
    }

    #[test]
    fn test_walking_keeps_feet_in_reach() {
        let config = CreatureConfig {
            leg_count: 4,
            body_length: 1.5,
            ..Default::default()
        };
        let (mut body, mut controller) = creature(&config);
        let ground = FlatGround::new(0.0);
        let dt = 1.0 / 60.0;
        let mut stepped = false;
        for tick in 0..600 {
            body.advance(1.5 * dt);
            if tick % 120 == 0 {
                body.turn(15.0);
            }
            controller.update(&body, &ground, dt);
            stepped |= controller.stepping_count() > 0;
            for leg in controller.legs() {
                let pose = leg.pose();
                assert!(pose.is_finite());
                assert!((pose.foot - pose.hip).norm() <= leg.config().max_reach() + 1e-4);
            }
        }
        assert!(stepped);
    }
}
