//! Procedural legs for walking creatures.
//!
//! A body moves however the host likes. Each tick the legs cast for footholds
//! under the body, step toward them along an arc when they fall too far
//! behind, and solve a two-bone IK chain from hip to foot. The host reads back
//! hip/knee/foot positions and draws whatever it wants.
//!
//! ```no_run
//! use legwork::{BodyPose, CreatureConfig, FlatGround, LegController};
//!
//! let config = CreatureConfig { leg_count: 4, ..Default::default() };
//! let hips = config.leg_configs().unwrap().iter().map(|l| l.hip_offset()).collect();
//! let mut body = BodyPose::new(nalgebra::Vector3::new(0.0, 1.7, 0.0), 0.0, hips);
//! let mut legs = LegController::new(&config, &body).unwrap();
//!
//! body.advance(0.05);
//! legs.update(&body, &FlatGround::new(0.0), 1.0 / 60.0);
//! ```

pub mod body;
pub mod config;
pub mod controller;
pub mod error;
pub mod gait;
pub mod ground;
pub mod ik;
pub mod leg;
pub mod math;
pub mod placement;
pub mod step;
pub mod visual;

pub use body::{BodyPose, BodyProvider, BodySnapshot};
pub use config::{CreatureConfig, GaitSettings, LegConfig};
pub use controller::LegController;
pub use error::{ConfigError, Result};
pub use gait::{GaitClock, GaitModel};
pub use ground::{FlatGround, GroundHit, GroundQuery, NoGround};
pub use ik::{IkSolution, Reach};
pub use leg::{Leg, Side};
pub use step::{RetargetPolicy, StepState};
pub use visual::{DebugMarker, DebugObserver, LegPose, SegmentTransform, VisualSink};
