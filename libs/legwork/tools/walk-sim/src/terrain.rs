use legwork::{GroundHit, GroundQuery};
use nalgebra::Vector3;
use noise::{NoiseFn, Perlin};

/// Rolling hills from 2D Perlin noise.
pub struct Terrain {
    perlin: Perlin,
    /// Peak-to-valley height is roughly twice this.
    pub amplitude: f32,
    /// World units per noise period.
    pub scale: f32,
}

impl Terrain {
    pub fn new(seed: u32, amplitude: f32, scale: f32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            amplitude,
            scale,
        }
    }

    pub fn height(&self, x: f32, z: f32) -> f32 {
        if self.scale <= 0.0 {
            return 0.0;
        }
        let sample = self
            .perlin
            .get([(x / self.scale) as f64, (z / self.scale) as f64]);
        sample as f32 * self.amplitude
    }
}

impl GroundQuery for Terrain {
    fn cast_down(&self, origin: &Vector3<f32>) -> Option<GroundHit> {
        let height = self.height(origin.x, origin.z);
        let distance = origin.y - height;
        if distance < 0.0 {
            return None;
        }
        Some(GroundHit {
            point: Vector3::new(origin.x, height, origin.z),
            distance,
        })
    }
}
