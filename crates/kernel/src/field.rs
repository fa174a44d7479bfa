use fieldscape_common::Rgb;
use glam::Vec3;

use crate::color::ColorMap;
use crate::config::KernelConfig;
use crate::error::KernelError;
use crate::height::HeightField;
use crate::noise;
use crate::spiral::SpiralTrajectory;

/// The procedural field kernel.
///
/// Constructed once from a validated [`KernelConfig`] and passed by reference
/// into the frame loop. Every method is a pure function of its arguments and
/// the constants fixed at construction: no interior mutability, no
/// allocation, no I/O. The kernel is `Send + Sync`, so batches may be split
/// across threads freely.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FieldKernel {
    config: KernelConfig,
    height: HeightField,
    spiral: SpiralTrajectory,
    color: ColorMap,
}

impl FieldKernel {
    /// Validate `config` and build a kernel from it.
    pub fn new(config: KernelConfig) -> Result<Self, KernelError> {
        config.validate()?;
        tracing::debug!(
            amplitude = config.wave.amplitude,
            turns = config.spiral.turns,
            max_radius = config.spiral.max_radius,
            "field kernel constructed"
        );
        Ok(Self {
            config,
            height: HeightField::new(config.wave),
            spiral: SpiralTrajectory::new(config.spiral),
            color: ColorMap::new(config.color),
        })
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    /// Largest magnitude [`height`](Self::height) can return.
    pub fn height_envelope(&self) -> f32 {
        self.config.wave.envelope()
    }

    pub fn height(&self, x: f32, z: f32, t: f32) -> f32 {
        self.height.height(x, z, t)
    }

    pub fn fast_height(&self, x: f32, z: f32, t: f32) -> f32 {
        self.height.fast_height(x, z, t)
    }

    pub fn spiral_position(
        &self,
        index: usize,
        count: usize,
        t: f32,
    ) -> Result<Vec3, KernelError> {
        self.spiral.position(index, count, t)
    }

    pub fn spiral_x(&self, index: usize, count: usize, t: f32) -> Result<f32, KernelError> {
        self.spiral.x(index, count, t)
    }

    pub fn spiral_y(&self, index: usize, t: f32) -> f32 {
        self.spiral.y(index, t)
    }

    pub fn spiral_z(&self, index: usize, count: usize, t: f32) -> Result<f32, KernelError> {
        self.spiral.z(index, count, t)
    }

    pub fn color_r(&self, coord: f32) -> f32 {
        self.color.red(coord)
    }

    pub fn color_g(&self, coord: f32) -> f32 {
        self.color.green(coord)
    }

    pub fn color_b(&self, coord: f32) -> f32 {
        self.color.blue(coord)
    }

    pub fn color(&self, position: Vec3) -> Rgb {
        self.color.color(position)
    }

    pub fn value_noise(&self, x: f32, seed: f32) -> f32 {
        noise::value_noise(x, seed)
    }
}
