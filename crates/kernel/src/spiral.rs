use std::f32::consts::TAU;

use glam::Vec3;

use crate::config::SpiralConfig;
use crate::error::KernelError;

/// Rotating spiral that places particle `i` of `n` at an even fraction
/// `i / n` along the arms.
///
/// Radius grows linearly with `i / n`, so distinct indices never coincide.
/// Height bobs independently per particle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpiralTrajectory {
    config: SpiralConfig,
}

impl SpiralTrajectory {
    pub fn new(config: SpiralConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SpiralConfig {
        &self.config
    }

    /// Position of particle `index` out of `count` at time `t`.
    ///
    /// Fails with [`KernelError::InvalidArgument`] unless `index < count`
    /// (which also rules out `count == 0`).
    pub fn position(&self, index: usize, count: usize, t: f32) -> Result<Vec3, KernelError> {
        let (angle, radius) = self.polar(index, count, t)?;
        Ok(Vec3::new(
            sanitize(angle.cos() * radius),
            self.y(index, t),
            sanitize(angle.sin() * radius),
        ))
    }

    pub fn x(&self, index: usize, count: usize, t: f32) -> Result<f32, KernelError> {
        let (angle, radius) = self.polar(index, count, t)?;
        Ok(sanitize(angle.cos() * radius))
    }

    /// Vertical position. Depends only on the index, so it needs no count.
    pub fn y(&self, index: usize, t: f32) -> f32 {
        let c = &self.config;
        let phase = c.bob_speed * t + index as f32 * c.bob_phase_step;
        sanitize(c.bob_amplitude * phase.sin())
    }

    pub fn z(&self, index: usize, count: usize, t: f32) -> Result<f32, KernelError> {
        let (angle, radius) = self.polar(index, count, t)?;
        Ok(sanitize(angle.sin() * radius))
    }

    fn polar(&self, index: usize, count: usize, t: f32) -> Result<(f32, f32), KernelError> {
        if index >= count {
            return Err(KernelError::InvalidArgument { index, count });
        }
        let c = &self.config;
        let fraction = index as f32 / count as f32;
        let angle = fraction * TAU * c.turns + c.angular_speed * t;
        let radius = fraction * c.max_radius;
        Ok((angle, radius))
    }
}

fn sanitize(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}
