use fieldscape_common::Rgb;
use fieldscape_kernel::FieldKernel;
use glam::Vec3;

use crate::error::SceneError;

/// Fixed-size point cloud placed on the kernel's spiral.
///
/// Positions and colors are rewritten every frame; display sizes are
/// jittered once at construction from value noise.
#[derive(Debug, Clone)]
pub struct ParticleCloud {
    positions: Vec<Vec3>,
    colors: Vec<Rgb>,
    sizes: Vec<f32>,
}

impl ParticleCloud {
    /// `count` particles of nominal size `base_size`. Each particle's size is
    /// scaled into `[0.75, 1.25] · base_size` by value noise at `seed`.
    pub fn new(
        kernel: &FieldKernel,
        count: usize,
        base_size: f32,
        seed: f32,
    ) -> Result<Self, SceneError> {
        if count == 0 {
            return Err(SceneError::EmptyCloud);
        }
        if !(base_size.is_finite() && base_size > 0.0) {
            return Err(SceneError::InvalidParticleSize(base_size));
        }
        let sizes = (0..count)
            .map(|i| base_size * (0.75 + 0.5 * kernel.value_noise(i as f32 * 0.5, seed)))
            .collect();
        Ok(Self {
            positions: vec![Vec3::ZERO; count],
            colors: vec![Rgb::default(); count],
            sizes,
        })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Place every particle on the spiral at time `t` and color it from its
    /// new position.
    pub fn update(&mut self, kernel: &FieldKernel, t: f32) -> Result<(), SceneError> {
        let count = self.positions.len();
        for (i, (position, color)) in self
            .positions
            .iter_mut()
            .zip(self.colors.iter_mut())
            .enumerate()
        {
            *position = kernel.spiral_position(i, count, t)?;
            *color = kernel.color(*position);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cloud_rejected() {
        let kernel = FieldKernel::default();
        assert!(matches!(
            ParticleCloud::new(&kernel, 0, 0.12, 0.0),
            Err(SceneError::EmptyCloud)
        ));
        assert!(matches!(
            ParticleCloud::new(&kernel, 10, -1.0, 0.0),
            Err(SceneError::InvalidParticleSize(_))
        ));
    }

    #[test]
    fn update_follows_spiral_and_color_map() {
        let kernel = FieldKernel::default();
        let mut cloud = ParticleCloud::new(&kernel, 150, 0.12, 0.0).unwrap();
        cloud.update(&kernel, 2.25).unwrap();
        assert_eq!(cloud.len(), 150);
        for (i, (p, c)) in cloud.positions().iter().zip(cloud.colors()).enumerate() {
            assert_eq!(*p, kernel.spiral_position(i, 150, 2.25).unwrap());
            assert_eq!(*c, kernel.color(*p));
            assert!(c.is_normalized());
        }
    }

    #[test]
    fn sizes_are_jittered_within_bounds() {
        let kernel = FieldKernel::default();
        let cloud = ParticleCloud::new(&kernel, 64, 0.2, 3.0).unwrap();
        assert!(cloud.sizes().iter().all(|&s| (0.15..=0.25).contains(&s)));
        let first = cloud.sizes()[0];
        assert!(cloud.sizes().iter().any(|&s| (s - first).abs() > 1e-4));
    }

    #[test]
    fn single_particle_sits_on_axis() {
        let kernel = FieldKernel::default();
        let mut cloud = ParticleCloud::new(&kernel, 1, 0.1, 0.0).unwrap();
        cloud.update(&kernel, 4.0).unwrap();
        let p = cloud.positions()[0];
        assert_eq!((p.x, p.z), (0.0, 0.0));
    }
}
