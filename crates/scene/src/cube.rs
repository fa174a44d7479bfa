use fieldscape_common::{Rgb, Transform};
use fieldscape_kernel::FieldKernel;
use glam::{EulerRot, Quat, Vec3};

/// A single spinning cube whose color cycles through the color map.
#[derive(Debug, Clone, Copy)]
pub struct ColorCube {
    pub transform: Transform,
    pub color: Rgb,
    /// Spin rate around x and y (radians per second).
    pub spin: (f32, f32),
}

impl ColorCube {
    pub fn new(position: Vec3, edge: f32) -> Self {
        Self {
            transform: Transform {
                position,
                rotation: Quat::IDENTITY,
                scale: Vec3::splat(edge),
            },
            color: Rgb::default(),
            spin: (0.5, 0.3),
        }
    }

    pub fn update(&mut self, kernel: &FieldKernel, t: f32) {
        self.transform.rotation =
            Quat::from_euler(EulerRot::XYZ, t * self.spin.0, t * self.spin.1, 0.0);
        let p = self.transform.position;
        self.color = Rgb::new(
            kernel.color_r(p.x + t),
            kernel.color_g(p.y + t),
            kernel.color_b(p.z + t),
        );
    }
}

impl Default for ColorCube {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 1.0, 0.0), 1.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cube_placement() {
        let cube = ColorCube::default();
        assert_eq!(cube.transform.position, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(cube.transform.scale, Vec3::splat(1.5));
    }

    #[test]
    fn color_follows_time_shifted_position() {
        let kernel = FieldKernel::default();
        let mut cube = ColorCube::default();
        cube.update(&kernel, 2.0);
        assert_eq!(cube.color.r, kernel.color_r(2.0));
        assert_eq!(cube.color.g, kernel.color_g(3.0));
        assert_eq!(cube.color.b, kernel.color_b(2.0));
    }

    #[test]
    fn rotation_at_time_zero_is_identity() {
        let kernel = FieldKernel::default();
        let mut cube = ColorCube::default();
        cube.update(&kernel, 0.0);
        assert!(cube.transform.rotation.abs_diff_eq(Quat::IDENTITY, 1e-6));
    }

    #[test]
    fn spins_over_time() {
        let kernel = FieldKernel::default();
        let mut cube = ColorCube::default();
        cube.update(&kernel, 1.0);
        let (x, y, _) = cube.transform.rotation.to_euler(EulerRot::XYZ);
        assert!((x - 0.5).abs() < 1e-4);
        assert!((y - 0.3).abs() < 1e-4);
    }
}
