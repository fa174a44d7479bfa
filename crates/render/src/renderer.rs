use fieldscape_scene::Scene;
use glam::{Mat4, Vec3};

/// Camera placement used for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 5.0, 12.0),
            target: Vec3::ZERO,
            fov_degrees: 60.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl RenderView {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    /// Right-handed perspective with depth in `[0, 1]`.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

/// Renderer-agnostic interface.
///
/// A renderer reads the scene and a view and produces output. It never writes
/// to the scene.
pub trait Renderer {
    type Output;

    fn render(&self, scene: &Scene, view: &RenderView) -> Self::Output;
}

/// Plain-text renderer for terminals, logs and tests.
#[derive(Debug, Clone, Copy)]
pub struct DebugTextRenderer {
    /// How many particles to list individually.
    pub particle_lines: usize,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self { particle_lines: 5 }
    }

    pub fn with_particle_lines(particle_lines: usize) -> Self {
        Self { particle_lines }
    }
}

impl Default for DebugTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn on_off(visible: bool) -> &'static str {
    if visible { "on" } else { "off" }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, view: &RenderView) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Field Scene (frame={}, t={:.3}) ===\n",
            scene.frame(),
            scene.time()
        ));
        out.push_str(&format!(
            "Layers: terrain={} particles={} cube={}\n",
            on_off(scene.layers.terrain),
            on_off(scene.layers.particles),
            on_off(scene.layers.cube)
        ));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        ));

        let terrain = scene.terrain();
        let (lo, hi) = terrain.height_range();
        out.push_str(&format!(
            "Terrain: {} vertices, height [{:.3}, {:.3}]\n",
            terrain.vertex_count(),
            lo,
            hi
        ));

        let particles = scene.particles();
        out.push_str(&format!("Particles: {}\n", particles.len()));
        let listed = particles
            .positions()
            .iter()
            .zip(particles.colors())
            .enumerate()
            .take(self.particle_lines);
        for (i, (p, c)) in listed {
            out.push_str(&format!(
                "  [{:>4}] pos=({:.2}, {:.2}, {:.2}) rgb=({:.2}, {:.2}, {:.2})\n",
                i, p.x, p.y, p.z, c.r, c.g, c.b
            ));
        }
        if particles.len() > self.particle_lines {
            out.push_str(&format!(
                "  ... {} more\n",
                particles.len() - self.particle_lines
            ));
        }

        let cube = scene.cube();
        out.push_str(&format!(
            "Cube: rgb=({:.2}, {:.2}, {:.2})\n",
            cube.color.r, cube.color.g, cube.color.b
        ));

        tracing::trace!(bytes = out.len(), "debug text rendered");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldscape_kernel::FieldKernel;
    use fieldscape_scene::SceneConfig;

    fn scene() -> (FieldKernel, Scene) {
        let kernel = FieldKernel::default();
        let scene = Scene::new(&kernel, &SceneConfig::default()).unwrap();
        (kernel, scene)
    }

    #[test]
    fn renders_fresh_scene() {
        let (_, scene) = scene();
        let output = DebugTextRenderer::new().render(&scene, &RenderView::default());

        assert!(output.contains("frame=0"));
        assert!(output.contains("Terrain: 1681 vertices"));
        assert!(output.contains("Particles: 150"));
        assert!(output.contains("... 145 more"));
    }

    #[test]
    fn renders_updated_scene() {
        let (kernel, mut scene) = scene();
        scene.update(&kernel, 1.0).unwrap();
        let output = DebugTextRenderer::with_particle_lines(2).render(&scene, &RenderView::default());

        assert!(output.contains("frame=1"));
        assert!(output.contains("t=1.000"));
        assert!(output.contains("[   1] pos="));
        assert!(!output.contains("[   2] pos="));
        assert!(output.contains("Cube: rgb="));
    }

    #[test]
    fn reports_hidden_layers() {
        let (_, mut scene) = scene();
        scene.layers.particles = false;
        let output = DebugTextRenderer::new().render(&scene, &RenderView::default());
        assert!(output.contains("terrain=on particles=off cube=on"));
    }

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 60.0);
        assert_eq!(view.target, Vec3::ZERO);
        assert_eq!(view.eye, Vec3::new(0.0, 5.0, 12.0));
    }

    #[test]
    fn view_projection_centers_target() {
        let view = RenderView::default();
        let clip = view.view_projection(16.0 / 9.0) * view.target.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }
}
