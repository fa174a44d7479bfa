use std::f32::consts::FRAC_PI_2;

use fieldscape_render::RenderView;
use glam::{Mat4, Vec3};

/// Camera orbiting a target point.
///
/// Drag input is queued and bled into the orientation by `damping` each
/// frame, so motion eases out after the mouse stops.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub target: Vec3,
    /// Angle around +Y, zero looking down -Z.
    pub yaw: f32,
    /// Elevation above the XZ plane.
    pub pitch: f32,
    pub distance: f32,
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Fraction of queued rotation applied per frame.
    pub damping: f32,
    /// Radians per pixel of drag.
    pub rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pending_yaw: f32,
    pending_pitch: f32,
}

const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_view(&RenderView::default())
    }
}

impl OrbitCamera {
    /// Orbit camera matching a static view's eye and target.
    pub fn from_view(view: &RenderView) -> Self {
        let offset = view.eye - view.target;
        let distance = offset.length().max(1e-3);
        Self {
            target: view.target,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            fov_degrees: view.fov_degrees,
            aspect: 16.0 / 9.0,
            near: view.near,
            far: view.far,
            damping: 0.05,
            rotate_speed: 0.005,
            min_distance: 2.0,
            max_distance: 100.0,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + self.distance * Vec3::new(cp * sy, sp, cp * cy)
    }

    /// Queue rotation from a mouse drag in pixels.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.pending_yaw -= dx * self.rotate_speed;
        self.pending_pitch += dy * self.rotate_speed;
    }

    /// Zoom by scroll lines; positive moves closer.
    pub fn zoom(&mut self, lines: f32) {
        self.distance =
            (self.distance * 0.95_f32.powf(lines)).clamp(self.min_distance, self.max_distance);
    }

    /// Apply one frame of damped rotation.
    pub fn update(&mut self) {
        let damping = self.damping.clamp(0.0, 1.0);
        self.yaw += self.pending_yaw * damping;
        self.pitch = (self.pitch + self.pending_pitch * damping).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.pending_yaw *= 1.0 - damping;
        self.pending_pitch *= 1.0 - damping;
    }

    pub fn render_view(&self) -> RenderView {
        RenderView {
            eye: self.eye(),
            target: self.target,
            fov_degrees: self.fov_degrees,
            near: self.near,
            far: self.far,
        }
    }

    pub fn view_projection(&self) -> Mat4 {
        self.render_view().view_projection(self.aspect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_render_view() {
        let cam = OrbitCamera::default();
        assert!(cam.eye().distance(Vec3::new(0.0, 5.0, 12.0)) < 1e-4);
        assert!((cam.distance - 13.0).abs() < 1e-4);
        assert_eq!(cam.damping, 0.05);
        assert!(!cam.view_projection().col(0).x.is_nan());
    }

    #[test]
    fn drag_eases_in_over_frames() {
        let mut cam = OrbitCamera::default();
        cam.drag(-100.0, 0.0);
        cam.update();
        let first = cam.yaw;
        assert!(first > 0.0 && first < 0.5);
        for _ in 0..500 {
            cam.update();
        }
        assert!((cam.yaw - 0.5).abs() < 1e-3);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = OrbitCamera::default();
        cam.damping = 1.0;
        cam.drag(0.0, 10_000.0);
        cam.update();
        assert!(cam.pitch <= PITCH_LIMIT);
        assert!(cam.eye().y < cam.target.y + cam.distance);
    }

    #[test]
    fn zoom_is_clamped() {
        let mut cam = OrbitCamera::default();
        cam.zoom(1_000.0);
        assert_eq!(cam.distance, cam.min_distance);
        cam.zoom(-1_000.0);
        assert_eq!(cam.distance, cam.max_distance);
    }

    #[test]
    fn distance_is_preserved_by_rotation() {
        let mut cam = OrbitCamera::default();
        cam.damping = 1.0;
        cam.drag(37.0, -12.0);
        cam.update();
        assert!((cam.eye().distance(cam.target) - cam.distance).abs() < 1e-4);
    }
}
