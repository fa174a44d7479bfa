use std::time::Instant;

use fieldscape_common::Rgb;
use fieldscape_kernel::FieldKernel;
use serde::{Deserialize, Serialize};

use crate::clock::FrameTimer;
use crate::cube::ColorCube;
use crate::error::SceneError;
use crate::particles::ParticleCloud;
use crate::terrain::TerrainMesh;

/// Scene construction parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub terrain_size: f32,
    pub terrain_segments: u32,
    pub terrain_base_y: f32,
    pub particle_count: usize,
    pub particle_size: f32,
    pub particle_seed: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            terrain_size: 20.0,
            terrain_segments: 40,
            terrain_base_y: -2.0,
            particle_count: 150,
            particle_size: 0.12,
            particle_seed: 0.0,
        }
    }
}

/// Which visuals are shown. Hidden layers are not updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneLayers {
    pub terrain: bool,
    pub particles: bool,
    pub cube: bool,
}

impl Default for SceneLayers {
    fn default() -> Self {
        Self {
            terrain: true,
            particles: true,
            cube: true,
        }
    }
}

/// Snapshot of the scene after an update, for logs and text output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSummary {
    pub frame: u64,
    pub time: f32,
    pub layers: SceneLayers,
    pub terrain_vertices: usize,
    pub height_min: f32,
    pub height_max: f32,
    pub particle_count: usize,
    pub cube_color: Rgb,
    pub update_micros: u128,
}

/// Caller-side owner of every buffer the kernel drives.
///
/// The kernel itself is passed in on each update; the scene never keeps a
/// reference to it.
#[derive(Debug, Clone)]
pub struct Scene {
    pub layers: SceneLayers,
    terrain: TerrainMesh,
    particles: ParticleCloud,
    cube: ColorCube,
    timer: FrameTimer,
    frame: u64,
    time: f32,
}

impl Scene {
    pub fn new(kernel: &FieldKernel, config: &SceneConfig) -> Result<Self, SceneError> {
        let terrain = TerrainMesh::plane(
            config.terrain_size,
            config.terrain_segments,
            config.terrain_base_y,
        )?;
        let particles = ParticleCloud::new(
            kernel,
            config.particle_count,
            config.particle_size,
            config.particle_seed,
        )?;
        tracing::debug!(
            vertices = terrain.vertex_count(),
            particles = particles.len(),
            "scene built"
        );
        Ok(Self {
            layers: SceneLayers::default(),
            terrain,
            particles,
            cube: ColorCube::default(),
            timer: FrameTimer::new(120),
            frame: 0,
            time: 0.0,
        })
    }

    pub fn terrain(&self) -> &TerrainMesh {
        &self.terrain
    }

    pub fn particles(&self) -> &ParticleCloud {
        &self.particles
    }

    pub fn cube(&self) -> &ColorCube {
        &self.cube
    }

    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    /// Frames updated so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Time passed to the most recent update.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Apply the kernel at time `t` to every visible layer.
    pub fn update(&mut self, kernel: &FieldKernel, t: f32) -> Result<(), SceneError> {
        let _span = tracing::info_span!("scene_update", frame = self.frame, t).entered();
        let start = Instant::now();

        if t < self.time {
            tracing::warn!(previous = self.time, t, "scene time moved backwards");
        }

        if self.layers.terrain {
            self.terrain.update(kernel, t);
        }
        if self.layers.particles {
            self.particles.update(kernel, t)?;
        }
        if self.layers.cube {
            self.cube.update(kernel, t);
        }

        self.time = t;
        self.frame += 1;
        self.timer.record(start.elapsed());

        tracing::trace!(
            terrain = self.layers.terrain,
            particles = self.layers.particles,
            cube = self.layers.cube,
            "scene update complete"
        );
        Ok(())
    }

    pub fn summary(&self) -> SceneSummary {
        let (height_min, height_max) = self.terrain.height_range();
        SceneSummary {
            frame: self.frame,
            time: self.time,
            layers: self.layers,
            terrain_vertices: self.terrain.vertex_count(),
            height_min,
            height_max,
            particle_count: self.particles.len(),
            cube_color: self.cube.color,
            update_micros: self.timer.last().map(|d| d.as_micros()).unwrap_or(0),
        }
    }
}
