//! Scene: the caller side of the field kernel.
//!
//! Owns the terrain mesh, particle cloud and color cube buffers, and writes
//! kernel output into them once per frame.
//!
//! # Invariants
//! - The kernel is borrowed per update, never stored.
//! - Buffer sizes are fixed at construction; updates reuse allocations.
//! - Hidden layers keep their last values.

mod clock;
mod cube;
mod error;
mod particles;
mod scene;
mod terrain;

pub use clock::{FrameClock, FrameTimer};
pub use cube::ColorCube;
pub use error::SceneError;
pub use particles::ParticleCloud;
pub use scene::{Scene, SceneConfig, SceneLayers, SceneSummary};
pub use terrain::TerrainMesh;

pub fn crate_info() -> &'static str {
    "fieldscape-scene v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}
