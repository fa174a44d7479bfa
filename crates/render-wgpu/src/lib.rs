//! wgpu render backend for fieldscape scenes.
//!
//! Draws a grid floor, the terrain as a wireframe, and the particles and
//! color cube as lit instanced cubes. The camera orbits a target with
//! damped mouse controls.
//!
//! # Invariants
//! - The renderer only reads the scene.
//! - Camera motion lives outside the kernel and never feeds back into it.
//! - Scene time is driven by the app's clock, not by the frame rate.

mod camera;
mod gpu;
mod shaders;

pub use camera::OrbitCamera;
pub use gpu::WgpuRenderer;
