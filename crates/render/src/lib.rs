//! Rendering adapter: a renderer-agnostic view of a [`Scene`].
//!
//! # Invariants
//! - Renderers borrow the scene immutably; kernel output is only written by
//!   `Scene::update`.
//! - What is drawn depends only on the scene and the view.
//!
//! [`Scene`]: fieldscape_scene::Scene

mod renderer;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "fieldscape-render v0.1.0"
}
