//! Shared value types for the fieldscape workspace.
//!
//! Everything here is a plain `Copy` value. Nothing owns buffers or state.

mod types;

pub use types::{Rgb, Transform};
