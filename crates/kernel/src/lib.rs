//! Field Kernel: deterministic height, spiral and color functions that drive
//! the animated scene.
//!
//! # Invariants
//! - Every function is pure: same inputs and config, same output bits.
//! - Outputs are finite for all finite inputs; color channels stay in `[0, 1]`.
//! - The only failing call is the spiral with `index >= count`.

pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod height;
pub mod noise;
pub mod spiral;

pub use color::ColorMap;
pub use config::{ChannelCurve, ColorConfig, KernelConfig, SpiralConfig, WaveConfig, WaveTerm};
pub use error::{ConfigError, KernelError};
pub use field::FieldKernel;
pub use height::HeightField;
pub use noise::value_noise;
pub use spiral::SpiralTrajectory;
