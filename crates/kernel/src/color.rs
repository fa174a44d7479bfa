use fieldscape_common::Rgb;
use glam::Vec3;

use crate::config::{ChannelCurve, ColorConfig};

/// Maps arbitrary scalars to channel intensities in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ColorMap {
    config: ColorConfig,
}

impl ColorMap {
    pub fn new(config: ColorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ColorConfig {
        &self.config
    }

    pub fn red(&self, coord: f32) -> f32 {
        channel(&self.config.red, coord)
    }

    pub fn green(&self, coord: f32) -> f32 {
        channel(&self.config.green, coord)
    }

    pub fn blue(&self, coord: f32) -> f32 {
        channel(&self.config.blue, coord)
    }

    /// Red from x, green from y, blue from z.
    pub fn color(&self, position: Vec3) -> Rgb {
        Rgb::new(
            self.red(position.x),
            self.green(position.y),
            self.blue(position.z),
        )
    }
}

fn channel(curve: &ChannelCurve, coord: f32) -> f32 {
    let v = ((curve.frequency * coord + curve.phase).sin() + 1.0) * 0.5;
    if v.is_nan() { 0.5 } else { v.clamp(0.0, 1.0) }
}
