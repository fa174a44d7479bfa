use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A color with each channel normalized to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color from arbitrary channel values, clamping each into `[0, 1]`.
    /// NaN channels become 0.5.
    pub fn clamped(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: clamp_unit(r),
            g: clamp_unit(g),
            b: clamp_unit(b),
        }
    }

    /// Parse a `#rrggbb` hex string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .ok()
                .map(|v| v as f32 / 255.0)
        };
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// RGBA with full opacity, the layout GPU instance data expects.
    pub fn to_rgba(self) -> [f32; 4] {
        [self.r, self.g, self.b, 1.0]
    }

    pub fn is_normalized(&self) -> bool {
        [self.r, self.g, self.b]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::WHITE
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.5 } else { v.clamp(0.0, 1.0) }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamped_keeps_channels_in_range() {
        let c = Rgb::clamped(-3.0, 0.25, 7.0);
        assert_eq!(c, Rgb::new(0.0, 0.25, 1.0));
        assert!(c.is_normalized());
    }

    #[test]
    fn clamped_maps_nan_to_midpoint() {
        let c = Rgb::clamped(f32::NAN, 0.0, 1.0);
        assert_eq!(c.r, 0.5);
    }

    #[test]
    fn hex_parsing() {
        let c = Rgb::from_hex("#4a90e2").unwrap();
        assert!((c.r - 74.0 / 255.0).abs() < 1e-6);
        assert!((c.g - 144.0 / 255.0).abs() < 1e-6);
        assert!((c.b - 226.0 / 255.0).abs() < 1e-6);
        assert!(Rgb::from_hex("#12345").is_none());
        assert!(Rgb::from_hex("zzzzzz").is_none());
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn transform_from_position() {
        let t = Transform::from_position(Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(t.position.y, 1.0);
        assert_eq!(t.scale, Vec3::ONE);
    }
}
