//! Tunable constants for the three sub-kernels.
//!
//! Every struct is `#[serde(default)]`, so a YAML file only has to name the
//! constants it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One `sin(fx·x + sx·t) · cos(fz·z + sz·t)` style product term.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTerm {
    /// Spatial frequency along x.
    pub freq_x: f32,
    /// Spatial frequency along z.
    pub freq_z: f32,
    /// Phase speed of the x factor (radians per second).
    pub speed_x: f32,
    /// Phase speed of the z factor (radians per second).
    pub speed_z: f32,
}

impl Default for WaveTerm {
    fn default() -> Self {
        Self {
            freq_x: 0.5,
            freq_z: 0.5,
            speed_x: 1.0,
            speed_z: 1.0,
        }
    }
}

/// Height field constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    pub amplitude: f32,
    pub primary: WaveTerm,
    pub secondary: WaveTerm,
    /// Weight of the secondary term relative to the primary.
    pub secondary_weight: f32,
}

impl WaveConfig {
    /// Largest magnitude `height` can return with these constants.
    pub fn envelope(&self) -> f32 {
        self.amplitude * (1.0 + self.secondary_weight.abs())
    }
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            amplitude: 2.0,
            primary: WaveTerm::default(),
            secondary: WaveTerm {
                freq_x: 0.3,
                freq_z: 0.4,
                speed_x: -0.5,
                speed_z: 0.3,
            },
            secondary_weight: 0.5,
        }
    }
}

/// Spiral trajectory constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralConfig {
    /// Full turns swept from the first to the last particle.
    pub turns: f32,
    /// Rotation speed of the whole spiral (radians per second).
    pub angular_speed: f32,
    /// Radius reached by the last particle.
    pub max_radius: f32,
    /// Vertical bobbing amplitude.
    pub bob_amplitude: f32,
    /// Vertical bobbing speed (radians per second).
    pub bob_speed: f32,
    /// Bobbing phase offset between neighbouring particles.
    pub bob_phase_step: f32,
}

impl Default for SpiralConfig {
    fn default() -> Self {
        Self {
            turns: 2.0,
            angular_speed: 1.0,
            max_radius: 5.0,
            bob_amplitude: 2.0,
            bob_speed: 1.0,
            bob_phase_step: 0.1,
        }
    }
}

/// Curve for one color channel: `(sin(frequency·c + phase) + 1) / 2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelCurve {
    pub frequency: f32,
    pub phase: f32,
}

impl Default for ChannelCurve {
    fn default() -> Self {
        Self {
            frequency: 0.3,
            phase: 0.0,
        }
    }
}

/// Color map constants, one curve per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub red: ChannelCurve,
    pub green: ChannelCurve,
    pub blue: ChannelCurve,
}

/// All kernel constants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    pub wave: WaveConfig,
    pub spiral: SpiralConfig,
    pub color: ColorConfig,
}

impl KernelConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded kernel config");
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check every constant. The first offending field is reported.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.wave;
        let s = &self.spiral;
        let c = &self.color;
        let fields: [(&'static str, f32); 24] = [
            ("wave.amplitude", w.amplitude),
            ("wave.primary.freq_x", w.primary.freq_x),
            ("wave.primary.freq_z", w.primary.freq_z),
            ("wave.primary.speed_x", w.primary.speed_x),
            ("wave.primary.speed_z", w.primary.speed_z),
            ("wave.secondary.freq_x", w.secondary.freq_x),
            ("wave.secondary.freq_z", w.secondary.freq_z),
            ("wave.secondary.speed_x", w.secondary.speed_x),
            ("wave.secondary.speed_z", w.secondary.speed_z),
            ("wave.secondary_weight", w.secondary_weight),
            ("spiral.turns", s.turns),
            ("spiral.angular_speed", s.angular_speed),
            ("spiral.max_radius", s.max_radius),
            ("spiral.bob_amplitude", s.bob_amplitude),
            ("spiral.bob_speed", s.bob_speed),
            ("spiral.bob_phase_step", s.bob_phase_step),
            ("color.red.frequency", c.red.frequency),
            ("color.red.phase", c.red.phase),
            ("color.green.frequency", c.green.frequency),
            ("color.green.phase", c.green.phase),
            ("color.blue.frequency", c.blue.frequency),
            ("color.blue.phase", c.blue.phase),
            // The envelope can overflow even when each factor is finite.
            ("wave envelope", w.envelope()),
            ("spiral sweep angle", s.turns * std::f32::consts::TAU),
        ];
        if let Some(&(field, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NotFinite { field });
        }

        check(w.amplitude >= 0.0, "wave.amplitude", w.amplitude, "must not be negative")?;
        check(s.turns > 0.0, "spiral.turns", s.turns, "must be positive")?;
        check(
            s.max_radius > 0.0,
            "spiral.max_radius",
            s.max_radius,
            "must be positive so particles stay distinct",
        )?;
        check(
            s.bob_amplitude >= 0.0,
            "spiral.bob_amplitude",
            s.bob_amplitude,
            "must not be negative",
        )?;
        Ok(())
    }
}

fn check(
    ok: bool,
    field: &'static str,
    value: f32,
    reason: &'static str,
) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_validate() {
        assert!(KernelConfig::default().validate().is_ok());
    }

    #[test]
    fn default_envelope() {
        assert_eq!(WaveConfig::default().envelope(), 3.0);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = KernelConfig::from_yaml_str("wave:\n  amplitude: 1.5\n").unwrap();
        assert_eq!(config.wave.amplitude, 1.5);
        assert_eq!(config.wave.primary, WaveTerm::default());
        assert_eq!(config.spiral, SpiralConfig::default());
        assert_eq!(config.color, ColorConfig::default());
    }

    #[test]
    fn empty_yaml_is_default() {
        let config = KernelConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, KernelConfig::default());
    }

    #[test]
    fn yaml_round_trip() {
        let mut config = KernelConfig::default();
        config.spiral.turns = 3.5;
        config.color.blue.phase = 1.25;
        let text = config.to_yaml().unwrap();
        assert_eq!(KernelConfig::from_yaml_str(&text).unwrap(), config);
    }

    #[test]
    fn rejects_negative_amplitude() {
        let err = KernelConfig::from_yaml_str("wave:\n  amplitude: -1.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "wave.amplitude",
                ..
            }
        ));
    }

    #[test]
    fn rejects_zero_radius() {
        let mut config = KernelConfig::default();
        config.spiral.max_radius = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("spiral.max_radius"));
    }

    #[test]
    fn rejects_non_finite() {
        let mut config = KernelConfig::default();
        config.color.green.frequency = f32::NAN;
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::NotFinite {
                field: "color.green.frequency"
            }
        ));
    }

    #[test]
    fn rejects_overflowing_envelope() {
        let mut config = KernelConfig::default();
        config.wave.amplitude = f32::MAX;
        config.wave.secondary_weight = 2.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotFinite { .. })
        ));
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(matches!(
            KernelConfig::from_yaml_str("wave: [1, 2"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "spiral:\n  max_radius: 8.0").unwrap();
        let config = KernelConfig::load(file.path()).unwrap();
        assert_eq!(config.spiral.max_radius, 8.0);
    }

    #[test]
    fn load_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");
        let err = KernelConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("missing.yaml"));
    }
}
