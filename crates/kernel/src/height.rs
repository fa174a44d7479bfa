use crate::config::{WaveConfig, WaveTerm};

/// Traveling-wave height field over the XZ plane.
///
/// `height = A · (sin(x-phase)·cos(z-phase) + w · cos(x-phase)·sin(z-phase))`
/// where each phase is `freq · coord + speed · t`. The result is bounded by
/// [`WaveConfig::envelope`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeightField {
    config: WaveConfig,
}

impl HeightField {
    pub fn new(config: WaveConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    /// Height of the surface at `(x, z)` at time `t`.
    pub fn height(&self, x: f32, z: f32, t: f32) -> f32 {
        let c = &self.config;
        let (px, pz) = phases(&c.primary, x, z, t);
        let (sx, sz) = phases(&c.secondary, x, z, t);
        let primary = px.sin() * pz.cos();
        let secondary = sx.cos() * sz.sin();
        finite_or_zero(c.amplitude * (primary + secondary * c.secondary_weight))
    }

    /// Primary term only. Cheaper, bounded by the amplitude alone.
    pub fn fast_height(&self, x: f32, z: f32, t: f32) -> f32 {
        let c = &self.config;
        let (px, pz) = phases(&c.primary, x, z, t);
        finite_or_zero(c.amplitude * px.sin() * pz.cos())
    }
}

fn phases(term: &WaveTerm, x: f32, z: f32, t: f32) -> (f32, f32) {
    (
        term.freq_x * x + term.speed_x * t,
        term.freq_z * z + term.speed_z * t,
    )
}

// sin/cos of a finite argument is finite; only infinite or NaN inputs get here.
fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> HeightField {
        HeightField::default()
    }

    #[test]
    fn origin_at_time_zero_is_flat() {
        assert_eq!(field().height(0.0, 0.0, 0.0), 0.0);
        assert_eq!(field().fast_height(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn matches_reference_composition() {
        let (x, z, t) = (1.3_f32, -2.7_f32, 0.8_f32);
        let wave1 = (x * 0.5 + t).sin() * (z * 0.5 + t).cos();
        let wave2 = (x * 0.3 - t * 0.5).cos() * (z * 0.4 + t * 0.3).sin();
        let expected = (wave1 + wave2 * 0.5) * 2.0;
        assert!((field().height(x, z, t) - expected).abs() < 1e-5);
    }

    #[test]
    fn bounded_over_a_wide_sweep() {
        let f = field();
        let envelope = f.config().envelope();
        let coords = [-1.0e6, -517.25, -20.0, -3.3, 0.0, 0.1, 7.7, 42.0, 1.0e4, 3.0e7];
        let times = [0.0, 0.016, 1.0, 59.9, 3600.0, 1.0e6];
        for &x in &coords {
            for &z in &coords {
                for &t in &times {
                    let h = f.height(x, z, t);
                    assert!(h.is_finite(), "height({x}, {z}, {t}) = {h}");
                    assert!(h.abs() <= envelope + 1e-4, "height({x}, {z}, {t}) = {h}");
                    let fast = f.fast_height(x, z, t);
                    assert!(fast.abs() <= f.config().amplitude + 1e-4);
                }
            }
        }
    }

    #[test]
    fn extreme_finite_inputs_stay_finite() {
        let f = field();
        for v in [f32::MAX, f32::MIN, f32::MIN_POSITIVE, -f32::MIN_POSITIVE] {
            assert!(f.height(v, v, 0.0).is_finite());
            assert!(f.height(0.0, 0.0, v.abs()).is_finite());
        }
    }

    #[test]
    fn non_finite_inputs_map_to_zero() {
        let f = field();
        assert_eq!(f.height(f32::INFINITY, 0.0, 0.0), 0.0);
        assert_eq!(f.height(0.0, f32::NAN, 1.0), 0.0);
    }

    #[test]
    fn small_time_step_gives_small_change() {
        let f = field();
        let dt = 1.0e-3;
        // |dh/dt| is at most A·(|p1| + |q1| + w·(|p2| + |q2|)) = 2·(2 + 0.4) = 4.8
        let max_rate = 4.8;
        for i in 0..200 {
            let x = -10.0 + i as f32 * 0.1;
            let z = 10.0 - i as f32 * 0.07;
            let t = i as f32 * 0.05;
            let dh = (f.height(x, z, t + dt) - f.height(x, z, t)).abs();
            assert!(dh <= max_rate * dt + 1e-4, "jump of {dh} at ({x}, {z}, {t})");
        }
    }

    #[test]
    fn deterministic() {
        let f = field();
        let a = f.height(3.25, -1.5, 12.0);
        let b = f.height(3.25, -1.5, 12.0);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn zero_amplitude_is_flat() {
        let f = HeightField::new(WaveConfig {
            amplitude: 0.0,
            ..WaveConfig::default()
        });
        assert_eq!(f.height(4.0, 5.0, 6.0), 0.0);
    }
}
