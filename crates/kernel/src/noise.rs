/// One-dimensional value noise in `[0, 1]`.
///
/// Hashes the two lattice points around `x` with a sine hash and blends them
/// with a smoothstep, so the result is continuous in `x`. Non-finite inputs
/// return 0.5.
pub fn value_noise(x: f32, seed: f32) -> f32 {
    if !x.is_finite() || !seed.is_finite() {
        return 0.5;
    }
    let cell = x.floor();
    let f = x - cell;
    let a = lattice_hash(cell, seed);
    let b = lattice_hash(cell + 1.0, seed);
    let u = f * f * (3.0 - 2.0 * f);
    (a * (1.0 - u) + b * u).clamp(0.0, 1.0)
}

fn lattice_hash(k: f32, seed: f32) -> f32 {
    ((k + seed).sin() * 43_758.547).rem_euclid(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_unit_range() {
        for i in -2000..2000 {
            let x = i as f32 * 0.173;
            let n = value_noise(x, 3.0);
            assert!((0.0..=1.0).contains(&n), "noise({x}) = {n}");
        }
    }

    #[test]
    fn hits_lattice_values_at_integers() {
        for k in -5..5 {
            let x = k as f32;
            assert_eq!(value_noise(x, 1.0), lattice_hash(x, 1.0));
        }
    }

    #[test]
    fn continuous_across_lattice_points() {
        let eps = 1.0e-3;
        for k in -20..20 {
            let x = k as f32;
            let left = value_noise(x - eps, 0.0);
            let right = value_noise(x + eps, 0.0);
            assert!((left - right).abs() < 0.01, "gap at {x}");
        }
    }

    #[test]
    fn seed_changes_the_pattern() {
        let a: Vec<f32> = (0..16).map(|i| value_noise(i as f32 + 0.5, 0.0)).collect();
        let b: Vec<f32> = (0..16).map(|i| value_noise(i as f32 + 0.5, 7.0)).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn non_finite_is_midpoint() {
        assert_eq!(value_noise(f32::NAN, 0.0), 0.5);
        assert_eq!(value_noise(f32::INFINITY, 0.0), 0.5);
        assert_eq!(value_noise(0.0, f32::NEG_INFINITY), 0.5);
    }

    #[test]
    fn huge_inputs_stay_in_range() {
        for x in [1.0e9, -1.0e9, f32::MAX, f32::MIN] {
            let n = value_noise(x, 2.0);
            assert!((0.0..=1.0).contains(&n));
        }
    }
}
