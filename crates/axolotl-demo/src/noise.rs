use ::noise::{NoiseFn, OpenSimplex};
use rand::Rng;

/// Seeded, continuous 2D simplex noise.
///
/// Samples lie roughly in `[-1, 1]`. An instance always returns the same
/// value for the same coordinates.
#[derive(Clone)]
pub struct NoiseField {
    simplex: OpenSimplex,
    seed: u32,
}

impl NoiseField {
    /// Seeds from the thread-local random source.
    pub fn new() -> Self {
        Self::from_rng(&mut rand::thread_rng())
    }

    pub fn from_rng<R: Rng>(rng: &mut R) -> Self {
        Self::with_seed(rng.gen_range(0..=u32::MAX))
    }

    pub fn with_seed(seed: u32) -> Self {
        Self {
            simplex: OpenSimplex::new(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn sample(&self, x: f32, y: f32) -> f32 {
        let v = self.simplex.get([x as f64, y as f64]) as f32;
        if v.is_finite() { v } else { 0.0 }
    }
}

impl Default for NoiseField {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField").field("seed", &self.seed).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grid() -> impl Iterator<Item = (f32, f32)> {
        (-20..20).flat_map(|i| (-20..20).map(move |j| (i as f32 * 0.37, j as f32 * 0.41)))
    }

    #[test]
    fn same_rng_seed_gives_same_field() {
        let a = NoiseField::from_rng(&mut StdRng::seed_from_u64(7));
        let b = NoiseField::from_rng(&mut StdRng::seed_from_u64(7));
        assert_eq!(a.seed(), b.seed());
        for (x, y) in grid() {
            assert_eq!(a.sample(x, y), b.sample(x, y));
            assert_eq!(a.sample(x, y), a.sample(x, y));
        }
    }

    #[test]
    fn nearby_samples_stay_close() {
        let field = NoiseField::with_seed(42);
        let eps = 1e-3;
        for (x, y) in grid() {
            let dx = (field.sample(x + eps, y) - field.sample(x, y)).abs();
            let dy = (field.sample(x, y + eps) - field.sample(x, y)).abs();
            assert!(dx <= 20.0 * eps, "jump of {dx} at ({x}, {y})");
            assert!(dy <= 20.0 * eps, "jump of {dy} at ({x}, {y})");
        }
    }

    #[test]
    fn continuous_across_lattice_points() {
        let field = NoiseField::with_seed(3);
        for i in -5..5 {
            let x = i as f32;
            let left = field.sample(x - 1e-4, 0.5);
            let right = field.sample(x + 1e-4, 0.5);
            assert!((left - right).abs() < 1e-2);
        }
    }

    #[test]
    fn samples_are_bounded() {
        let field = NoiseField::with_seed(11);
        for (x, y) in grid() {
            let v = field.sample(x * 13.0, y * 7.0);
            assert!(v.is_finite());
            assert!((-1.0..=1.0).contains(&v), "{v} out of range");
        }
        assert!(field.sample(1e6, -1e6).is_finite());
    }
}
