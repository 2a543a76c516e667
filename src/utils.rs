//! Random sources and small helpers.

use rand::Rng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Fast RNG suitable for no_std environments.
pub type FastRng = Xoshiro256PlusPlus;

/// # Overview
///
/// The two random primitives training needs.
///
/// Every [`rand::Rng`] is a `RandomSource`, so a hardware generator only has
/// to implement [`rand::RngCore`] to be injected into [`Model::step`].
///
/// [`Model::step`]: crate::Model::step
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn uniform_float(&mut self) -> f32;

    /// Uniform index in `[0, n)`. `n` must be non-zero.
    fn uniform_index(&mut self, n: usize) -> usize;

    /// Bernoulli trial: true when a fresh draw is `<= probability`.
    #[inline]
    fn chance(&mut self, probability: f32) -> bool {
        self.uniform_float() <= probability
    }
}

impl<R: Rng> RandomSource for R {
    #[inline]
    fn uniform_float(&mut self) -> f32 {
        self.random::<f32>()
    }

    #[inline]
    fn uniform_index(&mut self, n: usize) -> usize {
        self.random_range(0..n)
    }
}

/// # Overview
///
/// Creates a fast RNG seeded from a u64 value.
///
/// # Examples
///
/// ```
/// use tsetlin_mcu::utils::rng_from_seed;
///
/// let mut rng = rng_from_seed(42);
/// ```
#[inline]
pub fn rng_from_seed(seed: u64) -> FastRng {
    use rand::SeedableRng;
    Xoshiro256PlusPlus::seed_from_u64(seed)
}

/// # Overview
///
/// Creates a fast RNG with entropy from thread-local RNG.
#[cfg(feature = "std")]
#[inline]
pub fn rng_from_entropy() -> FastRng {
    use rand::SeedableRng;
    Xoshiro256PlusPlus::from_rng(&mut rand::rng())
}

/// # Overview
///
/// Shuffles a slice in-place using Fisher-Yates algorithm.
#[inline]
pub fn shuffle<T, R: RandomSource>(slice: &mut [T], rng: &mut R) {
    for i in (1..slice.len()).rev() {
        let j = rng.uniform_index(i + 1);
        slice.swap(i, j);
    }
}
