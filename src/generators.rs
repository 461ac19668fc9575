//! Random sources.
//!
//! Key material and per-ciphertext randomness come from two distinct
//! generators. Both are ChaCha20 streams; even when built from the same
//! numeric seed they read different stream identifiers, so the bits that
//! produce a secret key are never reused for masks or noise.

use crate::{Error, Result, Variance};
use rand::{thread_rng, Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, Normal};

const SECRET_STREAM: u64 = 0;
const ENCRYPTION_STREAM: u64 = 1;

/// 2^64 as a float, the scale between torus values and `u64` words.
const TORUS_SCALE: f64 = 18446744073709551616.0;

/// How a generator gets its initial state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Seed {
    /// Reproducible stream, for tests.
    Fixed(u64),
    /// Fresh entropy from the thread RNG.
    Entropy,
}

impl Seed {
    /// Builds a seed from the two raw integers a foreign caller passes:
    /// mode `0` selects a fixed stream seeded with `value`, mode `1` draws
    /// fresh entropy and requires `value == 0`.
    pub fn from_raw(mode: u64, value: u64) -> Result<Seed> {
        match (mode, value) {
            (0, v) => Ok(Seed::Fixed(v)),
            (1, 0) => Ok(Seed::Entropy),
            (mode, value) => Err(Error::InvalidSeed { mode, value }),
        }
    }

    fn into_rng(self, stream: u64) -> ChaCha20Rng {
        let mut rng = match self {
            Seed::Fixed(v) => ChaCha20Rng::seed_from_u64(v),
            Seed::Entropy => ChaCha20Rng::from_seed(thread_rng().gen()),
        };
        rng.set_stream(stream);
        rng
    }
}

/// Operations shared by both generator flavors.
pub trait RandomGenerator {
    /// Draws a uniformly random 64-bit word.
    fn next_uniform_u64(&mut self) -> u64;

    /// Fills `out` with uniformly random 64-bit words.
    fn fill_uniform(&mut self, out: &mut [u64]) {
        for x in out.iter_mut() {
            *x = self.next_uniform_u64();
        }
    }
}

/// Generator reserved for secret key material.
pub struct SecretRandomGenerator {
    rng: ChaCha20Rng,
}

impl SecretRandomGenerator {
    pub fn new(seed: Seed) -> Self {
        SecretRandomGenerator {
            rng: seed.into_rng(SECRET_STREAM),
        }
    }

    /// Draws a uniform bit, returned as `0` or `1`.
    pub fn random_binary(&mut self) -> u64 {
        self.rng.gen_range(0..=1)
    }
}

impl RandomGenerator for SecretRandomGenerator {
    fn next_uniform_u64(&mut self) -> u64 {
        self.rng.gen()
    }
}

/// Generator for masks, noise and mask seeds.
pub struct EncryptionRandomGenerator {
    rng: ChaCha20Rng,
}

impl EncryptionRandomGenerator {
    pub fn new(seed: Seed) -> Self {
        EncryptionRandomGenerator {
            rng: seed.into_rng(ENCRYPTION_STREAM),
        }
    }

    /// Samples a centered normal value with standard deviation
    /// `sqrt(variance)`, in torus units.
    pub fn next_gaussian(&mut self, variance: Variance) -> Result<f64> {
        let normal = Normal::new(0.0, variance.std_dev())
            .map_err(|_| Error::InvalidVariance(variance.get()))?;
        Ok(normal.sample(&mut self.rng))
    }

    /// Samples a noise term and quantizes it onto the 64-bit torus.
    ///
    /// Whole turns of the torus are dropped before scaling, and negative
    /// samples wrap around 2^64.
    pub fn random_noise(&mut self, variance: Variance) -> Result<u64> {
        if variance.is_zero() {
            return Ok(0);
        }
        let e = self.next_gaussian(variance)?;
        Ok(torus_to_u64(e))
    }

    /// Draws the seed of a mask that will be regenerated later.
    pub fn random_mask_seed(&mut self) -> [u8; 32] {
        self.rng.gen()
    }
}

impl RandomGenerator for EncryptionRandomGenerator {
    fn next_uniform_u64(&mut self) -> u64 {
        self.rng.gen()
    }
}

impl std::fmt::Debug for SecretRandomGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretRandomGenerator").finish_non_exhaustive()
    }
}

impl std::fmt::Debug for EncryptionRandomGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionRandomGenerator")
            .finish_non_exhaustive()
    }
}

/// Maps a real number onto Z/2^64. `fract` keeps the magnitude below 2^64
/// so the `i128` cast never saturates.
fn torus_to_u64(t: f64) -> u64 {
    (t.fract() * TORUS_SCALE).round() as i128 as u64
}

/// Regenerates the mask of a seeded ciphertext.
pub(crate) fn expand_mask(seed: [u8; 32], out: &mut [u64]) {
    let mut rng = ChaCha20Rng::from_seed(seed);
    for a_i in out.iter_mut() {
        *a_i = rng.gen();
    }
}
