use crate::{Error, LweDimension, Result, SecretRandomGenerator};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Binary LWE secret key.
#[derive(Clone)]
#[cfg_attr(test, derive(PartialEq, Eq))]
pub struct LweSecretKey {
    dimension: LweDimension,
    coeffs: Box<[u64]>,
}

impl Zeroize for LweSecretKey {
    fn zeroize(&mut self) {
        self.coeffs.zeroize();
    }
}

impl Drop for LweSecretKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl ZeroizeOnDrop for LweSecretKey {}

impl LweSecretKey {
    /// Draws `dimension` independent uniform bits.
    pub fn generate(dimension: LweDimension, rng: &mut SecretRandomGenerator) -> Result<Self> {
        let n = dimension.get();
        check_allocation(n)?;
        let coeffs = (0..n).map(|_| rng.random_binary()).collect();
        debug!(dimension = n, "generated LWE secret key");
        Ok(LweSecretKey { dimension, coeffs })
    }

    pub fn dimension(&self) -> LweDimension {
        self.dimension
    }

    /// Wrapping dot product between `mask` and the key. The caller checks
    /// the lengths.
    pub(crate) fn dot(&self, mask: &[u64]) -> u64 {
        mask.iter()
            .zip(self.coeffs.iter())
            .fold(0u64, |acc, (a_i, s_i)| acc.wrapping_add(a_i.wrapping_mul(*s_i)))
    }
}

impl std::fmt::Debug for LweSecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LweSecretKey")
            .field("dimension", &self.dimension.get())
            .finish_non_exhaustive()
    }
}

/// Rejects coefficient counts whose byte size does not fit an allocation.
pub(crate) fn check_allocation(n: usize) -> Result<()> {
    match n.checked_mul(std::mem::size_of::<u64>()) {
        Some(bytes) if bytes <= isize::MAX as usize => Ok(()),
        _ => Err(Error::OutOfMemory(n)),
    }
}
