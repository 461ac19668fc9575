use crate::generators::{expand_mask, RandomGenerator};
use crate::secret_key::check_allocation;
use crate::{
    EncryptionRandomGenerator, Error, LweDimension, LweSecretKey, Plaintext, Result, Variance,
};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// LWE ciphertext over Z/2^64: `body = <mask, s> + plaintext + e`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLweCiphertext")]
pub struct LweCiphertext {
    mask: Vec<u64>,
    body: u64,
}

impl LweCiphertext {
    /// Assembles a ciphertext from its parts. The mask length must be a
    /// valid [`LweDimension`].
    pub fn new(mask: Vec<u64>, body: u64) -> Result<Self> {
        LweDimension::new(mask.len())?;
        Ok(LweCiphertext { mask, body })
    }

    pub fn mask(&self) -> &[u64] {
        &self.mask
    }

    pub fn body(&self) -> u64 {
        self.body
    }

    pub fn dimension(&self) -> usize {
        self.mask.len()
    }

    /// Returns the noisy plaintext `body - <mask, s>`.
    pub fn decrypt(&self, sk: &LweSecretKey) -> Result<Plaintext> {
        check_dimension(sk.dimension().get(), self.mask.len())?;

        let dot_prod = sk.dot(&self.mask);
        trace!(dot_prod, "decrypting LWE ciphertext");

        Ok(Plaintext(self.body.wrapping_sub(dot_prod)))
    }

    pub fn add(&self, ct: &LweCiphertext) -> Result<LweCiphertext> {
        check_dimension(self.mask.len(), ct.mask.len())?;
        let mask = self
            .mask
            .iter()
            .zip(ct.mask.iter())
            .map(|(l_i, r_i)| l_i.wrapping_add(*r_i))
            .collect();

        Ok(LweCiphertext {
            mask,
            body: self.body.wrapping_add(ct.body),
        })
    }

    pub fn sub(&self, ct: &LweCiphertext) -> Result<LweCiphertext> {
        check_dimension(self.mask.len(), ct.mask.len())?;
        let mask = self
            .mask
            .iter()
            .zip(ct.mask.iter())
            .map(|(l_i, r_i)| l_i.wrapping_sub(*r_i))
            .collect();

        Ok(LweCiphertext {
            mask,
            body: self.body.wrapping_sub(ct.body),
        })
    }

    pub fn neg(&self) -> LweCiphertext {
        LweCiphertext {
            mask: self.mask.iter().map(|a_i| a_i.wrapping_neg()).collect(),
            body: self.body.wrapping_neg(),
        }
    }

    /// Multiplies the encrypted value by a cleartext scalar. The noise is
    /// multiplied as well.
    pub fn scalar_mul(&self, scalar: u64) -> LweCiphertext {
        LweCiphertext {
            mask: self.mask.iter().map(|a_i| a_i.wrapping_mul(scalar)).collect(),
            body: self.body.wrapping_mul(scalar),
        }
    }

    /// Adds a plaintext to the encrypted value without any fresh noise.
    pub fn add_plaintext(&self, pt: Plaintext) -> LweCiphertext {
        LweCiphertext {
            mask: self.mask.clone(),
            body: self.body.wrapping_add(pt.0),
        }
    }
}

#[derive(Deserialize)]
struct RawLweCiphertext {
    mask: Vec<u64>,
    body: u64,
}

impl TryFrom<RawLweCiphertext> for LweCiphertext {
    type Error = Error;

    fn try_from(raw: RawLweCiphertext) -> Result<Self> {
        LweCiphertext::new(raw.mask, raw.body)
    }
}

/// LWE ciphertext whose mask is replaced by the seed it was drawn from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LweSeededCiphertext {
    dimension: LweDimension,
    seed: [u8; 32],
    body: u64,
}

impl LweSeededCiphertext {
    pub fn new(dimension: LweDimension, seed: [u8; 32], body: u64) -> Self {
        LweSeededCiphertext {
            dimension,
            seed,
            body,
        }
    }

    pub fn dimension(&self) -> LweDimension {
        self.dimension
    }

    pub fn seed(&self) -> &[u8; 32] {
        &self.seed
    }

    pub fn body(&self) -> u64 {
        self.body
    }

    /// Regenerates the mask and returns the equivalent full ciphertext.
    pub fn expand(&self) -> Result<LweCiphertext> {
        let n = self.dimension.get();
        check_allocation(n)?;
        let mut mask = vec![0u64; n];
        expand_mask(self.seed, &mut mask);
        Ok(LweCiphertext {
            mask,
            body: self.body,
        })
    }

    pub fn decrypt(&self, sk: &LweSecretKey) -> Result<Plaintext> {
        check_dimension(sk.dimension().get(), self.dimension.get())?;
        self.expand()?.decrypt(sk)
    }
}

fn check_dimension(expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(Error::DimensionMismatch { expected, found });
    }
    Ok(())
}

/// Body of a fresh encryption of `pt` for an already sampled mask.
fn encrypt_body(
    sk: &LweSecretKey,
    mask: &[u64],
    pt: Plaintext,
    rng: &mut EncryptionRandomGenerator,
    variance: Variance,
) -> Result<u64> {
    let e = rng.random_noise(variance)?;
    let dot_prod = sk.dot(mask);
    trace!(dot_prod, noise = e as i64, "encrypting LWE ciphertext");

    Ok(dot_prod.wrapping_add(pt.0).wrapping_add(e))
}

/// Encrypts `pt` under `sk` with a uniform mask and Gaussian noise of the
/// given variance.
pub fn encrypt(
    sk: &LweSecretKey,
    pt: Plaintext,
    rng: &mut EncryptionRandomGenerator,
    variance: Variance,
) -> Result<LweCiphertext> {
    let n = sk.dimension().get();
    check_allocation(n)?;

    // mask
    let mut mask = vec![0u64; n];
    rng.fill_uniform(&mut mask);

    // body
    let body = encrypt_body(sk, &mask, pt, rng, variance)?;

    Ok(LweCiphertext { mask, body })
}

/// Decrypts `ct` into its noisy plaintext.
pub fn decrypt(sk: &LweSecretKey, ct: &LweCiphertext) -> Result<Plaintext> {
    ct.decrypt(sk)
}

/// Encrypts every plaintext of `pts` independently.
pub fn encrypt_list(
    sk: &LweSecretKey,
    pts: &[Plaintext],
    rng: &mut EncryptionRandomGenerator,
    variance: Variance,
) -> Result<Vec<LweCiphertext>> {
    pts.iter()
        .map(|pt| encrypt(sk, *pt, rng, variance))
        .collect()
}

/// Decrypts every ciphertext of `cts`. Fails on the first mismatched
/// dimension.
pub fn decrypt_list(sk: &LweSecretKey, cts: &[LweCiphertext]) -> Result<Vec<Plaintext>> {
    cts.iter().map(|ct| ct.decrypt(sk)).collect()
}

/// Encrypts `pt` with a mask regenerated from a seed drawn from `rng`.
pub fn encrypt_seeded(
    sk: &LweSecretKey,
    pt: Plaintext,
    rng: &mut EncryptionRandomGenerator,
    variance: Variance,
) -> Result<LweSeededCiphertext> {
    let dimension = sk.dimension();
    check_allocation(dimension.get())?;

    let seed = rng.random_mask_seed();
    let mut mask = vec![0u64; dimension.get()];
    expand_mask(seed, &mut mask);

    let body = encrypt_body(sk, &mask, pt, rng, variance)?;

    Ok(LweSeededCiphertext {
        dimension,
        seed,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Encoder, SecretRandomGenerator, Seed};
    use rand::{thread_rng, Rng};

    fn setup(n: usize, seed: u64) -> (LweSecretKey, EncryptionRandomGenerator) {
        let mut secret_gen = SecretRandomGenerator::new(Seed::Fixed(seed));
        let sk = LweSecretKey::generate(LweDimension::new(n).unwrap(), &mut secret_gen).unwrap();
        (sk, EncryptionRandomGenerator::new(Seed::Fixed(seed)))
    }

    fn noiseless() -> Variance {
        Variance::new(0.0).unwrap()
    }

    #[test]
    fn test_keygen_enc_dec() {
        let (sk, mut rng) = setup(599, 0);
        let encoder = Encoder::new(3).unwrap();
        for _ in 0..100 {
            let msg = thread_rng().gen_range(0..8);
            let ct = encrypt(&sk, encoder.encode(msg).unwrap(), &mut rng, noiseless()).unwrap();
            let pt = decrypt(&sk, &ct).unwrap();
            assert_eq!(pt, Plaintext(msg << 60));
            assert_eq!(encoder.decode(pt), msg);
        }
    }

    #[test]
    fn test_dimension_one() {
        let (sk, mut rng) = setup(1, 3);
        let ct = encrypt(&sk, Plaintext(5 << 60), &mut rng, noiseless()).unwrap();
        assert_eq!(ct.dimension(), 1);
        assert_eq!(ct.decrypt(&sk).unwrap(), Plaintext(5 << 60));
    }

    #[test]
    fn test_noisy_enc_dec() {
        let (sk, mut rng) = setup(630, 11);
        let encoder = Encoder::new(3).unwrap();
        let variance = Variance::from_log_std_dev(-15.0).unwrap();
        let trials = 2000;
        let mut recovered = 0;
        for i in 0..trials {
            let msg = i % 8;
            let ct = encrypt(&sk, encoder.encode(msg).unwrap(), &mut rng, variance).unwrap();
            if encoder.decode(ct.decrypt(&sk).unwrap()) == msg {
                recovered += 1;
            }
        }
        assert!(recovered * 1000 >= trials * 999);
    }

    #[test]
    fn test_noise_is_present() {
        let (sk, mut rng) = setup(64, 2);
        let variance = Variance::from_log_std_dev(-15.0).unwrap();
        let pt = Plaintext(2 << 60);
        let noisy = (0..16)
            .map(|_| encrypt(&sk, pt, &mut rng, variance).unwrap())
            .filter(|ct| ct.decrypt(&sk).unwrap() != pt)
            .count();
        assert!(noisy > 0);
    }

    #[test]
    fn test_encryptions_differ() {
        let (sk, mut rng) = setup(599, 0);
        let pt = Plaintext(4 << 60);
        let ct1 = encrypt(&sk, pt, &mut rng, noiseless()).unwrap();
        let ct2 = encrypt(&sk, pt, &mut rng, noiseless()).unwrap();
        assert_ne!(ct1.mask(), ct2.mask());
        assert_ne!(ct1.body(), ct2.body());
        assert_eq!(ct1.decrypt(&sk).unwrap(), ct2.decrypt(&sk).unwrap());
    }

    #[test]
    fn test_fixed_seeds_reproduce_ciphertexts() {
        let (sk1, mut rng1) = setup(256, 4);
        let (sk2, mut rng2) = setup(256, 4);
        let ct1 = encrypt(&sk1, Plaintext(1 << 60), &mut rng1, noiseless()).unwrap();
        let ct2 = encrypt(&sk2, Plaintext(1 << 60), &mut rng2, noiseless()).unwrap();
        assert_eq!(ct1, ct2);
    }

    #[test]
    fn test_dimension_mismatch() {
        let (sk1, mut rng) = setup(599, 0);
        let (sk2, _) = setup(600, 1);
        let ct = encrypt(&sk1, Plaintext(0), &mut rng, noiseless()).unwrap();
        assert_eq!(
            ct.decrypt(&sk2),
            Err(Error::DimensionMismatch {
                expected: 600,
                found: 599
            })
        );
        let other = encrypt(&sk2, Plaintext(0), &mut rng, noiseless()).unwrap();
        assert!(matches!(
            ct.add(&other),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_new_rejects_empty_mask() {
        assert_eq!(LweCiphertext::new(vec![], 0), Err(Error::InvalidDimension(0)));
        let ct = LweCiphertext::new(vec![1, 2, 3], 4).unwrap();
        assert_eq!(ct.mask(), &[1, 2, 3]);
        assert_eq!(ct.body(), 4);
    }

    #[test]
    fn test_add() {
        let (sk, mut rng) = setup(599, 5);
        let encoder = Encoder::new(3).unwrap();
        let c1 = encrypt(&sk, encoder.encode(2).unwrap(), &mut rng, noiseless()).unwrap();
        let c2 = encrypt(&sk, encoder.encode(7).unwrap(), &mut rng, noiseless()).unwrap();
        let c3 = c1.add(&c2).unwrap();
        // the sum spills into the guard bit
        assert_eq!(encoder.decode(c3.decrypt(&sk).unwrap()), 9);
    }

    #[test]
    fn test_sub_neg() {
        let (sk, mut rng) = setup(599, 6);
        let encoder = Encoder::new(3).unwrap();
        let c1 = encrypt(&sk, encoder.encode(6).unwrap(), &mut rng, noiseless()).unwrap();
        let c2 = encrypt(&sk, encoder.encode(4).unwrap(), &mut rng, noiseless()).unwrap();
        assert_eq!(encoder.decode(c1.sub(&c2).unwrap().decrypt(&sk).unwrap()), 2);
        let neg = c2.neg().add(&c1).unwrap();
        assert_eq!(encoder.decode(neg.decrypt(&sk).unwrap()), 2);
    }

    #[test]
    fn test_scalar_mul_and_add_plaintext() {
        let (sk, mut rng) = setup(599, 7);
        let encoder = Encoder::new(3).unwrap();
        let ct = encrypt(&sk, encoder.encode(3).unwrap(), &mut rng, noiseless()).unwrap();
        assert_eq!(encoder.decode(ct.scalar_mul(2).decrypt(&sk).unwrap()), 6);
        let ct = ct.add_plaintext(encoder.encode(1).unwrap());
        assert_eq!(encoder.decode(ct.decrypt(&sk).unwrap()), 4);
    }

    #[test]
    fn test_list() {
        let (sk, mut rng) = setup(128, 8);
        let pts: Vec<Plaintext> = (0..8).map(|i| Plaintext(i << 60)).collect();
        let cts = encrypt_list(&sk, &pts, &mut rng, noiseless()).unwrap();
        assert_eq!(cts.len(), pts.len());
        assert_eq!(decrypt_list(&sk, &cts).unwrap(), pts);
    }

    #[test]
    fn test_seeded() {
        let (sk, mut rng) = setup(599, 9);
        let pt = Plaintext(4 << 60);
        let seeded = encrypt_seeded(&sk, pt, &mut rng, noiseless()).unwrap();
        assert_eq!(seeded.dimension(), sk.dimension());
        assert_eq!(seeded.decrypt(&sk).unwrap(), pt);

        let expanded = seeded.expand().unwrap();
        assert_eq!(expanded.dimension(), 599);
        assert_eq!(expanded.body(), seeded.body());
        assert_eq!(expanded.decrypt(&sk).unwrap(), pt);
    }
}
