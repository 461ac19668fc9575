use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Number of coefficients of a secret key, and of the mask of every
/// ciphertext encrypted under it. Ranges over `1..=u32::MAX` so that it
/// always fits the serialized length prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct LweDimension(usize);

impl LweDimension {
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 || n > u32::MAX as usize {
            return Err(Error::InvalidDimension(n));
        }
        Ok(LweDimension(n))
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<usize> for LweDimension {
    type Error = Error;

    fn try_from(n: usize) -> Result<Self> {
        LweDimension::new(n)
    }
}

impl From<LweDimension> for usize {
    fn from(n: LweDimension) -> usize {
        n.0
    }
}

/// Variance of the Gaussian noise, in torus units: the standard deviation
/// `sqrt(variance)` is a fraction of the modulus 2^64.
///
/// `0.0` disables the noise entirely and is only meant for deterministic
/// tests.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Variance(f64);

impl Variance {
    pub fn new(variance: f64) -> Result<Self> {
        if !variance.is_finite() || variance < 0.0 {
            return Err(Error::InvalidVariance(variance));
        }
        Ok(Variance(variance))
    }

    /// Variance matching a standard deviation of `2^log_std_dev` torus units.
    pub fn from_log_std_dev(log_std_dev: f64) -> Result<Self> {
        Variance::new(f64::powf(2.0, 2.0 * log_std_dev))
    }

    pub fn get(self) -> f64 {
        self.0
    }

    pub fn std_dev(self) -> f64 {
        self.0.sqrt()
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl TryFrom<f64> for Variance {
    type Error = Error;

    fn try_from(variance: f64) -> Result<Self> {
        Variance::new(variance)
    }
}

impl From<Variance> for f64 {
    fn from(v: Variance) -> f64 {
        v.0
    }
}

pub const DEFAULT_DIMENSION: usize = 599;
pub const DEFAULT_PRECISION: u32 = 3;

/// The full set of numeric parameters a caller has to agree on.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LweParameters {
    pub dimension: usize,
    pub variance: f64,
    pub precision: u32,
}

impl LweParameters {
    /// Checks every field and returns the typed views.
    pub fn validate(&self) -> Result<(LweDimension, Variance, crate::Encoder)> {
        Ok((
            LweDimension::new(self.dimension)?,
            Variance::new(self.variance)?,
            crate::Encoder::new(self.precision)?,
        ))
    }
}

impl Default for LweParameters {
    fn default() -> Self {
        LweParameters {
            dimension: DEFAULT_DIMENSION,
            variance: 0.0,
            precision: DEFAULT_PRECISION,
        }
    }
}

#[test]
fn test_dimension() {
    assert_eq!(LweDimension::new(0), Err(Error::InvalidDimension(0)));
    assert_eq!(LweDimension::try_from(599).map(LweDimension::get), Ok(599));
}

#[test]
fn test_variance() {
    assert!(Variance::new(0.0).unwrap().is_zero());
    assert!(Variance::new(-1e-9).is_err());
    assert!(Variance::new(f64::NAN).is_err());
    assert!(Variance::new(f64::INFINITY).is_err());

    let v = Variance::from_log_std_dev(-15.0).unwrap();
    assert_eq!(v.std_dev(), f64::powf(2.0, -15.0));
}

#[test]
fn test_default_parameters() {
    let (n, var, encoder) = LweParameters::default().validate().unwrap();
    assert_eq!(n.get(), 599);
    assert!(var.is_zero());
    assert_eq!(encoder.shift(), 60);

    let bad = LweParameters {
        precision: 63,
        ..LweParameters::default()
    };
    assert_eq!(bad.validate().unwrap_err(), Error::InvalidPrecision(63));
}
