//! Fixed-point encoding of cleartexts into the high bits of a 64-bit word.
//!
//! A cleartext of `precision` bits is placed right below a guard bit, so
//! `shift = 64 - (precision + 1)` low bits are left to absorb noise.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// An encoded cleartext, possibly carrying noise in its low bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Plaintext(pub u64);

/// Encoding window shared by both ends of a computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Encoder {
    precision: u32,
    shift: u32,
}

impl Encoder {
    /// `precision` must leave at least one noise bit below the guard bit.
    pub fn new(precision: u32) -> Result<Self> {
        if precision == 0 || precision > 62 {
            return Err(Error::InvalidPrecision(precision));
        }
        Ok(Encoder {
            precision,
            shift: 64 - (precision + 1),
        })
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn shift(&self) -> u32 {
        self.shift
    }

    /// Values wider than the window are rejected, never wrapped.
    pub fn encode(&self, value: u64) -> Result<Plaintext> {
        if value >> self.precision != 0 {
            return Err(Error::EncodingOverflow {
                value,
                precision: self.precision,
            });
        }
        Ok(Plaintext(value << self.shift))
    }

    /// Rounds to the closest multiple of `2^shift` and removes the
    /// encoding. The result is reduced modulo `2^(precision + 1)`, so small
    /// negative noise around zero decodes to zero.
    pub fn decode(&self, pt: Plaintext) -> u64 {
        let rounded = (pt.0 >> self.shift) + ((pt.0 >> (self.shift - 1)) & 1);
        rounded & ((1u64 << (self.precision + 1)) - 1)
    }
}

/// Encodes `value` with a one-off [`Encoder`].
pub fn encode(value: u64, precision: u32) -> Result<Plaintext> {
    Encoder::new(precision)?.encode(value)
}

/// Decodes `pt` with a one-off [`Encoder`].
pub fn decode(pt: Plaintext, precision: u32) -> Result<u64> {
    Ok(Encoder::new(precision)?.decode(pt))
}

#[test]
fn test_codec() {
    let encoder = Encoder::new(3).unwrap();
    assert_eq!(encoder.shift(), 60);
    for i in 0..8 {
        assert_eq!(encoder.decode(encoder.encode(i).unwrap()), i);
    }
    assert_eq!(encode(4, 3).unwrap(), Plaintext(4 << 60));
}

#[test]
fn test_strict_overflow() {
    assert_eq!(
        encode(8, 3),
        Err(Error::EncodingOverflow {
            value: 8,
            precision: 3
        })
    );
    assert!(encode(u64::MAX, 62).is_err());
    assert!(encode((1 << 62) - 1, 62).is_ok());
}

#[test]
fn test_invalid_precision() {
    assert_eq!(Encoder::new(0), Err(Error::InvalidPrecision(0)));
    assert_eq!(Encoder::new(63), Err(Error::InvalidPrecision(63)));
    assert!(decode(Plaintext(0), 64).is_err());
}

#[test]
fn test_approx_dec() {
    let encoder = Encoder::new(3).unwrap();
    let four = 4u64 << 60;
    // noise below half a step is absorbed in both directions
    assert_eq!(encoder.decode(Plaintext(four + (1 << 58))), 4);
    assert_eq!(encoder.decode(Plaintext(four - (1 << 58))), 4);
    // half a step or more moves to the neighbour
    assert_eq!(encoder.decode(Plaintext(four + (1 << 59))), 5);
    // negative noise around zero wraps back to zero
    assert_eq!(encoder.decode(Plaintext(0u64.wrapping_sub(1 << 40))), 0);
}

#[test]
fn test_decode_widest_window() {
    let encoder = Encoder::new(62).unwrap();
    assert_eq!(encoder.shift(), 1);
    // rounds up past the guard bit and wraps to zero
    assert_eq!(encoder.decode(Plaintext(u64::MAX)), 0);
    assert_eq!(encoder.decode(Plaintext(5 << 1)), 5);
    assert_eq!(encoder.decode(Plaintext((5 << 1) + 1)), 6);
}
