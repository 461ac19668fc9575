//! Byte-exact ciphertext codec.
//!
//! Version 1 layout, all integers little-endian:
//!
//! ```text
//! +---------+------------------+--------------------+-----------+
//! | tag: u8 | mask_length: u32 | mask: [u64; len]   | body: u64 |
//! +---------+------------------+--------------------+-----------+
//! ```
//!
//! Seeded ciphertexts use their own tag and carry a 32-byte mask seed in
//! place of the mask.

use crate::secret_key::check_allocation;
use crate::{Error, LweCiphertext, LweDimension, LweSeededCiphertext, Result};
use tracing::debug;

pub const CIPHERTEXT_V1: u8 = 0x01;
pub const SEEDED_CIPHERTEXT_V1: u8 = 0x81;

/// Size of the tag and mask length prefix.
pub const HEADER_SIZE: usize = 1 + 4;

const SEEDED_SIZE: usize = HEADER_SIZE + 32 + 8;

/// Serializes `ct`. Equal ciphertexts always produce equal bytes.
pub fn serialize(ct: &LweCiphertext) -> Vec<u8> {
    let n = mask_length(ct.dimension());
    let mut buf = Vec::with_capacity(HEADER_SIZE + 8 * ct.dimension() + 8);
    buf.push(CIPHERTEXT_V1);
    buf.extend_from_slice(&n.to_le_bytes());
    for a_i in ct.mask() {
        buf.extend_from_slice(&a_i.to_le_bytes());
    }
    buf.extend_from_slice(&ct.body().to_le_bytes());
    buf
}

/// Parses a buffer produced by [`serialize`]. Nothing is built unless the
/// whole buffer is valid.
pub fn deserialize(buf: &[u8]) -> Result<LweCiphertext> {
    let n = read_header(buf, CIPHERTEXT_V1)?;
    let expected = full_size(n)?;
    check_length(buf.len(), expected)?;

    let mut words = buf[HEADER_SIZE..].chunks_exact(8).map(read_u64);
    let mask: Vec<u64> = words.by_ref().take(n).collect();
    let body = words.next().ok_or(Error::MalformedBuffer {
        expected,
        found: buf.len(),
    })?;

    LweCiphertext::new(mask, body)
}

/// Like [`deserialize`], but also rejects a valid buffer holding a
/// ciphertext of another dimension.
pub fn deserialize_with_dimension(buf: &[u8], dimension: LweDimension) -> Result<LweCiphertext> {
    let ct = deserialize(buf)?;
    if ct.dimension() != dimension.get() {
        return Err(Error::DimensionMismatch {
            expected: dimension.get(),
            found: ct.dimension(),
        });
    }
    Ok(ct)
}

pub fn serialize_seeded(ct: &LweSeededCiphertext) -> Vec<u8> {
    let n = mask_length(ct.dimension().get());
    let mut buf = Vec::with_capacity(SEEDED_SIZE);
    buf.push(SEEDED_CIPHERTEXT_V1);
    buf.extend_from_slice(&n.to_le_bytes());
    buf.extend_from_slice(ct.seed());
    buf.extend_from_slice(&ct.body().to_le_bytes());
    buf
}

pub fn deserialize_seeded(buf: &[u8]) -> Result<LweSeededCiphertext> {
    let n = read_header(buf, SEEDED_CIPHERTEXT_V1)?;
    check_length(buf.len(), SEEDED_SIZE)?;

    let dimension = LweDimension::new(n)?;
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&buf[HEADER_SIZE..HEADER_SIZE + 32]);
    let body = read_u64(&buf[HEADER_SIZE + 32..]);

    Ok(LweSeededCiphertext::new(dimension, seed, body))
}

// LweDimension caps every mask at u32::MAX coefficients.
fn mask_length(n: usize) -> u32 {
    n as u32
}

/// Validates the tag and returns the declared, non-zero mask length.
fn read_header(buf: &[u8], tag: u8) -> Result<usize> {
    if buf.len() < HEADER_SIZE {
        debug!(len = buf.len(), "buffer shorter than ciphertext header");
        return Err(Error::MalformedBuffer {
            expected: HEADER_SIZE,
            found: buf.len(),
        });
    }
    if buf[0] != tag {
        debug!(tag = buf[0], "unknown ciphertext tag");
        return Err(Error::UnsupportedVersion(buf[0]));
    }
    let mut len = [0u8; 4];
    len.copy_from_slice(&buf[1..HEADER_SIZE]);
    let n = u32::from_le_bytes(len) as usize;
    if n == 0 {
        return Err(Error::InvalidDimension(0));
    }
    Ok(n)
}

/// Total size of a version 1 buffer holding `n` mask coefficients.
fn full_size(n: usize) -> Result<usize> {
    check_allocation(n)?;
    n.checked_mul(8)
        .and_then(|m| m.checked_add(HEADER_SIZE + 8))
        .ok_or(Error::OutOfMemory(n))
}

fn check_length(found: usize, expected: usize) -> Result<()> {
    if found < expected {
        debug!(expected, found, "truncated ciphertext buffer");
        return Err(Error::MalformedBuffer { expected, found });
    }
    if found > expected {
        debug!(expected, found, "ciphertext buffer has trailing bytes");
        return Err(Error::TrailingBytes { expected, found });
    }
    Ok(())
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut word = [0u8; 8];
    word.copy_from_slice(&bytes[..8]);
    u64::from_le_bytes(word)
}
