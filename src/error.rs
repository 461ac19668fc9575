//! Error type shared by every fallible operation of the crate.

/// The Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by key generation, encryption, decryption and the
/// ciphertext codec.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The seed configuration handed to a generator is not recognized.
    #[error("Invalid seed configuration: mode {mode}, value {value}")]
    InvalidSeed { mode: u64, value: u64 },

    /// The LWE dimension must be positive.
    #[error("Invalid LWE dimension: {0}")]
    InvalidDimension(usize),

    /// The requested object cannot be represented in memory.
    #[error("Out of memory: cannot allocate {0} coefficients")]
    OutOfMemory(usize),

    /// Two objects that must share a dimension do not.
    #[error("Dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// The cleartext does not fit in the encoding window.
    #[error("Value {value} does not fit in {precision} bits")]
    EncodingOverflow { value: u64, precision: u32 },

    /// The buffer is shorter than the layout it declares.
    #[error("Malformed buffer: expected {expected} bytes, found {found}")]
    MalformedBuffer { expected: usize, found: usize },

    /// The buffer is longer than the layout it declares.
    #[error("Trailing bytes: expected {expected} bytes, found {found}")]
    TrailingBytes { expected: usize, found: usize },

    /// The buffer carries a version tag this codec does not read.
    #[error("Unsupported serialization version: {0:#04x}")]
    UnsupportedVersion(u8),

    /// The noise variance is negative, NaN or infinite.
    #[error("Invalid variance: {0}")]
    InvalidVariance(f64),

    /// The encoding precision leaves no room for the guard bit.
    #[error("Invalid precision: {0}")]
    InvalidPrecision(u32),
}

impl Error {
    /// Stable numeric code of this error, suitable for an out-of-band error
    /// channel. `0` is reserved for success and never returned.
    pub fn code(&self) -> i32 {
        match self {
            Error::InvalidSeed { .. } => 1,
            Error::InvalidDimension(_) => 2,
            Error::OutOfMemory(_) => 3,
            Error::DimensionMismatch { .. } => 4,
            Error::EncodingOverflow { .. } => 5,
            Error::MalformedBuffer { .. } => 6,
            Error::TrailingBytes { .. } => 7,
            Error::UnsupportedVersion(_) => 8,
            Error::InvalidVariance(_) => 9,
            Error::InvalidPrecision(_) => 10,
        }
    }
}

/// Collapse a result into the code a foreign caller would check before
/// using the value: `0` on success, [`Error::code`] otherwise.
pub fn error_code<T>(result: &Result<T>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(e) => e.code(),
    }
}

#[cfg(test)]
mod tests {
    use super::{error_code, Error};

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = [
            Error::InvalidSeed { mode: 7, value: 0 },
            Error::InvalidDimension(0),
            Error::OutOfMemory(usize::MAX),
            Error::DimensionMismatch {
                expected: 1,
                found: 2,
            },
            Error::EncodingOverflow {
                value: 8,
                precision: 3,
            },
            Error::MalformedBuffer {
                expected: 5,
                found: 0,
            },
            Error::TrailingBytes {
                expected: 5,
                found: 6,
            },
            Error::UnsupportedVersion(2),
            Error::InvalidVariance(-1.0),
            Error::InvalidPrecision(0),
        ];
        let mut codes: Vec<i32> = errors.iter().map(Error::code).collect();
        assert!(codes.iter().all(|&c| c != 0));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_error_code_of_result() {
        assert_eq!(error_code(&Ok::<u8, Error>(1)), 0);
        assert_eq!(error_code::<u8>(&Err(Error::UnsupportedVersion(3))), 8);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::DimensionMismatch {
                expected: 599,
                found: 600
            }
            .to_string(),
            "Dimension mismatch: expected 599, found 600"
        );
        assert_eq!(
            Error::UnsupportedVersion(2).to_string(),
            "Unsupported serialization version: 0x02"
        );
    }
}
