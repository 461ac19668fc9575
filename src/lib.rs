//! LWE symmetric encryption over 64-bit integers.
//!
//! Keys are drawn from a [`SecretRandomGenerator`], masks and noise from an
//! [`EncryptionRandomGenerator`]; both are passed explicitly to every call.
//! Ciphertexts cross untrusted storage through the byte codec in
//! [`serialization`].

pub mod encoding;
pub mod error;
pub mod generators;
pub mod lwe;
pub mod params;
pub mod secret_key;
pub mod serialization;

pub use encoding::{decode, encode, Encoder, Plaintext};
pub use error::{error_code, Error, Result};
pub use generators::{EncryptionRandomGenerator, RandomGenerator, SecretRandomGenerator, Seed};
pub use lwe::{
    decrypt, decrypt_list, encrypt, encrypt_list, encrypt_seeded, LweCiphertext,
    LweSeededCiphertext,
};
pub use params::{LweDimension, LweParameters, Variance};
pub use secret_key::LweSecretKey;
pub use serialization::{deserialize, deserialize_with_dimension, serialize};
