//! # Error Taxonomy
//!
//! Every fallible entry point in the library returns [`CryptResult`] with an
//! error drawn from the closed [`CryptError`] set. Errors are surfaced to the
//! caller, never recovered internally, and the library never panics on bad
//! input in non-test code.

use thiserror::Error;

/// The closed set of error conditions reported by the library.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CryptError {
    /// Operation was intentionally skipped (e.g. a self-test compiled out).
    #[error("Non-fatal 'no-operation' was returned")]
    Nop,

    /// Unspecified internal failure.
    #[error("Generic error")]
    Error,

    /// The caller's output buffer is too small; the required length has been
    /// written back through the length receiver where the API carries one.
    #[error("Buffer overflow")]
    BufferOverflow,

    /// Malformed serialized data (DER, PEM, SSH or PKCS framing).
    #[error("Invalid input packet")]
    InvalidPacket,

    /// An argument was outside its documented domain.
    #[error("Invalid argument provided")]
    InvalidArg,

    /// Key length not accepted by the primitive.
    #[error("Invalid key size")]
    InvalidKeysize,

    /// Round count not accepted by the primitive.
    #[error("Invalid number of rounds")]
    InvalidRounds,

    /// Cipher slot is not registered.
    #[error("Invalid cipher specified")]
    InvalidCipher,

    /// Hash slot is not registered.
    #[error("Invalid hash specified")]
    InvalidHash,

    /// PRNG slot is not registered.
    #[error("Invalid PRNG specified")]
    InvalidPrng,

    /// Allocation failure in the host or the MPI backend.
    #[error("Out of memory")]
    Mem,

    /// A private-key operation was requested with a public-only key.
    #[error("Key type mismatch")]
    PkTypeMismatch,

    /// Signing was requested with a public-only key.
    #[error("Key is not private")]
    PkNotPrivate,

    /// Key type not supported by this operation.
    #[error("Invalid key type")]
    PkInvalidType,

    /// Operand size incompatible with the modulus.
    #[error("Invalid size for the key")]
    PkInvalidSize,

    /// A self-test vector comparison failed.
    #[error("Algorithm failed test vectors")]
    FailTestvector,

    /// Length arithmetic wrapped.
    #[error("Integer overflow")]
    Overflow,

    /// The PRNG refused to supply bytes (typically: not seeded).
    #[error("Could not read enough from PRNG")]
    ErrorReadprng,

    /// A valid prefix decoded but trailing bytes remain.
    #[error("Input longer than expected")]
    InputTooLong,
}

/// Result alias used across the crate.
pub type CryptResult<T> = Result<T, CryptError>;

/// Convert an error code to its human-readable string.
pub fn error_to_string(err: CryptError) -> &'static str {
    match err {
        CryptError::Nop => "Non-fatal 'no-operation' was returned",
        CryptError::Error => "Generic error",
        CryptError::BufferOverflow => "Buffer overflow",
        CryptError::InvalidPacket => "Invalid input packet",
        CryptError::InvalidArg => "Invalid argument provided",
        CryptError::InvalidKeysize => "Invalid key size",
        CryptError::InvalidRounds => "Invalid number of rounds",
        CryptError::InvalidCipher => "Invalid cipher specified",
        CryptError::InvalidHash => "Invalid hash specified",
        CryptError::InvalidPrng => "Invalid PRNG specified",
        CryptError::Mem => "Out of memory",
        CryptError::PkTypeMismatch => "Key type mismatch",
        CryptError::PkNotPrivate => "Key is not private",
        CryptError::PkInvalidType => "Invalid key type",
        CryptError::PkInvalidSize => "Invalid size for the key",
        CryptError::FailTestvector => "Algorithm failed test vectors",
        CryptError::Overflow => "Integer overflow",
        CryptError::ErrorReadprng => "Could not read enough from PRNG",
        CryptError::InputTooLong => "Input longer than expected",
    }
}
