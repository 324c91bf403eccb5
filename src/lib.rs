//! # CRYPTKIT - Modular Cryptographic Primitives Library
//!
//! A registry-driven cryptographic engine: block ciphers, hashes and PRNGs
//! are published as descriptor records in process-wide slot tables, and
//! every cipher mode, MAC, AEAD and public-key scheme is written once
//! against those descriptors.
//!
//! ## Architecture
//!
//! - `error`: the closed error taxonomy every entry point returns
//! - `util`: endian/word helpers, constant-time comparison, GF(2^128)
//! - `registry`: descriptor tables, lookup and self-test dispatch
//! - `ciphers`: block-cipher descriptors with embedded known-answer tests
//! - `hashes`: hash descriptors, CHC, SHAKE
//! - `stream`: ChaCha20/Salsa20/RC4 stream state machines
//! - `prngs`: Yarrow, Fortuna, ChaCha20, RC4 and system generators
//! - `modes`: ECB/CBC/CFB/OFB/CTR/LRW/F8/XTS over any registered cipher
//! - `mac`: HMAC, OMAC, PMAC, XCBC, F9, Pelican, Poly1305, BLAKE2 MAC
//! - `encauth`: EAX, CCM, GCM, OCB3, ChaCha20-Poly1305
//! - `math`: the multi-precision integer abstraction
//! - `asn1`: DER codec, PEM, PKCS#8, SPKI, X.509 SPKI walk, SSH wire
//! - `pk`: RSA, DSA, DH, ECC (ECDSA/ECDH), Ed25519, X25519
//! - `kdf`: HKDF, PKCS#5, bcrypt
//! - `misc`: base codecs, CRC-32/Adler-32, padding, constants
//!
//! ## Concurrency
//!
//! Every entry point runs to completion on the caller's thread. The only
//! process-wide state is the descriptor tables; registration is serialized
//! internally and dispatch afterwards is read-only. All cipher/mode/MAC/
//! AEAD states and key objects are caller-owned and must not be shared
//! across threads without external exclusion.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;

pub mod util;

pub mod registry;

pub mod ciphers;

pub mod hashes;

pub mod stream;

pub mod prngs;

pub mod modes;

pub mod mac;

pub mod encauth;

pub mod math;

pub mod asn1;

pub mod pk;

pub mod kdf;

pub mod misc;

// Re-export the types nearly every caller touches
pub use error::{error_to_string, CryptError, CryptResult};
pub use registry::{
    cipher_hash_test, find_cipher, find_hash, find_prng, register_all_ciphers,
    register_all_hashes, register_all_prngs, register_cipher, register_hash, register_prng,
    unregister_cipher, unregister_hash, unregister_prng,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Register every compiled-in cipher, hash and PRNG descriptor. Idempotent
/// and safe to call from multiple threads (registration is serialized).
pub fn register_all() -> CryptResult<()> {
    register_all_ciphers()?;
    register_all_hashes()?;
    register_all_prngs()?;
    Ok(())
}
