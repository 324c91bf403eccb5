//! # Public-Key Schemes
//!
//! RSA, DSA, DH, ECC over named prime curves, Ed25519 and X25519, all
//! expressed over the [`crate::math::Mpi`] abstraction and the
//! [`crate::asn1`] codec. Key objects own their integers and wipe the
//! private parts on drop; every import validates group/curve membership
//! before accepting a key.

pub mod curve25519;
pub mod dh;
pub mod dsa;
pub mod ecc;
pub mod pkcs1;
pub mod rsa;

/// Whether a key object carries private material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    /// Public half only.
    Public,
    /// Public and private halves.
    Private,
}

/// Retry bound for randomized generation loops (ephemeral keys, primes
/// with side conditions).
pub(crate) const PK_MAX_RETRIES: usize = 30;
