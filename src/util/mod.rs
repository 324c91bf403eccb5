//! # Shared Utilities
//!
//! Endian and word helpers, constant-time comparison and the GF(2^128)
//! arithmetic shared by the XEX-style modes and MACs.

pub mod ct;
pub mod endian;
pub mod gf128;

pub use ct::{ct_eq, mem_neq};
pub use endian::{ctr_increment_be, ctr_increment_le, load32_be, load32_le, load64_be, load64_le,
                 store32_be, store32_le, store64_be, store64_le, xor_into};
pub use gf128::{gf_double, gf_double_le, gf_mult};

/// Largest block length (octets) of any registered block cipher.
pub const MAX_BLOCK_LEN: usize = 16;

/// Largest hash block length (octets) of any registered hash.
pub const MAX_HASH_BLOCK: usize = 144;

/// Largest digest length (octets) of any registered hash.
pub const MAX_DIGEST_LEN: usize = 64;
