//! # Miscellaneous
//!
//! Base16/32/64 codecs, CRC-32 and Adler-32 checksums, block padding, and
//! the compile-time constants module used by binding discovery.

pub mod adler32;
pub mod base;
pub mod constants;
pub mod crc32;
pub mod padding;

pub use adler32::Adler32;
pub use base::{
    base16_decode, base16_encode, base32_decode, base32_encode, base64_decode, base64_encode,
    base64url_decode, base64url_encode,
};
pub use constants::{get_constant, get_size, list_all_constants, list_all_sizes};
pub use crc32::Crc32;
pub use padding::{pad, unpad, PaddingMode};
