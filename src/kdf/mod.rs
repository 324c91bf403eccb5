//! # Key Derivation
//!
//! HKDF and PKCS#5 (PBKDF1/PBKDF2) over any registered hash, plus the
//! OpenSSH bcrypt KDF.

pub mod bcrypt;
pub mod hkdf;
pub mod pkcs5;

pub use bcrypt::bcrypt_kdf;
pub use hkdf::{hkdf, hkdf_expand, hkdf_extract};
pub use pkcs5::{pkcs5_v1, pkcs5_v2};
