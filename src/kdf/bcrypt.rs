//! The OpenSSH bcrypt KDF, as used by the `openssh-key-v1` container.

use crate::error::{CryptError, CryptResult};

/// Derive `out.len()` bytes from a passphrase and salt with the given
/// round count. Rounds must be non-zero; output 1..=64 bytes per the
/// underlying construction's block limit.
pub fn bcrypt_kdf(password: &[u8], salt: &[u8], rounds: u32, out: &mut [u8]) -> CryptResult<()> {
    if password.is_empty() || salt.is_empty() || rounds == 0 || out.is_empty() {
        return Err(CryptError::InvalidArg);
    }
    bcrypt_pbkdf::bcrypt_pbkdf(password, salt, rounds, out).map_err(|_| CryptError::Error)
}
