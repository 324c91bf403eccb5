//! # Authenticated Encryption
//!
//! AEAD modes over the registry: EAX, CCM, GCM, OCB3 and
//! ChaCha20-Poly1305. Every mode exposes a streaming state machine plus a
//! one-shot `memory` pair, and every decrypt-side tag comparison is
//! constant-time.

pub mod ccm;
pub mod chacha20poly1305;
pub mod eax;
pub mod gcm;
pub mod ocb3;

pub use ccm::{ccm_memory_decrypt, ccm_memory_encrypt};
pub use chacha20poly1305::ChaCha20Poly1305State;
pub use eax::EaxState;
pub use gcm::GcmState;
pub use ocb3::Ocb3State;

use crate::error::{CryptError, CryptResult};
use crate::util::ct_eq;
use zeroize::Zeroize;

/// Constant-time comparison of a computed tag against the received one.
/// The computed tag is wiped either way.
pub(crate) fn verify_tag(mut computed: Vec<u8>, received: &[u8]) -> CryptResult<()> {
    let ok = ct_eq(&computed[..computed.len().min(received.len())], received)
        && computed.len() >= received.len()
        && !received.is_empty();
    computed.zeroize();
    if ok {
        Ok(())
    } else {
        Err(CryptError::Error)
    }
}

#[cfg(test)]
pub(crate) mod testutil {
    use crate::registry::{find_cipher, register_all_ciphers};

    pub fn aes_slot() -> usize {
        register_all_ciphers().unwrap();
        find_cipher("aes").unwrap()
    }
}
