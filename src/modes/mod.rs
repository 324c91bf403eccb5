//! # Cipher Modes
//!
//! Confidentiality modes as streaming state machines over any registered
//! block cipher. Byte-oriented modes (CFB, OFB, CTR) accept any length and
//! buffer partial pads; block-oriented modes (ECB, CBC, LRW, F8) require a
//! multiple of the block length; XTS handles a ciphertext-stealing tail.

pub mod cbc;
pub mod cfb;
pub mod ctr;
pub mod ecb;
pub mod f8;
pub mod lrw;
pub mod ofb;
pub mod xts;

pub use cbc::CbcState;
pub use cfb::{CfbState, CfbWidth};
pub use ctr::{CounterEndian, CtrState};
pub use ecb::EcbState;
pub use f8::F8State;
pub use lrw::LrwState;
pub use ofb::OfbState;
pub use xts::XtsState;

use crate::error::{CryptError, CryptResult};
use crate::registry::{self, ScheduledKey};

/// Validate a cipher slot and schedule `key` under it.
pub(crate) fn schedule(
    cipher: usize,
    key: &[u8],
    num_rounds: u32,
) -> CryptResult<(Box<dyn ScheduledKey>, usize)> {
    let desc = registry::cipher_descriptor(cipher)?;
    let sk = desc.setup(key, num_rounds)?;
    Ok((sk, desc.block_length))
}

#[cfg(test)]
pub(crate) mod testutil {
    use crate::registry::{find_cipher, register_all_ciphers};

    pub fn aes_slot() -> usize {
        register_all_ciphers().unwrap();
        find_cipher("aes").unwrap()
    }

    pub fn des_slot() -> usize {
        register_all_ciphers().unwrap();
        find_cipher("des").unwrap()
    }
}
