//! BLAKE2b/BLAKE2s keyed MAC mode with runtime-chosen tag length.
//!
//! Built on the blake2 core API: the key length and output length go into
//! the parameter block, and the key (padded to a full compression block) is
//! absorbed as the first block, per the BLAKE2 keyed mode.

use crate::error::{CryptError, CryptResult};
use blake2::{Blake2bVarCore, Blake2sVarCore};
use digest::core_api::{Buffer, UpdateCore, VariableOutputCore};
use digest::Output;
use zeroize::Zeroize;

macro_rules! blake2_mac_impl {
    ($name:ident, $core:ty, $block:expr, $maxout:expr, $doc:literal) => {
        #[doc = $doc]
        pub struct $name {
            core: $core,
            buffer: Buffer<$core>,
            outlen: usize,
        }

        impl $name {
            /// Key the MAC for an `outlen`-byte tag.
            pub fn init(outlen: usize, key: &[u8]) -> CryptResult<Self> {
                if outlen == 0 || outlen > $maxout {
                    return Err(CryptError::InvalidArg);
                }
                if key.is_empty() || key.len() > $maxout {
                    return Err(CryptError::InvalidKeysize);
                }
                let core = <$core>::new_with_params(&[], &[], key.len(), outlen);
                let mut st = Self {
                    core,
                    buffer: Buffer::<$core>::default(),
                    outlen,
                };
                let mut padded = [0u8; $block];
                padded[..key.len()].copy_from_slice(key);
                st.absorb(&padded);
                padded.zeroize();
                Ok(st)
            }

            fn absorb(&mut self, data: &[u8]) {
                let Self { core, buffer, .. } = self;
                buffer.digest_blocks(data, |blocks| core.update_blocks(blocks));
            }

            /// Absorb message bytes.
            pub fn process(&mut self, data: &[u8]) -> CryptResult<()> {
                self.absorb(data);
                Ok(())
            }

            /// Finish; returns the `outlen`-byte tag.
            pub fn done(mut self) -> CryptResult<Vec<u8>> {
                let mut out = Output::<$core>::default();
                self.core.finalize_variable_core(&mut self.buffer, &mut out);
                let tag = out[..self.outlen].to_vec();
                out.as_mut_slice().zeroize();
                Ok(tag)
            }

            /// Finish, writing the leading bytes of the tag into `out`.
            pub fn done_into(self, out: &mut [u8]) -> CryptResult<usize> {
                let tag = self.done()?;
                Ok(super::clamp_tag(&tag, out))
            }
        }
    };
}

blake2_mac_impl!(
    Blake2bMacState,
    Blake2bVarCore,
    128,
    64,
    "BLAKE2b keyed-MAC streaming state (tags up to 64 bytes)."
);

blake2_mac_impl!(
    Blake2sMacState,
    Blake2sVarCore,
    64,
    32,
    "BLAKE2s keyed-MAC streaming state (tags up to 32 bytes)."
);

/// One-shot BLAKE2b MAC of `data`.
pub fn blake2bmac_memory(outlen: usize, key: &[u8], data: &[u8]) -> CryptResult<Vec<u8>> {
    let mut st = Blake2bMacState::init(outlen, key)?;
    st.process(data)?;
    st.done()
}

/// One-shot BLAKE2s MAC of `data`.
pub fn blake2smac_memory(outlen: usize, key: &[u8], data: &[u8]) -> CryptResult<Vec<u8>> {
    let mut st = Blake2sMacState::init(outlen, key)?;
    st.process(data)?;
    st.done()
}
