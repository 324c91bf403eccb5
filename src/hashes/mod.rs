//! # Hash Functions
//!
//! Descriptor records for every compiled-in hash. The compression functions
//! come from the RustCrypto digest crates; the descriptor layer adds the
//! registry contract (streaming state, OIDs for DER DigestInfo, embedded
//! known-answer tests). CHC — the cipher-hash construction — is built over
//! any registered 128-bit block cipher.

pub mod blake2;
pub mod chc;
pub mod md;
pub mod ripemd;
pub mod sha;
pub mod sha3;
pub mod shake;
pub mod tiger;
pub mod whirlpool;

use crate::error::{CryptError, CryptResult};
use crate::registry::{HashDescriptor, HashOps, HashState};
use digest::Digest;
use std::marker::PhantomData;

/// Every compiled-in hash descriptor, in registration order. CHC is absent:
/// it must be bound to a cipher with [`chc::chc_register`] first.
pub static ALL_HASHES: &[&HashDescriptor] = &[
    &sha::SHA1_DESC,
    &sha::SHA224_DESC,
    &sha::SHA256_DESC,
    &sha::SHA384_DESC,
    &sha::SHA512_DESC,
    &sha3::SHA3_224_DESC,
    &sha3::SHA3_256_DESC,
    &sha3::SHA3_384_DESC,
    &sha3::SHA3_512_DESC,
    &blake2::BLAKE2B_256_DESC,
    &blake2::BLAKE2B_512_DESC,
    &blake2::BLAKE2S_256_DESC,
    &md::MD2_DESC,
    &md::MD4_DESC,
    &md::MD5_DESC,
    &ripemd::RMD128_DESC,
    &ripemd::RMD160_DESC,
    &ripemd::RMD256_DESC,
    &ripemd::RMD320_DESC,
    &tiger::TIGER_DESC,
    &whirlpool::WHIRLPOOL_DESC,
];

/// Generic descriptor ops over a `digest::Digest` implementation plus one
/// embedded known-answer vector.
pub(crate) struct DigestOps<D> {
    kat_msg: &'static [u8],
    kat_hex: &'static str,
    _marker: PhantomData<fn() -> D>,
}

impl<D> DigestOps<D> {
    pub(crate) const fn new(kat_msg: &'static [u8], kat_hex: &'static str) -> Self {
        Self {
            kat_msg,
            kat_hex,
            _marker: PhantomData,
        }
    }
}

struct DigestState<D> {
    inner: D,
}

impl<D> HashState for DigestState<D>
where
    D: Digest + Clone + Send + 'static,
{
    fn process(&mut self, data: &[u8]) -> CryptResult<()> {
        Digest::update(&mut self.inner, data);
        Ok(())
    }

    fn done(self: Box<Self>) -> CryptResult<Vec<u8>> {
        Ok(self.inner.finalize().to_vec())
    }

    fn clone_state(&self) -> Box<dyn HashState> {
        Box::new(DigestState {
            inner: self.inner.clone(),
        })
    }
}

impl<D> HashOps for DigestOps<D>
where
    D: Digest + Clone + Send + Sync + 'static,
{
    fn init(&self) -> CryptResult<Box<dyn HashState>> {
        Ok(Box::new(DigestState { inner: D::new() }))
    }

    fn self_test(&self) -> CryptResult<()> {
        let expect = hex::decode(self.kat_hex).map_err(|_| CryptError::Error)?;
        // one-shot
        let mut st = self.init()?;
        st.process(self.kat_msg)?;
        if st.done()? != expect {
            return Err(CryptError::FailTestvector);
        }
        // split processing must agree with one-shot
        let mut st = self.init()?;
        let mid = self.kat_msg.len() / 2;
        st.process(&self.kat_msg[..mid])?;
        st.process(&self.kat_msg[mid..])?;
        if st.done()? != expect {
            return Err(CryptError::FailTestvector);
        }
        Ok(())
    }
}

/// Declare a `DigestOps` static and its public descriptor record.
macro_rules! digest_descriptor {
    ($ops:ident, $desc:ident, $ty:ty, $name:literal, $id:literal, $oid:literal,
     $digest:literal, $block:literal, $katmsg:literal, $kat:literal) => {
        static $ops: crate::hashes::DigestOps<$ty> =
            crate::hashes::DigestOps::new($katmsg, $kat);

        /// Descriptor record.
        pub static $desc: crate::registry::HashDescriptor = crate::registry::HashDescriptor {
            name: $name,
            id: $id,
            oid: $oid,
            digest_size: $digest,
            block_size: $block,
            ops: &$ops,
        };
    };
}
pub(crate) use digest_descriptor;
