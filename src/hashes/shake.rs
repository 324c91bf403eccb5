//! SHAKE128/SHAKE256 extendable-output functions.
//!
//! These sit outside the descriptor tables because their output length is
//! chosen per call; the registry's self-test dispatch invokes
//! [`shake_test`] explicitly.

use crate::error::{CryptError, CryptResult};
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Shake128, Shake256};

/// SHAKE128 of `data`, producing `outlen` bytes.
pub fn shake128(data: &[u8], outlen: usize) -> Vec<u8> {
    let mut xof = Shake128::default();
    xof.update(data);
    let mut reader = xof.finalize_xof();
    let mut out = vec![0u8; outlen];
    reader.read(&mut out);
    out
}

/// SHAKE256 of `data`, producing `outlen` bytes.
pub fn shake256(data: &[u8], outlen: usize) -> Vec<u8> {
    let mut xof = Shake256::default();
    xof.update(data);
    let mut reader = xof.finalize_xof();
    let mut out = vec![0u8; outlen];
    reader.read(&mut out);
    out
}

/// Known-answer tests for both XOFs (empty input, 32-byte output).
pub fn shake_test() -> CryptResult<()> {
    let expect128 =
        hex::decode("7f9c2ba4e88f827d616045507605853ed73b8093f6efbc88eb1a6eacfa66ef26")
            .map_err(|_| CryptError::Error)?;
    if shake128(b"", 32) != expect128 {
        return Err(CryptError::FailTestvector);
    }
    let expect256 =
        hex::decode("46b9dd2b0ba88d13233b3feb743eeb243fcd52ea62b81b82b50c27646ed5762f")
            .map_err(|_| CryptError::Error)?;
    if shake256(b"", 32) != expect256 {
        return Err(CryptError::FailTestvector);
    }
    Ok(())
}
