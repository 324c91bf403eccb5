//! CCM mode (RFC 3610): CBC-MAC over a formatted header then CTR
//! encryption. CCM needs the message length up front, so the interface is
//! one-shot.

use super::verify_tag;
use crate::error::{CryptError, CryptResult};
use crate::registry::{self, ScheduledKey};
use crate::util::{ctr_increment_be, xor_into};

const BLOCK: usize = 16;

struct CbcMac {
    key: Box<dyn ScheduledKey>,
    x: [u8; BLOCK],
}

impl CbcMac {
    fn absorb_block(&mut self, block: &[u8; BLOCK]) -> CryptResult<()> {
        xor_into(&mut self.x, block);
        let x = self.x;
        self.key.encrypt_block(&x, &mut self.x)?;
        Ok(())
    }

    /// Absorb `data` zero-padded to a block boundary.
    fn absorb_padded(&mut self, data: &[u8]) -> CryptResult<()> {
        for chunk in data.chunks(BLOCK) {
            let mut block = [0u8; BLOCK];
            block[..chunk.len()].copy_from_slice(chunk);
            self.absorb_block(&block)?;
        }
        Ok(())
    }
}

fn format_b0(
    nonce: &[u8],
    aad_present: bool,
    taglen: usize,
    ptlen: usize,
) -> CryptResult<[u8; BLOCK]> {
    let l = 15 - nonce.len();
    let mut b0 = [0u8; BLOCK];
    b0[0] = (u8::from(aad_present) << 6) | ((((taglen - 2) / 2) as u8) << 3) | ((l - 1) as u8);
    b0[1..1 + nonce.len()].copy_from_slice(nonce);
    let mut len = ptlen;
    for x in (1 + nonce.len()..BLOCK).rev() {
        b0[x] = (len & 0xFF) as u8;
        len >>= 8;
    }
    // the message length must fit the L field the nonce leaves room for
    if len != 0 {
        return Err(CryptError::InvalidArg);
    }
    Ok(b0)
}

fn validate(cipher: usize, nonce: &[u8], taglen: usize) -> CryptResult<()> {
    let desc = registry::cipher_descriptor(cipher)?;
    if desc.block_length != BLOCK {
        return Err(CryptError::InvalidArg);
    }
    if !(7..=13).contains(&nonce.len()) {
        return Err(CryptError::InvalidArg);
    }
    if !(4..=16).contains(&taglen) || taglen % 2 != 0 {
        return Err(CryptError::InvalidArg);
    }
    Ok(())
}

fn ccm_core(
    cipher: usize,
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    taglen: usize,
    input: &[u8],
    encrypting: bool,
) -> CryptResult<(Vec<u8>, Vec<u8>)> {
    validate(cipher, nonce, taglen)?;
    if aad.len() >= 0xFF00 {
        // longer AAD needs the extended length markers; out of scope here
        return Err(CryptError::InvalidArg);
    }
    let desc = registry::cipher_descriptor(cipher)?;
    let sk = desc.setup(key, 0)?;
    let l = 15 - nonce.len();

    // counter blocks: flags || nonce || index
    let mut a = [0u8; BLOCK];
    a[0] = (l - 1) as u8;
    a[1..1 + nonce.len()].copy_from_slice(nonce);
    let mut s0 = [0u8; BLOCK];
    sk.encrypt_block(&a, &mut s0)?;

    // keystream for the payload starts at counter 1
    let mut output = vec![0u8; input.len()];
    let mut pad = [0u8; BLOCK];
    for (x, chunk) in input.chunks(BLOCK).enumerate() {
        ctr_increment_be(&mut a, l);
        sk.encrypt_block(&a, &mut pad)?;
        let off = x * BLOCK;
        for (y, byte) in chunk.iter().enumerate() {
            output[off + y] = byte ^ pad[y];
        }
    }

    let pt: &[u8] = if encrypting { input } else { &output };

    // CBC-MAC over B0, the length-prefixed AAD and the plaintext
    let mut mac = CbcMac {
        key: sk,
        x: [0u8; BLOCK],
    };
    mac.absorb_block(&format_b0(nonce, !aad.is_empty(), taglen, pt.len())?)?;
    if !aad.is_empty() {
        let mut framed = Vec::with_capacity(2 + aad.len());
        framed.extend_from_slice(&(aad.len() as u16).to_be_bytes());
        framed.extend_from_slice(aad);
        mac.absorb_padded(&framed)?;
    }
    mac.absorb_padded(pt)?;

    let mut tag = mac.x[..taglen].to_vec();
    xor_into(&mut tag, &s0[..taglen]);
    Ok((output, tag))
}

/// One-shot CCM encryption; returns `(ciphertext, tag)`.
pub fn ccm_memory_encrypt(
    cipher: usize,
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    pt: &[u8],
    taglen: usize,
) -> CryptResult<(Vec<u8>, Vec<u8>)> {
    ccm_core(cipher, key, nonce, aad, taglen, pt, true)
}

/// One-shot CCM decryption with tag verification.
pub fn ccm_memory_decrypt(
    cipher: usize,
    key: &[u8],
    nonce: &[u8],
    aad: &[u8],
    ct: &[u8],
    tag: &[u8],
) -> CryptResult<Vec<u8>> {
    let (pt, computed) = ccm_core(cipher, key, nonce, aad, tag.len(), ct, false)?;
    verify_tag(computed, tag)?;
    Ok(pt)
}
