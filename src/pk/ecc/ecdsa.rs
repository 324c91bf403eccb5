//! ECDSA over the named curves: one shared signing loop (with scalar
//! blinding and recovery-id capture) and four signature encodings.

use super::point::{self, EccPoint};
use super::EccKey;
use crate::asn1::ssh::{SshReader, SshWriter};
use crate::asn1::value::{der_decode_exact, der_encode, DerValue};
use crate::error::{CryptError, CryptResult};
use crate::math::{Int, Mpi};
use crate::pk::KeyType;
use rand_core::RngCore;

/// Reduce a message digest to an integer: leftmost `bits(n)` bits,
/// zero-extended when the digest is short.
pub(crate) fn hash_to_int(hash: &[u8], order: &Int) -> Int {
    let pbits = order.bit_length();
    let pbytes = (pbits + 7) / 8;
    if pbits > hash.len() * 8 {
        Int::from_bytes_be(hash)
    } else if pbits % 8 == 0 {
        Int::from_bytes_be(&hash[..pbytes])
    } else {
        // drop the low bits that fall outside the order's bit length
        let shift = 8 - pbits % 8;
        let mut buf = vec![0u8; pbytes];
        let mut carry = 0u8;
        for (x, byte) in hash.iter().take(pbytes).enumerate() {
            buf[x] = carry | (byte >> shift);
            carry = byte << (8 - shift);
        }
        Int::from_bytes_be(&buf)
    }
}

/// One raw signature with its recovery id.
pub struct EcdsaSignature {
    /// First half.
    pub r: Int,
    /// Second half.
    pub s: Int,
    /// Bit 0: parity of R.y; bit 1: whether R.x wrapped mod n.
    pub recid: u8,
}

/// The shared signing loop: blinded `s = (e + k_priv·r)/k_eph mod n`.
pub fn sign_hash_internal<R: RngCore>(
    key: &EccKey,
    rng: &mut R,
    hash: &[u8],
) -> CryptResult<EcdsaSignature> {
    if key.key_type != KeyType::Private {
        return Err(CryptError::PkNotPrivate);
    }
    let dom = &key.domain;
    let n = &dom.order;
    let e = hash_to_int(hash, n);
    let g = EccPoint::from_affine(dom.gx.clone(), dom.gy.clone());

    for _ in 0..crate::pk::PK_MAX_RETRIES {
        let k = Int::rand_below(rng, n);
        if k.is_zero() {
            continue;
        }
        let big_r = point::point_mul(&k, &g, dom)?;
        let (rx, ry) = big_r.to_affine(dom)?;
        let r = rx.rem(n)?;
        if r.is_zero() {
            continue;
        }
        // recovery id: x wrap count (bit 1) and y parity (bit 0)
        let mut recid = 0u8;
        if rx >= *n {
            recid |= 2;
        }
        if ry.is_odd() {
            recid |= 1;
        }

        // s = b·(e/(kb) + x·r/(kb))
        let b = loop {
            let b = Int::rand_below(rng, n);
            if !b.is_zero() {
                break b;
            }
        };
        let kb_inv = k.mul_mod(&b, n)?.invmod(n)?;
        let xr = key.k.mul_mod(&r, n)?;
        let s = kb_inv
            .mul_mod(&xr, n)?
            .add_mod(&kb_inv.mul_mod(&e, n)?, n)?
            .mul_mod(&b, n)?;
        if s.is_zero() {
            continue;
        }
        return Ok(EcdsaSignature { r, s, recid });
    }
    Err(CryptError::Error)
}

/// The shared verification: `R' = u1·G + u2·Q`, accept iff `R'.x ≡ r`.
pub fn verify_hash_internal(key: &EccKey, hash: &[u8], r: &Int, s: &Int) -> CryptResult<()> {
    let dom = &key.domain;
    let n = &dom.order;
    if r.is_zero() || s.is_zero() || r >= n || s >= n {
        return Err(CryptError::InvalidPacket);
    }
    let e = hash_to_int(hash, n);
    let w = s.invmod(n)?;
    let u1 = e.mul_mod(&w, n)?;
    let u2 = r.mul_mod(&w, n)?;
    let g = EccPoint::from_affine(dom.gx.clone(), dom.gy.clone());
    let q = EccPoint::from_affine(key.public.0.clone(), key.public.1.clone());
    let rp = point::point_mul2(&u1, &g, &u2, &q, dom)?;
    if rp.is_infinity() {
        return Err(CryptError::InvalidPacket);
    }
    let (x, _) = rp.to_affine(dom)?;
    if &x.rem(n)? != r {
        return Err(CryptError::InvalidPacket);
    }
    Ok(())
}

impl EccKey {
    /// Sign, ANSI X9.62 encoding: DER `SEQUENCE { r, s }`.
    pub fn sign_hash<R: RngCore>(&self, rng: &mut R, hash: &[u8]) -> CryptResult<Vec<u8>> {
        let sig = sign_hash_internal(self, rng, hash)?;
        der_encode(&DerValue::Sequence(vec![
            DerValue::uint(&sig.r),
            DerValue::uint(&sig.s),
        ]))
    }

    /// Verify an ANSI X9.62 signature.
    pub fn verify_hash(&self, hash: &[u8], sig: &[u8]) -> CryptResult<()> {
        let tree = der_decode_exact(sig)?;
        let children = match &tree {
            DerValue::Sequence(c) if c.len() == 2 => c,
            _ => return Err(CryptError::InvalidPacket),
        };
        verify_hash_internal(self, hash, children[0].as_uint()?, children[1].as_uint()?)
    }

    /// Sign, RFC 7518 (JWS) encoding: `r ∥ s`, each padded to the order
    /// byte length.
    pub fn sign_hash_rfc7518<R: RngCore>(&self, rng: &mut R, hash: &[u8]) -> CryptResult<Vec<u8>> {
        let sig = sign_hash_internal(self, rng, hash)?;
        let size = (self.domain.order.bit_length() + 7) / 8;
        let mut out = sig.r.to_bytes_be_padded(size)?;
        out.extend_from_slice(&sig.s.to_bytes_be_padded(size)?);
        Ok(out)
    }

    /// Verify an RFC 7518 signature.
    pub fn verify_hash_rfc7518(&self, hash: &[u8], sig: &[u8]) -> CryptResult<()> {
        let size = (self.domain.order.bit_length() + 7) / 8;
        if sig.len() != 2 * size {
            return Err(CryptError::InvalidPacket);
        }
        let r = Int::from_bytes_be(&sig[..size]);
        let s = Int::from_bytes_be(&sig[size..]);
        verify_hash_internal(self, hash, &r, &s)
    }

    /// Sign, Ethereum encoding: `r(32) ∥ s(32) ∥ recid+27`; secp256k1
    /// only.
    pub fn sign_hash_eth27<R: RngCore>(&self, rng: &mut R, hash: &[u8]) -> CryptResult<Vec<u8>> {
        if self.domain.name != "secp256k1" {
            return Err(CryptError::PkInvalidType);
        }
        let sig = sign_hash_internal(self, rng, hash)?;
        let mut out = sig.r.to_bytes_be_padded(32)?;
        out.extend_from_slice(&sig.s.to_bytes_be_padded(32)?);
        out.push(sig.recid + 27);
        Ok(out)
    }

    /// Verify an Ethereum-encoded signature.
    pub fn verify_hash_eth27(&self, hash: &[u8], sig: &[u8]) -> CryptResult<()> {
        if self.domain.name != "secp256k1" {
            return Err(CryptError::PkInvalidType);
        }
        if sig.len() != 65 || !(27..=30).contains(&sig[64]) {
            return Err(CryptError::InvalidPacket);
        }
        let r = Int::from_bytes_be(&sig[..32]);
        let s = Int::from_bytes_be(&sig[32..64]);
        verify_hash_internal(self, hash, &r, &s)
    }

    /// Sign, RFC 5656 (SSH) encoding: `string(curve) ∥ mpint(r) ∥
    /// mpint(s)`.
    pub fn sign_hash_rfc5656<R: RngCore>(&self, rng: &mut R, hash: &[u8]) -> CryptResult<Vec<u8>> {
        let name = self.domain.ssh_name().ok_or(CryptError::PkInvalidType)?;
        let sig = sign_hash_internal(self, rng, hash)?;
        let mut w = SshWriter::new();
        w.put_string(name.as_bytes());
        w.put_mpint(&sig.r);
        w.put_mpint(&sig.s);
        Ok(w.finish())
    }

    /// Verify an RFC 5656 signature.
    pub fn verify_hash_rfc5656(&self, hash: &[u8], sig: &[u8]) -> CryptResult<()> {
        let name = self.domain.ssh_name().ok_or(CryptError::PkInvalidType)?;
        let mut r = SshReader::new(sig);
        let curve = r.get_string()?;
        if curve != name.as_bytes() {
            return Err(CryptError::InvalidPacket);
        }
        let rr = r.get_mpint()?;
        let ss = r.get_mpint()?;
        if !r.is_empty() {
            return Err(CryptError::InputTooLong);
        }
        verify_hash_internal(self, hash, &rr, &ss)
    }
}
