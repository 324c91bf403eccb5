//! DSA: parameter/key generation, signing and verification, with the
//! OpenSSL-compatible DER layouts.

use super::KeyType;
use crate::asn1::spki::{decode_spki, encode_spki, Spki};
use crate::asn1::value::{der_decode_exact, der_encode, DerValue};
use crate::error::{CryptError, CryptResult};
use crate::math::{Int, Mpi};
use rand_core::RngCore;

/// id-dsa OID.
pub const OID_DSA: &[u32] = &[1, 2, 840, 10040, 4, 1];

/// A DSA key (or public half).
pub struct DsaKey {
    /// Which halves are populated.
    pub key_type: KeyType,
    /// Prime modulus.
    pub p: Int,
    /// Prime group order, divides `p - 1`.
    pub q: Int,
    /// Generator of the order-q subgroup.
    pub g: Int,
    /// Public value `g^x mod p`.
    pub y: Int,
    /// Private exponent (zero for public keys).
    pub x: Int,
    /// Byte size of `q`, cached for hash truncation.
    pub qord: usize,
}

impl Drop for DsaKey {
    fn drop(&mut self) {
        self.x.wipe();
    }
}

fn validate_sizes(group_size: usize, modulus_size: usize) -> CryptResult<()> {
    // bounds carried from the reference implementation
    if group_size < 15 || group_size >= 1024 {
        return Err(CryptError::InvalidArg);
    }
    if modulus_size < 48 || modulus_size > 512 || group_size + 8 > modulus_size {
        return Err(CryptError::InvalidArg);
    }
    Ok(())
}

impl DsaKey {
    /// Generate domain parameters and a key pair. `group_size` and
    /// `modulus_size` are the byte sizes of q and p.
    pub fn generate<R: RngCore>(
        rng: &mut R,
        group_size: usize,
        modulus_size: usize,
    ) -> CryptResult<Self> {
        validate_sizes(group_size, modulus_size)?;
        let one = Int::from_u32(1);
        let two = Int::from_u32(2);

        let q = Int::gen_prime(rng, group_size * 8)?;
        let two_q = q.mul(&two);

        // search p = X - (X mod 2q) + 1 of the requested size
        tracing::debug!(group_size, modulus_size, "dsa parameter search");
        let p = loop {
            let mut raw = vec![0u8; modulus_size];
            rng.fill_bytes(&mut raw);
            raw[0] |= 0x80;
            raw[modulus_size - 1] |= 0x01;
            let x = Int::from_bytes_be(&raw);
            let candidate = x.sub(&x.rem(&two_q)?)?.add(&one);
            if candidate.bit_length() == modulus_size * 8 && candidate.is_prime() {
                break candidate;
            }
        };

        // g = h^((p-1)/q) mod p, g > 1
        let p1 = p.sub(&one)?;
        let exp = p1.div_rem(&q)?.0;
        let mut h = two.clone();
        let g = loop {
            let g = h.exptmod(&exp, &p)?;
            if g.cmp_u32(1) == std::cmp::Ordering::Greater {
                break g;
            }
            h = h.add(&one);
        };

        // x ∈ [1, q-1], y = g^x
        let x = loop {
            let x = Int::rand_below(rng, &q);
            if !x.is_zero() {
                break x;
            }
        };
        let y = g.exptmod(&x, &p)?;

        Ok(Self {
            key_type: KeyType::Private,
            p,
            q,
            g,
            y,
            x,
            qord: group_size,
        })
    }

    fn reduce_hash(&self, hash: &[u8]) -> Int {
        // leftmost min(|hash|, |q|) bytes
        let take = hash.len().min(self.qord);
        Int::from_bytes_be(&hash[..take])
    }

    /// Sign a message hash; returns `(r, s)`.
    pub fn sign_hash<R: RngCore>(&self, rng: &mut R, hash: &[u8]) -> CryptResult<(Int, Int)> {
        if self.key_type != KeyType::Private {
            return Err(CryptError::PkNotPrivate);
        }
        let e = self.reduce_hash(hash);
        for _ in 0..super::PK_MAX_RETRIES {
            let k = Int::rand_below(rng, &self.q);
            if k.is_zero() || k.gcd(&self.q).cmp_u32(1) != std::cmp::Ordering::Equal {
                continue;
            }
            let r = self.g.exptmod(&k, &self.p)?.rem(&self.q)?;
            if r.is_zero() {
                continue;
            }
            let kinv = k.invmod(&self.q)?;
            let s = kinv
                .mul_mod(&e.add(&self.x.mul(&r)), &self.q)?;
            if s.is_zero() {
                continue;
            }
            return Ok((r, s));
        }
        Err(CryptError::Error)
    }

    /// Verify `(r, s)` over a message hash.
    pub fn verify_hash(&self, hash: &[u8], r: &Int, s: &Int) -> CryptResult<()> {
        if r.is_zero() || s.is_zero() || r >= &self.q || s >= &self.q {
            return Err(CryptError::InvalidPacket);
        }
        let e = self.reduce_hash(hash);
        let w = s.invmod(&self.q)?;
        let u1 = e.mul_mod(&w, &self.q)?;
        let u2 = r.mul_mod(&w, &self.q)?;
        let v = self
            .g
            .exptmod(&u1, &self.p)?
            .mul_mod(&self.y.exptmod(&u2, &self.p)?, &self.p)?
            .rem(&self.q)?;
        if &v != r {
            return Err(CryptError::InvalidPacket);
        }
        Ok(())
    }

    /// Sign and DER-encode as `SEQUENCE { r, s }`.
    pub fn sign_hash_der<R: RngCore>(&self, rng: &mut R, hash: &[u8]) -> CryptResult<Vec<u8>> {
        let (r, s) = self.sign_hash(rng, hash)?;
        der_encode(&DerValue::Sequence(vec![
            DerValue::uint(&r),
            DerValue::uint(&s),
        ]))
    }

    /// Verify a DER `SEQUENCE { r, s }` signature.
    pub fn verify_hash_der(&self, hash: &[u8], sig: &[u8]) -> CryptResult<()> {
        let tree = der_decode_exact(sig)?;
        let children = match &tree {
            DerValue::Sequence(c) if c.len() == 2 => c,
            _ => return Err(CryptError::InvalidPacket),
        };
        self.verify_hash(hash, children[0].as_uint()?, children[1].as_uint()?)
    }

    /// Export: private keys use the OpenSSL `SEQUENCE { 0, p, q, g, y, x }`
    /// layout, public keys an SPKI whose parameters are
    /// `SEQUENCE { p, q, g }`.
    pub fn export(&self, which: KeyType) -> CryptResult<Vec<u8>> {
        match which {
            KeyType::Private => {
                if self.key_type != KeyType::Private {
                    return Err(CryptError::PkTypeMismatch);
                }
                der_encode(&DerValue::Sequence(vec![
                    DerValue::uint(&Int::zero()),
                    DerValue::uint(&self.p),
                    DerValue::uint(&self.q),
                    DerValue::uint(&self.g),
                    DerValue::uint(&self.y),
                    DerValue::uint(&self.x),
                ]))
            }
            KeyType::Public => {
                let y_der = der_encode(&DerValue::uint(&self.y))?;
                encode_spki(&Spki {
                    algorithm: OID_DSA.to_vec(),
                    parameters: Some(DerValue::Sequence(vec![
                        DerValue::uint(&self.p),
                        DerValue::uint(&self.q),
                        DerValue::uint(&self.g),
                    ])),
                    public_key: y_der,
                })
            }
        }
    }

    /// Import either export layout.
    pub fn import(der: &[u8]) -> CryptResult<Self> {
        if let Ok(spki) = decode_spki(der) {
            if spki.algorithm == OID_DSA {
                let params = match &spki.parameters {
                    Some(DerValue::Sequence(p)) if p.len() == 3 => p,
                    _ => return Err(CryptError::InvalidPacket),
                };
                let y = der_decode_exact(&spki.public_key)?;
                let key = Self {
                    key_type: KeyType::Public,
                    p: params[0].as_uint()?.clone(),
                    q: params[1].as_uint()?.clone(),
                    g: params[2].as_uint()?.clone(),
                    y: y.as_uint()?.clone(),
                    x: Int::zero(),
                    qord: 0,
                };
                return key.finish_import();
            }
        }
        let tree = der_decode_exact(der)?;
        let children = match &tree {
            DerValue::Sequence(c) if c.len() == 6 => c,
            _ => return Err(CryptError::InvalidPacket),
        };
        if !children[0].as_uint()?.is_zero() {
            return Err(CryptError::InvalidPacket);
        }
        let key = Self {
            key_type: KeyType::Private,
            p: children[1].as_uint()?.clone(),
            q: children[2].as_uint()?.clone(),
            g: children[3].as_uint()?.clone(),
            y: children[4].as_uint()?.clone(),
            x: children[5].as_uint()?.clone(),
            qord: 0,
        };
        key.finish_import()
    }

    fn finish_import(mut self) -> CryptResult<Self> {
        self.qord = (self.q.bit_length() + 7) / 8;
        // group sanity: q | p-1, 1 < g < p, g^q ≡ 1, y in group
        let one = Int::from_u32(1);
        let p1 = self.p.sub(&one)?;
        if !p1.rem(&self.q)?.is_zero()
            || self.g.cmp_u32(1) != std::cmp::Ordering::Greater
            || self.g >= self.p
            || self.g.exptmod(&self.q, &self.p)? != one
            || self.y.is_zero()
            || self.y >= self.p
        {
            return Err(CryptError::InvalidPacket);
        }
        if self.key_type == KeyType::Private && self.g.exptmod(&self.x, &self.p)? != self.y {
            return Err(CryptError::InvalidPacket);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    fn small_key() -> DsaKey {
        // 20-byte q / 96-byte p keeps the test fast while exercising the
        // full generation path
        DsaKey::generate(&mut OsRng, 20, 96).unwrap()
    }

    #[test]
    fn test_generate_invariants() {
        let key = small_key();
        let one = Int::from_u32(1);
        assert!(key.p.is_prime());
        assert!(key.q.is_prime());
        assert!(key
            .p
            .sub(&one)
            .unwrap()
            .rem(&key.q)
            .unwrap()
            .is_zero());
        assert_eq!(key.g.exptmod(&key.q, &key.p).unwrap(), one);
        assert_eq!(key.g.exptmod(&key.x, &key.p).unwrap(), key.y);
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let key = small_key();
        let hash = [0xC3u8; 20];
        let sig = key.sign_hash_der(&mut OsRng, &hash).unwrap();
        key.verify_hash_der(&hash, &sig).unwrap();

        let mut bad = hash;
        bad[0] ^= 1;
        assert!(key.verify_hash_der(&bad, &sig).is_err());
    }

    #[test]
    fn test_export_import_public() {
        let key = small_key();
        let pub_der = key.export(KeyType::Public).unwrap();
        let public = DsaKey::import(&pub_der).unwrap();
        assert_eq!(public.key_type, KeyType::Public);
        assert_eq!(public.qord, key.qord);

        let hash = [0x11u8; 20];
        let sig = key.sign_hash_der(&mut OsRng, &hash).unwrap();
        public.verify_hash_der(&hash, &sig).unwrap();
    }

    #[test]
    fn test_export_import_private() {
        let key = small_key();
        let der = key.export(KeyType::Private).unwrap();
        let back = DsaKey::import(&der).unwrap();
        assert_eq!(back.key_type, KeyType::Private);
        assert_eq!(back.y, key.y);
    }

    #[test]
    fn test_bad_sizes_rejected() {
        assert!(DsaKey::generate(&mut OsRng, 14, 96).is_err());
        assert!(DsaKey::generate(&mut OsRng, 20, 24).is_err());
    }
}
