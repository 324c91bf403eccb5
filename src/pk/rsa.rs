//! RSA keys: generation, the blinded CRT private operation, OAEP/PSS/v1.5
//! wrappers and PKCS#1/PKCS#8/SPKI/PEM interchange.

use super::pkcs1;
use super::KeyType;
use crate::asn1::pem::{pem_decode, pem_encode};
use crate::asn1::pkcs8::{decode_pkcs8, encode_pkcs8};
use crate::asn1::spki::{decode_spki, encode_spki, Spki};
use crate::asn1::value::{der_decode_exact, der_encode, DerValue};
use crate::error::{CryptError, CryptResult};
use crate::math::{Int, Mpi};
use crate::util::ct_eq;
use rand_core::RngCore;

/// Smallest accepted modulus, bits.
pub const MIN_RSA_SIZE: usize = 1024;
/// Largest accepted modulus, bits.
pub const MAX_RSA_SIZE: usize = 4096;

/// rsaEncryption OID.
pub const OID_RSA: &[u32] = &[1, 2, 840, 113549, 1, 1, 1];

/// An RSA key pair (or public half).
pub struct RsaKey {
    /// Which halves are populated.
    pub key_type: KeyType,
    /// Modulus.
    pub n: Int,
    /// Public exponent.
    pub e: Int,
    /// Private exponent (zero for public keys).
    pub d: Int,
    /// First prime.
    pub p: Int,
    /// Second prime.
    pub q: Int,
    /// `d mod (p-1)`.
    pub dp: Int,
    /// `d mod (q-1)`.
    pub dq: Int,
    /// `q⁻¹ mod p`.
    pub qp: Int,
}

impl Drop for RsaKey {
    fn drop(&mut self) {
        self.d.wipe();
        self.p.wipe();
        self.q.wipe();
        self.dp.wipe();
        self.dq.wipe();
        self.qp.wipe();
    }
}

impl RsaKey {
    /// Modulus length in bytes.
    pub fn size(&self) -> usize {
        (self.n.bit_length() + 7) / 8
    }

    /// Generate a key of `bits` modulus bits with public exponent `e`.
    pub fn generate<R: RngCore>(rng: &mut R, bits: usize, e: u32) -> CryptResult<Self> {
        if !(MIN_RSA_SIZE..=MAX_RSA_SIZE).contains(&bits) || bits % 8 != 0 {
            return Err(CryptError::InvalidKeysize);
        }
        if e < 3 || e % 2 == 0 {
            return Err(CryptError::InvalidArg);
        }
        let e_int = Int::from_u32(e);
        let one = Int::from_u32(1);

        tracing::debug!(bits, "rsa key generation start");
        let (p, q, n) = loop {
            let p = Int::gen_prime(rng, bits / 2)?;
            if p.sub(&one)?.gcd(&e_int).cmp_u32(1) != std::cmp::Ordering::Equal {
                continue;
            }
            let q = Int::gen_prime(rng, bits / 2)?;
            if q == p || q.sub(&one)?.gcd(&e_int).cmp_u32(1) != std::cmp::Ordering::Equal {
                continue;
            }
            let n = p.mul(&q);
            if n.bit_length() == bits {
                break (p, q, n);
            }
        };

        let p1 = p.sub(&one)?;
        let q1 = q.sub(&one)?;
        let d = e_int.invmod(&p1.lcm(&q1))?;
        let dp = d.rem(&p1)?;
        let dq = d.rem(&q1)?;
        let qp = q.invmod(&p)?;
        tracing::debug!(bits, "rsa key generation done");

        Ok(Self {
            key_type: KeyType::Private,
            n,
            e: e_int,
            d,
            p,
            q,
            dp,
            dq,
            qp,
        })
    }

    /// The raw RSA primitive: `m^e` or (blinded CRT) `m^d` mod n. Output is
    /// left-padded to the modulus size.
    pub fn exptmod<R: RngCore>(
        &self,
        rng: &mut R,
        input: &[u8],
        which: KeyType,
    ) -> CryptResult<Vec<u8>> {
        if which == KeyType::Private && self.key_type != KeyType::Private {
            return Err(CryptError::PkNotPrivate);
        }
        let m = Int::from_bytes_be(input);
        if m >= self.n {
            return Err(CryptError::PkInvalidSize);
        }
        let result = match which {
            KeyType::Public => m.exptmod(&self.e, &self.n)?,
            KeyType::Private => {
                // blinding: (r^e · m)^d · r⁻¹ mod n
                let r = loop {
                    let r = Int::rand_below(rng, &self.n);
                    if !r.is_zero() && r.gcd(&self.n).cmp_u32(1) == std::cmp::Ordering::Equal {
                        break r;
                    }
                };
                let re = r.exptmod(&self.e, &self.n)?;
                let blinded = m.mul_mod(&re, &self.n)?;

                // CRT: mp = c^dp mod p, mq = c^dq mod q
                let mp = blinded.rem(&self.p)?.exptmod(&self.dp, &self.p)?;
                let mq = blinded.rem(&self.q)?.exptmod(&self.dq, &self.q)?;
                let h = mp
                    .sub_mod(&mq.rem(&self.p)?, &self.p)?
                    .mul_mod(&self.qp, &self.p)?;
                let unblinded = mq.add(&h.mul(&self.q));

                let rinv = r.invmod(&self.n)?;
                unblinded.mul_mod(&rinv, &self.n)?
            }
        };
        result.to_bytes_be_padded(self.size())
    }

    // -- high-level operations ---------------------------------------------

    /// OAEP encrypt `msg` under the public key.
    pub fn encrypt_oaep<R: RngCore>(
        &self,
        rng: &mut R,
        hash: usize,
        label: &[u8],
        msg: &[u8],
    ) -> CryptResult<Vec<u8>> {
        let em = pkcs1::oaep_encode(hash, rng, self.n.bit_length(), label, msg)?;
        self.exptmod(rng, &em, KeyType::Public)
    }

    /// OAEP decrypt.
    pub fn decrypt_oaep<R: RngCore>(
        &self,
        rng: &mut R,
        hash: usize,
        label: &[u8],
        ct: &[u8],
    ) -> CryptResult<Vec<u8>> {
        if ct.len() != self.size() {
            return Err(CryptError::PkInvalidSize);
        }
        let em = self.exptmod(rng, ct, KeyType::Private)?;
        pkcs1::oaep_decode(hash, self.n.bit_length(), label, &em)
    }

    /// PKCS#1 v1.5 encrypt.
    pub fn encrypt_v15<R: RngCore>(&self, rng: &mut R, msg: &[u8]) -> CryptResult<Vec<u8>> {
        let em = pkcs1::v15_enc_encode(rng, self.n.bit_length(), msg)?;
        self.exptmod(rng, &em, KeyType::Public)
    }

    /// PKCS#1 v1.5 decrypt.
    pub fn decrypt_v15<R: RngCore>(&self, rng: &mut R, ct: &[u8]) -> CryptResult<Vec<u8>> {
        if ct.len() != self.size() {
            return Err(CryptError::PkInvalidSize);
        }
        let em = self.exptmod(rng, ct, KeyType::Private)?;
        pkcs1::v15_enc_decode(self.n.bit_length(), &em)
    }

    /// PSS sign a message hash.
    pub fn sign_pss<R: RngCore>(
        &self,
        rng: &mut R,
        hash: usize,
        saltlen: usize,
        msghash: &[u8],
    ) -> CryptResult<Vec<u8>> {
        let em = pkcs1::pss_encode(hash, rng, saltlen, self.n.bit_length(), msghash)?;
        // EM is one bit narrower than the modulus
        let mut padded = vec![0u8; self.size() - em.len()];
        padded.extend_from_slice(&em);
        self.exptmod(rng, &padded, KeyType::Private)
    }

    /// PSS verify.
    pub fn verify_pss<R: RngCore>(
        &self,
        rng: &mut R,
        hash: usize,
        saltlen: usize,
        msghash: &[u8],
        sig: &[u8],
    ) -> CryptResult<()> {
        if sig.len() != self.size() {
            return Err(CryptError::PkInvalidSize);
        }
        let em_full = self.exptmod(rng, sig, KeyType::Public)?;
        let embits = self.n.bit_length() - 1;
        let emlen = (embits + 7) / 8;
        let em = &em_full[em_full.len() - emlen..];
        pkcs1::pss_verify(hash, saltlen, self.n.bit_length(), msghash, em)
    }

    /// PKCS#1 v1.5 sign a message hash.
    pub fn sign_v15<R: RngCore>(
        &self,
        rng: &mut R,
        hash: usize,
        msghash: &[u8],
    ) -> CryptResult<Vec<u8>> {
        let em = pkcs1::v15_sig_encode(hash, self.n.bit_length(), msghash)?;
        self.exptmod(rng, &em, KeyType::Private)
    }

    /// PKCS#1 v1.5 verify.
    pub fn verify_v15<R: RngCore>(
        &self,
        rng: &mut R,
        hash: usize,
        msghash: &[u8],
        sig: &[u8],
    ) -> CryptResult<()> {
        if sig.len() != self.size() {
            return Err(CryptError::PkInvalidSize);
        }
        let em = self.exptmod(rng, sig, KeyType::Public)?;
        pkcs1::v15_sig_verify(hash, self.n.bit_length(), msghash, &em)
    }

    // -- interchange -------------------------------------------------------

    /// Export PKCS#1 DER (`RSAPrivateKey` or `RSAPublicKey`).
    pub fn export_pkcs1(&self, which: KeyType) -> CryptResult<Vec<u8>> {
        match which {
            KeyType::Private => {
                if self.key_type != KeyType::Private {
                    return Err(CryptError::PkTypeMismatch);
                }
                der_encode(&DerValue::Sequence(vec![
                    DerValue::uint(&Int::zero()),
                    DerValue::uint(&self.n),
                    DerValue::uint(&self.e),
                    DerValue::uint(&self.d),
                    DerValue::uint(&self.p),
                    DerValue::uint(&self.q),
                    DerValue::uint(&self.dp),
                    DerValue::uint(&self.dq),
                    DerValue::uint(&self.qp),
                ]))
            }
            KeyType::Public => der_encode(&DerValue::Sequence(vec![
                DerValue::uint(&self.n),
                DerValue::uint(&self.e),
            ])),
        }
    }

    /// Export the public key as SubjectPublicKeyInfo DER.
    pub fn export_spki(&self) -> CryptResult<Vec<u8>> {
        encode_spki(&Spki {
            algorithm: OID_RSA.to_vec(),
            parameters: Some(DerValue::Null),
            public_key: self.export_pkcs1(KeyType::Public)?,
        })
    }

    /// Export the private key as PKCS#8 DER.
    pub fn export_pkcs8(&self) -> CryptResult<Vec<u8>> {
        encode_pkcs8(
            OID_RSA,
            Some(DerValue::Null),
            &self.export_pkcs1(KeyType::Private)?,
        )
    }

    /// Export as PEM (`RSA PRIVATE KEY` / `PUBLIC KEY`).
    pub fn export_pem(&self, which: KeyType) -> CryptResult<String> {
        Ok(match which {
            KeyType::Private => pem_encode("RSA PRIVATE KEY", &self.export_pkcs1(which)?),
            KeyType::Public => pem_encode("PUBLIC KEY", &self.export_spki()?),
        })
    }

    /// Import from PKCS#1, PKCS#8 or SPKI DER (auto-detected).
    pub fn import(der: &[u8]) -> CryptResult<Self> {
        if let Ok(spki) = decode_spki(der) {
            if spki.algorithm == OID_RSA {
                return Self::import_pkcs1(&spki.public_key);
            }
        }
        if let Ok(p8) = decode_pkcs8(der) {
            if p8.algorithm == OID_RSA {
                return Self::import_pkcs1(&p8.private_key);
            }
        }
        Self::import_pkcs1(der)
    }

    /// Import from a PEM document.
    pub fn import_pem(text: &str, passphrase: Option<&[u8]>) -> CryptResult<Self> {
        let pem = pem_decode(text, passphrase)?;
        Self::import(&pem.body)
    }

    /// Import PKCS#1 DER, accepting both the private and public layouts.
    pub fn import_pkcs1(der: &[u8]) -> CryptResult<Self> {
        let tree = der_decode_exact(der)?;
        let children = match &tree {
            DerValue::Sequence(c) => c,
            _ => return Err(CryptError::InvalidPacket),
        };
        match children.len() {
            2 => {
                let n = children[0].as_uint()?.clone();
                let e = children[1].as_uint()?.clone();
                if n.cmp_u32(2) != std::cmp::Ordering::Greater || e.cmp_u32(1) != std::cmp::Ordering::Greater {
                    return Err(CryptError::InvalidPacket);
                }
                Ok(Self {
                    key_type: KeyType::Public,
                    n,
                    e,
                    d: Int::zero(),
                    p: Int::zero(),
                    q: Int::zero(),
                    dp: Int::zero(),
                    dq: Int::zero(),
                    qp: Int::zero(),
                })
            }
            9 => {
                if !children[0].as_uint()?.is_zero() {
                    return Err(CryptError::InvalidPacket);
                }
                let key = Self {
                    key_type: KeyType::Private,
                    n: children[1].as_uint()?.clone(),
                    e: children[2].as_uint()?.clone(),
                    d: children[3].as_uint()?.clone(),
                    p: children[4].as_uint()?.clone(),
                    q: children[5].as_uint()?.clone(),
                    dp: children[6].as_uint()?.clone(),
                    dq: children[7].as_uint()?.clone(),
                    qp: children[8].as_uint()?.clone(),
                };
                // consistency: p·q = N
                if key.p.mul(&key.q) != key.n {
                    return Err(CryptError::InvalidPacket);
                }
                Ok(key)
            }
            _ => Err(CryptError::InvalidPacket),
        }
    }
}

/// Verify with constant-time comparison that two DER exports describe the
/// same public key.
pub fn rsa_public_eq(a: &RsaKey, b: &RsaKey) -> bool {
    ct_eq(&a.n.to_bytes_be(), &b.n.to_bytes_be()) && ct_eq(&a.e.to_bytes_be(), &b.e.to_bytes_be())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{find_hash, register_all_hashes};
    use rand::rngs::OsRng;

    fn sha256() -> usize {
        register_all_hashes().unwrap();
        find_hash("sha256").unwrap()
    }

    fn test_key() -> RsaKey {
        RsaKey::generate(&mut OsRng, 1024, 65537).unwrap()
    }

    #[test]
    fn test_generate_invariants() {
        let key = test_key();
        assert_eq!(key.n.bit_length(), 1024);
        // d·e ≡ 1 (mod lcm(p-1, q-1))
        let one = Int::from_u32(1);
        let l = key.p.sub(&one).unwrap().lcm(&key.q.sub(&one).unwrap());
        assert_eq!(key.d.mul_mod(&key.e, &l).unwrap(), one);
        assert_eq!(key.qp.mul_mod(&key.q, &key.p).unwrap(), one);
    }

    #[test]
    fn test_oaep_roundtrip() {
        let key = test_key();
        let msg = b"top secret";
        let ct = key.encrypt_oaep(&mut OsRng, sha256(), b"", msg).unwrap();
        assert_eq!(ct.len(), key.size());
        let pt = key.decrypt_oaep(&mut OsRng, sha256(), b"", &ct).unwrap();
        assert_eq!(pt, msg);
    }

    #[test]
    fn test_v15_roundtrip() {
        let key = test_key();
        let msg = b"legacy secret";
        let ct = key.encrypt_v15(&mut OsRng, msg).unwrap();
        let pt = key.decrypt_v15(&mut OsRng, &ct).unwrap();
        assert_eq!(pt, msg);
    }

    #[test]
    fn test_pss_sign_verify() {
        let key = test_key();
        let msghash = [0x5Au8; 32];
        let sig = key.sign_pss(&mut OsRng, sha256(), 32, &msghash).unwrap();
        key.verify_pss(&mut OsRng, sha256(), 32, &msghash, &sig)
            .unwrap();
        let mut bad = sig.clone();
        bad[10] ^= 1;
        assert!(key
            .verify_pss(&mut OsRng, sha256(), 32, &msghash, &bad)
            .is_err());
    }

    #[test]
    fn test_v15_sign_verify() {
        let key = test_key();
        let msghash = [0x77u8; 32];
        let sig = key.sign_v15(&mut OsRng, sha256(), &msghash).unwrap();
        key.verify_v15(&mut OsRng, sha256(), &msghash, &sig).unwrap();
    }

    #[test]
    fn test_der_roundtrips() {
        let key = test_key();
        let priv_der = key.export_pkcs1(KeyType::Private).unwrap();
        let back = RsaKey::import(&priv_der).unwrap();
        assert_eq!(back.key_type, KeyType::Private);
        assert!(rsa_public_eq(&key, &back));

        let spki = key.export_spki().unwrap();
        let pub_back = RsaKey::import(&spki).unwrap();
        assert_eq!(pub_back.key_type, KeyType::Public);
        assert!(rsa_public_eq(&key, &pub_back));

        let p8 = key.export_pkcs8().unwrap();
        let p8_back = RsaKey::import(&p8).unwrap();
        assert_eq!(p8_back.key_type, KeyType::Private);
    }

    #[test]
    fn test_pem_roundtrip() {
        let key = test_key();
        let pem = key.export_pem(KeyType::Private).unwrap();
        let back = RsaKey::import_pem(&pem, None).unwrap();
        assert!(rsa_public_eq(&key, &back));
    }

    #[test]
    fn test_public_key_cannot_sign() {
        let key = test_key();
        let pub_der = key.export_spki().unwrap();
        let public = RsaKey::import(&pub_der).unwrap();
        assert_eq!(
            public
                .sign_v15(&mut OsRng, sha256(), &[0u8; 32])
                .err(),
            Some(CryptError::PkNotPrivate)
        );
    }

    #[test]
    fn test_generate_rejects_bad_sizes() {
        assert!(RsaKey::generate(&mut OsRng, 512, 65537).is_err());
        assert!(RsaKey::generate(&mut OsRng, 1024, 4).is_err());
    }
}
