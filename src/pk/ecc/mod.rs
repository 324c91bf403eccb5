//! ECC key objects over the named prime curves: generation, validation,
//! ECDH, and raw/X9.63/SPKI/SEC1/PKCS#8 interchange. The ECDSA paths live
//! in [`ecdsa`].

pub mod curves;
pub mod ecdsa;
pub mod point;

pub use curves::EccDomain;
pub use point::EccPoint;

use super::KeyType;
use crate::asn1::pkcs8::{decode_pkcs8, encode_pkcs8};
use crate::asn1::spki::{decode_spki, encode_spki, Spki};
use crate::asn1::value::{der_decode_exact, der_encode, DerValue};
use crate::asn1::{oid_num_to_str, oid_str_to_num};
use crate::error::{CryptError, CryptResult};
use crate::math::{Int, Mpi};
use rand_core::RngCore;

/// id-ecPublicKey.
pub const OID_EC_PUBLIC_KEY: &[u32] = &[1, 2, 840, 10045, 2, 1];

/// An ECC key over a named curve.
pub struct EccKey {
    /// Which halves are populated.
    pub key_type: KeyType,
    /// Domain parameters.
    pub domain: EccDomain,
    /// Private scalar (zero for public keys).
    pub k: Int,
    /// Public point, affine.
    pub public: (Int, Int),
}

impl Drop for EccKey {
    fn drop(&mut self) {
        self.k.wipe();
    }
}

impl EccKey {
    /// Generate a key pair on `domain`.
    pub fn generate<R: RngCore>(rng: &mut R, domain: EccDomain) -> CryptResult<Self> {
        let k = loop {
            let k = Int::rand_below(rng, &domain.order);
            if !k.is_zero() && k.cmp_u32(1) != std::cmp::Ordering::Equal {
                break k;
            }
        };
        let g = EccPoint::from_affine(domain.gx.clone(), domain.gy.clone());
        let public = point::point_mul(&k, &g, &domain)?.to_affine(&domain)?;
        let key = Self {
            key_type: KeyType::Private,
            domain,
            k,
            public,
        };
        key.verify_key()?;
        Ok(key)
    }

    /// Validate the public point: on the curve, not at infinity, and of
    /// order n.
    pub fn verify_key(&self) -> CryptResult<()> {
        point::is_point(&self.public.0, &self.public.1, &self.domain)?;
        let p = EccPoint::from_affine(self.public.0.clone(), self.public.1.clone());
        if p.is_infinity() {
            return Err(CryptError::InvalidPacket);
        }
        let np = point::point_mul(&self.domain.order, &p, &self.domain)?;
        if !np.is_infinity() {
            return Err(CryptError::InvalidPacket);
        }
        Ok(())
    }

    /// ANSI X9.63 export: `04 ∥ X ∥ Y`, coordinates padded to field size.
    pub fn export_raw_public(&self) -> CryptResult<Vec<u8>> {
        let size = self.domain.size();
        let mut out = Vec::with_capacity(1 + 2 * size);
        out.push(0x04);
        out.extend_from_slice(&self.public.0.to_bytes_be_padded(size)?);
        out.extend_from_slice(&self.public.1.to_bytes_be_padded(size)?);
        Ok(out)
    }

    /// Import a public point in X9.63 form; `04` uncompressed and `02`/`03`
    /// compressed encodings are accepted.
    pub fn import_raw_public(domain: EccDomain, data: &[u8]) -> CryptResult<Self> {
        let size = domain.size();
        let (x, y) = match data.first() {
            Some(0x04) if data.len() == 1 + 2 * size => {
                let x = Int::from_bytes_be(&data[1..1 + size]);
                let y = Int::from_bytes_be(&data[1 + size..]);
                (x, y)
            }
            Some(&tag @ (0x02 | 0x03)) if data.len() == 1 + size => {
                let x = Int::from_bytes_be(&data[1..]);
                // y² = x³ + ax + b
                let rhs = x
                    .sqr_mod(&domain.prime)?
                    .mul_mod(&x, &domain.prime)?
                    .add_mod(&domain.a.mul_mod(&x, &domain.prime)?, &domain.prime)?
                    .add_mod(&domain.b, &domain.prime)?;
                let mut y = point::sqrt_mod(&rhs, &domain)?;
                if y.is_odd() != (tag == 0x03) {
                    y = domain.prime.sub(&y)?;
                }
                (x, y)
            }
            _ => return Err(CryptError::InvalidPacket),
        };
        let key = Self {
            key_type: KeyType::Public,
            domain,
            k: Int::zero(),
            public: (x, y),
        };
        key.verify_key()?;
        Ok(key)
    }

    /// ECDH: x-coordinate of `k·Q_peer`, padded to the field size.
    pub fn shared_secret(&self, peer: &EccKey) -> CryptResult<Vec<u8>> {
        if self.key_type != KeyType::Private {
            return Err(CryptError::PkNotPrivate);
        }
        if self.domain != peer.domain {
            return Err(CryptError::PkTypeMismatch);
        }
        peer.verify_key()?;
        let q = EccPoint::from_affine(peer.public.0.clone(), peer.public.1.clone());
        let shared = point::point_mul(&self.k, &q, &self.domain)?;
        let (x, _) = shared.to_affine(&self.domain)?;
        x.to_bytes_be_padded(self.domain.size())
    }

    /// Export the public key as SPKI DER (parameters = named-curve OID).
    pub fn export_spki(&self) -> CryptResult<Vec<u8>> {
        encode_spki(&Spki {
            algorithm: OID_EC_PUBLIC_KEY.to_vec(),
            parameters: Some(DerValue::Oid(oid_str_to_num(self.domain.oid)?)),
            public_key: self.export_raw_public()?,
        })
    }

    /// SEC1 `ECPrivateKey` DER: `SEQUENCE { 1, OCTET STRING k,
    /// [0] curve OID, [1] BIT STRING pubkey }`.
    pub fn export_sec1(&self) -> CryptResult<Vec<u8>> {
        if self.key_type != KeyType::Private {
            return Err(CryptError::PkTypeMismatch);
        }
        let size = self.domain.size();
        let oid_der = der_encode(&DerValue::Oid(oid_str_to_num(self.domain.oid)?))?;
        let pub_der = der_encode(&DerValue::BitString {
            data: self.export_raw_public()?,
            bits: (1 + 2 * size) * 8,
        })?;
        der_encode(&DerValue::Sequence(vec![
            DerValue::uint(&Int::from_u32(1)),
            DerValue::OctetString(self.k.to_bytes_be_padded(size)?),
            DerValue::Raw {
                tag: 0xA0,
                content: oid_der,
            },
            DerValue::Raw {
                tag: 0xA1,
                content: pub_der,
            },
        ]))
    }

    /// Export the private key as PKCS#8 DER wrapping the SEC1 structure.
    pub fn export_pkcs8(&self) -> CryptResult<Vec<u8>> {
        encode_pkcs8(
            OID_EC_PUBLIC_KEY,
            Some(DerValue::Oid(oid_str_to_num(self.domain.oid)?)),
            &self.export_sec1()?,
        )
    }

    /// Import from SPKI, PKCS#8 or bare SEC1 DER (auto-detected).
    pub fn import(der: &[u8]) -> CryptResult<Self> {
        if let Ok(spki) = decode_spki(der) {
            if spki.algorithm == OID_EC_PUBLIC_KEY {
                let domain = match &spki.parameters {
                    Some(DerValue::Oid(oid)) => EccDomain::by_oid(&oid_num_to_str(oid)?)?,
                    _ => return Err(CryptError::InvalidPacket),
                };
                return Self::import_raw_public(domain, &spki.public_key);
            }
        }
        if let Ok(p8) = decode_pkcs8(der) {
            if p8.algorithm == OID_EC_PUBLIC_KEY {
                let hint = match &p8.parameters {
                    Some(DerValue::Oid(oid)) => Some(EccDomain::by_oid(&oid_num_to_str(oid)?)?),
                    _ => None,
                };
                return Self::import_sec1(&p8.private_key, hint);
            }
        }
        Self::import_sec1(der, None)
    }

    /// Import a SEC1 `ECPrivateKey`, with an optional domain hint from an
    /// enclosing PKCS#8 wrapper.
    pub fn import_sec1(der: &[u8], hint: Option<EccDomain>) -> CryptResult<Self> {
        let tree = der_decode_exact(der)?;
        let children = match &tree {
            DerValue::Sequence(c) if c.len() >= 2 => c,
            _ => return Err(CryptError::InvalidPacket),
        };
        if children[0].as_uint()?.cmp_u32(1) != std::cmp::Ordering::Equal {
            return Err(CryptError::InvalidPacket);
        }
        let k = Int::from_bytes_be(children[1].as_octets()?);

        let mut domain = hint;
        for child in &children[2..] {
            if let DerValue::Raw { tag: 0xA0, content } = child {
                if let DerValue::Oid(oid) = der_decode_exact(content)? {
                    domain = Some(EccDomain::by_oid(&oid_num_to_str(&oid)?)?);
                }
            }
        }
        let domain = domain.ok_or(CryptError::InvalidPacket)?;

        if k.is_zero() || k >= domain.order {
            return Err(CryptError::InvalidPacket);
        }
        let g = EccPoint::from_affine(domain.gx.clone(), domain.gy.clone());
        let public = point::point_mul(&k, &g, &domain)?.to_affine(&domain)?;
        let key = Self {
            key_type: KeyType::Private,
            domain,
            k,
            public,
        };
        key.verify_key()?;
        Ok(key)
    }
}
