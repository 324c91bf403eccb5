//! PKCS#8 PrivateKeyInfo: `SEQUENCE { INTEGER version,
//! AlgorithmIdentifier, OCTET STRING privateKey [, [0] attributes] }`.

use super::value::{der_decode_exact, der_encode, DerValue};
use crate::error::{CryptError, CryptResult};
use crate::math::Mpi;

/// A decoded PKCS#8 PrivateKeyInfo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pkcs8 {
    /// Version field; 0 and 1 are accepted.
    pub version: u32,
    /// Algorithm OID components.
    pub algorithm: Vec<u32>,
    /// Algorithm parameters, when present.
    pub parameters: Option<DerValue>,
    /// The inner privateKey octets.
    pub private_key: Vec<u8>,
}

/// Wrap an algorithm-specific private key in a version-0 PrivateKeyInfo.
pub fn encode_pkcs8(
    algorithm: &[u32],
    parameters: Option<DerValue>,
    private_key: &[u8],
) -> CryptResult<Vec<u8>> {
    let mut alg = vec![DerValue::Oid(algorithm.to_vec())];
    if let Some(params) = parameters {
        alg.push(params);
    }
    der_encode(&DerValue::Sequence(vec![
        DerValue::Integer(super::DerInteger::from_i64(0)),
        DerValue::Sequence(alg),
        DerValue::OctetString(private_key.to_vec()),
    ]))
}

/// Decode a PrivateKeyInfo. Trailing attributes (`[0]`) are tolerated and
/// ignored, which is why an `InputTooLong` style tail inside the outer
/// SEQUENCE is treated as success.
pub fn decode_pkcs8(input: &[u8]) -> CryptResult<Pkcs8> {
    let tree = der_decode_exact(input)?;
    let children = match &tree {
        DerValue::Sequence(c) if c.len() >= 3 => c,
        _ => return Err(CryptError::InvalidPacket),
    };
    let v = children[0].as_uint()?;
    let version = if v.cmp_u32(0) == std::cmp::Ordering::Equal {
        0
    } else if v.cmp_u32(1) == std::cmp::Ordering::Equal {
        1
    } else {
        return Err(CryptError::InvalidPacket);
    };
    let alg = match &children[1] {
        DerValue::Sequence(a) if !a.is_empty() && a.len() <= 2 => a,
        _ => return Err(CryptError::InvalidPacket),
    };
    let algorithm = match &alg[0] {
        DerValue::Oid(oid) => oid.clone(),
        _ => return Err(CryptError::InvalidPacket),
    };
    let private_key = children[2].as_octets()?.to_vec();
    // children[3..], when present, are the optional attribute sets; ignored
    Ok(Pkcs8 {
        version,
        algorithm,
        parameters: alg.get(1).cloned(),
        private_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Int;

    #[test]
    fn test_pkcs8_roundtrip() {
        let enc = encode_pkcs8(&[1, 3, 101, 112], None, &[9u8; 34]).unwrap();
        let dec = decode_pkcs8(&enc).unwrap();
        assert_eq!(dec.version, 0);
        assert_eq!(dec.algorithm, vec![1, 3, 101, 112]);
        assert_eq!(dec.private_key, vec![9u8; 34]);
        assert!(dec.parameters.is_none());
    }

    #[test]
    fn test_pkcs8_with_attributes_tolerated() {
        // hand-build version 1 with an empty [0] attribute set appended
        let body = DerValue::Sequence(vec![
            DerValue::uint(&Int::from_u32(1)),
            DerValue::Sequence(vec![DerValue::Oid(vec![1, 3, 101, 110])]),
            DerValue::OctetString(vec![1, 2, 3]),
            DerValue::Raw {
                tag: 0xA0,
                content: vec![],
            },
        ]);
        let enc = der_encode(&body).unwrap();
        let dec = decode_pkcs8(&enc).unwrap();
        assert_eq!(dec.version, 1);
        assert_eq!(dec.private_key, vec![1, 2, 3]);
    }

    #[test]
    fn test_pkcs8_rejects_version_2() {
        let body = DerValue::Sequence(vec![
            DerValue::uint(&Int::from_u32(2)),
            DerValue::Sequence(vec![DerValue::Oid(vec![1, 3, 101, 110])]),
            DerValue::OctetString(vec![]),
        ]);
        let enc = der_encode(&body).unwrap();
        assert!(decode_pkcs8(&enc).is_err());
    }
}
