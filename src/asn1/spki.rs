//! SubjectPublicKeyInfo: `SEQUENCE { AlgorithmIdentifier, BIT STRING }`.

use super::value::{der_decode_exact, der_encode, DerValue};
use crate::error::{CryptError, CryptResult};

/// A decoded SubjectPublicKeyInfo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spki {
    /// Algorithm OID components.
    pub algorithm: Vec<u32>,
    /// Algorithm parameters (`None` when absent; `Some(Null)` when an
    /// explicit NULL was present).
    pub parameters: Option<DerValue>,
    /// The subjectPublicKey payload (whole octets).
    pub public_key: Vec<u8>,
}

/// Encode an SPKI structure.
pub fn encode_spki(spki: &Spki) -> CryptResult<Vec<u8>> {
    let mut alg = vec![DerValue::Oid(spki.algorithm.clone())];
    if let Some(params) = &spki.parameters {
        alg.push(params.clone());
    }
    der_encode(&DerValue::Sequence(vec![
        DerValue::Sequence(alg),
        DerValue::BitString {
            data: spki.public_key.clone(),
            bits: spki.public_key.len() * 8,
        },
    ]))
}

/// Decode an SPKI structure from exact DER bytes.
pub fn decode_spki(input: &[u8]) -> CryptResult<Spki> {
    let tree = der_decode_exact(input)?;
    spki_from_value(&tree)
}

/// Interpret an already-decoded value as an SPKI.
pub fn spki_from_value(tree: &DerValue) -> CryptResult<Spki> {
    let children = match tree {
        DerValue::Sequence(c) if c.len() == 2 => c,
        _ => return Err(CryptError::InvalidPacket),
    };
    let alg = match &children[0] {
        DerValue::Sequence(a) if !a.is_empty() && a.len() <= 2 => a,
        _ => return Err(CryptError::InvalidPacket),
    };
    let algorithm = match &alg[0] {
        DerValue::Oid(oid) => oid.clone(),
        _ => return Err(CryptError::InvalidPacket),
    };
    let parameters = alg.get(1).cloned();
    let public_key = match &children[1] {
        DerValue::BitString { data, bits } if bits % 8 == 0 => data.clone(),
        _ => return Err(CryptError::InvalidPacket),
    };
    Ok(Spki {
        algorithm,
        parameters,
        public_key,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spki_roundtrip() {
        let spki = Spki {
            algorithm: vec![1, 3, 101, 112],
            parameters: None,
            public_key: vec![0xAB; 32],
        };
        let enc = encode_spki(&spki).unwrap();
        assert_eq!(decode_spki(&enc).unwrap(), spki);
    }

    #[test]
    fn test_spki_with_null_params() {
        let spki = Spki {
            algorithm: vec![1, 2, 840, 113549, 1, 1, 1],
            parameters: Some(DerValue::Null),
            public_key: vec![1, 2, 3],
        };
        let enc = encode_spki(&spki).unwrap();
        let back = decode_spki(&enc).unwrap();
        assert_eq!(back.parameters, Some(DerValue::Null));
    }

    #[test]
    fn test_spki_rejects_non_sequence() {
        assert!(decode_spki(&[0x04, 0x00]).is_err());
    }
}
