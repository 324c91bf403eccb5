//! Named short-Weierstrass prime-curve domain parameters.

use crate::error::{CryptError, CryptResult};
use crate::math::{Int, Mpi};

/// Registry record for a named curve (radix-16 constants).
pub struct CurveRecord {
    /// SEC/NIST name.
    pub name: &'static str,
    /// Dotted OID.
    pub oid: &'static str,
    /// Field prime.
    pub prime: &'static str,
    /// Coefficient A.
    pub a: &'static str,
    /// Coefficient B.
    pub b: &'static str,
    /// Group order n.
    pub order: &'static str,
    /// Base point x.
    pub gx: &'static str,
    /// Base point y.
    pub gy: &'static str,
    /// Cofactor.
    pub cofactor: u32,
}

/// Compiled-in curves, ascending by size.
pub static CURVES: &[CurveRecord] = &[
    CurveRecord {
        name: "secp192r1",
        oid: "1.2.840.10045.3.1.1",
        prime: "fffffffffffffffffffffffffffffffeffffffffffffffff",
        a: "fffffffffffffffffffffffffffffffefffffffffffffffc",
        b: "64210519e59c80e70fa7e9ab72243049feb8deecc146b9b1",
        order: "ffffffffffffffffffffffff99def836146bc9b1b4d22831",
        gx: "188da80eb03090f67cbf20eb43a18800f4ff0afd82ff1012",
        gy: "07192b95ffc8da78631011ed6b24cdd573f977a11e794811",
        cofactor: 1,
    },
    CurveRecord {
        name: "secp224r1",
        oid: "1.3.132.0.33",
        prime: "ffffffffffffffffffffffffffffffff000000000000000000000001",
        a: "fffffffffffffffffffffffffffffffefffffffffffffffffffffffe",
        b: "b4050a850c04b3abf54132565044b0b7d7bfd8ba270b39432355ffb4",
        order: "ffffffffffffffffffffffffffff16a2e0b8f03e13dd29455c5c2a3d",
        gx: "b70e0cbd6bb4bf7f321390b94a03c1d356c21122343280d6115c1d21",
        gy: "bd376388b5f723fb4c22dfe6cd4375a05a07476444d5819985007e34",
        cofactor: 1,
    },
    CurveRecord {
        name: "secp256r1",
        oid: "1.2.840.10045.3.1.7",
        prime: "ffffffff00000001000000000000000000000000ffffffffffffffffffffffff",
        a: "ffffffff00000001000000000000000000000000fffffffffffffffffffffffc",
        b: "5ac635d8aa3a93e7b3ebbd55769886bc651d06b0cc53b0f63bce3c3e27d2604b",
        order: "ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551",
        gx: "6b17d1f2e12c4247f8bce6e563a440f277037d812deb33a0f4a13945d898c296",
        gy: "4fe342e2fe1a7f9b8ee7eb4a7c0f9e162bce33576b315ececbb6406837bf51f5",
        cofactor: 1,
    },
    CurveRecord {
        name: "secp256k1",
        oid: "1.3.132.0.10",
        prime: "fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f",
        a: "0",
        b: "7",
        order: "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141",
        gx: "79be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798",
        gy: "483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8",
        cofactor: 1,
    },
    CurveRecord {
        name: "secp384r1",
        oid: "1.3.132.0.34",
        prime: "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe\
                ffffffff0000000000000000ffffffff",
        a: "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe\
            ffffffff0000000000000000fffffffc",
        b: "b3312fa7e23ee7e4988e056be3f82d19181d9c6efe8141120314088f5013875a\
            c656398d8a2ed19d2a85c8edd3ec2aef",
        order: "ffffffffffffffffffffffffffffffffffffffffffffffffc7634d81f4372ddf\
                581a0db248b0a77aecec196accc52973",
        gx: "aa87ca22be8b05378eb1c71ef320ad746e1d3b628ba79b9859f741e082542a38\
             5502f25dbf55296c3a545e3872760ab7",
        gy: "3617de4a96262c6f5d9e98bf9292dc29f8f41dbd289a147ce9da3113b5f0b8c0\
             0a60b1ce1d7e819d7a431d7c90ea0e5f",
        cofactor: 1,
    },
    CurveRecord {
        name: "secp521r1",
        oid: "1.3.132.0.35",
        prime: "1fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff\
                ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff\
                fff",
        a: "1fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff\
            ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff\
            ffc",
        b: "51953eb9618e1c9a1f929a21a0b68540eea2da725b99b315f3b8b489918ef109\
            e156193951ec7e937b1652c0bd3bb1bf073573df883d2c34f1ef451fd46b503f\
            00",
        order: "1fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff\
                ffa51868783bf2f966b7fcc0148f709a5d03bb5c9b8899c47aebb6fb71e91386\
                409",
        gx: "c6858e06b70404e9cd9e3ecb662395b4429c648139053fb521f828af606b4d3d\
             baa14b5e77efe75928fe1dc127a2ffa8de3348b3c1856a429bf97e7e31c2e5bd\
             66",
        gy: "11839296a789a3bc0045c8a5fb42c7d1bd998f54449579b446817afbd17273e6\
             62c97ee72995ef42640c550b9013fad0761353c7086a272c24088be94769fd16\
             650",
        cofactor: 1,
    },
];

/// Fully parsed domain parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EccDomain {
    /// Curve name.
    pub name: &'static str,
    /// Dotted OID string.
    pub oid: &'static str,
    /// Field prime.
    pub prime: Int,
    /// Coefficient A.
    pub a: Int,
    /// Coefficient B.
    pub b: Int,
    /// Group order.
    pub order: Int,
    /// Base point x.
    pub gx: Int,
    /// Base point y.
    pub gy: Int,
    /// Cofactor.
    pub cofactor: u32,
}

impl EccDomain {
    fn from_record(rec: &'static CurveRecord) -> CryptResult<Self> {
        Ok(Self {
            name: rec.name,
            oid: rec.oid,
            prime: Int::from_radix(rec.prime, 16)?,
            a: Int::from_radix(rec.a, 16)?,
            b: Int::from_radix(rec.b, 16)?,
            order: Int::from_radix(rec.order, 16)?,
            gx: Int::from_radix(rec.gx, 16)?,
            gy: Int::from_radix(rec.gy, 16)?,
            cofactor: rec.cofactor,
        })
    }

    /// Look a curve up by name ("secp256r1", also "nistp256" aliases).
    pub fn by_name(name: &str) -> CryptResult<Self> {
        let canonical = match name {
            "nistp192" | "P-192" => "secp192r1",
            "nistp224" | "P-224" => "secp224r1",
            "nistp256" | "P-256" => "secp256r1",
            "nistp384" | "P-384" => "secp384r1",
            "nistp521" | "P-521" => "secp521r1",
            other => other,
        };
        CURVES
            .iter()
            .find(|c| c.name == canonical)
            .map(Self::from_record)
            .ok_or(CryptError::InvalidArg)?
    }

    /// Look a curve up by dotted OID.
    pub fn by_oid(oid: &str) -> CryptResult<Self> {
        CURVES
            .iter()
            .find(|c| c.oid == oid)
            .map(Self::from_record)
            .ok_or(CryptError::InvalidArg)?
    }

    /// Smallest curve whose field is at least `size` bytes.
    pub fn by_size(size: usize) -> CryptResult<Self> {
        CURVES
            .iter()
            .find(|c| {
                // records are sorted by field size
                (c.prime.len() * 4 + 7) / 8 >= size
            })
            .map(Self::from_record)
            .ok_or(CryptError::InvalidKeysize)?
    }

    /// Field size in bytes.
    pub fn size(&self) -> usize {
        (self.prime.bit_length() + 7) / 8
    }

    /// The SSH identifier ("nistp256") where one exists.
    pub fn ssh_name(&self) -> Option<&'static str> {
        match self.name {
            "secp256r1" => Some("nistp256"),
            "secp384r1" => Some("nistp384"),
            "secp521r1" => Some("nistp521"),
            _ => None,
        }
    }
}
