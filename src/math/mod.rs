//! # Multi-Precision Integers
//!
//! All public-key code is written against the [`Mpi`] operation trait and
//! the crate-wide [`Int`] alias. There is exactly one process-wide backend
//! (the `num-bigint-dig` based [`Bignum`]); swapping it means implementing
//! [`Mpi`] for another type and re-pointing the alias.

pub mod bignum;

pub use bignum::Bignum;

use crate::error::CryptResult;
use rand_core::RngCore;

/// The backend every public-key scheme is instantiated with.
pub type Int = Bignum;

/// The operation table a bignum backend must supply.
///
/// Values are non-negative; operations that could underflow are modular or
/// fallible. All failures map into the crate error taxonomy (`Mem` for
/// backend allocation, `InvalidArg` for domain violations).
pub trait Mpi: Sized + Clone + PartialEq + Eq + PartialOrd + Ord + std::fmt::Debug {
    /// The value 0.
    fn zero() -> Self;
    /// A small constant.
    fn from_u32(v: u32) -> Self;
    /// Big-endian unsigned import.
    fn from_bytes_be(bytes: &[u8]) -> Self;
    /// Big-endian unsigned export, no leading zeros (empty for 0).
    fn to_bytes_be(&self) -> Vec<u8>;
    /// Big-endian export left-padded to exactly `len` bytes.
    fn to_bytes_be_padded(&self, len: usize) -> CryptResult<Vec<u8>>;
    /// Parse from an ASCII radix-10 or radix-16 string.
    fn from_radix(s: &str, radix: u32) -> CryptResult<Self>;
    /// Render to a radix string (lowercase for 16).
    fn to_radix(&self, radix: u32) -> String;

    /// Number of significant bits (0 for the value 0).
    fn bit_length(&self) -> usize;
    /// Number of trailing zero bits (0 for the value 0).
    fn trailing_zeros(&self) -> usize;
    /// Test a single bit.
    fn bit(&self, index: usize) -> bool;
    /// Whether the value is 0.
    fn is_zero(&self) -> bool;
    /// Whether the value is odd.
    fn is_odd(&self) -> bool;
    /// Compare against a small constant.
    fn cmp_u32(&self, v: u32) -> std::cmp::Ordering;

    /// `self + other`.
    fn add(&self, other: &Self) -> Self;
    /// `self - other`; fails on underflow.
    fn sub(&self, other: &Self) -> CryptResult<Self>;
    /// `self * other`.
    fn mul(&self, other: &Self) -> Self;
    /// `self²`.
    fn sqr(&self) -> Self {
        self.mul(self)
    }
    /// `(self / other, self % other)`; fails on division by zero.
    fn div_rem(&self, other: &Self) -> CryptResult<(Self, Self)>;
    /// `self mod m`.
    fn rem(&self, m: &Self) -> CryptResult<Self> {
        Ok(self.div_rem(m)?.1)
    }

    /// `(self + other) mod m`.
    fn add_mod(&self, other: &Self, m: &Self) -> CryptResult<Self> {
        self.add(other).rem(m)
    }
    /// `(self - other) mod m`; operands must already be `< m`.
    fn sub_mod(&self, other: &Self, m: &Self) -> CryptResult<Self> {
        self.add(m).sub(other)?.rem(m)
    }
    /// `(self * other) mod m`.
    fn mul_mod(&self, other: &Self, m: &Self) -> CryptResult<Self> {
        self.mul(other).rem(m)
    }
    /// `self² mod m`.
    fn sqr_mod(&self, m: &Self) -> CryptResult<Self> {
        self.sqr().rem(m)
    }

    /// `self^exp mod m`.
    fn exptmod(&self, exp: &Self, m: &Self) -> CryptResult<Self>;
    /// `self⁻¹ mod m`; fails when no inverse exists.
    fn invmod(&self, m: &Self) -> CryptResult<Self>;
    /// Greatest common divisor.
    fn gcd(&self, other: &Self) -> Self;
    /// Least common multiple.
    fn lcm(&self, other: &Self) -> Self;

    /// Uniform value in `0..bound`.
    fn rand_below<R: RngCore>(rng: &mut R, bound: &Self) -> Self;
    /// Probabilistic primality test.
    fn is_prime(&self) -> bool;
    /// Random prime of exactly `bits` bits.
    fn gen_prime<R: RngCore>(rng: &mut R, bits: usize) -> CryptResult<Self>;

    /// Securely wipe the value.
    fn wipe(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radix_roundtrip() {
        let n = Int::from_radix("deadbeef00112233", 16).unwrap();
        assert_eq!(n.to_radix(16), "deadbeef00112233");
        let d = Int::from_radix("123456789", 10).unwrap();
        assert_eq!(d.to_radix(10), "123456789");
    }

    #[test]
    fn test_bytes_roundtrip_and_padding() {
        let n = Int::from_bytes_be(&[0x01, 0x02, 0x03]);
        assert_eq!(n.to_bytes_be(), vec![0x01, 0x02, 0x03]);
        assert_eq!(
            n.to_bytes_be_padded(5).unwrap(),
            vec![0x00, 0x00, 0x01, 0x02, 0x03]
        );
        assert!(n.to_bytes_be_padded(2).is_err());
    }

    #[test]
    fn test_modular_ops() {
        let p = Int::from_u32(97);
        let a = Int::from_u32(53);
        let b = Int::from_u32(71);
        let s = a.add_mod(&b, &p).unwrap();
        assert_eq!(s, Int::from_u32((53 + 71) % 97));
        let d = a.sub_mod(&b, &p).unwrap();
        assert_eq!(d, Int::from_u32((53 + 97 - 71) % 97));
        let inv = a.invmod(&p).unwrap();
        assert_eq!(a.mul_mod(&inv, &p).unwrap(), Int::from_u32(1));
    }

    #[test]
    fn test_exptmod_fermat() {
        let p = Int::from_u32(101);
        let a = Int::from_u32(7);
        let e = Int::from_u32(100);
        assert_eq!(a.exptmod(&e, &p).unwrap(), Int::from_u32(1));
    }

    #[test]
    fn test_bit_ops() {
        let n = Int::from_u32(0b1011_0000);
        assert_eq!(n.bit_length(), 8);
        assert_eq!(n.trailing_zeros(), 4);
        assert!(n.bit(7));
        assert!(!n.bit(0));
    }

    #[test]
    fn test_primality() {
        assert!(Int::from_u32(65537).is_prime());
        assert!(!Int::from_u32(65536).is_prime());
    }
}
