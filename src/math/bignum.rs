//! The `num-bigint-dig` backed [`Mpi`] implementation.

use super::Mpi;
use crate::error::{CryptError, CryptResult};
use num_bigint_dig::{BigUint, ModInverse, RandBigInt, RandPrime};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::RngCore;
use std::cmp::Ordering;

/// A non-negative arbitrary-precision integer.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Bignum(BigUint);

impl std::fmt::Debug for Bignum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // hex keeps large operands readable in assertions
        write!(f, "Bignum(0x{})", self.0.to_str_radix(16))
    }
}

impl Mpi for Bignum {
    fn zero() -> Self {
        Bignum(BigUint::zero())
    }

    fn from_u32(v: u32) -> Self {
        Bignum(BigUint::from(v))
    }

    fn from_bytes_be(bytes: &[u8]) -> Self {
        Bignum(BigUint::from_bytes_be(bytes))
    }

    fn to_bytes_be(&self) -> Vec<u8> {
        if self.0.is_zero() {
            return Vec::new();
        }
        self.0.to_bytes_be()
    }

    fn to_bytes_be_padded(&self, len: usize) -> CryptResult<Vec<u8>> {
        let raw = self.to_bytes_be();
        if raw.len() > len {
            return Err(CryptError::BufferOverflow);
        }
        let mut out = vec![0u8; len];
        out[len - raw.len()..].copy_from_slice(&raw);
        Ok(out)
    }

    fn from_radix(s: &str, radix: u32) -> CryptResult<Self> {
        if !(radix == 10 || radix == 16) {
            return Err(CryptError::InvalidArg);
        }
        BigUint::parse_bytes(s.as_bytes(), radix)
            .map(Bignum)
            .ok_or(CryptError::InvalidArg)
    }

    fn to_radix(&self, radix: u32) -> String {
        self.0.to_str_radix(radix)
    }

    fn bit_length(&self) -> usize {
        if self.0.is_zero() {
            return 0;
        }
        self.0.bits() as usize
    }

    fn trailing_zeros(&self) -> usize {
        self.0.trailing_zeros().unwrap_or(0) as usize
    }

    fn bit(&self, index: usize) -> bool {
        if index >= self.bit_length() {
            return false;
        }
        ((&self.0 >> index) & BigUint::one()) == BigUint::one()
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    fn is_odd(&self) -> bool {
        self.0.is_odd()
    }

    fn cmp_u32(&self, v: u32) -> Ordering {
        self.0.cmp(&BigUint::from(v))
    }

    fn add(&self, other: &Self) -> Self {
        Bignum(&self.0 + &other.0)
    }

    fn sub(&self, other: &Self) -> CryptResult<Self> {
        if self.0 < other.0 {
            return Err(CryptError::InvalidArg);
        }
        Ok(Bignum(&self.0 - &other.0))
    }

    fn mul(&self, other: &Self) -> Self {
        Bignum(&self.0 * &other.0)
    }

    fn div_rem(&self, other: &Self) -> CryptResult<(Self, Self)> {
        if other.0.is_zero() {
            return Err(CryptError::InvalidArg);
        }
        let (q, r) = self.0.div_rem(&other.0);
        Ok((Bignum(q), Bignum(r)))
    }

    fn exptmod(&self, exp: &Self, m: &Self) -> CryptResult<Self> {
        if m.0.is_zero() {
            return Err(CryptError::InvalidArg);
        }
        Ok(Bignum(self.0.modpow(&exp.0, &m.0)))
    }

    fn invmod(&self, m: &Self) -> CryptResult<Self> {
        let inv = (&self.0)
            .mod_inverse(&m.0)
            .ok_or(CryptError::InvalidArg)?;
        inv.to_biguint().map(Bignum).ok_or(CryptError::InvalidArg)
    }

    fn gcd(&self, other: &Self) -> Self {
        Bignum(self.0.gcd(&other.0))
    }

    fn lcm(&self, other: &Self) -> Self {
        Bignum(self.0.lcm(&other.0))
    }

    fn rand_below<R: RngCore>(rng: &mut R, bound: &Self) -> Self {
        Bignum(rng.gen_biguint_below(&bound.0))
    }

    fn is_prime(&self) -> bool {
        num_bigint_dig::prime::probably_prime(&self.0, 25)
    }

    fn gen_prime<R: RngCore>(rng: &mut R, bits: usize) -> CryptResult<Self> {
        if bits < 16 {
            return Err(CryptError::InvalidArg);
        }
        Ok(Bignum(rng.gen_prime(bits)))
    }

    fn wipe(&mut self) {
        use zeroize::Zeroize;
        self.0.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_underflow_is_error() {
        let a = Bignum::from_u32(3);
        let b = Bignum::from_u32(5);
        assert_eq!(a.sub(&b), Err(CryptError::InvalidArg));
    }

    #[test]
    fn test_div_rem_by_zero_is_error() {
        let a = Bignum::from_u32(3);
        assert!(a.div_rem(&Bignum::zero()).is_err());
    }

    #[test]
    fn test_zero_exports_empty() {
        assert!(Bignum::zero().to_bytes_be().is_empty());
        assert_eq!(Bignum::zero().to_bytes_be_padded(4).unwrap(), vec![0u8; 4]);
    }

    #[test]
    fn test_gen_prime_has_requested_size() {
        let mut rng = rand::rngs::OsRng;
        let p = Bignum::gen_prime(&mut rng, 128).unwrap();
        assert_eq!(p.bit_length(), 128);
        assert!(p.is_prime());
    }
}
