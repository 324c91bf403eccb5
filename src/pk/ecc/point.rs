//! Jacobian-coordinate point arithmetic over a prime field.
//!
//! The affine point is `(X/Z², Y/Z³)`; infinity is represented with
//! `Z = 0`. Scalar multiplication uses a fixed 4-bit window; verification
//! uses Shamir's trick for the double multiplication.

use super::curves::EccDomain;
use crate::error::{CryptError, CryptResult};
use crate::math::{Int, Mpi};

/// A projective (Jacobian) point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EccPoint {
    /// X coordinate.
    pub x: Int,
    /// Y coordinate.
    pub y: Int,
    /// Z coordinate; 0 marks the point at infinity.
    pub z: Int,
}

impl EccPoint {
    /// The point at infinity.
    pub fn infinity() -> Self {
        Self {
            x: Int::from_u32(1),
            y: Int::from_u32(1),
            z: Int::zero(),
        }
    }

    /// An affine point lifted to Jacobian form.
    pub fn from_affine(x: Int, y: Int) -> Self {
        Self {
            x,
            y,
            z: Int::from_u32(1),
        }
    }

    /// Whether this is the point at infinity. The all-zero triple is not
    /// treated as infinity (it is simply invalid), matching the reference
    /// semantics.
    pub fn is_infinity(&self) -> bool {
        if self.x.is_zero() && self.y.is_zero() && self.z.is_zero() {
            return false;
        }
        self.z.is_zero()
    }

    /// Reduce to affine coordinates.
    pub fn to_affine(&self, dom: &EccDomain) -> CryptResult<(Int, Int)> {
        if self.is_infinity() || self.z.is_zero() {
            return Err(CryptError::InvalidArg);
        }
        let p = &dom.prime;
        let zinv = self.z.invmod(p)?;
        let zinv2 = zinv.sqr_mod(p)?;
        let zinv3 = zinv2.mul_mod(&zinv, p)?;
        Ok((self.x.mul_mod(&zinv2, p)?, self.y.mul_mod(&zinv3, p)?))
    }
}

/// `2·P` in Jacobian coordinates.
pub fn point_double(p: &EccPoint, dom: &EccDomain) -> CryptResult<EccPoint> {
    if p.is_infinity() || p.y.is_zero() {
        return Ok(EccPoint::infinity());
    }
    let m = &dom.prime;

    let y2 = p.y.sqr_mod(m)?;
    let s = p
        .x
        .mul_mod(&y2, m)?
        .mul_mod(&Int::from_u32(4), m)?;
    let z2 = p.z.sqr_mod(m)?;
    let z4 = z2.sqr_mod(m)?;
    let big_m = p
        .x
        .sqr_mod(m)?
        .mul_mod(&Int::from_u32(3), m)?
        .add_mod(&dom.a.mul_mod(&z4, m)?, m)?;

    let x3 = big_m
        .sqr_mod(m)?
        .sub_mod(&s.mul_mod(&Int::from_u32(2), m)?, m)?;
    let y4 = y2.sqr_mod(m)?;
    let y3 = big_m
        .mul_mod(&s.sub_mod(&x3, m)?, m)?
        .sub_mod(&y4.mul_mod(&Int::from_u32(8), m)?, m)?;
    let z3 = p
        .y
        .mul_mod(&p.z, m)?
        .mul_mod(&Int::from_u32(2), m)?;

    Ok(EccPoint {
        x: x3,
        y: y3,
        z: z3,
    })
}

/// `P + Q` in Jacobian coordinates.
pub fn point_add(p: &EccPoint, q: &EccPoint, dom: &EccDomain) -> CryptResult<EccPoint> {
    if p.is_infinity() {
        return Ok(q.clone());
    }
    if q.is_infinity() {
        return Ok(p.clone());
    }
    let m = &dom.prime;

    let z1_2 = p.z.sqr_mod(m)?;
    let z2_2 = q.z.sqr_mod(m)?;
    let z1_3 = z1_2.mul_mod(&p.z, m)?;
    let z2_3 = z2_2.mul_mod(&q.z, m)?;

    let u1 = p.x.mul_mod(&z2_2, m)?;
    let u2 = q.x.mul_mod(&z1_2, m)?;
    let s1 = p.y.mul_mod(&z2_3, m)?;
    let s2 = q.y.mul_mod(&z1_3, m)?;

    let h = u2.sub_mod(&u1, m)?;
    let r = s2.sub_mod(&s1, m)?;

    if h.is_zero() {
        if r.is_zero() {
            return point_double(p, dom);
        }
        return Ok(EccPoint::infinity());
    }

    let h2 = h.sqr_mod(m)?;
    let h3 = h2.mul_mod(&h, m)?;
    let u1h2 = u1.mul_mod(&h2, m)?;

    let x3 = r
        .sqr_mod(m)?
        .sub_mod(&h3, m)?
        .sub_mod(&u1h2.mul_mod(&Int::from_u32(2), m)?, m)?;
    let y3 = r
        .mul_mod(&u1h2.sub_mod(&x3, m)?, m)?
        .sub_mod(&s1.mul_mod(&h3, m)?, m)?;
    let z3 = p.z.mul_mod(&q.z, m)?.mul_mod(&h, m)?;

    Ok(EccPoint {
        x: x3,
        y: y3,
        z: z3,
    })
}

/// `k·P` with a fixed 4-bit window and a precomputed multiple table.
pub fn point_mul(k: &Int, p: &EccPoint, dom: &EccDomain) -> CryptResult<EccPoint> {
    if k.is_zero() || p.is_infinity() {
        return Ok(EccPoint::infinity());
    }
    // table[i] = i·P for i in 0..16
    let mut table = Vec::with_capacity(16);
    table.push(EccPoint::infinity());
    table.push(p.clone());
    for x in 2..16usize {
        let entry = if x % 2 == 0 {
            point_double(&table[x / 2], dom)?
        } else {
            point_add(&table[x - 1], p, dom)?
        };
        table.push(entry);
    }

    let bits = k.bit_length();
    let nibbles = (bits + 3) / 4;
    let mut acc = EccPoint::infinity();
    for i in (0..nibbles).rev() {
        for _ in 0..4 {
            acc = point_double(&acc, dom)?;
        }
        let mut idx = 0usize;
        for b in 0..4 {
            if k.bit(i * 4 + (3 - b)) {
                idx |= 8 >> b;
            }
        }
        if idx != 0 {
            acc = point_add(&acc, &table[idx], dom)?;
        }
    }
    Ok(acc)
}

/// `u1·G + u2·Q` via Shamir's trick (verification path, public inputs).
pub fn point_mul2(
    u1: &Int,
    g: &EccPoint,
    u2: &Int,
    q: &EccPoint,
    dom: &EccDomain,
) -> CryptResult<EccPoint> {
    let gq = point_add(g, q, dom)?;
    let bits = u1.bit_length().max(u2.bit_length());
    let mut acc = EccPoint::infinity();
    for i in (0..bits).rev() {
        acc = point_double(&acc, dom)?;
        let b1 = u1.bit(i);
        let b2 = u2.bit(i);
        let addend = match (b1, b2) {
            (true, true) => Some(&gq),
            (true, false) => Some(g),
            (false, true) => Some(q),
            (false, false) => None,
        };
        if let Some(point) = addend {
            acc = point_add(&acc, point, dom)?;
        }
    }
    Ok(acc)
}

/// Whether affine `(x, y)` satisfies `y² = x³ + ax + b (mod p)` and lies
/// inside the field.
pub fn is_point(x: &Int, y: &Int, dom: &EccDomain) -> CryptResult<()> {
    let p = &dom.prime;
    if x >= p || y >= p {
        return Err(CryptError::InvalidPacket);
    }
    let lhs = y.sqr_mod(p)?;
    let rhs = x
        .sqr_mod(p)?
        .mul_mod(x, p)?
        .add_mod(&dom.a.mul_mod(x, p)?, p)?
        .add_mod(&dom.b, p)?;
    if lhs != rhs {
        return Err(CryptError::InvalidPacket);
    }
    Ok(())
}

/// Square root modulo the field prime (Tonelli–Shanks, with the fast
/// `p ≡ 3 (mod 4)` path), used for compressed-point import.
pub fn sqrt_mod(n: &Int, dom: &EccDomain) -> CryptResult<Int> {
    let p = &dom.prime;
    let one = Int::from_u32(1);
    if n.is_zero() {
        return Ok(Int::zero());
    }
    // Euler criterion
    let p1 = p.sub(&one)?;
    let half = p1.div_rem(&Int::from_u32(2))?.0;
    if n.exptmod(&half, p)? != one {
        return Err(CryptError::InvalidPacket);
    }
    if p.rem(&Int::from_u32(4))?.cmp_u32(3) == std::cmp::Ordering::Equal {
        let exp = p.add(&one).div_rem(&Int::from_u32(4))?.0;
        return n.exptmod(&exp, p);
    }

    // general Tonelli–Shanks
    let s = p1.trailing_zeros();
    let mut q = p1.clone();
    for _ in 0..s {
        q = q.div_rem(&Int::from_u32(2))?.0;
    }
    // non-residue z
    let mut z = Int::from_u32(2);
    while z.exptmod(&half, p)? == one {
        z = z.add(&one);
    }
    let mut m = s;
    let mut c = z.exptmod(&q, p)?;
    let mut t = n.exptmod(&q, p)?;
    let mut r = n.exptmod(&q.add(&one).div_rem(&Int::from_u32(2))?.0, p)?;
    while t != one {
        // find least i with t^(2^i) = 1
        let mut i = 0usize;
        let mut t2 = t.clone();
        while t2 != one {
            t2 = t2.sqr_mod(p)?;
            i += 1;
            if i == m {
                return Err(CryptError::InvalidPacket);
            }
        }
        let mut b = c.clone();
        for _ in 0..m - i - 1 {
            b = b.sqr_mod(p)?;
        }
        m = i;
        c = b.sqr_mod(p)?;
        t = t.mul_mod(&c, p)?;
        r = r.mul_mod(&b, p)?;
    }
    Ok(r)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p256() -> EccDomain {
        EccDomain::by_name("secp256r1").unwrap()
    }

    fn base(dom: &EccDomain) -> EccPoint {
        EccPoint::from_affine(dom.gx.clone(), dom.gy.clone())
    }

    #[test]
    fn test_double_equals_add_self() {
        let dom = p256();
        let g = base(&dom);
        let d = point_double(&g, &dom).unwrap().to_affine(&dom).unwrap();
        let a = point_add(&g, &g, &dom).unwrap().to_affine(&dom).unwrap();
        assert_eq!(d, a);
    }

    #[test]
    fn test_order_times_base_is_infinity() {
        let dom = p256();
        let g = base(&dom);
        let o = point_mul(&dom.order, &g, &dom).unwrap();
        assert!(o.is_infinity());
    }

    #[test]
    fn test_scalar_mul_distributes() {
        let dom = p256();
        let g = base(&dom);
        // (a+b)G == aG + bG
        let a = Int::from_u32(123456);
        let b = Int::from_u32(654321);
        let lhs = point_mul(&a.add(&b), &g, &dom).unwrap().to_affine(&dom).unwrap();
        let ag = point_mul(&a, &g, &dom).unwrap();
        let bg = point_mul(&b, &g, &dom).unwrap();
        let rhs = point_add(&ag, &bg, &dom).unwrap().to_affine(&dom).unwrap();
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn test_shamir_matches_separate() {
        let dom = p256();
        let g = base(&dom);
        let q = point_mul(&Int::from_u32(777), &g, &dom).unwrap();
        let u1 = Int::from_u32(31337);
        let u2 = Int::from_u32(271828);
        let combined = point_mul2(&u1, &g, &u2, &q, &dom)
            .unwrap()
            .to_affine(&dom)
            .unwrap();
        let separate = point_add(
            &point_mul(&u1, &g, &dom).unwrap(),
            &point_mul(&u2, &q, &dom).unwrap(),
            &dom,
        )
        .unwrap()
        .to_affine(&dom)
        .unwrap();
        assert_eq!(combined, separate);
    }

    #[test]
    fn test_is_point_rejects_off_curve() {
        let dom = p256();
        is_point(&dom.gx, &dom.gy, &dom).unwrap();
        assert!(is_point(&dom.gx, &dom.gx, &dom).is_err());
    }

    #[test]
    fn test_sqrt_mod_recovers_gy() {
        for name in ["secp256r1", "secp224r1", "secp256k1"] {
            let dom = EccDomain::by_name(name).unwrap();
            let y2 = dom.gy.sqr_mod(&dom.prime).unwrap();
            let y = sqrt_mod(&y2, &dom).unwrap();
            let neg = dom.prime.sub(&y).unwrap();
            assert!(y == dom.gy || neg == dom.gy, "sqrt failed for {name}");
        }
    }

    #[test]
    fn test_infinity_identities() {
        let dom = p256();
        let g = base(&dom);
        let inf = EccPoint::infinity();
        assert_eq!(
            point_add(&g, &inf, &dom).unwrap().to_affine(&dom).unwrap(),
            g.to_affine(&dom).unwrap()
        );
        assert!(point_mul(&Int::zero(), &g, &dom).unwrap().is_infinity());
    }
}
