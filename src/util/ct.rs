//! Constant-time byte comparison.
//!
//! Every MAC-tag verification and the PKCS#1 v1.5 decrypt padding scan go
//! through these helpers. The comparisons OR byte differences into a single
//! accumulator and reduce to a boolean at the end, without data-dependent
//! branches.

use subtle::ConstantTimeEq;

/// Compare two byte slices in constant time.
///
/// Returns `true` iff `a` and `b` have the same length and content. The
/// length check itself is public information (both lengths are known to the
/// caller); the content comparison does not branch on data.
pub fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Compare two equal-length memory regions for inequality.
///
/// Returns `0` when the regions are equal, `1` otherwise. Unlike `memcmp`
/// the result carries no ordering information, only (in)equality.
pub fn mem_neq(a: &[u8], b: &[u8]) -> u8 {
    debug_assert_eq!(a.len(), b.len());
    let mut ret = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        ret |= x ^ y;
    }
    ret |= ret >> 4;
    ret |= ret >> 2;
    ret |= ret >> 1;
    ret & 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ct_eq() {
        assert!(ct_eq(b"abcdef", b"abcdef"));
        assert!(!ct_eq(b"abcdef", b"abcdeg"));
        assert!(!ct_eq(b"abc", b"abcd"));
        assert!(ct_eq(b"", b""));
    }

    #[test]
    fn test_mem_neq() {
        assert_eq!(mem_neq(b"same", b"same"), 0);
        assert_eq!(mem_neq(b"same", b"sbme"), 1);
        // difference only in the last byte still reduces to exactly 1
        assert_eq!(mem_neq(&[0x00; 32], &{ let mut v = [0x00; 32]; v[31] = 0x80; v }), 1);
    }
}
