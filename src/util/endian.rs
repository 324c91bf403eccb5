//! Endian load/store helpers and mode counter arithmetic.

/// Load a big-endian 32-bit word.
#[inline]
pub fn load32_be(b: &[u8]) -> u32 {
    u32::from_be_bytes([b[0], b[1], b[2], b[3]])
}

/// Load a little-endian 32-bit word.
#[inline]
pub fn load32_le(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

/// Load a big-endian 64-bit word.
#[inline]
pub fn load64_be(b: &[u8]) -> u64 {
    u64::from_be_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
}

/// Load a little-endian 64-bit word.
#[inline]
pub fn load64_le(b: &[u8]) -> u64 {
    u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]])
}

/// Store a 32-bit word big-endian.
#[inline]
pub fn store32_be(v: u32, b: &mut [u8]) {
    b[..4].copy_from_slice(&v.to_be_bytes());
}

/// Store a 32-bit word little-endian.
#[inline]
pub fn store32_le(v: u32, b: &mut [u8]) {
    b[..4].copy_from_slice(&v.to_le_bytes());
}

/// Store a 64-bit word big-endian.
#[inline]
pub fn store64_be(v: u64, b: &mut [u8]) {
    b[..8].copy_from_slice(&v.to_be_bytes());
}

/// Store a 64-bit word little-endian.
#[inline]
pub fn store64_le(v: u64, b: &mut [u8]) {
    b[..8].copy_from_slice(&v.to_le_bytes());
}

/// XOR `src` into `dst` byte-wise. `dst` must be at least as long as `src`.
#[inline]
pub fn xor_into(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        *d ^= *s;
    }
}

/// Increment a big-endian counter in place.
///
/// Only the low `ctrlen` bytes of `ctr` (i.e. `ctr[ctr.len()-ctrlen..]`)
/// participate; the carry stops at that boundary, matching the CTR mode
/// counter-window contract.
pub fn ctr_increment_be(ctr: &mut [u8], ctrlen: usize) {
    let start = ctr.len() - ctrlen;
    for x in (start..ctr.len()).rev() {
        ctr[x] = ctr[x].wrapping_add(1);
        if ctr[x] != 0 {
            break;
        }
    }
}

/// Increment a little-endian counter in place.
///
/// Only the first `ctrlen` bytes of `ctr` participate.
pub fn ctr_increment_le(ctr: &mut [u8], ctrlen: usize) {
    for x in 0..ctrlen {
        ctr[x] = ctr[x].wrapping_add(1);
        if ctr[x] != 0 {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_roundtrip() {
        let mut buf = [0u8; 8];
        store64_be(0x0123_4567_89AB_CDEF, &mut buf);
        assert_eq!(buf, [0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF]);
        assert_eq!(load64_be(&buf), 0x0123_4567_89AB_CDEF);
        store32_le(0xDEAD_BEEF, &mut buf);
        assert_eq!(load32_le(&buf), 0xDEAD_BEEF);
    }

    #[test]
    fn test_ctr_increment_be_window() {
        let mut ctr = [0xFFu8; 16];
        ctr_increment_be(&mut ctr, 4);
        // low 4 bytes wrap to zero, byte 11 is outside the window and stays
        assert_eq!(&ctr[12..], &[0, 0, 0, 0]);
        assert_eq!(ctr[11], 0xFF);
    }

    #[test]
    fn test_ctr_increment_le_window() {
        let mut ctr = [0u8; 16];
        ctr[0] = 0xFF;
        ctr_increment_le(&mut ctr, 2);
        assert_eq!(ctr[0], 0x00);
        assert_eq!(ctr[1], 0x01);
    }
}
