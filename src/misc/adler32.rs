//! Adler-32 (RFC 1950) with a streaming contract.

const MOD_ADLER: u32 = 65521;

/// Streaming Adler-32 state.
#[derive(Debug, Clone)]
pub struct Adler32 {
    a: u32,
    b: u32,
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Adler32 {
    /// Fresh state.
    pub fn new() -> Self {
        Self { a: 1, b: 0 }
    }

    /// Absorb bytes.
    pub fn update(&mut self, data: &[u8]) {
        // 5552 is the largest run that cannot overflow 32 bits
        for chunk in data.chunks(5552) {
            for &byte in chunk {
                self.a += byte as u32;
                self.b += self.a;
            }
            self.a %= MOD_ADLER;
            self.b %= MOD_ADLER;
        }
    }

    /// Finish; returns the checksum.
    pub fn finish(self) -> u32 {
        (self.b << 16) | self.a
    }

    /// One-shot convenience.
    pub fn checksum(data: &[u8]) -> u32 {
        let mut st = Self::new();
        st.update(data);
        st.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adler32_wikipedia_vector() {
        assert_eq!(Adler32::checksum(b"Wikipedia"), 0x11E6_0398);
    }

    #[test]
    fn test_adler32_empty() {
        assert_eq!(Adler32::checksum(b""), 1);
    }

    #[test]
    fn test_adler32_streaming_matches_one_shot() {
        let data = vec![0xA5u8; 10_000];
        let mut st = Adler32::new();
        for chunk in data.chunks(333) {
            st.update(chunk);
        }
        assert_eq!(st.finish(), Adler32::checksum(&data));
    }
}
