//! EAX mode: CTR encryption bracketed by three tweaked OMACs (nonce,
//! header, ciphertext).

use super::verify_tag;
use crate::error::{CryptError, CryptResult};
use crate::mac::OmacState;
use crate::modes::{CounterEndian, CtrState};
use crate::registry;

/// EAX streaming state.
pub struct EaxState {
    ctr: CtrState,
    /// OMAC over the nonce, already finalized at init.
    n: Vec<u8>,
    headeromac: OmacState,
    ctomac: OmacState,
}

fn tweaked_omac(cipher: usize, key: &[u8], tweak: u8) -> CryptResult<OmacState> {
    let desc = registry::cipher_descriptor(cipher)?;
    let mut st = OmacState::init(cipher, key)?;
    let mut prefix = vec![0u8; desc.block_length];
    prefix[desc.block_length - 1] = tweak;
    st.process(&prefix)?;
    Ok(st)
}

impl EaxState {
    /// Key the mode; `nonce` and `header` may be any length (the header can
    /// be extended later with [`Self::add_header`]).
    pub fn init(cipher: usize, key: &[u8], nonce: &[u8], header: &[u8]) -> CryptResult<Self> {
        // N = OMAC^0(nonce)
        let mut nomac = tweaked_omac(cipher, key, 0)?;
        nomac.process(nonce)?;
        let n = nomac.done()?;

        let mut headeromac = tweaked_omac(cipher, key, 1)?;
        headeromac.process(header)?;
        let ctomac = tweaked_omac(cipher, key, 2)?;

        let ctr = CtrState::start(cipher, &n, key, 0, CounterEndian::Big, 0, false)?;
        Ok(Self {
            ctr,
            n,
            headeromac,
            ctomac,
        })
    }

    /// Absorb more associated data.
    pub fn add_header(&mut self, header: &[u8]) -> CryptResult<()> {
        self.headeromac.process(header)
    }

    /// Encrypt plaintext bytes; any length.
    pub fn encrypt(&mut self, pt: &[u8], ct: &mut [u8]) -> CryptResult<()> {
        self.ctr.encrypt(pt, ct)?;
        self.ctomac.process(&ct[..pt.len()])
    }

    /// Decrypt ciphertext bytes; any length.
    pub fn decrypt(&mut self, ct: &[u8], pt: &mut [u8]) -> CryptResult<()> {
        self.ctomac.process(ct)?;
        self.ctr.decrypt(ct, pt)
    }

    /// Finish and produce the tag (full block length; truncate as needed).
    pub fn done(self) -> CryptResult<Vec<u8>> {
        let h = self.headeromac.done()?;
        let c = self.ctomac.done()?;
        let mut tag = self.n;
        for (t, (hb, cb)) in tag.iter_mut().zip(h.iter().zip(c.iter())) {
            *t ^= hb ^ cb;
        }
        Ok(tag)
    }

    /// Finish a decryption and verify `tag` in constant time.
    pub fn done_verify(self, tag: &[u8]) -> CryptResult<()> {
        verify_tag(self.done()?, tag)
    }
}

/// One-shot EAX encryption; returns `(ciphertext, tag)`.
pub fn eax_memory_encrypt(
    cipher: usize,
    key: &[u8],
    nonce: &[u8],
    header: &[u8],
    pt: &[u8],
    taglen: usize,
) -> CryptResult<(Vec<u8>, Vec<u8>)> {
    let mut st = EaxState::init(cipher, key, nonce, header)?;
    let mut ct = vec![0u8; pt.len()];
    st.encrypt(pt, &mut ct)?;
    let mut tag = st.done()?;
    if taglen > tag.len() {
        return Err(CryptError::InvalidArg);
    }
    tag.truncate(taglen);
    Ok((ct, tag))
}

/// One-shot EAX decryption with tag verification.
pub fn eax_memory_decrypt(
    cipher: usize,
    key: &[u8],
    nonce: &[u8],
    header: &[u8],
    ct: &[u8],
    tag: &[u8],
) -> CryptResult<Vec<u8>> {
    let mut st = EaxState::init(cipher, key, nonce, header)?;
    let mut pt = vec![0u8; ct.len()];
    st.decrypt(ct, &mut pt)?;
    st.done_verify(tag)?;
    Ok(pt)
}

#[cfg(test)]
mod tests {
    use super::super::testutil::aes_slot;
    use super::*;

    #[test]
    fn test_eax_paper_vector_1() {
        let key = hex::decode("233952dee4d5ed5f9b9c6d6ff80ff478").unwrap();
        let nonce = hex::decode("62ec67f9c3a4a407fcb2a8c49031a8b3").unwrap();
        let header = hex::decode("6bfb914fd07eae6b").unwrap();
        let (ct, tag) = eax_memory_encrypt(aes_slot(), &key, &nonce, &header, b"", 16).unwrap();
        assert!(ct.is_empty());
        assert_eq!(hex::encode(&tag), "e037830e8389f27b025a2d6527e79d01");
    }

    #[test]
    fn test_eax_paper_vector_2() {
        let key = hex::decode("91945d3f4dcbee0bf45ef52255f095a4").unwrap();
        let nonce = hex::decode("becaf043b0a23d843194ba972c66debd").unwrap();
        let header = hex::decode("fa3bfd4806eb53fa").unwrap();
        let pt = hex::decode("f7fb").unwrap();
        let (ct, tag) = eax_memory_encrypt(aes_slot(), &key, &nonce, &header, &pt, 16).unwrap();
        assert_eq!(hex::encode(&ct), "19dd");
        assert_eq!(hex::encode(&tag), "5c4c9331049d0bdab0277408f67967e5");

        let back = eax_memory_decrypt(aes_slot(), &key, &nonce, &header, &ct, &tag).unwrap();
        assert_eq!(back, pt);
    }

    #[test]
    fn test_eax_tamper_detected() {
        let key = [0u8; 16];
        let (mut ct, tag) =
            eax_memory_encrypt(aes_slot(), &key, b"nonce", b"header", b"payload", 16).unwrap();
        ct[0] ^= 1;
        assert!(eax_memory_decrypt(aes_slot(), &key, b"nonce", b"header", &ct, &tag).is_err());
    }

    #[test]
    fn test_eax_header_tamper_detected() {
        let key = [0u8; 16];
        let (ct, tag) =
            eax_memory_encrypt(aes_slot(), &key, b"nonce", b"header", b"payload", 16).unwrap();
        assert!(eax_memory_decrypt(aes_slot(), &key, b"nonce", b"headeR", &ct, &tag).is_err());
    }
}
