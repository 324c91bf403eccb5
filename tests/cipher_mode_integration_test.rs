// Integration tests for the mode state machines over every registered cipher

use cryptkit::modes::{
    CbcState, CfbState, CfbWidth, CounterEndian, CtrState, EcbState, F8State, LrwState, OfbState,
    XtsState,
};
use cryptkit::registry::{self, cipher_descriptor};

fn all_slots() -> Vec<usize> {
    cryptkit::register_all().unwrap();
    (0..registry::TAB_SIZE)
        .filter(|&slot| registry::cipher_is_valid(slot).is_ok())
        .collect()
}

fn test_key(len: usize) -> Vec<u8> {
    (0..len).map(|x| (x * 7 + 3) as u8).collect()
}

#[test]
fn test_ecb_roundtrip_every_cipher() {
    for slot in all_slots() {
        let desc = cipher_descriptor(slot).unwrap();
        let key = test_key(desc.min_key_length());
        let mut st = EcbState::start(slot, &key, 0).unwrap();
        let pt: Vec<u8> = (0..desc.block_length * 4).map(|x| x as u8).collect();
        let mut ct = vec![0u8; pt.len()];
        st.encrypt(&pt, &mut ct).unwrap();
        assert_ne!(ct, pt, "{} produced identity ciphertext", desc.name);
        let mut back = vec![0u8; ct.len()];
        st.decrypt(&ct, &mut back).unwrap();
        assert_eq!(back, pt, "{} ECB roundtrip failed", desc.name);
    }
}

#[test]
fn test_cbc_roundtrip_every_cipher() {
    for slot in all_slots() {
        let desc = cipher_descriptor(slot).unwrap();
        let key = test_key(desc.max_key_length());
        let iv = vec![0xA5u8; desc.block_length];
        let pt: Vec<u8> = (0..desc.block_length * 3).map(|x| x as u8).collect();

        let mut enc = CbcState::start(slot, &iv, &key, 0).unwrap();
        let mut ct = vec![0u8; pt.len()];
        enc.encrypt(&pt, &mut ct).unwrap();

        let mut dec = CbcState::start(slot, &iv, &key, 0).unwrap();
        let mut back = vec![0u8; ct.len()];
        dec.decrypt(&ct, &mut back).unwrap();
        assert_eq!(back, pt, "{} CBC roundtrip failed", desc.name);
    }
}

#[test]
fn test_byte_oriented_modes_roundtrip_every_cipher() {
    for slot in all_slots() {
        let desc = cipher_descriptor(slot).unwrap();
        let key = test_key(desc.min_key_length());
        let iv = vec![0x3Cu8; desc.block_length];
        // deliberately not block aligned
        let pt: Vec<u8> = (0..desc.block_length * 2 + 5).map(|x| x as u8).collect();

        let mut enc = CfbState::start(slot, &iv, &key, 0).unwrap();
        let mut ct = vec![0u8; pt.len()];
        enc.encrypt(&pt, &mut ct).unwrap();
        let mut dec = CfbState::start(slot, &iv, &key, 0).unwrap();
        let mut back = vec![0u8; ct.len()];
        dec.decrypt(&ct, &mut back).unwrap();
        assert_eq!(back, pt, "{} CFB roundtrip failed", desc.name);

        let mut enc = OfbState::start(slot, &iv, &key, 0).unwrap();
        enc.encrypt(&pt, &mut ct).unwrap();
        let mut dec = OfbState::start(slot, &iv, &key, 0).unwrap();
        dec.decrypt(&ct, &mut back).unwrap();
        assert_eq!(back, pt, "{} OFB roundtrip failed", desc.name);

        let mut enc =
            CtrState::start(slot, &iv, &key, 0, CounterEndian::Big, 0, false).unwrap();
        enc.encrypt(&pt, &mut ct).unwrap();
        let mut dec =
            CtrState::start(slot, &iv, &key, 0, CounterEndian::Big, 0, false).unwrap();
        dec.decrypt(&ct, &mut back).unwrap();
        assert_eq!(back, pt, "{} CTR roundtrip failed", desc.name);
    }
}

#[test]
fn test_cfb_narrow_widths_where_supported() {
    cryptkit::register_all().unwrap();
    for name in ["aes", "des", "3des", "blowfish"] {
        let slot = cryptkit::find_cipher(name).unwrap();
        let desc = cipher_descriptor(slot).unwrap();
        let key = test_key(desc.min_key_length());
        let iv = vec![0x77u8; desc.block_length];
        let pt = b"narrow cfb widths".to_vec();

        for width in [CfbWidth::Bit1, CfbWidth::Bit8] {
            let mut enc = CfbState::start_ex(slot, &iv, &key, 0, width).unwrap();
            let mut ct = vec![0u8; pt.len()];
            enc.encrypt(&pt, &mut ct).unwrap();
            let mut dec = CfbState::start_ex(slot, &iv, &key, 0, width).unwrap();
            let mut back = vec![0u8; ct.len()];
            dec.decrypt(&ct, &mut back).unwrap();
            assert_eq!(back, pt, "{name} CFB-{width:?} roundtrip failed");
        }
    }
}

#[test]
fn test_lrw_f8_xts_on_128_bit_ciphers() {
    cryptkit::register_all().unwrap();
    for name in ["aes", "twofish", "serpent", "camellia", "sm4"] {
        let slot = cryptkit::find_cipher(name).unwrap();
        let key = test_key(16);
        let tweak = test_key(16);
        let iv = vec![1u8; 16];

        let pt: Vec<u8> = (0..64).map(|x| x as u8).collect();
        let mut enc = LrwState::start(slot, &iv, &key, &tweak, 0).unwrap();
        let mut ct = vec![0u8; pt.len()];
        enc.encrypt(&pt, &mut ct).unwrap();
        let mut dec = LrwState::start(slot, &iv, &key, &tweak, 0).unwrap();
        let mut back = vec![0u8; ct.len()];
        dec.decrypt(&ct, &mut back).unwrap();
        assert_eq!(back, pt, "{name} LRW roundtrip failed");

        let salt = [0xD6u8; 4];
        let mut enc = F8State::start(slot, &iv, &key, &salt, 0).unwrap();
        enc.encrypt(&pt, &mut ct).unwrap();
        let mut dec = F8State::start(slot, &iv, &key, &salt, 0).unwrap();
        dec.decrypt(&ct, &mut back).unwrap();
        assert_eq!(back, pt, "{name} F8 roundtrip failed");

        // XTS with a stolen tail
        let pt_tail: Vec<u8> = (0..45).map(|x| x as u8).collect();
        let sector = [9u8; 16];
        let mut xts = XtsState::start(slot, &key, &tweak, 0).unwrap();
        let mut ct = vec![0u8; pt_tail.len()];
        xts.encrypt(&pt_tail, &mut ct, &sector).unwrap();
        let mut back = vec![0u8; ct.len()];
        xts.decrypt(&ct, &mut back, &sector).unwrap();
        assert_eq!(back, pt_tail, "{name} XTS stealing roundtrip failed");
    }
}

#[test]
fn test_aes_ecb_fips197_vector() {
    cryptkit::register_all().unwrap();
    let slot = cryptkit::find_cipher("aes").unwrap();
    let key = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();
    let pt = hex::decode("00112233445566778899aabbccddeeff").unwrap();
    let mut st = EcbState::start(slot, &key, 0).unwrap();
    let mut ct = vec![0u8; 16];
    st.encrypt(&pt, &mut ct).unwrap();
    assert_eq!(hex::encode(&ct), "69c4e0d86a7b0430d8cdb78070b4c55a");
}
