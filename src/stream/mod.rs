//! # Stream Ciphers
//!
//! Byte-oriented stream-cipher state machines with the uniform
//! `setup → ivctr → crypt/keystream → done` lifecycle. Chunking the input
//! across `crypt` calls never changes the output, and `keystream` is
//! defined as zeroing the output then encrypting it in place, so keystream
//! bytes equal an encryption of all-zero input.

pub mod chacha;
pub mod rc4;
pub mod salsa20;

pub use chacha::ChaChaState;
pub use rc4::Rc4State;
pub use salsa20::Salsa20State;
