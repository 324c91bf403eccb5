//! # Message Authentication Codes
//!
//! Streaming MAC constructions with the uniform `init → process → done`
//! contract. Block-cipher MACs (OMAC, PMAC, XCBC, F9, Pelican) run over any
//! registered cipher slot; HMAC runs over any registered hash; Poly1305 and
//! the BLAKE2 MACs are keyed directly.
//!
//! `done` yields the full-length tag; `done_into` writes the leading
//! `min(out.len(), tag_len)` bytes, mirroring the clamp-style length
//! receiver of the wire formats that consume truncated tags.

pub mod blake2mac;
pub mod f9;
pub mod hmac;
pub mod omac;
pub mod pelican;
pub mod pmac;
pub mod poly1305;
pub mod xcbc;

pub use blake2mac::{Blake2bMacState, Blake2sMacState};
pub use f9::F9State;
pub use hmac::HmacState;
pub use omac::OmacState;
pub use pelican::PelicanState;
pub use pmac::PmacState;
pub use poly1305::Poly1305State;
pub use xcbc::XcbcState;

/// Copy the leading bytes of `tag` into `out`, returning the count written.
pub(crate) fn clamp_tag(tag: &[u8], out: &mut [u8]) -> usize {
    let n = tag.len().min(out.len());
    out[..n].copy_from_slice(&tag[..n]);
    n
}
