//! The [`DerValue`] tree: primitive encoders/decoders, SEQUENCE/SET
//! composition and the flexi-decoder.

use super::time::{GeneralizedTime, UtcTime};
use super::{decode_length, encode_length};
use crate::error::{CryptError, CryptResult};
use crate::math::{Int, Mpi};

// universal tags
const TAG_BOOLEAN: u8 = 0x01;
const TAG_INTEGER: u8 = 0x02;
const TAG_BIT_STRING: u8 = 0x03;
const TAG_OCTET_STRING: u8 = 0x04;
const TAG_NULL: u8 = 0x05;
const TAG_OID: u8 = 0x06;
const TAG_UTF8_STRING: u8 = 0x0C;
const TAG_PRINTABLE_STRING: u8 = 0x13;
const TAG_TELETEX_STRING: u8 = 0x14;
const TAG_IA5_STRING: u8 = 0x16;
const TAG_UTCTIME: u8 = 0x17;
const TAG_GENERALIZEDTIME: u8 = 0x18;
const TAG_GENERAL_STRING: u8 = 0x1B;
const TAG_SEQUENCE: u8 = 0x30;
const TAG_SET: u8 = 0x31;

/// A signed DER INTEGER: sign plus unsigned magnitude, since the MPI layer
/// is non-negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerInteger {
    /// Sign; `-0` is normalized to `+0`.
    pub negative: bool,
    /// Absolute value.
    pub magnitude: Int,
}

impl DerInteger {
    /// A non-negative integer.
    pub fn positive(magnitude: Int) -> Self {
        Self {
            negative: false,
            magnitude,
        }
    }

    /// From a small signed constant.
    pub fn from_i64(v: i64) -> Self {
        Self {
            negative: v < 0,
            magnitude: Int::from_bytes_be(&v.unsigned_abs().to_be_bytes()),
        }
    }
}

/// The kind of a [`DerValue`], used for template comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum DerKind {
    Boolean,
    Integer,
    BitString,
    OctetString,
    Null,
    Oid,
    Utf8String,
    PrintableString,
    TeletexString,
    Ia5String,
    GeneralString,
    UtcTime,
    GeneralizedTime,
    Sequence,
    Set,
    SetOf,
    Raw,
}

/// One node of a DER document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DerValue {
    /// BOOLEAN.
    Boolean(bool),
    /// INTEGER (arbitrary precision, signed).
    Integer(DerInteger),
    /// BIT STRING: packed bits MSB-first plus the exact bit count.
    BitString {
        /// Packed bits, most significant bit of byte 0 first.
        data: Vec<u8>,
        /// Number of meaningful bits.
        bits: usize,
    },
    /// OCTET STRING.
    OctetString(Vec<u8>),
    /// NULL.
    Null,
    /// OBJECT IDENTIFIER as numeric components.
    Oid(Vec<u32>),
    /// UTF8String.
    Utf8String(String),
    /// PrintableString.
    PrintableString(String),
    /// TeletexString (T61); stored as raw latin bytes.
    TeletexString(Vec<u8>),
    /// IA5String.
    Ia5String(String),
    /// GeneralString; stored as raw bytes.
    GeneralString(Vec<u8>),
    /// UTCTime.
    UtcTime(UtcTime),
    /// GeneralizedTime.
    GeneralizedTime(GeneralizedTime),
    /// SEQUENCE of nested values, in order.
    Sequence(Vec<DerValue>),
    /// SET of nested values.
    Set(Vec<DerValue>),
    /// SET OF: element encodings are sorted lexicographically when encoded.
    SetOf(Vec<DerValue>),
    /// Any other tag, kept verbatim (context/application/private classes).
    Raw {
        /// Full tag octet.
        tag: u8,
        /// Undecoded contents.
        content: Vec<u8>,
    },
}

impl DerValue {
    /// The template kind of this node.
    pub fn kind(&self) -> DerKind {
        match self {
            DerValue::Boolean(_) => DerKind::Boolean,
            DerValue::Integer(_) => DerKind::Integer,
            DerValue::BitString { .. } => DerKind::BitString,
            DerValue::OctetString(_) => DerKind::OctetString,
            DerValue::Null => DerKind::Null,
            DerValue::Oid(_) => DerKind::Oid,
            DerValue::Utf8String(_) => DerKind::Utf8String,
            DerValue::PrintableString(_) => DerKind::PrintableString,
            DerValue::TeletexString(_) => DerKind::TeletexString,
            DerValue::Ia5String(_) => DerKind::Ia5String,
            DerValue::GeneralString(_) => DerKind::GeneralString,
            DerValue::UtcTime(_) => DerKind::UtcTime,
            DerValue::GeneralizedTime(_) => DerKind::GeneralizedTime,
            DerValue::Sequence(_) => DerKind::Sequence,
            DerValue::Set(_) => DerKind::Set,
            DerValue::SetOf(_) => DerKind::SetOf,
            DerValue::Raw { .. } => DerKind::Raw,
        }
    }

    /// Children of a constructed node, empty for primitives.
    pub fn children(&self) -> &[DerValue] {
        match self {
            DerValue::Sequence(c) | DerValue::Set(c) | DerValue::SetOf(c) => c,
            _ => &[],
        }
    }

    /// Convenience constructor for an unsigned INTEGER.
    pub fn uint(v: &Int) -> Self {
        DerValue::Integer(DerInteger::positive(v.clone()))
    }

    /// Convenience accessor: the value as an unsigned [`Int`].
    pub fn as_uint(&self) -> CryptResult<&Int> {
        match self {
            DerValue::Integer(i) if !i.negative => Ok(&i.magnitude),
            _ => Err(CryptError::InvalidPacket),
        }
    }

    /// Convenience accessor: octet-string contents.
    pub fn as_octets(&self) -> CryptResult<&[u8]> {
        match self {
            DerValue::OctetString(b) => Ok(b),
            _ => Err(CryptError::InvalidPacket),
        }
    }
}

// ---------------------------------------------------------------------------
// encode
// ---------------------------------------------------------------------------

fn integer_content(v: &DerInteger) -> Vec<u8> {
    if v.magnitude.is_zero() {
        return vec![0x00];
    }
    if !v.negative {
        let mut raw = v.magnitude.to_bytes_be();
        if raw[0] & 0x80 != 0 {
            raw.insert(0, 0x00);
        }
        raw
    } else {
        // two's complement: smallest k with magnitude <= 2^(8k-1)
        let mut k = v.magnitude.to_bytes_be().len();
        let limit = |k: usize| {
            let mut b = vec![0u8; k];
            b[0] = 0x80;
            Int::from_bytes_be(&b)
        };
        if v.magnitude > limit(k) {
            k += 1;
        }
        let mut modulus = vec![0x01u8];
        modulus.extend(std::iter::repeat(0u8).take(k));
        let tc = Int::from_bytes_be(&modulus)
            .sub(&v.magnitude)
            .expect("magnitude below modulus");
        let raw = tc.to_bytes_be();
        let mut out = vec![0xFFu8; k - raw.len()];
        out.extend_from_slice(&raw);
        out
    }
}

fn oid_content(components: &[u32]) -> CryptResult<Vec<u8>> {
    if components.len() < 2 {
        return Err(CryptError::InvalidArg);
    }
    if components[0] > 2 || (components[0] < 2 && components[1] > 39) {
        return Err(CryptError::InvalidArg);
    }
    let mut out = Vec::new();
    let first = components[0]
        .checked_mul(40)
        .and_then(|v| v.checked_add(components[1]))
        .ok_or(CryptError::Overflow)?;
    let mut push_base128 = |mut v: u32| {
        let mut tmp = [0u8; 5];
        let mut n = 0;
        loop {
            tmp[n] = (v & 0x7F) as u8;
            v >>= 7;
            n += 1;
            if v == 0 {
                break;
            }
        }
        for x in (0..n).rev() {
            let marker = if x == 0 { 0x00 } else { 0x80 };
            out.push(tmp[x] | marker);
        }
    };
    push_base128(first);
    for &c in &components[2..] {
        push_base128(c);
    }
    Ok(out)
}

fn emit(tag: u8, content: &[u8], out: &mut Vec<u8>) {
    out.push(tag);
    encode_length(content.len(), out);
    out.extend_from_slice(content);
}

/// Encode a value tree into DER bytes.
pub fn der_encode(value: &DerValue) -> CryptResult<Vec<u8>> {
    let mut out = Vec::new();
    encode_into(value, &mut out)?;
    Ok(out)
}

fn encode_into(value: &DerValue, out: &mut Vec<u8>) -> CryptResult<()> {
    match value {
        DerValue::Boolean(b) => emit(TAG_BOOLEAN, &[if *b { 0xFF } else { 0x00 }], out),
        DerValue::Integer(v) => emit(TAG_INTEGER, &integer_content(v), out),
        DerValue::BitString { data, bits } => {
            let bytes = (bits + 7) / 8;
            if bytes > data.len() {
                return Err(CryptError::InvalidArg);
            }
            let unused = (8 - (bits % 8)) % 8;
            let mut content = Vec::with_capacity(1 + bytes);
            content.push(unused as u8);
            content.extend_from_slice(&data[..bytes]);
            if unused > 0 {
                // zero the unused trailing bits
                let last = content.len() - 1;
                content[last] &= 0xFFu8 << unused;
            }
            emit(TAG_BIT_STRING, &content, out);
        }
        DerValue::OctetString(b) => emit(TAG_OCTET_STRING, b, out),
        DerValue::Null => emit(TAG_NULL, &[], out),
        DerValue::Oid(components) => emit(TAG_OID, &oid_content(components)?, out),
        DerValue::Utf8String(s) => emit(TAG_UTF8_STRING, s.as_bytes(), out),
        DerValue::PrintableString(s) => {
            if !s.bytes().all(is_printable_char) {
                return Err(CryptError::InvalidArg);
            }
            emit(TAG_PRINTABLE_STRING, s.as_bytes(), out);
        }
        DerValue::TeletexString(b) => emit(TAG_TELETEX_STRING, b, out),
        DerValue::Ia5String(s) => {
            if !s.is_ascii() {
                return Err(CryptError::InvalidArg);
            }
            emit(TAG_IA5_STRING, s.as_bytes(), out);
        }
        DerValue::GeneralString(b) => emit(TAG_GENERAL_STRING, b, out),
        DerValue::UtcTime(t) => emit(TAG_UTCTIME, t.encode()?.as_bytes(), out),
        DerValue::GeneralizedTime(t) => emit(TAG_GENERALIZEDTIME, t.encode()?.as_bytes(), out),
        DerValue::Sequence(items) => {
            let mut content = Vec::new();
            for item in items {
                encode_into(item, &mut content)?;
            }
            emit(TAG_SEQUENCE, &content, out);
        }
        DerValue::Set(items) => {
            // DER orders SET members by tag octet
            let mut encoded: Vec<Vec<u8>> = Vec::with_capacity(items.len());
            for item in items {
                encoded.push(der_encode(item)?);
            }
            encoded.sort_by(|a, b| a.first().cmp(&b.first()));
            let content: Vec<u8> = encoded.concat();
            emit(TAG_SET, &content, out);
        }
        DerValue::SetOf(items) => {
            // DER orders SET OF members by their full encodings
            let mut encoded: Vec<Vec<u8>> = Vec::with_capacity(items.len());
            for item in items {
                encoded.push(der_encode(item)?);
            }
            encoded.sort();
            let content: Vec<u8> = encoded.concat();
            emit(TAG_SET, &content, out);
        }
        DerValue::Raw { tag, content } => emit(*tag, content, out),
    }
    Ok(())
}

fn is_printable_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b" '()+,-./:=?".contains(&b)
}

// ---------------------------------------------------------------------------
// decode (flexi)
// ---------------------------------------------------------------------------

/// Decode the first value in `input`; returns the node and bytes consumed.
pub fn der_decode(input: &[u8]) -> CryptResult<(DerValue, usize)> {
    decode_node(input, 0)
}

/// Decode `input`, requiring exact consumption; trailing bytes yield
/// `InputTooLong`.
pub fn der_decode_exact(input: &[u8]) -> CryptResult<DerValue> {
    let (value, used) = der_decode(input)?;
    if used != input.len() {
        return Err(CryptError::InputTooLong);
    }
    Ok(value)
}

const MAX_DEPTH: usize = 32;

fn decode_node(input: &[u8], depth: usize) -> CryptResult<(DerValue, usize)> {
    if depth > MAX_DEPTH {
        return Err(CryptError::Overflow);
    }
    if input.len() < 2 {
        return Err(CryptError::InvalidPacket);
    }
    let tag = input[0];
    if tag & 0x1F == 0x1F {
        // multi-octet tag numbers are not used by the supported formats
        return Err(CryptError::InvalidPacket);
    }
    let (len, lenlen) = decode_length(&input[1..])?;
    let start = 1 + lenlen;
    let content = input
        .get(start..start + len)
        .ok_or(CryptError::InvalidPacket)?;
    let used = start + len;

    let value = match tag {
        TAG_BOOLEAN => match content {
            [0xFF] => DerValue::Boolean(true),
            [0x00] => DerValue::Boolean(false),
            _ => return Err(CryptError::InvalidPacket),
        },
        TAG_INTEGER => DerValue::Integer(decode_integer_content(content)?),
        TAG_BIT_STRING => {
            let unused = *content.first().ok_or(CryptError::InvalidPacket)? as usize;
            if unused > 7 || (unused > 0 && content.len() == 1) {
                return Err(CryptError::InvalidPacket);
            }
            let data = content[1..].to_vec();
            let bits = data.len() * 8 - unused;
            DerValue::BitString { data, bits }
        }
        TAG_OCTET_STRING => DerValue::OctetString(content.to_vec()),
        TAG_NULL => {
            if !content.is_empty() {
                return Err(CryptError::InvalidPacket);
            }
            DerValue::Null
        }
        TAG_OID => DerValue::Oid(decode_oid_content(content)?),
        TAG_UTF8_STRING => DerValue::Utf8String(
            String::from_utf8(content.to_vec()).map_err(|_| CryptError::InvalidPacket)?,
        ),
        TAG_PRINTABLE_STRING => {
            if !content.iter().all(|&b| is_printable_char(b)) {
                return Err(CryptError::InvalidPacket);
            }
            DerValue::PrintableString(String::from_utf8_lossy(content).into_owned())
        }
        TAG_TELETEX_STRING => DerValue::TeletexString(content.to_vec()),
        TAG_IA5_STRING => {
            if !content.is_ascii() {
                return Err(CryptError::InvalidPacket);
            }
            DerValue::Ia5String(String::from_utf8_lossy(content).into_owned())
        }
        TAG_GENERAL_STRING => DerValue::GeneralString(content.to_vec()),
        TAG_UTCTIME => DerValue::UtcTime(UtcTime::decode(
            std::str::from_utf8(content).map_err(|_| CryptError::InvalidPacket)?,
        )?),
        TAG_GENERALIZEDTIME => DerValue::GeneralizedTime(GeneralizedTime::decode(
            std::str::from_utf8(content).map_err(|_| CryptError::InvalidPacket)?,
        )?),
        TAG_SEQUENCE => DerValue::Sequence(decode_children(content, depth + 1)?),
        TAG_SET => DerValue::Set(decode_children(content, depth + 1)?),
        other => DerValue::Raw {
            tag: other,
            content: content.to_vec(),
        },
    };
    Ok((value, used))
}

fn decode_children(mut content: &[u8], depth: usize) -> CryptResult<Vec<DerValue>> {
    let mut out = Vec::new();
    while !content.is_empty() {
        let (child, used) = decode_node(content, depth)?;
        out.push(child);
        content = &content[used..];
    }
    Ok(out)
}

fn decode_integer_content(content: &[u8]) -> CryptResult<DerInteger> {
    if content.is_empty() {
        return Err(CryptError::InvalidPacket);
    }
    // minimal: no redundant leading 0x00/0xFF
    if content.len() > 1 {
        if content[0] == 0x00 && content[1] & 0x80 == 0 {
            return Err(CryptError::InvalidPacket);
        }
        if content[0] == 0xFF && content[1] & 0x80 != 0 {
            return Err(CryptError::InvalidPacket);
        }
    }
    if content[0] & 0x80 == 0 {
        Ok(DerInteger::positive(Int::from_bytes_be(content)))
    } else {
        let mut modulus = vec![0x01u8];
        modulus.extend(std::iter::repeat(0u8).take(content.len()));
        let magnitude = Int::from_bytes_be(&modulus)
            .sub(&Int::from_bytes_be(content))
            .map_err(|_| CryptError::InvalidPacket)?;
        Ok(DerInteger {
            negative: true,
            magnitude,
        })
    }
}

fn decode_oid_content(content: &[u8]) -> CryptResult<Vec<u32>> {
    if content.is_empty() || content.last().map(|b| b & 0x80) != Some(0) {
        return Err(CryptError::InvalidPacket);
    }
    let mut raw: Vec<u32> = Vec::new();
    let mut acc: u32 = 0;
    for &b in content {
        if acc == 0 && b == 0x80 {
            // non-minimal base-128
            return Err(CryptError::InvalidPacket);
        }
        acc = acc.checked_mul(128).ok_or(CryptError::Overflow)? + (b & 0x7F) as u32;
        if b & 0x80 == 0 {
            raw.push(acc);
            acc = 0;
        }
    }
    let first = raw[0];
    let mut out = Vec::with_capacity(raw.len() + 1);
    if first < 40 {
        out.push(0);
        out.push(first);
    } else if first < 80 {
        out.push(1);
        out.push(first - 40);
    } else {
        out.push(2);
        out.push(first - 80);
    }
    out.extend_from_slice(&raw[1..]);
    Ok(out)
}

// ---------------------------------------------------------------------------
// template comparison
// ---------------------------------------------------------------------------

/// Check a decoded SEQUENCE against an expected list of member kinds.
pub fn flexi_sequence_cmp(value: &DerValue, template: &[DerKind]) -> CryptResult<()> {
    let children = match value {
        DerValue::Sequence(c) => c,
        _ => return Err(CryptError::InvalidPacket),
    };
    if children.len() != template.len() {
        return Err(CryptError::InvalidPacket);
    }
    for (child, kind) in children.iter().zip(template.iter()) {
        if child.kind() != *kind {
            return Err(CryptError::InvalidPacket);
        }
    }
    Ok(())
}
