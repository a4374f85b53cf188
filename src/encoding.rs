//! The `Signature` value type and its two ECDSA wire encodings: DER
//! (`SEQUENCE { INTEGER r, INTEGER s }`, decoded strictly) and the 64-byte
//! compact form.

use crate::errors::Secp256k1Error;
use crate::scalar::Scalar;

/// An ECDSA signature `(r, s)`, both held canonical (`1 <= r, s < n`) — the
/// zero case is rejected at construction, so every live `Signature` is
/// valid in shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    r: Scalar,
    s: Scalar,
}

impl Signature {
    pub fn from_scalars(r: Scalar, s: Scalar) -> Result<Self, Secp256k1Error> {
        if bool::from(r.is_zero()) || bool::from(s.is_zero()) {
            return Err(Secp256k1Error::InvalidSignature);
        }
        Ok(Signature { r, s })
    }

    pub fn r(&self) -> Scalar {
        self.r
    }

    pub fn s(&self) -> Scalar {
        self.s
    }

    /// `s <= n/2`.
    pub fn is_low_s(&self) -> bool {
        self.s.is_low().into()
    }

    /// Returns a copy with `s` replaced by `n - s` if it isn't already
    /// low-s. Idempotent.
    pub fn normalize_s(&self) -> Self {
        if self.is_low_s() {
            *self
        } else {
            Signature { r: self.r, s: self.s.neg() }
        }
    }

    pub fn to_compact(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r.to_bytes_be());
        out[32..].copy_from_slice(&self.s.to_bytes_be());
        out
    }

    pub fn from_compact(bytes: &[u8; 64]) -> Result<Self, Secp256k1Error> {
        let mut r_bytes = [0u8; 32];
        let mut s_bytes = [0u8; 32];
        r_bytes.copy_from_slice(&bytes[..32]);
        s_bytes.copy_from_slice(&bytes[32..]);
        let r = Scalar::from_bytes_be(&r_bytes).map_err(|_| Secp256k1Error::InvalidSignature)?;
        let s = Scalar::from_bytes_be(&s_bytes).map_err(|_| Secp256k1Error::InvalidSignature)?;
        Signature::from_scalars(r, s)
    }

    pub fn to_der(&self) -> Vec<u8> {
        let r_enc = encode_der_integer(&self.r.to_bytes_be());
        let s_enc = encode_der_integer(&self.s.to_bytes_be());
        let body_len = r_enc.len() + s_enc.len();
        let mut out = Vec::with_capacity(2 + body_len);
        out.push(0x30);
        out.push(body_len as u8);
        out.extend_from_slice(&r_enc);
        out.extend_from_slice(&s_enc);
        out
    }

    /// Strict DER decode: rejects non-minimal lengths, negative integers,
    /// and trailing data. Both `SEQUENCE` and `INTEGER` lengths are
    /// required to be short-form (DER ECDSA signatures never exceed 72
    /// bytes, so long-form length octets are never legitimate here).
    pub fn from_der(bytes: &[u8]) -> Result<Self, Secp256k1Error> {
        if bytes.len() < 8 || bytes[0] != 0x30 {
            return Err(Secp256k1Error::InvalidEncoding);
        }
        let seq_len = bytes[1];
        if seq_len & 0x80 != 0 {
            return Err(Secp256k1Error::InvalidEncoding);
        }
        if bytes.len() != 2 + seq_len as usize {
            return Err(Secp256k1Error::InvalidEncoding);
        }
        let (r_bytes, offset) = parse_der_integer(bytes, 2)?;
        let (s_bytes, offset) = parse_der_integer(bytes, offset)?;
        if offset != bytes.len() {
            return Err(Secp256k1Error::InvalidEncoding);
        }
        let r = Scalar::from_bytes_be(&r_bytes).map_err(|_| Secp256k1Error::InvalidSignature)?;
        let s = Scalar::from_bytes_be(&s_bytes).map_err(|_| Secp256k1Error::InvalidSignature)?;
        Signature::from_scalars(r, s)
    }

    pub fn to_der_hex(&self) -> String {
        crate::util::to_hex(&self.to_der())
    }

    pub fn from_der_hex(s: &str) -> Result<Self, Secp256k1Error> {
        Self::from_der(&crate::util::bytes_from_hex(s)?)
    }

    pub fn to_compact_hex(&self) -> String {
        crate::util::to_hex(&self.to_compact())
    }

    pub fn from_compact_hex(s: &str) -> Result<Self, Secp256k1Error> {
        Self::from_compact(&crate::util::fixed_bytes_from_hex::<64>(s)?)
    }
}

/// Minimal-length DER `INTEGER`: strips redundant leading zero bytes, then
/// reintroduces a single `0x00` pad iff the remaining high bit is set
/// (non-negative-integer rule).
fn encode_der_integer(value: &[u8; 32]) -> Vec<u8> {
    let mut start = 0;
    while start < 31 && value[start] == 0 {
        start += 1;
    }
    let mut content = Vec::with_capacity(33);
    if value[start] & 0x80 != 0 {
        content.push(0x00);
    }
    content.extend_from_slice(&value[start..]);
    let mut out = Vec::with_capacity(2 + content.len());
    out.push(0x02);
    out.push(content.len() as u8);
    out.extend(content);
    out
}

/// Parses one DER `INTEGER` starting at `offset`, returning its value
/// zero-padded to 32 bytes and the offset just past it.
fn parse_der_integer(bytes: &[u8], offset: usize) -> Result<([u8; 32], usize), Secp256k1Error> {
    if offset + 2 > bytes.len() || bytes[offset] != 0x02 {
        return Err(Secp256k1Error::InvalidEncoding);
    }
    let len = bytes[offset + 1];
    if len & 0x80 != 0 || len == 0 {
        return Err(Secp256k1Error::InvalidEncoding);
    }
    let start = offset + 2;
    let end = start + len as usize;
    if end > bytes.len() {
        return Err(Secp256k1Error::InvalidEncoding);
    }
    let content = &bytes[start..end];
    if content[0] & 0x80 != 0 {
        // High bit set with no 0x00 pad: this would decode as a negative integer.
        return Err(Secp256k1Error::InvalidEncoding);
    }
    if content.len() > 1 && content[0] == 0 && content[1] & 0x80 == 0 {
        return Err(Secp256k1Error::InvalidEncoding);
    }
    if content.len() > 33 {
        return Err(Secp256k1Error::InvalidEncoding);
    }
    let trimmed = if content.len() == 33 { &content[1..] } else { content };
    let mut out = [0u8; 32];
    out[32 - trimmed.len()..].copy_from_slice(trimmed);
    Ok((out, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar_from_u64(v: u64) -> Scalar {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&v.to_be_bytes());
        Scalar::from_bytes_be(&bytes).unwrap()
    }

    #[test]
    fn der_round_trip() {
        let sig = Signature::from_scalars(scalar_from_u64(1), scalar_from_u64(2)).unwrap();
        let der = sig.to_der();
        assert_eq!(Signature::from_der(&der).unwrap(), sig);
    }

    #[test]
    fn der_high_bit_gets_zero_pad() {
        // A value with its top byte >= 0x80 needs a leading 0x00 pad in DER.
        let mut bytes = [0u8; 32];
        bytes[0] = 0x80;
        let r = Scalar::from_bytes_be(&bytes).unwrap();
        let sig = Signature::from_scalars(r, scalar_from_u64(1)).unwrap();
        let der = sig.to_der();
        // SEQUENCE tag, len, INTEGER tag, len=33, 0x00 pad, ...
        assert_eq!(der[2], 0x02);
        assert_eq!(der[3], 33);
        assert_eq!(der[4], 0x00);
    }

    #[test]
    fn der_rejects_trailing_data() {
        let sig = Signature::from_scalars(scalar_from_u64(1), scalar_from_u64(2)).unwrap();
        let mut der = sig.to_der();
        der.push(0xff);
        assert!(Signature::from_der(&der).is_err());
    }

    #[test]
    fn der_rejects_non_minimal_length() {
        let sig = Signature::from_scalars(scalar_from_u64(1), scalar_from_u64(2)).unwrap();
        let mut der = sig.to_der();
        // Insert a redundant 0x00 pad byte in front of r's content without
        // a high bit to justify it.
        der.insert(4, 0x00);
        der[3] += 1;
        der[1] += 1;
        assert!(Signature::from_der(&der).is_err());
    }

    #[test]
    fn compact_round_trip() {
        let sig = Signature::from_scalars(scalar_from_u64(7), scalar_from_u64(9)).unwrap();
        assert_eq!(Signature::from_compact(&sig.to_compact()).unwrap(), sig);
    }

    #[test]
    fn zero_components_rejected() {
        assert!(Signature::from_scalars(Scalar::ZERO, scalar_from_u64(1)).is_err());
        assert!(Signature::from_scalars(scalar_from_u64(1), Scalar::ZERO).is_err());
    }

    #[test]
    fn normalize_s_is_idempotent() {
        let sig = Signature::from_scalars(scalar_from_u64(1), scalar_from_u64(2)).unwrap();
        let normalized = sig.normalize_s();
        assert_eq!(normalized.normalize_s(), normalized);
        assert!(normalized.is_low_s());
    }
}
