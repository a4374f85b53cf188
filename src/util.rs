//! `hash_to_private_key`/`is_valid_private_key`/`random_private_key`, and the
//! hex/bytes coercion layer the public API's polymorphic inputs go through
//! before reaching the monomorphic core.

use crate::errors::Secp256k1Error;
use crate::limbs::{self, sub_limbs};
use crate::scalar::Scalar;
use rand_core::{CryptoRng, RngCore};

/// `n - 1`, used by `hash_to_private_key`'s bias-away-from-zero reduction.
fn n_minus_one() -> [u64; 4] {
    let (diff, _) = sub_limbs(&Scalar::MODULUS, &[1, 0, 0, 0]);
    diff
}

/// `(int(bytes) mod (n-1)) + 1`, biasing the result away from zero.
/// Requires `40 <= bytes.len() <= 1024`.
pub fn hash_to_private_key(bytes: &[u8]) -> Result<Scalar, Secp256k1Error> {
    if bytes.len() < 40 || bytes.len() > 1024 {
        return Err(Secp256k1Error::InvalidEncoding);
    }
    let reduced = limbs::reduce_wide_bytes(bytes, &n_minus_one());
    let (biased, carry) = limbs::add_limbs(&reduced, &[1, 0, 0, 0]);
    debug_assert_eq!(carry, 0, "reduced < n-1, so +1 cannot overflow 256 bits");
    Ok(Scalar::from_limbs_unchecked(biased))
}

/// `bytes` interpreted big-endian, in `[1, n)`.
pub fn is_valid_private_key(bytes: &[u8; 32]) -> bool {
    match Scalar::from_bytes_be(bytes) {
        Ok(scalar) => bool::from(scalar.is_valid_nonzero()),
        Err(_) => false,
    }
}

/// Rejection-samples a uniformly random private key from `rng`.
pub fn random_private_key<R: CryptoRng + RngCore>(rng: &mut R) -> Result<Scalar, Secp256k1Error> {
    for _ in 0..1024 {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        if let Ok(scalar) = Scalar::from_bytes_be(&bytes) {
            if bool::from(scalar.is_valid_nonzero()) {
                return Ok(scalar);
            }
        }
    }
    Err(Secp256k1Error::EntropyFailure)
}

/// Decodes a hex string (even length, hex digits only) to bytes.
pub fn bytes_from_hex(s: &str) -> Result<Vec<u8>, Secp256k1Error> {
    hex::decode(s).map_err(|_| Secp256k1Error::InvalidEncoding)
}

/// Decodes a hex string to a fixed-size byte array, rejecting any length
/// other than `N` bytes.
pub fn fixed_bytes_from_hex<const N: usize>(s: &str) -> Result<[u8; N], Secp256k1Error> {
    let bytes = bytes_from_hex(s)?;
    if bytes.len() != N {
        return Err(Secp256k1Error::InvalidEncoding);
    }
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_to_private_key_rejects_short_input() {
        assert!(hash_to_private_key(&[0u8; 39]).is_err());
    }

    #[test]
    fn hash_to_private_key_biases_away_from_zero() {
        let key = hash_to_private_key(&[0u8; 40]).unwrap();
        assert!(bool::from(key.is_valid_nonzero()));
    }

    #[test]
    fn valid_private_key_boundaries() {
        let mut one = [0u8; 32];
        one[31] = 1;
        assert!(is_valid_private_key(&one));
        assert!(!is_valid_private_key(&[0u8; 32]));
    }

    #[test]
    fn hex_roundtrip() {
        let bytes = vec![0xde, 0xad, 0xbe, 0xef];
        let encoded = to_hex(&bytes);
        assert_eq!(bytes_from_hex(&encoded).unwrap(), bytes);
    }

    #[test]
    fn odd_length_hex_rejected() {
        assert!(bytes_from_hex("abc").is_err());
    }
}
