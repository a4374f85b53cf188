//! BIP 340 Schnorr signatures: tagged hashing, x-only key generation,
//! `sign`/`verify`.

use crate::errors::Secp256k1Error;
use crate::field::Fp;
use crate::point::{AffinePoint, ProjectivePoint};
use crate::precompute;
use crate::scalar::Scalar;
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

/// `taggedHash(tag, m) = SHA256(SHA256(tag) || SHA256(tag) || m)`.
fn tagged_hash(tag: &[u8], parts: &[&[u8]]) -> [u8; 32] {
    let tag_hash = Sha256::digest(tag);
    let mut hasher = Sha256::new();
    hasher.update(tag_hash);
    hasher.update(tag_hash);
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// The x-only (32-byte) BIP340 public key for `private_key`.
pub fn get_public_key(private_key: &Scalar) -> Result<[u8; 32], Secp256k1Error> {
    if !bool::from(private_key.is_valid_nonzero()) {
        return Err(Secp256k1Error::InvalidPrivateKey);
    }
    precompute::base_point_mul(private_key).to_affine().to_x_only()
}

/// BIP340 signing. `aux` is 32 bytes of auxiliary randomness (all-zero is a
/// valid, if non-private, choice — used by the reference test vectors).
pub fn sign(message: &[u8], private_key: &Scalar, aux: &[u8; 32]) -> Result<[u8; 64], Secp256k1Error> {
    if !bool::from(private_key.is_valid_nonzero()) {
        return Err(Secp256k1Error::InvalidPrivateKey);
    }
    let (px, py) = match precompute::base_point_mul(private_key).to_affine() {
        AffinePoint::Point { x, y } => (x, y),
        AffinePoint::Identity => unreachable!("nonzero scalar times generator is never identity"),
    };
    let mut d = if bool::from(py.is_odd()) { private_key.neg() } else { *private_key };

    let aux_hash = tagged_hash(b"BIP0340/aux", &[aux]);
    let mut d_bytes = d.to_bytes_be();
    let mut t = [0u8; 32];
    for i in 0..32 {
        t[i] = d_bytes[i] ^ aux_hash[i];
    }
    d_bytes.zeroize();
    let px_bytes = px.to_bytes_be();
    let rand = tagged_hash(b"BIP0340/nonce", &[&t, &px_bytes, message]);
    t.zeroize();
    let mut k0 = Scalar::from_bytes_wide(&rand);
    if bool::from(k0.is_zero()) {
        d.zeroize();
        return Err(Secp256k1Error::EntropyFailure);
    }

    let (rx, ry) = match precompute::base_point_mul(&k0).to_affine() {
        AffinePoint::Point { x, y } => (x, y),
        AffinePoint::Identity => unreachable!("nonzero scalar times generator is never identity"),
    };
    let mut k = if bool::from(ry.is_odd()) { k0.neg() } else { k0 };
    k0.zeroize();

    let rx_bytes = rx.to_bytes_be();
    let e_bytes = tagged_hash(b"BIP0340/challenge", &[&rx_bytes, &px_bytes, message]);
    let e = Scalar::from_bytes_wide(&e_bytes);
    let s = k.add(&e.mul(&d));
    k.zeroize();
    d.zeroize();

    let mut signature = [0u8; 64];
    signature[..32].copy_from_slice(&rx_bytes);
    signature[32..].copy_from_slice(&s.to_bytes_be());
    Ok(signature)
}

/// BIP340 verification against an x-only public key.
pub fn verify(signature: &[u8; 64], message: &[u8], public_key_x: &[u8; 32]) -> Result<bool, Secp256k1Error> {
    let p = AffinePoint::from_x_only(public_key_x)?;

    let mut r_bytes = [0u8; 32];
    let mut s_bytes = [0u8; 32];
    r_bytes.copy_from_slice(&signature[..32]);
    s_bytes.copy_from_slice(&signature[32..]);
    let r_fp = Fp::from_bytes_be(&r_bytes).map_err(|_| Secp256k1Error::InvalidSignature)?;
    let s = Scalar::from_bytes_be(&s_bytes).map_err(|_| Secp256k1Error::InvalidSignature)?;

    let e_bytes = tagged_hash(b"BIP0340/challenge", &[&r_bytes, public_key_x, message]);
    let e = Scalar::from_bytes_wide(&e_bytes);

    let g = ProjectivePoint::generator();
    let p_proj = ProjectivePoint::from_affine(&p);
    // R = s*G - e*P, via the fused dual-base multiply with the negated challenge.
    let r_point = precompute::dual_base_mul_variable_time(&s, &g, &e.neg(), &p_proj);
    if bool::from(r_point.is_identity()) {
        return Ok(false);
    }
    let (x, y) = match r_point.to_affine() {
        AffinePoint::Point { x, y } => (x, y),
        AffinePoint::Identity => unreachable!("checked above"),
    };
    if bool::from(y.is_odd()) {
        return Ok(false);
    }
    Ok(x == r_fp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar_from_hex(s: &str) -> Scalar {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes).unwrap();
        Scalar::from_bytes_be(&bytes).unwrap()
    }

    fn bytes32_from_hex(s: &str) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes).unwrap();
        bytes
    }

    #[test]
    fn bip340_vector_0() {
        let d = scalar_from_hex("0000000000000000000000000000000000000000000000000000000000000003");
        let aux = [0u8; 32];
        let message = [0u8; 32];
        let signature = sign(&message, &d, &aux).unwrap();
        let pubkey = get_public_key(&d).unwrap();

        assert_eq!(
            hex::encode(pubkey),
            "f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9"
        );
        assert_eq!(
            hex::encode(signature),
            "e907831f80848d1069a5371b402410364bdf1c5f8307b0084c55f1ce2dca821525f66a4a85ea8b71e482a74f382d2ce5ebeee8fdb2172f477df4900d310536c0"
        );
        assert!(verify(&signature, &message, &pubkey).unwrap());
    }

    #[test]
    fn sign_then_verify_round_trip() {
        let d = scalar_from_hex("00000000000000000000000000000000000000000000000000000000000beef0");
        let aux = bytes32_from_hex("1111111111111111111111111111111111111111111111111111111111111111".get(..64).unwrap());
        let message = *b"the quick brown fox jumps over.";
        let signature = sign(&message, &d, &aux).unwrap();
        let pubkey = get_public_key(&d).unwrap();
        assert!(verify(&signature, &message, &pubkey).unwrap());
    }

    #[test]
    fn tampered_message_fails_verification() {
        let d = scalar_from_hex("0000000000000000000000000000000000000000000000000000000000000003");
        let aux = [0u8; 32];
        let message = [0u8; 32];
        let signature = sign(&message, &d, &aux).unwrap();
        let pubkey = get_public_key(&d).unwrap();
        let other_message = [1u8; 32];
        assert!(!verify(&signature, &other_message, &pubkey).unwrap());
    }

    #[test]
    fn invalid_x_only_key_rejected() {
        // x = p itself has no valid field representative.
        let bad_x = [0xffu8; 32];
        assert!(get_public_key(&Scalar::ONE).is_ok());
        assert!(AffinePoint::from_x_only(&bad_x).is_err());
    }
}
