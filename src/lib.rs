//! A pure-Rust secp256k1 implementation: field and group arithmetic, ECDSA
//! (RFC 6979 deterministic nonces), BIP340 Schnorr signatures, ECDH, and
//! public key recovery.
//!
//! The curve: `y^2 = x^3 + 7` over `Fp` with prime order `n`. Secret-dependent
//! control flow and memory access go through [`subtle`] throughout; the only
//! variable-time paths are the ones that only ever see public inputs
//! (signature verification, key recovery).

mod curve;
pub mod ecdsa;
mod encoding;
mod errors;
mod field;
mod limbs;
mod point;
mod precompute;
mod scalar;
pub mod schnorr;
pub mod util;

pub use encoding::Signature;
pub use errors::Secp256k1Error;
pub use field::Fp;
pub use point::{AffinePoint, ProjectivePoint};
pub use scalar::Scalar;

pub use curve::generator;
pub use precompute::precompute;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_wires_together() {
        precompute();
        let d = Scalar::from_bytes_be(&{
            let mut b = [0u8; 32];
            b[31] = 7;
            b
        })
        .unwrap();
        let pubkey_bytes = ecdsa::get_public_key(&d, true).unwrap();
        let pubkey = AffinePoint::from_sec1(&pubkey_bytes).unwrap();
        assert!(bool::from(pubkey.is_on_curve()));

        let h = {
            use sha2::Digest;
            let digest: [u8; 32] = sha2::Sha256::digest(b"integration").into();
            digest
        };
        let (sig, _recovery_id) = ecdsa::sign(&h, &d).unwrap();
        assert!(ecdsa::verify(&sig, &h, &pubkey, true).unwrap());

        let schnorr_pubkey = schnorr::get_public_key(&d).unwrap();
        let schnorr_sig = schnorr::sign(&h, &d, &[0u8; 32]).unwrap();
        assert!(schnorr::verify(&schnorr_sig, &h, &schnorr_pubkey).unwrap());
    }
}
