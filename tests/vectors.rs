//! Integration tests against the public API: RFC 6979 and BIP340 reference
//! vectors, and the property-style checks (low-s, recovery, ECDH symmetry)
//! exercised end-to-end through the crate's exported surface rather than its
//! internal module paths.

use secp256k1_engine::{ecdsa, schnorr, AffinePoint, Fp, Scalar};
use sha2::{Digest, Sha256};

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

fn sha256(msg: &[u8]) -> [u8; 32] {
    Sha256::digest(msg).into()
}

#[test]
fn rfc6979_appendix_a_2_5() {
    let d = scalar_from_hex("c9afa9d845ba75166b5c215767b1d6934e50c3db36e89b127b8a622b120f6721");
    let h = sha256(b"sample");
    let (sig, _) = ecdsa::sign(&h, &d).unwrap();
    assert_eq!(
        hex::encode(sig.r().to_bytes_be()),
        "432310e32cb80eb6503a26ce83cc165c783b870845fb8aad6d970889fcd7a6c8"
    );
    assert_eq!(
        hex::encode(sig.s().to_bytes_be()),
        "530128b6b81c548874a6305d93ed071ca6e05074d85863d4056ce89b02bfab69"
    );

    let pubkey_bytes = ecdsa::get_public_key(&d, true).unwrap();
    let pubkey = AffinePoint::from_sec1(&pubkey_bytes).unwrap();
    assert!(ecdsa::verify(&sig, &h, &pubkey, true).unwrap());
}

#[test]
fn bip340_vector_0() {
    let d = scalar_from_hex("0000000000000000000000000000000000000000000000000000000000000003");
    let aux = [0u8; 32];
    let message = [0u8; 32];

    let signature = schnorr::sign(&message, &d, &aux).unwrap();
    let pubkey = schnorr::get_public_key(&d).unwrap();

    assert_eq!(
        hex::encode(pubkey),
        "f9308a019258c31049344f85f89d5229b531c845836f99b08601f113bce036f9"
    );
    assert_eq!(
        hex::encode(signature),
        "e907831f80848d1069a5371b402410364bdf1c5f8307b0084c55f1ce2dca821525f66a4a85ea8b71e482a74f382d2ce5ebeee8fdb2172f477df4900d310536c0"
    );
    assert!(schnorr::verify(&signature, &message, &pubkey).unwrap());
}

#[test]
fn ecdsa_signatures_are_low_s_by_default() {
    let d = scalar_from_hex("0000000000000000000000000000000000000000000000000000000000001234");
    for msg in [&b"a"[..], b"bb", b"ccc", b"dddd", b"eeeee"] {
        let h = sha256(msg);
        let (sig, _) = ecdsa::sign(&h, &d).unwrap();
        assert!(sig.is_low_s(), "signature over {msg:?} was not low-s");
    }
}

#[test]
fn recovery_reconstructs_signer_across_many_messages() {
    let d = scalar_from_hex("00000000000000000000000000000000000000000000000000000000000f00ba");
    let pubkey_bytes = ecdsa::get_public_key(&d, false).unwrap();
    let expected = AffinePoint::from_sec1(&pubkey_bytes).unwrap();

    for msg in [&b"one"[..], b"two", b"three"] {
        let h = sha256(msg);
        let (sig, recovery_id) = ecdsa::sign(&h, &d).unwrap();
        let recovered = ecdsa::recover_public_key(&h, &sig, recovery_id).unwrap();
        assert_eq!(recovered, expected);
    }
}

#[test]
fn ecdh_shared_secret_is_symmetric_across_keys() {
    let alice = scalar_from_hex("00000000000000000000000000000000000000000000000000000000000a11c3");
    let bob = scalar_from_hex("0000000000000000000000000000000000000000000000000000000000b0b000");

    let alice_pub = AffinePoint::from_sec1(&ecdsa::get_public_key(&alice, true).unwrap()).unwrap();
    let bob_pub = AffinePoint::from_sec1(&ecdsa::get_public_key(&bob, true).unwrap()).unwrap();

    let from_alice = ecdsa::get_shared_secret(&alice, &bob_pub, true).unwrap();
    let from_bob = ecdsa::get_shared_secret(&bob, &alice_pub, true).unwrap();
    assert_eq!(from_alice, from_bob);
}

#[test]
fn tampered_ecdsa_signature_fails_verification() {
    let d = scalar_from_hex("000000000000000000000000000000000000000000000000000000000000c0de");
    let h = sha256(b"tamper test");
    let (sig, _) = ecdsa::sign(&h, &d).unwrap();
    let pubkey = AffinePoint::from_sec1(&ecdsa::get_public_key(&d, true).unwrap()).unwrap();

    let other_h = sha256(b"different message");
    assert!(!ecdsa::verify(&sig, &other_h, &pubkey, true).unwrap());
}

#[test]
fn der_and_compact_encodings_round_trip_through_verification() {
    let d = scalar_from_hex("0000000000000000000000000000000000000000000000000000000000009999");
    let h = sha256(b"encoding round trip");
    let (sig, _) = ecdsa::sign(&h, &d).unwrap();
    let pubkey = AffinePoint::from_sec1(&ecdsa::get_public_key(&d, true).unwrap()).unwrap();

    let der = sig.to_der_hex();
    let from_der = secp256k1_engine::Signature::from_der_hex(&der).unwrap();
    assert!(ecdsa::verify(&from_der, &h, &pubkey, true).unwrap());

    let compact = sig.to_compact_hex();
    let from_compact = secp256k1_engine::Signature::from_compact_hex(&compact).unwrap();
    assert!(ecdsa::verify(&from_compact, &h, &pubkey, true).unwrap());
}

#[test]
fn schnorr_nonce_derivation_is_deterministic() {
    let d = scalar_from_hex("1111111111111111111111111111111111111111111111111111111111111111");
    let aux = bytes32_from_hex("2222222222222222222222222222222222222222222222222222222222222222");
    let message = sha256(b"schnorr property check");
    let pubkey = schnorr::get_public_key(&d).unwrap();
    let sig_a = schnorr::sign(&message, &d, &aux).unwrap();
    let sig_b = schnorr::sign(&message, &d, &aux).unwrap();
    assert_eq!(sig_a, sig_b);
    assert!(schnorr::verify(&sig_a, &message, &pubkey).unwrap());
}

#[test]
fn boundary_scalars_one_and_n_minus_one_sign_successfully() {
    let one = scalar_from_hex("0000000000000000000000000000000000000000000000000000000000000001");
    // n - 1, the largest valid private key.
    let n_minus_one =
        scalar_from_hex("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364140");

    let h = sha256(b"boundary scalar");
    for d in [one, n_minus_one] {
        let (sig, _) = ecdsa::sign(&h, &d).unwrap();
        let pubkey = AffinePoint::from_sec1(&ecdsa::get_public_key(&d, true).unwrap()).unwrap();
        assert!(ecdsa::verify(&sig, &h, &pubkey, true).unwrap());
    }
}

#[test]
fn zero_hash_and_high_bit_hash_sign_and_verify() {
    let d = scalar_from_hex("0000000000000000000000000000000000000000000000000000000000005a5a");
    let pubkey = AffinePoint::from_sec1(&ecdsa::get_public_key(&d, true).unwrap()).unwrap();

    let zero_hash = [0u8; 32];
    let (sig, _) = ecdsa::sign(&zero_hash, &d).unwrap();
    assert!(ecdsa::verify(&sig, &zero_hash, &pubkey, true).unwrap());

    let mut high_bit_hash = [0u8; 32];
    high_bit_hash[0] = 0x80;
    let (sig, _) = ecdsa::sign(&high_bit_hash, &d).unwrap();
    assert!(ecdsa::verify(&sig, &high_bit_hash, &pubkey, true).unwrap());
}

#[test]
fn point_decompression_rejects_non_residue_x() {
    // x = 5: 5^3 + 7 = 132, a quadratic non-residue mod secp256k1's p, so no
    // y exists and the decoder must reject rather than silently accept.
    let mut bytes = [0u8; 33];
    bytes[0] = 0x02;
    bytes[32] = 0x05;
    assert!(AffinePoint::from_compressed(bytes).is_err());
}

#[test]
fn x_at_or_above_field_prime_is_rejected() {
    let p = bytes32_from_hex("fffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f");
    assert!(Fp::from_bytes_be(&p).is_err());
}

#[test]
fn s_equal_half_n_is_accepted_s_equal_half_n_plus_one_is_rejected_under_strict() {
    let d = scalar_from_hex("0000000000000000000000000000000000000000000000000000000000002be1");
    let h = sha256(b"low-s boundary");
    let pubkey = AffinePoint::from_sec1(&ecdsa::get_public_key(&d, true).unwrap()).unwrap();
    let (raw_sig, _) = ecdsa::sign_with_options(&h, &d, false, None).unwrap();
    let low = raw_sig.normalize_s();
    assert!(low.is_low_s());
    assert!(ecdsa::verify(&low, &h, &pubkey, true).unwrap());

    if !raw_sig.is_low_s() {
        assert!(ecdsa::verify(&raw_sig, &h, &pubkey, true).is_err());
    }
}
