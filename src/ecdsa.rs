//! ECDSA: RFC 6979 deterministic nonces, `sign`/`verify`/
//! `recover_public_key`, plus the `getPublicKey`/`getSharedSecret` key
//! operations that ride on the same scalar-multiplication engine.

use crate::encoding::Signature;
use crate::errors::Secp256k1Error;
use crate::field::Fp;
use crate::point::{self, AffinePoint, ProjectivePoint};
use crate::precompute;
use crate::scalar::Scalar;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroize;

type HmacSha256 = Hmac<Sha256>;

/// The low bit of a recovery id is the parity of `R.y`; the high bit is set
/// iff `R.x >= n` (the field element overflowed the scalar range).
pub type RecoveryId = u8;

/// Stateful RFC 6979 HMAC-DRBG: `next_candidate` can be called repeatedly to
/// walk the deterministic candidate sequence, continuing the K/V chain
/// rather than restarting it — needed because `sign` must retry with the
/// *next* RFC 6979 candidate whenever `r` or `s` comes out to zero.
struct Rfc6979Drbg {
    k: [u8; 32],
    v: [u8; 32],
}

impl Drop for Rfc6979Drbg {
    fn drop(&mut self) {
        self.k.zeroize();
        self.v.zeroize();
    }
}

impl Rfc6979Drbg {
    fn new(private_key: &Scalar, z: &Scalar, extra_entropy: Option<&[u8]>) -> Self {
        let mut d_bytes = private_key.to_bytes_be();
        let mut z_bytes = z.to_bytes_be();
        let mut v = [0x01u8; 32];
        let mut k = [0x00u8; 32];

        let mut mac = HmacSha256::new_from_slice(&k).expect("HMAC accepts any key length");
        mac.update(&v);
        mac.update(&[0x00]);
        mac.update(&d_bytes);
        mac.update(&z_bytes);
        if let Some(extra) = extra_entropy {
            mac.update(extra);
        }
        k.copy_from_slice(mac.finalize().into_bytes().as_slice());

        let mut mac = HmacSha256::new_from_slice(&k).unwrap();
        mac.update(&v);
        v.copy_from_slice(mac.finalize().into_bytes().as_slice());

        let mut mac = HmacSha256::new_from_slice(&k).unwrap();
        mac.update(&v);
        mac.update(&[0x01]);
        mac.update(&d_bytes);
        mac.update(&z_bytes);
        if let Some(extra) = extra_entropy {
            mac.update(extra);
        }
        k.copy_from_slice(mac.finalize().into_bytes().as_slice());

        let mut mac = HmacSha256::new_from_slice(&k).unwrap();
        mac.update(&v);
        v.copy_from_slice(mac.finalize().into_bytes().as_slice());

        d_bytes.zeroize();
        z_bytes.zeroize();
        Rfc6979Drbg { k, v }
    }

    /// Produces the next `k` candidate in `[1, n)`. `hlen == qlen == 256`
    /// bits for secp256k1/SHA-256, so a single HMAC round always yields a
    /// full-width `T`; the inner retry only guards the (astronomically
    /// rare) case `T >= n`.
    fn next_candidate(&mut self) -> Scalar {
        loop {
            let mut mac = HmacSha256::new_from_slice(&self.k).unwrap();
            mac.update(&self.v);
            self.v.copy_from_slice(mac.finalize().into_bytes().as_slice());
            if let Ok(candidate) = Scalar::from_bytes_be(&self.v) {
                if bool::from(candidate.is_valid_nonzero()) {
                    return candidate;
                }
            }
            let mut mac = HmacSha256::new_from_slice(&self.k).unwrap();
            mac.update(&self.v);
            mac.update(&[0x00]);
            self.k.copy_from_slice(mac.finalize().into_bytes().as_slice());
            let mut mac = HmacSha256::new_from_slice(&self.k).unwrap();
            mac.update(&self.v);
            self.v.copy_from_slice(mac.finalize().into_bytes().as_slice());
        }
    }
}

/// Big-endian unsigned byte-array comparison; valid because both operands
/// are always fixed-width 32-byte representations.
fn bytes_ge(a: &[u8; 32], b: &[u8; 32]) -> bool {
    a.as_slice() >= b.as_slice()
}

fn sign_internal(
    message_hash: &[u8; 32],
    private_key: &Scalar,
    canonical: bool,
    extra_entropy: Option<&[u8]>,
) -> Result<(Signature, RecoveryId), Secp256k1Error> {
    if !bool::from(private_key.is_valid_nonzero()) {
        return Err(Secp256k1Error::InvalidPrivateKey);
    }
    let z = Scalar::from_hash_truncated(message_hash);
    let mut drbg = Rfc6979Drbg::new(private_key, &z, extra_entropy);

    loop {
        let mut k = drbg.next_candidate();
        let (x, y) = match precompute::base_point_mul(&k).to_affine() {
            AffinePoint::Point { x, y } => (x, y),
            AffinePoint::Identity => {
                k.zeroize();
                continue;
            }
        };
        let x_bytes = x.to_bytes_be();
        let r = Scalar::from_bytes_wide(&x_bytes);
        if bool::from(r.is_zero()) {
            k.zeroize();
            continue;
        }
        let mut dr = private_key.mul(&r);
        let mut k_inv = k.invert().expect("k is nonzero and n is prime");
        k.zeroize();
        let s_raw = k_inv.mul(&z.add(&dr));
        k_inv.zeroize();
        dr.zeroize();
        if bool::from(s_raw.is_zero()) {
            continue;
        }

        let mut y_odd = bool::from(y.is_odd());
        let s = if canonical && !bool::from(s_raw.is_low()) {
            y_odd = !y_odd;
            s_raw.neg()
        } else {
            s_raw
        };
        let x_overflow = bytes_ge(&x_bytes, &crate::curve::Curve::N);
        let recovery_id: RecoveryId = (y_odd as u8) | ((x_overflow as u8) << 1);
        return Ok((Signature::from_scalars(r, s)?, recovery_id));
    }
}

/// Deterministic ECDSA signing, RFC 6979 nonce, low-s canonicalization.
pub fn sign(message_hash: &[u8; 32], private_key: &Scalar) -> Result<(Signature, RecoveryId), Secp256k1Error> {
    sign_internal(message_hash, private_key, true, None)
}

/// As [`sign`], with explicit control over low-s canonicalization and
/// RFC 6979 `extraEntropy` (raw bytes, appended to every HMAC round).
pub fn sign_with_options(
    message_hash: &[u8; 32],
    private_key: &Scalar,
    canonical: bool,
    extra_entropy: Option<&[u8]>,
) -> Result<(Signature, RecoveryId), Secp256k1Error> {
    sign_internal(message_hash, private_key, canonical, extra_entropy)
}

/// As [`sign_with_options`], drawing the RFC 6979 `extraEntropy` as exactly
/// 32 random bytes from `rng` (the `extraEntropy: true` case).
pub fn sign_with_random_extra_entropy<R: rand_core::CryptoRng + rand_core::RngCore>(
    message_hash: &[u8; 32],
    private_key: &Scalar,
    canonical: bool,
    rng: &mut R,
) -> Result<(Signature, RecoveryId), Secp256k1Error> {
    let mut extra = [0u8; 32];
    rng.fill_bytes(&mut extra);
    sign_internal(message_hash, private_key, canonical, Some(&extra))
}

/// Verifies an ECDSA signature. `strict` (spec default `true`) additionally
/// rejects high-s signatures. Returns `Ok(false)` for a well-formed
/// signature that simply fails the mathematical check — only shape errors
/// raise, so verification never leaks an oracle through its error type.
pub fn verify(
    signature: &Signature,
    message_hash: &[u8; 32],
    public_key: &AffinePoint,
    strict: bool,
) -> Result<bool, Secp256k1Error> {
    if strict && !signature.is_low_s() {
        return Err(Secp256k1Error::InvalidSignature);
    }
    if bool::from(public_key.is_identity()) || !bool::from(public_key.is_on_curve()) {
        return Err(Secp256k1Error::InvalidPoint);
    }

    let z = Scalar::from_hash_truncated(message_hash);
    let w = signature.s().invert().map_err(|_| Secp256k1Error::InvalidSignature)?;
    let u1 = z.mul(&w);
    let u2 = signature.r().mul(&w);

    let g = ProjectivePoint::generator();
    let q = ProjectivePoint::from_affine(public_key);
    let r_point = precompute::dual_base_mul_variable_time(&u1, &g, &u2, &q);
    if bool::from(r_point.is_identity()) {
        return Ok(false);
    }
    let x = match r_point.to_affine() {
        AffinePoint::Point { x, .. } => x,
        AffinePoint::Identity => unreachable!("checked above"),
    };
    let r_check = Scalar::from_bytes_wide(&x.to_bytes_be());
    Ok(r_check == signature.r())
}

/// Reconstructs the public key that produced `signature` over
/// `message_hash`, given the recovery id returned alongside it by `sign`.
pub fn recover_public_key(
    message_hash: &[u8; 32],
    signature: &Signature,
    recovery_id: RecoveryId,
) -> Result<AffinePoint, Secp256k1Error> {
    let x_overflow = recovery_id & 0b10 != 0;
    let y_odd = recovery_id & 0b01 != 0;

    let r_fp = Fp::from_bytes_be(&signature.r().to_bytes_be())
        .map_err(|_| Secp256k1Error::InvalidSignature)?;
    let x = if x_overflow {
        let n_fp = Fp::from_bytes_be(&crate::curve::Curve::N).expect("n < p");
        r_fp.add(&n_fp)
    } else {
        r_fp
    };
    let y = point::lift_y(&x, y_odd).ok_or(Secp256k1Error::InvalidPoint)?;
    let r_point = ProjectivePoint::from_affine(&AffinePoint::Point { x, y });

    let z = Scalar::from_hash_truncated(message_hash);
    let r_inv = signature.r().invert().map_err(|_| Secp256k1Error::InvalidSignature)?;

    let s_r = r_point.mul_variable_time(&signature.s());
    let z_g = ProjectivePoint::generator().mul_variable_time(&z);
    let q = s_r.add(&z_g.negate()).mul_variable_time(&r_inv);

    let q_affine = q.to_affine();
    if bool::from(q_affine.is_identity()) {
        return Err(Secp256k1Error::InvalidPoint);
    }
    Ok(q_affine)
}

/// `d * G`, SEC1-encoded.
pub fn get_public_key(private_key: &Scalar, compressed: bool) -> Result<Vec<u8>, Secp256k1Error> {
    if !bool::from(private_key.is_valid_nonzero()) {
        return Err(Secp256k1Error::InvalidPrivateKey);
    }
    let point = precompute::base_point_mul(private_key).to_affine();
    if compressed {
        Ok(point.to_compressed()?.to_vec())
    } else {
        Ok(point.to_uncompressed()?.to_vec())
    }
}

/// ECDH shared secret `d * Q`, SEC1-encoded. Symmetric: `d1*(d2*G) ==
/// d2*(d1*G)` by associativity of scalar multiplication.
pub fn get_shared_secret(
    private_key: &Scalar,
    public_key: &AffinePoint,
    compressed: bool,
) -> Result<Vec<u8>, Secp256k1Error> {
    if !bool::from(private_key.is_valid_nonzero()) {
        return Err(Secp256k1Error::InvalidPrivateKey);
    }
    if bool::from(public_key.is_identity()) || !bool::from(public_key.is_on_curve()) {
        return Err(Secp256k1Error::InvalidPoint);
    }
    let shared = precompute::variable_base_mul_constant_time(
        &ProjectivePoint::from_affine(public_key),
        private_key,
    )
    .to_affine();
    if compressed {
        Ok(shared.to_compressed()?.to_vec())
    } else {
        Ok(shared.to_uncompressed()?.to_vec())
    }
}
