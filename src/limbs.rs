//! Shared 256-bit limb plumbing used by both [`crate::field::Fp`] and
//! [`crate::scalar::Scalar`].
//!
//! Values are stored as four `u64` limbs, least-significant limb first
//! (`limbs[0]` holds bits `0..64`). Every helper here is a pure function over
//! limb arrays; the typed wrappers in `field.rs`/`scalar.rs` are responsible
//! for picking the right modulus and keeping values canonical.

use subtle::{Choice, ConditionallySelectable};

pub type Limbs = [u64; 4];
pub type WideLimbs = [u64; 8];

/// `a + b + carry`, returning `(sum, carry_out)`.
#[inline(always)]
pub fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let sum = a as u128 + b as u128 + carry as u128;
    (sum as u64, (sum >> 64) as u64)
}

/// `a - b - borrow`, returning `(diff, borrow_out)` where `borrow_out` is 1
/// iff the subtraction underflowed.
#[inline(always)]
pub fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let diff = a as i128 - b as i128 - borrow as i128;
    (diff as u64, (diff < 0) as u64)
}

/// `acc + a*b + carry`, returning `(low, carry_out)`.
#[inline(always)]
pub fn mac(acc: u64, a: u64, b: u64, carry: u64) -> (u64, u64) {
    let r = acc as u128 + (a as u128) * (b as u128) + carry as u128;
    (r as u64, (r >> 64) as u64)
}

pub fn add_limbs(a: &Limbs, b: &Limbs) -> (Limbs, u64) {
    let mut r = [0u64; 4];
    let mut carry = 0u64;
    for i in 0..4 {
        let (s, c) = adc(a[i], b[i], carry);
        r[i] = s;
        carry = c;
    }
    (r, carry)
}

pub fn sub_limbs(a: &Limbs, b: &Limbs) -> (Limbs, u64) {
    let mut r = [0u64; 4];
    let mut borrow = 0u64;
    for i in 0..4 {
        let (d, bo) = sbb(a[i], b[i], borrow);
        r[i] = d;
        borrow = bo;
    }
    (r, borrow)
}

/// Schoolbook 4x4 -> 8 limb product.
pub fn mul_wide(a: &Limbs, b: &Limbs) -> WideLimbs {
    let mut r = [0u64; 8];
    for i in 0..4 {
        let mut carry = 0u64;
        for j in 0..4 {
            let (lo, hi) = mac(r[i + j], a[i], b[j], carry);
            r[i + j] = lo;
            carry = hi;
        }
        r[i + 4] = carry;
    }
    r
}

pub fn is_zero(a: &Limbs) -> Choice {
    let mut acc = 0u64;
    for limb in a {
        acc |= *limb;
    }
    Choice::from((acc == 0) as u8)
}

/// Constant-time `a >= b`.
pub fn ge(a: &Limbs, b: &Limbs) -> Choice {
    let (_, borrow) = sub_limbs(a, b);
    Choice::from((borrow == 0) as u8)
}

pub fn conditional_select(a: &Limbs, b: &Limbs, choice: Choice) -> Limbs {
    let mut r = [0u64; 4];
    for i in 0..4 {
        r[i] = u64::conditional_select(&a[i], &b[i], choice);
    }
    r
}

/// `(acc << 1) | bit`, returning `(shifted, carry_out)` where `carry_out` is
/// the bit shifted out past the top of the 256-bit value.
fn shl1(acc: &Limbs, bit: u64) -> (Limbs, u64) {
    let mut r = [0u64; 4];
    let mut carry = bit;
    for i in 0..4 {
        let next_carry = acc[i] >> 63;
        r[i] = (acc[i] << 1) | carry;
        carry = next_carry;
    }
    (r, carry)
}

/// One step of binary long division: `acc = (acc*2 + bit) mod modulus`,
/// given the invariant `acc < modulus` on entry.
///
/// Constant-time: the single conditional subtraction is a masked select, not
/// a data-dependent branch.
fn reduce_step(acc: Limbs, bit: u64, modulus: &Limbs) -> Limbs {
    let (shifted, carry_out) = shl1(&acc, bit);
    let (diff, borrow) = sub_limbs(&shifted, modulus);
    // Need to subtract iff the 257-bit value `carry_out*2^256 + shifted` is
    // >= modulus: either the carry bit fired, or it didn't and shifted itself
    // is already >= modulus (no borrow from the plain 256-bit subtraction).
    let need_sub = Choice::from((carry_out != 0) as u8) | Choice::from((borrow == 0) as u8);
    conditional_select(&shifted, &diff, need_sub)
}

/// Reduce an arbitrary-length big-endian byte string modulo `modulus`.
///
/// Used for RFC 6979's `bits2int`, for widening 32-to-48-byte nonces, and for
/// `hash_to_private_key`'s 40..=1024 byte inputs.
pub fn reduce_wide_bytes(bytes: &[u8], modulus: &Limbs) -> Limbs {
    let mut acc = [0u64; 4];
    for byte in bytes {
        for bit_idx in (0..8).rev() {
            let bit = ((byte >> bit_idx) & 1) as u64;
            acc = reduce_step(acc, bit, modulus);
        }
    }
    acc
}

/// Reduce a little-endian wide limb array (e.g. a 512-bit multiplication
/// product) modulo `modulus`.
pub fn reduce_wide_limbs(wide: &WideLimbs, modulus: &Limbs) -> Limbs {
    let mut acc = [0u64; 4];
    for limb_idx in (0..8).rev() {
        let limb = wide[limb_idx];
        for bit_idx in (0..64).rev() {
            let bit = (limb >> bit_idx) & 1;
            acc = reduce_step(acc, bit, modulus);
        }
    }
    acc
}

pub fn limbs_from_bytes_be(bytes: &[u8; 32]) -> Limbs {
    let mut r = [0u64; 4];
    for i in 0..4 {
        let mut chunk = [0u8; 8];
        chunk.copy_from_slice(&bytes[24 - i * 8..32 - i * 8]);
        r[i] = u64::from_be_bytes(chunk);
    }
    r
}

pub fn limbs_to_bytes_be(limbs: &Limbs) -> [u8; 32] {
    let mut out = [0u8; 32];
    for i in 0..4 {
        out[24 - i * 8..32 - i * 8].copy_from_slice(&limbs[i].to_be_bytes());
    }
    out
}
