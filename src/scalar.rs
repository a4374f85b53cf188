//! Scalar arithmetic over the secp256k1 curve order `n`.

use crate::errors::Secp256k1Error;
use crate::limbs::{
    self, add_limbs, conditional_select, ge, limbs_from_bytes_be, limbs_to_bytes_be, mul_wide,
    reduce_wide_limbs, sub_limbs, Limbs,
};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroize;

/// An element of `Z/nZ`, always held canonical (`< N`). Private keys and
/// ECDSA/Schnorr nonces are represented as `Scalar`s so they pick up
/// `Zeroize` for free.
#[derive(Clone, Copy, Debug, Zeroize)]
pub struct Scalar(Limbs);

impl Scalar {
    pub const ZERO: Scalar = Scalar([0, 0, 0, 0]);
    pub const ONE: Scalar = Scalar([1, 0, 0, 0]);

    pub(crate) const MODULUS: Limbs = [
        0xbfd25e8cd0364141,
        0xbaaedce6af48a03b,
        0xfffffffffffffffe,
        0xffffffffffffffff,
    ];

    /// `n / 2`, the low-s / high-s boundary.
    pub(crate) const HALF: Limbs = [
        0xdfe92f46681b20a0,
        0x5d576e7357a4501d,
        0xffffffffffffffff,
        0x7fffffffffffffff,
    ];

    const INV_EXP: Limbs = [
        0xbfd25e8cd036413f,
        0xbaaedce6af48a03b,
        0xfffffffffffffffe,
        0xffffffffffffffff,
    ];

    pub fn from_bytes_be(bytes: &[u8; 32]) -> Result<Self, Secp256k1Error> {
        let limbs = limbs_from_bytes_be(bytes);
        if ge(&limbs, &Self::MODULUS).into() {
            return Err(Secp256k1Error::ScalarOverflow);
        }
        Ok(Scalar(limbs))
    }

    /// Reduces an arbitrary-length big-endian byte string modulo `n`.
    /// Used by RFC 6979's `bits2int`/nonce widening and by
    /// `hash_to_private_key`.
    pub fn from_bytes_wide(bytes: &[u8]) -> Self {
        Scalar(limbs::reduce_wide_bytes(bytes, &Self::MODULUS))
    }

    /// `bits2int`: take the leftmost 256 bits of `bytes` (truncating, not
    /// reducing, per RFC 6979 §2.3.2) then reduce modulo `n`.
    pub fn from_hash_truncated(bytes: &[u8]) -> Self {
        if bytes.len() <= 32 {
            return Self::from_bytes_wide(bytes);
        }
        Self::from_bytes_wide(&bytes[..32])
    }

    pub fn to_bytes_be(&self) -> [u8; 32] {
        limbs_to_bytes_be(&self.0)
    }

    /// Raw little-endian limbs, for the windowed scalar-multiplication
    /// tables in [`crate::precompute`].
    pub(crate) fn to_limbs(&self) -> Limbs {
        self.0
    }

    /// Builds a `Scalar` from limbs already known to be canonical (`< n`).
    /// Used internally where a value's range has already been established
    /// by construction (e.g. `hash_to_private_key`'s biased reduction).
    pub(crate) fn from_limbs_unchecked(limbs: Limbs) -> Self {
        Scalar(limbs)
    }

    pub fn is_zero(&self) -> Choice {
        limbs::is_zero(&self.0)
    }

    pub fn is_odd(&self) -> Choice {
        Choice::from((self.0[0] & 1) as u8)
    }

    /// `self <= n/2`.
    pub fn is_low(&self) -> Choice {
        // HALF - self borrows iff HALF < self, i.e. iff self > n/2.
        let (_, borrow) = sub_limbs(&Self::HALF, &self.0);
        Choice::from((borrow == 0) as u8)
    }

    pub fn add(&self, rhs: &Self) -> Self {
        let (sum, carry) = add_limbs(&self.0, &rhs.0);
        let (reduced, borrow) = sub_limbs(&sum, &Self::MODULUS);
        let need_sub = Choice::from((carry != 0) as u8) | Choice::from((borrow == 0) as u8);
        Scalar(conditional_select(&sum, &reduced, need_sub))
    }

    pub fn sub(&self, rhs: &Self) -> Self {
        let (diff, borrow) = sub_limbs(&self.0, &rhs.0);
        let (corrected, _) = add_limbs(&diff, &Self::MODULUS);
        Scalar(conditional_select(&diff, &corrected, Choice::from(borrow as u8)))
    }

    pub fn neg(&self) -> Self {
        Self::ZERO.sub(self)
    }

    pub fn mul(&self, rhs: &Self) -> Self {
        let wide = mul_wide(&self.0, &rhs.0);
        Scalar(reduce_wide_limbs(&wide, &Self::MODULUS))
    }

    fn pow(&self, exponent: &Limbs) -> Self {
        let mut result = Self::ONE;
        for limb_idx in (0..4).rev() {
            let limb = exponent[limb_idx];
            for bit_idx in (0..64).rev() {
                result = result.mul(&result);
                let bit = (limb >> bit_idx) & 1;
                let multiplied = result.mul(self);
                result = Scalar(conditional_select(&result.0, &multiplied.0, Choice::from(bit as u8)));
            }
        }
        result
    }

    /// Modular inverse via Fermat's little theorem (`n` is prime).
    pub fn invert(&self) -> Result<Self, Secp256k1Error> {
        if bool::from(self.is_zero()) {
            return Err(Secp256k1Error::InvalidPrivateKey);
        }
        Ok(self.pow(&Self::INV_EXP))
    }

    /// `1 <= self < n`, the validity condition for private keys and nonces.
    pub fn is_valid_nonzero(&self) -> Choice {
        !self.is_zero()
    }

    fn ct_eq_value(&self, other: &Self) -> Choice {
        let mut eq = Choice::from(1u8);
        for i in 0..4 {
            eq &= self.0[i].ct_eq(&other.0[i]);
        }
        eq
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq_value(other).into()
    }
}
impl Eq for Scalar {}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Scalar(conditional_select(&a.0, &b.0, choice))
    }
}
