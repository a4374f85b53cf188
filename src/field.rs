//! Field arithmetic over `p = 2^256 - 2^32 - 977`, the prime secp256k1 is
//! defined over.

use crate::errors::Secp256k1Error;
use crate::limbs::{
    self, add_limbs, conditional_select, ge, limbs_from_bytes_be, limbs_to_bytes_be, mul_wide,
    reduce_wide_limbs, sub_limbs, Limbs,
};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// An element of the secp256k1 base field, always held canonical (`< P`).
#[derive(Clone, Copy, Debug)]
pub struct Fp(Limbs);

impl Fp {
    pub const ZERO: Fp = Fp([0, 0, 0, 0]);
    pub const ONE: Fp = Fp([1, 0, 0, 0]);
    /// The curve's `b` coefficient (`a = 0`, `b = 7`).
    pub const B: Fp = Fp([7, 0, 0, 0]);

    const MODULUS: Limbs = [
        0xfffffffefffffc2f,
        0xffffffffffffffff,
        0xffffffffffffffff,
        0xffffffffffffffff,
    ];

    /// `(p + 1) / 4`, used by the `p ≡ 3 (mod 4)` square-root shortcut.
    const SQRT_EXP: Limbs = [
        0xffffffffbfffff0c,
        0xffffffffffffffff,
        0xffffffffffffffff,
        0x3fffffffffffffff,
    ];

    /// `p - 2`, the Fermat's-little-theorem inversion exponent.
    const INV_EXP: Limbs = [
        0xfffffffefffffc2d,
        0xffffffffffffffff,
        0xffffffffffffffff,
        0xffffffffffffffff,
    ];

    pub fn from_bytes_be(bytes: &[u8; 32]) -> Result<Self, Secp256k1Error> {
        let limbs = limbs_from_bytes_be(bytes);
        if ge(&limbs, &Self::MODULUS).into() {
            return Err(Secp256k1Error::FieldOverflow);
        }
        Ok(Fp(limbs))
    }

    pub fn to_bytes_be(&self) -> [u8; 32] {
        limbs_to_bytes_be(&self.0)
    }

    pub fn is_zero(&self) -> Choice {
        limbs::is_zero(&self.0)
    }

    /// True iff the canonical representative is odd (used for SEC1/BIP340
    /// parity).
    pub fn is_odd(&self) -> Choice {
        Choice::from((self.0[0] & 1) as u8)
    }

    pub fn add(&self, rhs: &Self) -> Self {
        let (sum, carry) = add_limbs(&self.0, &rhs.0);
        // a, b < p so a + b < 2p < 2^257; a single conditional subtraction
        // of p suffices, using `carry` to detect the rare case the 256-bit
        // add itself overflowed.
        let (reduced, borrow) = sub_limbs(&sum, &Self::MODULUS);
        let need_sub = Choice::from((carry != 0) as u8) | Choice::from((borrow == 0) as u8);
        Fp(conditional_select(&sum, &reduced, need_sub))
    }

    pub fn sub(&self, rhs: &Self) -> Self {
        let (diff, borrow) = sub_limbs(&self.0, &rhs.0);
        let (corrected, _) = add_limbs(&diff, &Self::MODULUS);
        Fp(conditional_select(&diff, &corrected, Choice::from(borrow as u8)))
    }

    pub fn neg(&self) -> Self {
        Self::ZERO.sub(self)
    }

    pub fn mul(&self, rhs: &Self) -> Self {
        let wide = mul_wide(&self.0, &rhs.0);
        Fp(reduce_wide_limbs(&wide, &Self::MODULUS))
    }

    pub fn sqr(&self) -> Self {
        self.mul(self)
    }

    fn pow(&self, exponent: &Limbs) -> Self {
        let mut result = Self::ONE;
        for limb_idx in (0..4).rev() {
            let limb = exponent[limb_idx];
            for bit_idx in (0..64).rev() {
                result = result.sqr();
                let bit = (limb >> bit_idx) & 1;
                let multiplied = result.mul(self);
                result = Fp(conditional_select(&result.0, &multiplied.0, Choice::from(bit as u8)));
            }
        }
        result
    }

    /// Modular inverse via Fermat's little theorem (`x^(p-2) mod p`).
    /// Constant-time square-and-multiply; `inv(0) == 0`, which callers that
    /// need to distinguish the identity case should guard against with
    /// [`Fp::is_zero`] before calling.
    pub fn invert(&self) -> Result<Self, Secp256k1Error> {
        if bool::from(self.is_zero()) {
            return Err(Secp256k1Error::InvalidPoint);
        }
        Ok(self.pow(&Self::INV_EXP))
    }

    /// `sqrt(x)` using the `p ≡ 3 (mod 4)` shortcut: `r = x^((p+1)/4)`.
    /// Returns `None` if `x` is a quadratic non-residue.
    pub fn sqrt(&self) -> Option<Self> {
        let candidate = self.pow(&Self::SQRT_EXP);
        if bool::from(candidate.sqr().ct_eq_value(self)) {
            Some(candidate)
        } else {
            None
        }
    }

    pub(crate) fn eq_choice(&self, other: &Self) -> Choice {
        self.ct_eq_value(other)
    }

    fn ct_eq_value(&self, other: &Self) -> Choice {
        let mut eq = Choice::from(1u8);
        for i in 0..4 {
            eq &= self.0[i].ct_eq(&other.0[i]);
        }
        eq
    }

    /// `x^3 + 7 mod p`, the right-hand side of the curve equation.
    pub fn curve_rhs(x: &Self) -> Self {
        x.sqr().mul(x).add(&Self::B)
    }
}

impl PartialEq for Fp {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq_value(other).into()
    }
}
impl Eq for Fp {}

impl ConditionallySelectable for Fp {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Fp(conditional_select(&a.0, &b.0, choice))
    }
}
