//! The secp256k1 curve group: `y^2 = x^3 + 7` over [`Fp`].
//!
//! [`ProjectivePoint`] carries Jacobian coordinates `(X, Y, Z)` with
//! `x = X/Z^2`, `y = Y/Z^3`, and the convention `Z = 0 <=> identity`.
//! [`AffinePoint`] is the logical `(x, y)` pair, with the point at infinity
//! modeled as its own variant rather than conflated with `(0, 0)`.

use crate::errors::Secp256k1Error;
use crate::field::Fp;
use crate::scalar::Scalar;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

pub const SEC1_UNCOMPRESSED_TAG: u8 = 0x04;
pub const SEC1_COMPRESSED_EVEN_TAG: u8 = 0x02;
pub const SEC1_COMPRESSED_ODD_TAG: u8 = 0x03;

/// An affine curve point, or the distinguished point at infinity.
#[derive(Clone, Copy, Debug)]
pub enum AffinePoint {
    Identity,
    Point { x: Fp, y: Fp },
}

impl AffinePoint {
    pub fn is_identity(&self) -> Choice {
        Choice::from(matches!(self, AffinePoint::Identity) as u8)
    }

    pub fn x(&self) -> Result<Fp, Secp256k1Error> {
        match self {
            AffinePoint::Identity => Err(Secp256k1Error::PointAtInfinity),
            AffinePoint::Point { x, .. } => Ok(*x),
        }
    }

    pub fn y(&self) -> Result<Fp, Secp256k1Error> {
        match self {
            AffinePoint::Identity => Err(Secp256k1Error::PointAtInfinity),
            AffinePoint::Point { y, .. } => Ok(*y),
        }
    }

    /// `y^2 == x^3 + 7`. Callers that construct an `AffinePoint::Point`
    /// directly (rather than through a decoder) should check this.
    pub fn is_on_curve(&self) -> Choice {
        match self {
            AffinePoint::Identity => Choice::from(1),
            AffinePoint::Point { x, y } => y.sqr().eq_choice(&Fp::curve_rhs(x)),
        }
    }

    pub fn negate(&self) -> Self {
        match self {
            AffinePoint::Identity => AffinePoint::Identity,
            AffinePoint::Point { x, y } => AffinePoint::Point { x: *x, y: y.neg() },
        }
    }

    /// SEC1 uncompressed encoding: `0x04 || x || y`. Fails on the identity,
    /// which has no SEC1 representation.
    pub fn to_uncompressed(&self) -> Result<[u8; 65], Secp256k1Error> {
        let (x, y) = match self {
            AffinePoint::Identity => return Err(Secp256k1Error::PointAtInfinity),
            AffinePoint::Point { x, y } => (x, y),
        };
        let mut out = [0u8; 65];
        out[0] = SEC1_UNCOMPRESSED_TAG;
        out[1..33].copy_from_slice(&x.to_bytes_be());
        out[33..65].copy_from_slice(&y.to_bytes_be());
        Ok(out)
    }

    /// SEC1 compressed encoding: `0x02`/`0x03 || x`.
    pub fn to_compressed(&self) -> Result<[u8; 33], Secp256k1Error> {
        let (x, y) = match self {
            AffinePoint::Identity => return Err(Secp256k1Error::PointAtInfinity),
            AffinePoint::Point { x, y } => (x, y),
        };
        let mut out = [0u8; 33];
        out[0] = u8::conditional_select(
            &SEC1_COMPRESSED_EVEN_TAG,
            &SEC1_COMPRESSED_ODD_TAG,
            y.is_odd(),
        );
        out[1..33].copy_from_slice(&x.to_bytes_be());
        Ok(out)
    }

    /// Decode a SEC1 public key: 33-byte compressed or 65-byte uncompressed.
    /// Hybrid (`0x06`/`0x07`) prefixes are not accepted.
    pub fn from_sec1(bytes: &[u8]) -> Result<Self, Secp256k1Error> {
        match bytes.len() {
            33 => Self::from_compressed(bytes.try_into().unwrap()),
            65 => Self::from_uncompressed(bytes.try_into().unwrap()),
            _ => Err(Secp256k1Error::InvalidEncoding),
        }
    }

    pub fn from_uncompressed(bytes: [u8; 65]) -> Result<Self, Secp256k1Error> {
        if bytes[0] != SEC1_UNCOMPRESSED_TAG {
            return Err(Secp256k1Error::InvalidEncoding);
        }
        let mut x_bytes = [0u8; 32];
        let mut y_bytes = [0u8; 32];
        x_bytes.copy_from_slice(&bytes[1..33]);
        y_bytes.copy_from_slice(&bytes[33..65]);
        let x = Fp::from_bytes_be(&x_bytes).map_err(|_| Secp256k1Error::InvalidPoint)?;
        let y = Fp::from_bytes_be(&y_bytes).map_err(|_| Secp256k1Error::InvalidPoint)?;
        let point = AffinePoint::Point { x, y };
        if !bool::from(point.is_on_curve()) {
            return Err(Secp256k1Error::InvalidPoint);
        }
        Ok(point)
    }

    pub fn from_compressed(bytes: [u8; 33]) -> Result<Self, Secp256k1Error> {
        let want_odd = match bytes[0] {
            SEC1_COMPRESSED_EVEN_TAG => false,
            SEC1_COMPRESSED_ODD_TAG => true,
            _ => return Err(Secp256k1Error::InvalidEncoding),
        };
        let mut x_bytes = [0u8; 32];
        x_bytes.copy_from_slice(&bytes[1..33]);
        let x = Fp::from_bytes_be(&x_bytes).map_err(|_| Secp256k1Error::InvalidPoint)?;
        let y = lift_y(&x, want_odd).ok_or(Secp256k1Error::InvalidPoint)?;
        Ok(AffinePoint::Point { x, y })
    }

    /// BIP340 x-only lift: given 32 bytes as `x`, pick the even-`y` root.
    pub fn from_x_only(bytes: &[u8; 32]) -> Result<Self, Secp256k1Error> {
        let x = Fp::from_bytes_be(bytes).map_err(|_| Secp256k1Error::InvalidPoint)?;
        let y = lift_y(&x, false).ok_or(Secp256k1Error::InvalidPoint)?;
        Ok(AffinePoint::Point { x, y })
    }

    /// The 32-byte x-only (BIP340) encoding. Fails on the identity.
    pub fn to_x_only(&self) -> Result<[u8; 32], Secp256k1Error> {
        Ok(self.x()?.to_bytes_be())
    }
}

/// Find `y` with `y^2 = x^3 + 7` and the requested parity, if `x` lifts.
/// `pub(crate)` since `ecdsa::recover_public_key` needs it to rebuild `R`
/// from a recovery id without re-deriving it from raw bytes.
pub(crate) fn lift_y(x: &Fp, want_odd: bool) -> Option<Fp> {
    let rhs = Fp::curve_rhs(x);
    let candidate = rhs.sqrt()?;
    let candidate_odd: bool = candidate.is_odd().into();
    Some(if candidate_odd == want_odd {
        candidate
    } else {
        candidate.neg()
    })
}

impl PartialEq for AffinePoint {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AffinePoint::Identity, AffinePoint::Identity) => true,
            (AffinePoint::Point { x: x1, y: y1 }, AffinePoint::Point { x: x2, y: y2 }) => {
                x1 == x2 && y1 == y2
            }
            _ => false,
        }
    }
}
impl Eq for AffinePoint {}

/// A point in Jacobian projective coordinates. `Z = 0` represents the
/// identity; arithmetic never needs to special-case a `(0, 0)` affine point
/// because no such point exists on the curve.
#[derive(Clone, Copy, Debug)]
pub struct ProjectivePoint {
    x: Fp,
    y: Fp,
    z: Fp,
}

impl ProjectivePoint {
    pub const IDENTITY: ProjectivePoint = ProjectivePoint {
        x: Fp::ONE,
        y: Fp::ONE,
        z: Fp::ZERO,
    };

    pub fn generator() -> Self {
        Self::from_affine(&crate::curve::generator())
    }

    pub fn from_affine(p: &AffinePoint) -> Self {
        match p {
            AffinePoint::Identity => Self::IDENTITY,
            AffinePoint::Point { x, y } => ProjectivePoint { x: *x, y: *y, z: Fp::ONE },
        }
    }

    pub fn is_identity(&self) -> Choice {
        self.z.is_zero()
    }

    pub fn to_affine(&self) -> AffinePoint {
        if bool::from(self.is_identity()) {
            return AffinePoint::Identity;
        }
        let z_inv = self.z.invert().expect("non-identity point has nonzero Z");
        let z_inv2 = z_inv.sqr();
        let z_inv3 = z_inv2.mul(&z_inv);
        AffinePoint::Point {
            x: self.x.mul(&z_inv2),
            y: self.y.mul(&z_inv3),
        }
    }

    pub fn negate(&self) -> Self {
        ProjectivePoint { x: self.x, y: self.y.neg(), z: self.z }
    }

    /// Standard Jacobian point doubling for `a = 0` Weierstrass curves
    /// (the "dbl-2009-l" formulas). Complete: fed the identity's
    /// representative `(1, 1, 0)`, the formulas themselves fall out to
    /// `(1, 1, 0)` again, so no identity branch is needed to stay
    /// constant-time.
    pub fn double(&self) -> Self {
        let a = self.x.sqr();
        let b = self.y.sqr();
        let c = b.sqr();
        let d = self.x.add(&b).sqr().sub(&a).sub(&c);
        let d = d.add(&d);
        let e = a.add(&a).add(&a);
        let f = e.sqr();
        let x3 = f.sub(&d).sub(&d);
        let c8 = c.add(&c).add(&c).add(&c).add(&c).add(&c).add(&c).add(&c);
        let y3 = e.mul(&d.sub(&x3)).sub(&c8);
        let z3 = self.y.mul(&self.z);
        let z3 = z3.add(&z3);
        ProjectivePoint { x: x3, y: y3, z: z3 }
    }

    /// Jacobian point addition ("add-2007-bl"), evaluated unconditionally
    /// and then resolved against the identity/doubling/mutual-inverse edge
    /// cases with constant-time selects rather than data-dependent
    /// branches — both operands may carry a secret scalar's partial sum, so
    /// which case applies must not be observable.
    pub fn add(&self, rhs: &Self) -> Self {
        let self_identity = self.is_identity();
        let rhs_identity = rhs.is_identity();

        let z1z1 = self.z.sqr();
        let z2z2 = rhs.z.sqr();
        let u1 = self.x.mul(&z2z2);
        let u2 = rhs.x.mul(&z1z1);
        let s1 = self.y.mul(&rhs.z).mul(&z2z2);
        let s2 = rhs.y.mul(&self.z).mul(&z1z1);

        let x_match = u1.eq_choice(&u2);
        let y_match = s1.eq_choice(&s2);
        let is_double = x_match & y_match;
        let is_inverse = x_match & !y_match;

        // Valid whenever u1 != u2; when u1 == u2 this divides through by
        // h == 0 and the result is meaningless, but computing it anyway
        // costs nothing since it's discarded by the selects below.
        let h = u2.sub(&u1);
        let i = h.add(&h).sqr();
        let j = h.mul(&i);
        let r = s2.sub(&s1).add(&s2.sub(&s1));
        let v = u1.mul(&i);
        let x3 = r.sqr().sub(&j).sub(&v.add(&v));
        let y3 = r.mul(&v.sub(&x3)).sub(&s1.mul(&j).add(&s1.mul(&j)));
        let z3 = self.z.add(&rhs.z).sqr().sub(&z1z1).sub(&z2z2).mul(&h);
        let generic = ProjectivePoint { x: x3, y: y3, z: z3 };

        let doubled = self.double();

        let mut result = generic;
        result = ProjectivePoint::conditional_select(&result, &Self::IDENTITY, is_inverse);
        result = ProjectivePoint::conditional_select(&result, &doubled, is_double);
        result = ProjectivePoint::conditional_select(&result, self, rhs_identity);
        result = ProjectivePoint::conditional_select(&result, rhs, self_identity);
        result
    }

    pub fn eq_choice(&self, other: &Self) -> Choice {
        let self_identity = self.is_identity();
        let other_identity = other.is_identity();
        let both_identity = self_identity & other_identity;
        let neither_identity = !self_identity & !other_identity;

        let z1z1 = self.z.sqr();
        let z2z2 = other.z.sqr();
        let x_match = self.x.mul(&z2z2).eq_choice(&other.x.mul(&z1z1));
        let y_match = self
            .y
            .mul(&other.z)
            .mul(&z2z2)
            .eq_choice(&other.y.mul(&self.z).mul(&z1z1));

        both_identity | (neither_identity & x_match & y_match)
    }

    /// Non-constant-time double-and-add, safe only when `scalar` is public
    /// (verification, precompute-table construction).
    pub fn mul_variable_time(&self, scalar: &Scalar) -> Self {
        let mut acc = Self::IDENTITY;
        let bytes = scalar.to_bytes_be();
        for byte in bytes {
            for bit_idx in (0..8).rev() {
                acc = acc.double();
                if (byte >> bit_idx) & 1 == 1 {
                    acc = acc.add(self);
                }
            }
        }
        acc
    }
}

impl ConditionallySelectable for ProjectivePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        ProjectivePoint {
            x: Fp::conditional_select(&a.x, &b.x, choice),
            y: Fp::conditional_select(&a.y, &b.y, choice),
            z: Fp::conditional_select(&a.z, &b.z, choice),
        }
    }
}

impl PartialEq for ProjectivePoint {
    fn eq(&self, other: &Self) -> bool {
        self.eq_choice(other).into()
    }
}
impl Eq for ProjectivePoint {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_is_on_curve() {
        let g = crate::curve::generator();
        assert!(bool::from(g.is_on_curve()));
    }

    #[test]
    fn double_matches_add_to_self() {
        let g = ProjectivePoint::generator();
        let doubled = g.double();
        let added = g.add(&g);
        assert_eq!(doubled, added);
    }

    #[test]
    fn point_plus_negation_is_identity() {
        let g = ProjectivePoint::generator();
        let sum = g.add(&g.negate());
        assert!(bool::from(sum.is_identity()));
    }

    #[test]
    fn point_plus_identity_is_unchanged() {
        let g = ProjectivePoint::generator();
        assert_eq!(g.add(&ProjectivePoint::IDENTITY), g);
    }

    #[test]
    fn sec1_round_trip() {
        let g = crate::curve::generator();
        let compressed = g.to_compressed().unwrap();
        let uncompressed = g.to_uncompressed().unwrap();
        assert_eq!(AffinePoint::from_compressed(compressed).unwrap(), g);
        assert_eq!(AffinePoint::from_uncompressed(uncompressed).unwrap(), g);
    }

    #[test]
    fn identity_has_no_sec1_encoding() {
        assert!(AffinePoint::Identity.to_compressed().is_err());
        assert!(AffinePoint::Identity.to_uncompressed().is_err());
    }
}
