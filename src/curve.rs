//! Curve-level constants: the field prime, the group order, and the
//! generator point `G`.

use crate::field::Fp;
use crate::point::AffinePoint;

/// Namespaced curve constants, kept as a unit struct so call sites read as
/// `Curve::N`, `Curve::P`, mirroring how this crate's predecessor exposed
/// them.
pub struct Curve;

impl Curve {
    /// Curve order `N`: `0xfffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141`.
    pub const N: [u8; 32] = [
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xfe, 0xba, 0xae, 0xdc, 0xe6, 0xaf, 0x48, 0xa0, 0x3b, 0xbf, 0xd2, 0x5e, 0x8c, 0xd0, 0x36,
        0x41, 0x41,
    ];

    /// `N / 2`, the low-s/high-s boundary.
    pub const N_DIV_2: [u8; 32] = [
        0x7f, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0x5d, 0x57, 0x6e, 0x73, 0x57, 0xa4, 0x50, 0x1d, 0xdf, 0xe9, 0x2f, 0x46, 0x68, 0x1b,
        0x20, 0xa0,
    ];

    /// Field prime `P`: `0xfffffffffffffffffffffffffffffffffffffffffffffffffffffffefffffc2f`.
    pub const P: [u8; 32] = [
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe, 0xff, 0xff, 0xff,
        0xfc, 0x2f,
    ];

    pub const GX: [u8; 32] = [
        0x79, 0xbe, 0x66, 0x7e, 0xf9, 0xdc, 0xbb, 0xac, 0x55, 0xa0, 0x62, 0x95, 0xce, 0x87, 0x0b,
        0x07, 0x02, 0x9b, 0xfc, 0xdb, 0x2d, 0xce, 0x28, 0xd9, 0x59, 0xf2, 0x81, 0x5b, 0x16, 0xf8,
        0x17, 0x98,
    ];

    pub const GY: [u8; 32] = [
        0x48, 0x3a, 0xda, 0x77, 0x26, 0xa3, 0xc4, 0x65, 0x5d, 0xa4, 0xfb, 0xfc, 0x0e, 0x11, 0x08,
        0xa8, 0xfd, 0x17, 0xb4, 0x48, 0xa6, 0x85, 0x54, 0x19, 0x9c, 0x47, 0xd0, 0x8f, 0xfb, 0x10,
        0xd4, 0xb8,
    ];

}

/// The generator point `G`, as an affine curve point.
pub fn generator() -> AffinePoint {
    let x = Fp::from_bytes_be(&Curve::GX).expect("Gx is canonical");
    let y = Fp::from_bytes_be(&Curve::GY).expect("Gy is canonical");
    AffinePoint::Point { x, y }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_matches_known_coordinates() {
        let g = generator();
        assert_eq!(g.x().unwrap().to_bytes_be(), Curve::GX);
        assert_eq!(g.y().unwrap().to_bytes_be(), Curve::GY);
    }
}
