use core::fmt;

/// Every distinguishable failure mode the engine can report.
///
/// Verification never surfaces these for a mathematically-failed check — a
/// well-formed signature that simply doesn't verify yields `Ok(false)`, not
/// an `Err`. These variants cover shape errors and input-boundary
/// violations only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Secp256k1Error {
    /// Malformed hex, wrong byte length, or non-minimal/trailing-data DER.
    InvalidEncoding,
    /// Scalar not in `[1, n)`.
    InvalidPrivateKey,
    /// Point is off-curve, has no valid lift, or is the identity where a
    /// finite point was required.
    InvalidPoint,
    /// Signature component out of range, or non-canonical where strictness
    /// was requested.
    InvalidSignature,
    /// A field element input was `>= p`.
    FieldOverflow,
    /// A scalar input was `>= n` where canonical form was required.
    ScalarOverflow,
    /// The identity (point at infinity) was encountered where a finite
    /// point is required, typically during serialization.
    PointAtInfinity,
    /// The CSPRNG collaborator could not produce a valid scalar, or
    /// `hash_to_private_key` exhausted its input without landing in range.
    EntropyFailure,
}

impl fmt::Display for Secp256k1Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::InvalidEncoding => "invalid encoding",
            Self::InvalidPrivateKey => "private key not in [1, n)",
            Self::InvalidPoint => "invalid or off-curve point",
            Self::InvalidSignature => "malformed or non-canonical signature",
            Self::FieldOverflow => "field element >= p",
            Self::ScalarOverflow => "scalar >= n",
            Self::PointAtInfinity => "point at infinity where a finite point was required",
            Self::EntropyFailure => "entropy source failed to produce a valid value",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for Secp256k1Error {}
