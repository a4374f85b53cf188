//! The scalar multiplication engine: a lazily-built, process-wide precompute
//! table for the generator `G`, constant-time fixed-window base-point
//! multiplication, constant-time variable-base multiplication, and a
//! variable-time fused dual-base multiply (Shamir's trick) for verification.

use crate::point::{AffinePoint, ProjectivePoint};
use crate::scalar::Scalar;
use std::sync::OnceLock;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

/// Default window width for the generator table, per spec: 8 bits per
/// window, aligning each window to one scalar byte.
pub const DEFAULT_WINDOW: usize = 8;

/// `T_i[j] = j * 2^(window*i) * base` for `j` in `1..=2^window - 1`.
/// Immutable once built; stored affine since rows are read far more often
/// than built.
pub struct PrecomputedTable {
    window: usize,
    rows: Vec<Vec<AffinePoint>>,
}

impl PrecomputedTable {
    pub fn build(base: &AffinePoint, window: usize) -> Self {
        assert!((1..=16).contains(&window), "window width out of supported range");
        let n_windows = (256 + window - 1) / window;
        let table_size = (1usize << window) - 1;
        let mut rows = Vec::with_capacity(n_windows);
        let mut window_base = ProjectivePoint::from_affine(base);
        for _ in 0..n_windows {
            let mut row = Vec::with_capacity(table_size);
            let mut acc = window_base;
            row.push(acc.to_affine());
            for _ in 1..table_size {
                acc = acc.add(&window_base);
                row.push(acc.to_affine());
            }
            rows.push(row);
            for _ in 0..window {
                window_base = window_base.double();
            }
        }
        PrecomputedTable { window, rows }
    }

    /// Constant-time scalar multiplication against this table: every row
    /// lookup scans all `2^window - 1` entries and conditionally selects,
    /// so control flow and memory access never depend on `scalar`.
    pub fn mul(&self, scalar: &Scalar) -> ProjectivePoint {
        let limbs = scalar.to_limbs();
        let mut acc = ProjectivePoint::IDENTITY;
        for (i, row) in self.rows.iter().enumerate() {
            let value = window_value(&limbs, i, self.window);
            let selected = select_row(row, value);
            acc = acc.add(&ProjectivePoint::from_affine(&selected));
        }
        acc
    }
}

/// Extracts the `window_width`-bit value covering bits
/// `[window_index*window_width, (window_index+1)*window_width)` of `limbs`
/// (little-endian `u64` limbs). `window_index`/`window_width` are always
/// public loop parameters; only the bit *values* read out of `limbs` are
/// secret.
fn window_value(limbs: &[u64; 4], window_index: usize, window_width: usize) -> u32 {
    let bit_start = window_index * window_width;
    let mut value: u32 = 0;
    for b in 0..window_width {
        let bit_pos = bit_start + b;
        if bit_pos >= 256 {
            break;
        }
        let limb_idx = bit_pos / 64;
        let bit_idx = bit_pos % 64;
        let bit = (limbs[limb_idx] >> bit_idx) & 1;
        value |= (bit as u32) << b;
    }
    value
}

/// Constant-time row lookup: `value == 0` selects the identity (no term for
/// this window), otherwise the (value-1)th row entry.
fn select_row(row: &[AffinePoint], value: u32) -> AffinePoint {
    let mut acc = ProjectivePoint::IDENTITY;
    for (idx, point) in row.iter().enumerate() {
        let j = (idx + 1) as u32;
        let choice = value.ct_eq(&j);
        acc = ProjectivePoint::conditional_select(&acc, &ProjectivePoint::from_affine(point), choice);
    }
    acc.to_affine()
}

static GENERATOR_TABLE: OnceLock<PrecomputedTable> = OnceLock::new();

fn generator_table() -> &'static PrecomputedTable {
    GENERATOR_TABLE.get_or_init(|| PrecomputedTable::build(&crate::curve::generator(), DEFAULT_WINDOW))
}

/// Front-load the cost of building the process-wide `G` table. Callers that
/// care about predictable latency on the first `sign`/`get_public_key` call
/// can invoke this during startup; it is otherwise built lazily and
/// thread-safely on first use.
pub fn precompute() {
    generator_table();
}

/// Constant-time `scalar * G`.
pub fn base_point_mul(scalar: &Scalar) -> ProjectivePoint {
    generator_table().mul(scalar)
}

/// Build (and hand back) a precompute table for a caller-supplied point,
/// e.g. a recurring counterparty public key in an ECDH-heavy protocol.
pub fn precompute_point(point: &AffinePoint, window: usize) -> PrecomputedTable {
    PrecomputedTable::build(point, window)
}

/// Constant-time variable-base multiplication via a conditional-select
/// double-and-add ladder; used whenever `scalar` is secret but no
/// precomputed table for `point` exists (ECDH, and the intermediate steps
/// of signing).
pub fn variable_base_mul_constant_time(point: &ProjectivePoint, scalar: &Scalar) -> ProjectivePoint {
    let mut acc = ProjectivePoint::IDENTITY;
    for byte in scalar.to_bytes_be() {
        for bit_idx in (0..8).rev() {
            acc = acc.double();
            let added = acc.add(point);
            let bit = (byte >> bit_idx) & 1;
            acc = ProjectivePoint::conditional_select(&acc, &added, Choice::from(bit));
        }
    }
    acc
}

/// Fused `k*G + l*Q` via Shamir's trick. Variable-time: only used by
/// signature verification, where both scalars are public.
pub fn dual_base_mul_variable_time(
    k: &Scalar,
    g: &ProjectivePoint,
    l: &Scalar,
    q: &ProjectivePoint,
) -> ProjectivePoint {
    let sum = g.add(q);
    let mut acc = ProjectivePoint::IDENTITY;
    let k_bytes = k.to_bytes_be();
    let l_bytes = l.to_bytes_be();
    for i in 0..32 {
        for bit_idx in (0..8).rev() {
            acc = acc.double();
            let kb = (k_bytes[i] >> bit_idx) & 1;
            let lb = (l_bytes[i] >> bit_idx) & 1;
            acc = match (kb, lb) {
                (0, 0) => acc,
                (1, 0) => acc.add(g),
                (0, 1) => acc.add(q),
                _ => acc.add(&sum),
            };
        }
    }
    acc
}
