// SPDX-License-Identifier: AGPL-3.0-only

//! Centralized numerical tolerances for tests and the validation binary.
//!
//! Every threshold used to judge a lattice or operator property lives here
//! with a note on where it comes from. No ad-hoc magic numbers in checks.
//!
//! | Category | Basis | Example |
//! |----------|-------|---------|
//! | Exact | Integer payloads, sign flips, permutations | 0 |
//! | Machine precision | IEEE 754 f64, short sums | 1e-12 |
//! | Accumulated | Inner products over the whole lattice | 1e-10 |

// ═══════════════════════════════════════════════════════════════════
// Machine-precision tolerances (IEEE 754 f64)
// ═══════════════════════════════════════════════════════════════════

/// Tolerance for operations that should be exact up to a few roundings.
///
/// f64 has ~15.9 significant digits; 1e-12 leaves room for the handful of
/// roundings in a complex multiply-add chain on O(1) values.
pub const EXACT_F64: f64 = 1e-12;

/// Elementwise `(A + B) - B == A` on complex stores.
///
/// One addition and one subtraction per element with |values| ≲ 300 give
/// rounding below 1e-13.
pub const STORE_ROUND_TRIP_ABS: f64 = 1e-12;

/// SU(3) links: max |U U† - 1| and |det U - 1|.
///
/// Gram-Schmidt reunitarization leaves ~1e-15; 1e-10 covers hot starts on
/// any lattice size used here.
pub const SU3_UNITARITY: f64 = 1e-10;

// ═══════════════════════════════════════════════════════════════════
// Operator tolerances
// ═══════════════════════════════════════════════════════════════════

/// Linearity `D(a x + b y) = a D x + b D y`, componentwise absolute error.
///
/// Each output component is a sum of ~100 terms of O(1) size, applied to
/// inputs built with one complex multiply-add; rounding stays below 1e-13.
pub const OPERATOR_LINEARITY_ABS: f64 = 1e-12;

/// γ5-Hermiticity `⟨x, γ5 D y⟩ = ⟨γ5 D x, y⟩`, absolute error of the inner product.
///
/// The inner products sum 12 V terms of O(1); on 4⁴–8·4³ lattices the
/// accumulated rounding is ~1e-12.
pub const HERMITICITY_ABS: f64 = 1e-10;

/// Free-field identities (constant spinor, point-source stencil weights).
///
/// Unit links and dyadic coefficients make these nearly exact.
pub const FREE_FIELD_ABS: f64 = 1e-13;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::assertions_on_constants)]
    fn tolerances_are_ordered() {
        assert!(FREE_FIELD_ABS <= EXACT_F64);
        assert!(EXACT_F64 <= HERMITICITY_ABS);
        assert!(OPERATOR_LINEARITY_ABS <= HERMITICITY_ABS);
        assert!(STORE_ROUND_TRIP_ABS > 0.0);
        assert!(SU3_UNITARITY > 0.0);
    }
}
