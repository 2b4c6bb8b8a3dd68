// SPDX-License-Identifier: AGPL-3.0-only

//! Contract between matrix-free operators and an iterative solver.
//!
//! A solver sees an operator only through [`LinearOperator`]: its size, its
//! action on a flat vector and, for Hermitian systems, the transform that
//! makes it Hermitian. For Wilson-type operators that transform is γ5
//! (`H = γ5 D`), for domain-wall operators γ5 combined with a reflection of
//! the fifth dimension. In both cases `undo_hermiticity` is an involution, so
//! it maps a solution of `H x = γ5 b` back to one of `D x = b`.

use log::warn;

use super::complex_f64::Complex64;
use crate::error::LatticeError;

/// Matrix-free linear operator on flat complex vectors.
///
/// Implementations are immutable after construction and safe to apply from
/// many threads at once.
pub trait LinearOperator: Sync {
    /// Length of the vectors the operator acts on.
    fn size(&self) -> usize;

    /// `D ψ`.
    ///
    /// A vector of the wrong length yields a zero vector of length
    /// [`LinearOperator::size`]; use [`LinearOperator::try_apply`] to get the
    /// mismatch as an error.
    fn apply(&self, psi: &[Complex64]) -> Vec<Complex64>;

    /// Hermiticity transform `R ψ` (γ5 or its 5-D generalization).
    fn undo_hermiticity(&self, psi: &[Complex64]) -> Vec<Complex64>;

    /// `R D ψ`, Hermitian for real boundary phases.
    fn apply_hermitian(&self, psi: &[Complex64]) -> Vec<Complex64> {
        self.undo_hermiticity(&self.apply(psi))
    }

    /// `D ψ`, or `SizeMismatch` when `psi` has the wrong length.
    ///
    /// # Errors
    ///
    /// `SizeMismatch` if `psi.len() != size()`.
    fn try_apply(&self, psi: &[Complex64]) -> Result<Vec<Complex64>, LatticeError> {
        check_size(self.size(), psi)?;
        Ok(self.apply(psi))
    }
}

/// Ok when `psi` has length `expected`.
///
/// # Errors
///
/// `SizeMismatch` otherwise.
pub fn check_size(expected: usize, psi: &[Complex64]) -> Result<(), LatticeError> {
    if psi.len() == expected {
        Ok(())
    } else {
        Err(LatticeError::SizeMismatch {
            expected,
            found: psi.len(),
        })
    }
}

/// Zero vector returned by `apply` on a size mismatch, logged as a warning.
pub(crate) fn mismatch_fallback(name: &str, expected: usize, found: usize) -> Vec<Complex64> {
    warn!("{name}: input length {found} does not match operator size {expected}; returning zeros");
    vec![Complex64::ZERO; expected]
}
