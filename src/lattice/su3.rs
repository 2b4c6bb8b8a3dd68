// SPDX-License-Identifier: AGPL-3.0-only

//! SU(3) link matrices.
//!
//! `U_μ(x)` transports color from `x + μ` back to `x`. The stencil only
//! needs `U v` and `U† v` on single color vectors; the rest of this module
//! exists to build and check link configurations (products, determinant,
//! projection back onto the group, random near-identity links).
//!
//! Storage: row-major, `m[row][col]`.
//!
//! # References
//!
//! - Gattringer & Lang, "QCD on the Lattice" (2010), Ch. 2

use std::ops::{Mul, Sub};

use super::complex_f64::Complex64;
use super::constants::{LATTICE_DIVISION_GUARD, N_COLORS};
use super::rng::Lcg;

/// Color vector at a single site: 3 complex components.
pub type ColorVector = [Complex64; N_COLORS];

type Row = [Complex64; N_COLORS];

/// SU(3) link variable, a 3×3 complex matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
#[must_use]
pub struct Su3Matrix {
    /// Elements `m[row][col]`.
    pub m: [Row; N_COLORS],
}

impl Default for Su3Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Su3Matrix {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::from_fn(|i, j| (0..N_COLORS).map(|k| self.m[i][k] * rhs.m[k][j]).sum())
    }
}

impl Sub for Su3Matrix {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_fn(|i, j| self.m[i][j] - rhs.m[i][j])
    }
}

impl Su3Matrix {
    /// Unit link (cold start).
    pub const IDENTITY: Self = Self {
        m: [
            [Complex64::ONE, Complex64::ZERO, Complex64::ZERO],
            [Complex64::ZERO, Complex64::ONE, Complex64::ZERO],
            [Complex64::ZERO, Complex64::ZERO, Complex64::ONE],
        ],
    };

    /// Matrix with elements `f(row, col)`.
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> Complex64) -> Self {
        Self {
            m: std::array::from_fn(|i| std::array::from_fn(|j| f(i, j))),
        }
    }

    /// U†
    pub fn adjoint(self) -> Self {
        Self::from_fn(|i, j| self.m[j][i].conj())
    }

    /// Re Tr U
    #[must_use]
    pub fn re_trace(self) -> f64 {
        (0..N_COLORS).map(|i| self.m[i][i].re).sum()
    }

    /// det U, expanded along the first row.
    pub fn det(self) -> Complex64 {
        let row1 = self.m[1];
        let row2 = self.m[2];
        let minor = |a: usize, b: usize| row1[a] * row2[b] - row1[b] * row2[a];
        self.m[0][0] * minor(1, 2) - self.m[0][1] * minor(0, 2) + self.m[0][2] * minor(0, 1)
    }

    /// Every element times `s`.
    pub fn scale(self, s: f64) -> Self {
        Self::from_fn(|i, j| self.m[i][j].scale(s))
    }

    /// `(U v)_a = Σ_b U_ab v_b`
    #[inline]
    #[must_use]
    pub fn mul_vec(&self, v: &[Complex64]) -> ColorVector {
        std::array::from_fn(|a| row_times(&self.m[a], v))
    }

    /// `(U† v)_a = Σ_b conj(U_ba) v_b`
    #[inline]
    #[must_use]
    pub fn adjoint_mul_vec(&self, v: &[Complex64]) -> ColorVector {
        std::array::from_fn(|a| {
            (0..N_COLORS)
                .map(|b| self.m[b][a].conj() * v[b])
                .sum()
        })
    }

    /// max(‖U U† − 1‖_max, |det U − 1|)
    #[must_use]
    pub fn su3_deviation(self) -> f64 {
        let unitarity = (self * self.adjoint() - Self::IDENTITY)
            .m
            .iter()
            .flatten()
            .map(|z| z.abs())
            .fold(0.0, f64::max);
        unitarity.max((self.det() - Complex64::ONE).abs())
    }

    /// Nearest SU(3) matrix by Gram-Schmidt on the first two rows.
    ///
    /// The third row is the conjugated cross product of the first two, which
    /// fixes det U = 1.
    pub fn reunitarize(self) -> Self {
        let r0 = normalized(self.m[0]);
        let overlap: Complex64 = r0.iter().zip(&self.m[1]).map(|(a, b)| a.conj() * *b).sum();
        let r1 = normalized(std::array::from_fn(|j| self.m[1][j] - r0[j] * overlap));
        let r2 = std::array::from_fn(|j| {
            let (k, l) = ((j + 1) % N_COLORS, (j + 2) % N_COLORS);
            (r0[k] * r1[l] - r0[l] * r1[k]).conj()
        });
        Self { m: [r0, r1, r2] }
    }

    /// Random link `exp(iεH)` to second order, then reunitarized.
    ///
    /// `H` is traceless Hermitian with Gaussian coefficients drawn from
    /// `rng`: two diagonal (λ3, λ8) then one complex pair per off-diagonal.
    pub fn random_near_identity(rng: &mut Lcg, epsilon: f64) -> Self {
        let a3 = rng.gaussian() * epsilon;
        let a8 = rng.gaussian() * epsilon / 3.0_f64.sqrt();
        let mut h = [[Complex64::ZERO; N_COLORS]; N_COLORS];
        h[0][0] = Complex64::real(a3 + a8);
        h[1][1] = Complex64::real(a8 - a3);
        h[2][2] = Complex64::real(-2.0 * a8);
        for (i, j) in [(0, 1), (0, 2), (1, 2)] {
            let z = Complex64::new(rng.gaussian() * epsilon, rng.gaussian() * epsilon);
            h[i][j] = z;
            h[j][i] = z.conj();
        }

        let h = Self { m: h };
        let h2 = h * h;
        Self::from_fn(|i, j| {
            Self::IDENTITY.m[i][j] + Complex64::I * h.m[i][j] - h2.m[i][j].scale(0.5)
        })
        .reunitarize()
    }
}

#[inline]
fn row_times(row: &Row, v: &[Complex64]) -> Complex64 {
    row.iter().zip(v).map(|(u, x)| *u * *x).sum()
}

fn normalized(row: Row) -> Row {
    let norm = row.iter().map(|z| z.abs_sq()).sum::<f64>().sqrt();
    if norm > LATTICE_DIVISION_GUARD {
        row.map(|z| z.scale(norm.recip()))
    } else {
        row
    }
}
