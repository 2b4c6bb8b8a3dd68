// SPDX-License-Identifier: AGPL-3.0-only

//! Flat fermion vectors.
//!
//! A spinor field is a `Vec<Complex64>` of length `12 × volume`, component
//! `(site, spin, color)` at `12*site + 3*spin + color`. Operators take and
//! return this representation directly so an external solver never has to
//! know about blocks or parity.

use super::complex_f64::Complex64;
use super::constants::{N_COLORS, N_SPINS, SPINOR_COMPONENTS};
use super::indexer::Shape;
use super::rng::Lcg;
use crate::error::LatticeError;

/// Flat index of component `(site, spin, color)`.
#[inline]
#[must_use]
pub const fn spinor_index(site: usize, spin: usize, color: usize) -> usize {
    SPINOR_COMPONENTS * site + N_COLORS * spin + color
}

/// Zero field on `volume` sites.
#[must_use]
pub fn zeros(volume: usize) -> Vec<Complex64> {
    vec![Complex64::ZERO; SPINOR_COMPONENTS * volume]
}

/// Unit source: 1 at `(coords, spin, color)`, 0 elsewhere.
///
/// # Errors
///
/// `OutOfRange` if `spin` or `color` is out of range,
/// `InvalidConfiguration` if `coords` has the wrong length.
pub fn point_source(
    shape: &Shape,
    coords: &[isize],
    spin: usize,
    color: usize,
) -> Result<Vec<Complex64>, LatticeError> {
    if coords.len() != shape.ndim() {
        return Err(LatticeError::invalid(format!(
            "source coordinates have {} entries, lattice has {} dimensions",
            coords.len(),
            shape.ndim()
        )));
    }
    if spin >= N_SPINS {
        return Err(LatticeError::OutOfRange {
            index: spin,
            bound: N_SPINS,
        });
    }
    if color >= N_COLORS {
        return Err(LatticeError::OutOfRange {
            index: color,
            bound: N_COLORS,
        });
    }
    let mut psi = zeros(shape.volume());
    psi[spinor_index(shape.site_index(coords), spin, color)] = Complex64::ONE;
    Ok(psi)
}

/// Random field with components uniform in `[-0.5, 0.5)²`.
#[must_use]
pub fn random(len: usize, seed: u64) -> Vec<Complex64> {
    let mut rng = Lcg::new(seed);
    (0..len)
        .map(|_| {
            let re = rng.uniform() - 0.5;
            let im = rng.uniform() - 0.5;
            Complex64::new(re, im)
        })
        .collect()
}

/// ⟨a|b⟩ = Σ conj(a\_i) b\_i
#[must_use]
pub fn dot(a: &[Complex64], b: &[Complex64]) -> Complex64 {
    a.iter().zip(b).map(|(x, y)| x.conj() * *y).sum()
}

/// ‖a‖²
#[must_use]
pub fn norm_sq(a: &[Complex64]) -> f64 {
    a.iter().map(|z| z.abs_sq()).sum()
}

/// y ← α x + y
pub fn axpy(alpha: Complex64, x: &[Complex64], y: &mut [Complex64]) {
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi += alpha * *xi;
    }
}

/// α x as a new vector.
#[must_use]
pub fn scaled(alpha: Complex64, x: &[Complex64]) -> Vec<Complex64> {
    x.iter().map(|&z| alpha * z).collect()
}

/// Largest componentwise |a - b|; infinite on a length mismatch.
#[must_use]
pub fn max_abs_diff(a: &[Complex64], b: &[Complex64]) -> f64 {
    if a.len() != b.len() {
        return f64::INFINITY;
    }
    a.iter()
        .zip(b)
        .map(|(x, y)| (*x - *y).abs())
        .fold(0.0, f64::max)
}

/// Sites carrying at least one nonzero component.
#[must_use]
pub fn nonzero_sites(psi: &[Complex64]) -> Vec<usize> {
    psi.chunks(SPINOR_COMPONENTS)
        .enumerate()
        .filter(|(_, site)| site.iter().any(|z| !z.is_zero()))
        .map(|(s, _)| s)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_source_has_one_entry() {
        let shape = Shape::new(&[4, 4, 4, 4]).unwrap();
        let psi = point_source(&shape, &[1, 0, 2, 3], 2, 1).unwrap();
        assert_eq!(psi.len(), 12 * 256);
        assert_eq!(norm_sq(&psi), 1.0);
        let site = shape.site_index(&[1, 0, 2, 3]);
        assert_eq!(psi[spinor_index(site, 2, 1)], Complex64::ONE);
        assert_eq!(nonzero_sites(&psi), vec![site]);
    }

    #[test]
    fn point_source_rejects_bad_indices() {
        let shape = Shape::new(&[2, 2, 2, 2]).unwrap();
        assert!(point_source(&shape, &[0, 0, 0, 0], 4, 0).is_err());
        assert!(point_source(&shape, &[0, 0, 0, 0], 0, 3).is_err());
        assert!(point_source(&shape, &[0, 0, 0], 0, 0).is_err());
    }

    #[test]
    fn dot_is_conjugate_linear_in_first_slot() {
        let a = random(24, 1);
        let b = random(24, 2);
        let i = Complex64::I;
        let lhs = dot(&scaled(i, &a), &b);
        let rhs = i.conj() * dot(&a, &b);
        assert!((lhs - rhs).abs() < 1e-14);
        assert!((dot(&a, &a).re - norm_sq(&a)).abs() < 1e-14);
    }

    #[test]
    fn axpy_accumulates() {
        let x = vec![Complex64::ONE; 4];
        let mut y = vec![Complex64::I; 4];
        axpy(Complex64::real(2.0), &x, &mut y);
        assert!(y.iter().all(|&z| z == Complex64::new(2.0, 1.0)));
    }

    #[test]
    fn random_is_seeded() {
        assert_eq!(random(12, 9), random(12, 9));
        assert_ne!(random(12, 9), random(12, 10));
    }
}
