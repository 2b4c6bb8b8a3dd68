// SPDX-License-Identifier: AGPL-3.0-only

//! Domain-wall (Shamir) operator over a pluggable 4-D kernel.
//!
//! A 5-D spinor is `ls` copies of a 4-D spinor, slice `s` at
//! `s * kernel.size() .. (s + 1) * kernel.size()`. With chiral projectors
//! P± = (1 ± γ5)/2:
//!
//!   (D ψ)\_s = (K + 1) ψ\_s - P₋ ψ\_{s+1} - P₊ ψ\_{s-1}
//!
//! where the hops out of the fifth dimension wrap with weight `-m` instead
//! of `1`: slice `ls-1` receives `+m P₋ ψ_0` and slice 0 receives
//! `+m P₊ ψ_{ls-1}`. The kernel `K` is the Wilson operator at mass `-M5`
//! for [`DomainWall::wilson`], or any [`LinearOperator`] on flat spinors.
//!
//! Hermitian form: `H = γ5 R5 D`, with `R5` reflecting `s → ls-1-s`.

use log::debug;

use super::complex_f64::Complex64;
use super::constants::{N_COLORS, SPINOR_COMPONENTS};
use super::gamma::Chirality;
use super::gauge::GaugeField;
use super::operator::{mismatch_fallback, LinearOperator};
use super::wilson::WilsonDirac;
use crate::error::LatticeError;

/// 5-D domain-wall operator with kernel `K`.
#[derive(Clone, Debug)]
pub struct DomainWall<K> {
    mass: f64,
    m5: f64,
    ls: usize,
    kernel: K,
}

impl<'a> DomainWall<WilsonDirac<'a>> {
    /// Domain-wall operator with the Wilson kernel at mass `-m5`.
    ///
    /// # Errors
    ///
    /// As [`WilsonDirac::new`] and [`DomainWall::new`].
    pub fn wilson(
        mass: f64,
        m5: f64,
        ls: usize,
        boundary: &[Complex64],
        gauge: &'a GaugeField,
    ) -> Result<Self, LatticeError> {
        let kernel = WilsonDirac::new(-m5, boundary, gauge)?;
        Self::new(mass, m5, ls, kernel)
    }
}

impl<K: LinearOperator> DomainWall<K> {
    /// Wrap a kernel.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `ls` is zero, `mass` or `m5` is not finite,
    /// or the kernel size is not a whole number of spinor sites.
    pub fn new(mass: f64, m5: f64, ls: usize, kernel: K) -> Result<Self, LatticeError> {
        if ls == 0 {
            return Err(LatticeError::invalid("fifth-dimension extent ls must be positive"));
        }
        if !mass.is_finite() || !m5.is_finite() {
            return Err(LatticeError::invalid(format!(
                "domain-wall parameters must be finite (mass {mass}, M5 {m5})"
            )));
        }
        if kernel.size() % SPINOR_COMPONENTS != 0 {
            return Err(LatticeError::invalid(format!(
                "kernel size {} is not a multiple of {SPINOR_COMPONENTS}",
                kernel.size()
            )));
        }
        debug!(
            "domain-wall operator: mass {mass}, M5 {m5}, Ls {ls}, kernel size {}",
            kernel.size()
        );
        Ok(Self {
            mass,
            m5,
            ls,
            kernel,
        })
    }

    /// Bare quark mass coupling the walls.
    #[must_use]
    pub const fn mass(&self) -> f64 {
        self.mass
    }

    /// Domain-wall height.
    #[must_use]
    pub const fn m5(&self) -> f64 {
        self.m5
    }

    /// Fifth-dimension extent.
    #[must_use]
    pub const fn ls(&self) -> usize {
        self.ls
    }

    /// The 4-D kernel.
    #[must_use]
    pub const fn kernel(&self) -> &K {
        &self.kernel
    }

    /// Slice `s` of a 5-D vector.
    ///
    /// # Panics
    ///
    /// If `s >= ls` or `psi` is shorter than the operator size.
    #[must_use]
    pub fn slice<'v>(&self, psi: &'v [Complex64], s: usize) -> &'v [Complex64] {
        let n = self.kernel.size();
        &psi[s * n..(s + 1) * n]
    }
}

impl<K: LinearOperator> LinearOperator for DomainWall<K> {
    fn size(&self) -> usize {
        self.ls * self.kernel.size()
    }

    fn apply(&self, psi: &[Complex64]) -> Vec<Complex64> {
        let size = self.size();
        if psi.len() != size {
            return mismatch_fallback("DomainWall::apply", size, psi.len());
        }
        let n = self.kernel.size();
        let ls = self.ls;
        let mut eta = Vec::with_capacity(size);

        for s in 0..ls {
            let mut out = self.kernel.apply(self.slice(psi, s));
            for (o, p) in out.iter_mut().zip(self.slice(psi, s)) {
                *o += *p;
            }

            let (up, up_weight) = if s + 1 < ls { (s + 1, -1.0) } else { (0, self.mass) };
            add_projected(&mut out, up_weight, Chirality::Minus, self.slice(psi, up));

            let (down, down_weight) = if s > 0 { (s - 1, -1.0) } else { (ls - 1, self.mass) };
            add_projected(&mut out, down_weight, Chirality::Plus, self.slice(psi, down));

            debug_assert_eq!(out.len(), n);
            eta.extend(out);
        }
        eta
    }

    fn undo_hermiticity(&self, psi: &[Complex64]) -> Vec<Complex64> {
        let size = self.size();
        if psi.len() != size {
            return mismatch_fallback("DomainWall::undo_hermiticity", size, psi.len());
        }
        (0..self.ls)
            .rev()
            .flat_map(|s| self.kernel.undo_hermiticity(self.slice(psi, s)))
            .collect()
    }
}

/// out += weight × P ψ for the chiral projector `chirality`.
fn add_projected(out: &mut [Complex64], weight: f64, chirality: Chirality, psi: &[Complex64]) {
    for (k, (o, p)) in out.iter_mut().zip(psi).enumerate() {
        let spin = (k % SPINOR_COMPONENTS) / N_COLORS;
        if chirality.keeps(spin) {
            *o += p.scale(weight);
        }
    }
}
