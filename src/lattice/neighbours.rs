// SPDX-License-Identifier: AGPL-3.0-only

//! Precomputed neighbour indices and boundary phases.
//!
//! For every site and every dimension d the table holds the site `hop` steps
//! behind (`x - hop·ê_d`) and ahead (`x + hop·ê_d`), together with the phase
//! picked up on the way: the dimension's boundary phase raised to the number
//! of times the hop wrapped around the lattice.
//!
//! Rows are `[site][direction]` with `2N` directions: `0..N` behind,
//! `N..2N` ahead.

use log::debug;

use super::complex_f64::Complex64;
use super::indexer::Shape;
use super::site_store::SiteStore;
use crate::error::LatticeError;

/// One stencil leg: target site and the phase applied to its value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbour {
    /// Lexicographic index of the neighbouring site.
    pub site: usize,
    /// Accumulated boundary phase (1 unless the leg wrapped).
    pub phase: Complex64,
}

/// Periodic boundary conditions: phase 1 in every dimension.
#[must_use]
pub fn periodic_boundary(ndim: usize) -> Vec<Complex64> {
    vec![Complex64::ONE; ndim]
}

/// Antiperiodic in dimension 0 (time), periodic elsewhere.
#[must_use]
pub fn antiperiodic_time(ndim: usize) -> Vec<Complex64> {
    let mut bcs = periodic_boundary(ndim);
    if let Some(t) = bcs.first_mut() {
        *t = Complex64::real(-1.0);
    }
    bcs
}

/// Neighbour table for one (shape, boundary conditions, hop) combination.
#[derive(Clone, Debug)]
pub struct NeighbourTable {
    extents: Vec<usize>,
    hop: usize,
    boundary: Vec<Complex64>,
    entries: Vec<Neighbour>,
}

impl NeighbourTable {
    /// Build the table.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `boundary` does not have one phase per
    /// dimension or `hop` is zero.
    pub fn new(shape: &Shape, boundary: &[Complex64], hop: usize) -> Result<Self, LatticeError> {
        let ndim = shape.ndim();
        if boundary.len() != ndim {
            return Err(LatticeError::invalid(format!(
                "{} boundary phases given for a {ndim}-dimensional lattice",
                boundary.len()
            )));
        }
        if hop == 0 {
            return Err(LatticeError::invalid("neighbour hop distance must be positive"));
        }

        let step = hop as isize;
        let mut entries = Vec::with_capacity(shape.volume() * 2 * ndim);
        for site in 0..shape.volume() {
            for sign in [-step, step] {
                for (d, &bc) in boundary.iter().enumerate() {
                    let (target, wraps) = shape.step(site, d, sign);
                    entries.push(Neighbour {
                        site: target,
                        phase: bc.powi(wraps.unsigned_abs() as u32),
                    });
                }
            }
        }

        debug!(
            "neighbour table: shape {:?}, hop {hop}, {} legs",
            shape.extents(),
            entries.len()
        );

        Ok(Self {
            extents: shape.extents().to_vec(),
            hop,
            boundary: boundary.to_vec(),
            entries,
        })
    }

    /// Number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.extents.len()
    }

    /// Directions per site (`2 * ndim`).
    #[must_use]
    pub fn num_directions(&self) -> usize {
        2 * self.extents.len()
    }

    /// Number of sites covered.
    #[must_use]
    pub fn volume(&self) -> usize {
        self.entries.len() / self.num_directions()
    }

    /// Hop distance.
    #[must_use]
    pub const fn hop(&self) -> usize {
        self.hop
    }

    /// Boundary phases the table was built with.
    #[must_use]
    pub fn boundary(&self) -> &[Complex64] {
        &self.boundary
    }

    /// All `2N` legs of a site.
    #[inline]
    #[must_use]
    pub fn row(&self, site: usize) -> &[Neighbour] {
        let n = self.num_directions();
        &self.entries[site * n..(site + 1) * n]
    }

    /// Leg in direction `dir` (`0..N` behind, `N..2N` ahead).
    #[inline]
    #[must_use]
    pub fn entry(&self, site: usize, dir: usize) -> Neighbour {
        self.entries[site * self.num_directions() + dir]
    }

    /// Site `hop` steps behind along `dim`.
    #[inline]
    #[must_use]
    pub fn behind(&self, site: usize, dim: usize) -> Neighbour {
        self.entry(site, dim)
    }

    /// Site `hop` steps ahead along `dim`.
    #[inline]
    #[must_use]
    pub fn ahead(&self, site: usize, dim: usize) -> Neighbour {
        self.entry(site, self.ndim() + dim)
    }

    /// Neighbour site indices of one site, in direction order.
    pub fn sites_row(&self, site: usize) -> impl Iterator<Item = usize> + '_ {
        self.row(site).iter().map(|n| n.site)
    }

    /// Neighbour phases of one site, in direction order.
    pub fn phases_row(&self, site: usize) -> impl Iterator<Item = Complex64> + '_ {
        self.row(site).iter().map(|n| n.phase)
    }

    /// Ok when `store` lives on the lattice this table was built for.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` otherwise.
    pub fn check_store<T>(&self, store: &SiteStore<T>) -> Result<(), LatticeError> {
        if store.extents() == self.extents.as_slice() {
            Ok(())
        } else {
            Err(LatticeError::ShapeMismatch {
                expected: self.extents.clone(),
                found: store.extents().to_vec(),
            })
        }
    }
}
