// SPDX-License-Identifier: AGPL-3.0-only

//! Coordinate ↔ lexicographic site index mapping on a periodic grid.
//!
//! Sites are numbered by mixed-radix encoding with the first dimension most
//! significant:
//!
//!   index = Σ\_d coord\[d\] × Π\_{e>d} extent\[e\]
//!
//! so for a 4-D lattice with shape `[T, X, Y, Z]` the last axis runs
//! fastest. Coordinates outside `[0, extent)` are reduced modulo the extent
//! (always non-negative); wraparound is the lattice periodicity, not an
//! error.

use crate::error::LatticeError;

/// Two-coloring of sites by coordinate-sum parity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Parity {
    /// Coordinate sum is even.
    Even,
    /// Coordinate sum is odd.
    Odd,
}

impl Parity {
    /// Parity of an integer coordinate sum.
    #[inline]
    #[must_use]
    pub const fn of_sum(sum: isize) -> Self {
        if sum.rem_euclid(2) == 0 {
            Self::Even
        } else {
            Self::Odd
        }
    }

    /// The other color.
    #[inline]
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Even => Self::Odd,
            Self::Odd => Self::Even,
        }
    }
}

/// Mixed-radix encoding of `digits` over `radices`, most significant first.
///
/// Digits must already lie in `[0, radix)`.
#[inline]
#[must_use]
pub fn mixed_radix(digits: &[usize], radices: &[usize]) -> usize {
    debug_assert_eq!(digits.len(), radices.len());
    digits
        .iter()
        .zip(radices)
        .fold(0, |acc, (&d, &r)| acc * r + d)
}

/// Grid shape with periodic coordinate ↔ index conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shape {
    extents: Vec<usize>,
    volume: usize,
}

impl Shape {
    /// Build a shape from per-dimension extents.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `extents` is empty or any extent is zero.
    pub fn new(extents: &[usize]) -> Result<Self, LatticeError> {
        if extents.is_empty() {
            return Err(LatticeError::invalid("lattice shape has no dimensions"));
        }
        if let Some(d) = extents.iter().position(|&e| e == 0) {
            return Err(LatticeError::invalid_dim(d, "extent must be positive"));
        }
        Ok(Self {
            extents: extents.to_vec(),
            volume: extents.iter().product(),
        })
    }

    /// Per-dimension extents.
    #[must_use]
    pub fn extents(&self) -> &[usize] {
        &self.extents
    }

    /// Number of dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.extents.len()
    }

    /// Total number of sites.
    #[must_use]
    pub const fn volume(&self) -> usize {
        self.volume
    }

    /// Lexicographic index of a (possibly out-of-range) coordinate tuple.
    ///
    /// # Panics
    ///
    /// If `coords` does not have one entry per dimension.
    #[must_use]
    pub fn site_index(&self, coords: &[isize]) -> usize {
        assert_eq!(
            coords.len(),
            self.ndim(),
            "coordinate tuple has {} entries for a {}-dimensional lattice",
            coords.len(),
            self.ndim()
        );
        coords
            .iter()
            .zip(&self.extents)
            .fold(0, |acc, (&c, &n)| acc * n + wrap(c, n))
    }

    /// Coordinates of a site, least significant dimension extracted first.
    ///
    /// # Panics
    ///
    /// If `index >= volume`.
    #[must_use]
    pub fn site_coords(&self, index: usize) -> Vec<isize> {
        let mut out = vec![0; self.ndim()];
        self.site_coords_into(index, &mut out);
        out
    }

    /// [`Shape::site_coords`] into a caller-provided buffer.
    ///
    /// # Panics
    ///
    /// If `index >= volume` or `out` has the wrong length.
    pub fn site_coords_into(&self, index: usize, out: &mut [isize]) {
        assert!(
            index < self.volume,
            "site index {index} out of range for volume {}",
            self.volume
        );
        assert_eq!(out.len(), self.ndim());
        let mut rem = index;
        for d in (0..self.ndim()).rev() {
            let n = self.extents[d];
            out[d] = (rem % n) as isize;
            rem /= n;
        }
    }

    /// Checked form of [`Shape::site_coords`].
    ///
    /// # Errors
    ///
    /// `OutOfRange` if `index >= volume`.
    pub fn try_site_coords(&self, index: usize) -> Result<Vec<isize>, LatticeError> {
        if index >= self.volume {
            return Err(LatticeError::OutOfRange {
                index,
                bound: self.volume,
            });
        }
        Ok(self.site_coords(index))
    }

    /// Coordinate-sum parity of a site.
    #[must_use]
    pub fn parity(&self, index: usize) -> Parity {
        Parity::of_sum(self.site_coords(index).iter().sum())
    }

    /// Site reached by moving `shift` steps along `dim`, and how many times
    /// the move wrapped around the periodic boundary (signed).
    ///
    /// # Panics
    ///
    /// If `dim >= ndim` or `index >= volume`.
    #[must_use]
    pub fn step(&self, index: usize, dim: usize, shift: isize) -> (usize, isize) {
        assert!(dim < self.ndim(), "dimension {dim} out of range");
        let mut coords = self.site_coords(index);
        let n = self.extents[dim] as isize;
        let moved = coords[dim] + shift;
        coords[dim] = moved;
        (self.site_index(&coords), moved.div_euclid(n))
    }
}

#[inline]
fn wrap(c: isize, n: usize) -> usize {
    c.rem_euclid(n as isize) as usize
}
