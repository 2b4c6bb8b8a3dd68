// SPDX-License-Identifier: AGPL-3.0-only

//! Lattice dimensions, stencil coefficients and numerical guards.

/// Number of colors (SU(3)).
pub const N_COLORS: usize = 3;

/// Number of Dirac spin components.
pub const N_SPINS: usize = 4;

/// Number of spacetime dimensions. Direction 0 is time.
pub const N_DIM: usize = 4;

/// Complex components per fermion site: spin × color.
pub const SPINOR_COMPONENTS: usize = N_SPINS * N_COLORS;

/// Coordination constant in the Wilson diagonal term `1 + D/χ + m`.
///
/// Counts the spatial directions; the temporal direction supplies the
/// leading `1`.
pub const WILSON_COORDINATION: f64 = 3.0;

/// Weight of each hopping leg in the Wilson stencil.
pub const HOPPING_WEIGHT: f64 = 0.5;

/// Division guard for norms and reunitarization.
pub const LATTICE_DIVISION_GUARD: f64 = 1e-30;

/// Hot-start perturbation scale for SU(3) link matrices.
pub const HOT_START_EPSILON: f64 = 1.5;
