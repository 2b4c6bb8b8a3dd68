// SPDX-License-Identifier: AGPL-3.0-only

//! Lattice storage and Dirac stencils for SU(3) gauge fields.
//!
//! Build order, leaf first:
//!
//! | Module | Purpose |
//! |--------|---------|
//! | `complex_f64` | Complex f64 arithmetic |
//! | `rng` | Seeded LCG for hot starts and random spinors |
//! | `su3` | SU(3) link matrices, color-vector products |
//! | `gamma` | Euclidean gamma matrices (chiral basis), γ5, chiral projectors |
//! | `indexer` | Coordinate ↔ site index on a periodic grid |
//! | `layout` | Blocked even/odd storage layout |
//! | `site_store` | Per-site storage, parity and roll views, elementwise arithmetic |
//! | `neighbours` | Neighbour indices and boundary phases |
//! | `gauge` | Gauge field: four links per site, tadpole factors |
//! | `spinor` | Flat 12-component fermion vectors |
//! | `operator` | `LinearOperator`, the interface an iterative solver consumes |
//! | `wilson` | Wilson Dirac operator |
//! | `domain_wall` | Shamir domain-wall operator over any 4-D kernel |
//!
//! # References
//!
//! - Gattringer & Lang, "Quantum Chromodynamics on the Lattice" (2010)
//! - Shamir, Nucl. Phys. B 406, 90 (1993)

/// Complex f64 arithmetic (re, im).
pub mod complex_f64;
/// Color/spin counts, stencil coefficients and numerical guards.
pub mod constants;
/// Domain-wall fermion operator.
pub mod domain_wall;
/// Dirac gamma matrices and chiral projectors.
pub mod gamma;
/// SU(3) gauge field on a blocked lattice.
pub mod gauge;
/// Coordinate ↔ lexicographic index mapping.
pub mod indexer;
/// Block / checkerboard storage layout.
pub mod layout;
/// Neighbour tables with boundary phases.
pub mod neighbours;
/// Solver-facing operator trait.
pub mod operator;
/// Seeded LCG for reproducible random fields.
pub mod rng;
/// Blocked per-site storage.
pub mod site_store;
/// Flat fermion vector helpers.
pub mod spinor;
/// SU(3) 3×3 complex matrix operations.
pub mod su3;
/// Wilson Dirac operator.
pub mod wilson;
