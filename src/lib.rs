// SPDX-License-Identifier: AGPL-3.0-only

//! Blocked even/odd lattice storage and matrix-free Dirac operators.
//!
//! Fields live on a 4-D periodic lattice (time first). Per-site data is held
//! in a [`lattice::site_store::SiteStore`] whose physical order groups
//! neighbouring sites into cache blocks and splits the lattice into even and
//! odd halves. Dirac operators read that storage through precomputed
//! neighbour tables and present themselves to an external solver through
//! [`lattice::operator::LinearOperator`].
//!
//! ## Modules
//!   - `lattice`: indexing, layout, storage, gauge field, operators
//!   - `config`: JSON run configuration
//!   - `error`: `LatticeError`
//!   - `tolerances`: named numerical thresholds
//!   - `validation`: pass/fail harness
//!
//! ## Validation binaries
//!   - `validate_wilson_dirac`: layout, arithmetic and operator properties

pub mod config;
pub mod error;
pub mod lattice;
pub mod tolerances;
pub mod validation;

pub use error::LatticeError;
