// SPDX-License-Identifier: AGPL-3.0-only

//! Typed errors for lattice layout, field storage, and operator application.
//!
//! Construction-time problems (bad grid or block shapes, malformed boundary
//! conditions) and call-time contract violations (index out of range,
//! mismatched stores, wrong vector length) are distinct variants so callers
//! can pattern-match instead of parsing strings.

use std::fmt;

/// Errors arising from lattice construction, storage access, or operators.
#[derive(Debug, Clone, PartialEq)]
pub enum LatticeError {
    /// Grid, block, or operator parameters are inconsistent.
    ///
    /// `dimension` names the offending axis when the problem is local to one.
    InvalidConfiguration {
        /// Offending dimension, if the failure is tied to a single axis.
        dimension: Option<usize>,
        /// What was wrong.
        reason: String,
    },

    /// A site index or coordinate fell outside the lattice.
    OutOfRange {
        /// Requested index.
        index: usize,
        /// Exclusive upper bound.
        bound: usize,
    },

    /// Two stores (or a store and a table) do not share a layout.
    ShapeMismatch {
        /// Shape of the left-hand operand.
        expected: Vec<usize>,
        /// Shape of the right-hand operand.
        found: Vec<usize>,
    },

    /// A vector handed to an operator has the wrong length.
    SizeMismatch {
        /// Operator size.
        expected: usize,
        /// Length supplied.
        found: usize,
    },

    /// Scalar assignment to a store with no sites.
    EmptyStore,

    /// Configuration file could not be read or parsed.
    ConfigLoad(String),
}

impl LatticeError {
    /// Shorthand for an [`LatticeError::InvalidConfiguration`] tied to one axis.
    pub fn invalid_dim(dimension: usize, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            dimension: Some(dimension),
            reason: reason.into(),
        }
    }

    /// Shorthand for an [`LatticeError::InvalidConfiguration`] not tied to an axis.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            dimension: None,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for LatticeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfiguration {
                dimension: Some(d),
                reason,
            } => write!(f, "Invalid lattice configuration along dimension {d}: {reason}"),
            Self::InvalidConfiguration {
                dimension: None,
                reason,
            } => write!(f, "Invalid lattice configuration: {reason}"),
            Self::OutOfRange { index, bound } => {
                write!(f, "Index {index} out of range (bound {bound})")
            }
            Self::ShapeMismatch { expected, found } => {
                write!(f, "Shape mismatch: expected {expected:?}, found {found:?}")
            }
            Self::SizeMismatch { expected, found } => {
                write!(f, "Operator size mismatch: expected {expected}, found {found}")
            }
            Self::EmptyStore => write!(f, "Assigning a value to an empty site store"),
            Self::ConfigLoad(msg) => write!(f, "Config loading failed: {msg}"),
        }
    }
}

impl std::error::Error for LatticeError {}
