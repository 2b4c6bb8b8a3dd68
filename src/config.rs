// SPDX-License-Identifier: AGPL-3.0-only

//! Run configuration: lattice geometry, boundary phases, operator parameters.
//!
//! All structs deserialize from JSON with every field optional; missing
//! fields take the defaults below. Loading never builds anything: call
//! [`LatticeConfig::validate`] (or construct from it) to run the same eager
//! checks the constructors perform.
//!
//! ```json
//! {
//!   "lattice":  { "shape": [8, 4, 4, 4], "block_shape": [2, 2, 2, 2],
//!                 "boundary": [{"re": -1.0, "im": 0.0}, {"re": 1.0, "im": 0.0},
//!                              {"re": 1.0, "im": 0.0}, {"re": 1.0, "im": 0.0}] },
//!   "operator": { "mass": 0.1, "domain_wall": { "m5": 1.8, "ls": 8 } },
//!   "gauge":    { "seed": 42, "epsilon": 1.5 }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LatticeError;
use crate::lattice::complex_f64::Complex64;
use crate::lattice::constants::{HOT_START_EPSILON, N_DIM};
use crate::lattice::indexer::Shape;
use crate::lattice::layout::BlockLayout;
use crate::lattice::neighbours::antiperiodic_time;

/// Lattice geometry and stencil normalizations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeConfig {
    /// Extents, time first.
    pub shape: Vec<usize>,
    /// Cache-block extents; `None` picks [`BlockLayout::default_block_shape`].
    pub block_shape: Option<Vec<usize>>,
    /// One boundary phase per dimension.
    pub boundary: Vec<Complex64>,
    /// Temporal tadpole factor.
    pub ut: f64,
    /// Spatial tadpole factor.
    pub us: f64,
    /// Bare anisotropy.
    pub chi: f64,
}

impl Default for LatticeConfig {
    fn default() -> Self {
        Self {
            shape: vec![8, 4, 4, 4],
            block_shape: None,
            boundary: antiperiodic_time(N_DIM),
            ut: 1.0,
            us: 1.0,
            chi: 1.0,
        }
    }
}

impl LatticeConfig {
    /// Parse from a JSON string.
    ///
    /// # Errors
    ///
    /// `ConfigLoad` on malformed JSON.
    pub fn from_json_str(json: &str) -> Result<Self, LatticeError> {
        serde_json::from_str(json).map_err(|e| LatticeError::ConfigLoad(e.to_string()))
    }

    /// Read a JSON file.
    ///
    /// # Errors
    ///
    /// `ConfigLoad` if the file cannot be opened or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self, LatticeError> {
        read_json(path)
    }

    /// Grid shape.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for an empty shape or a zero extent.
    pub fn grid(&self) -> Result<Shape, LatticeError> {
        Shape::new(&self.shape)
    }

    /// Block layout for this geometry.
    ///
    /// # Errors
    ///
    /// Any [`BlockLayout::new`] failure.
    pub fn layout(&self) -> Result<BlockLayout, LatticeError> {
        let shape = self.grid()?;
        match &self.block_shape {
            Some(blocks) => BlockLayout::new(shape, blocks),
            None => BlockLayout::with_default_blocks(shape),
        }
    }

    /// Check every field without keeping the results.
    ///
    /// # Errors
    ///
    /// The first failing check.
    pub fn validate(&self) -> Result<(), LatticeError> {
        if self.shape.len() != N_DIM {
            return Err(LatticeError::invalid(format!(
                "gauge lattices are {N_DIM}-dimensional, shape has {} entries",
                self.shape.len()
            )));
        }
        self.layout()?;
        if self.boundary.len() != self.shape.len() {
            return Err(LatticeError::invalid(format!(
                "{} boundary phases for {} dimensions",
                self.boundary.len(),
                self.shape.len()
            )));
        }
        for (name, v) in [("ut", self.ut), ("us", self.us), ("chi", self.chi)] {
            if !(v.is_finite() && v > 0.0) {
                return Err(LatticeError::invalid(format!("{name} must be positive, got {v}")));
            }
        }
        Ok(())
    }
}

/// Domain-wall parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainWallConfig {
    /// Wall height M5.
    pub m5: f64,
    /// Fifth-dimension extent.
    pub ls: usize,
}

impl Default for DomainWallConfig {
    fn default() -> Self {
        Self { m5: 1.8, ls: 8 }
    }
}

/// Operator parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorConfig {
    /// Bare quark mass.
    pub mass: f64,
    /// Present when the domain-wall operator should be checked too.
    pub domain_wall: Option<DomainWallConfig>,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            mass: 0.1,
            domain_wall: Some(DomainWallConfig::default()),
        }
    }
}

/// Everything the validation binary needs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Geometry.
    pub lattice: LatticeConfig,
    /// Operator parameters.
    pub operator: OperatorConfig,
    /// Hot-start configuration.
    pub gauge: GaugeStartConfig,
}

/// Random gauge field parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaugeStartConfig {
    /// LCG seed.
    pub seed: u64,
    /// Perturbation scale of the near-identity links.
    pub epsilon: f64,
}

impl Default for GaugeStartConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            epsilon: HOT_START_EPSILON,
        }
    }
}

impl RunConfig {
    /// Parse from a JSON string.
    ///
    /// # Errors
    ///
    /// `ConfigLoad` on malformed JSON.
    pub fn from_json_str(json: &str) -> Result<Self, LatticeError> {
        serde_json::from_str(json).map_err(|e| LatticeError::ConfigLoad(e.to_string()))
    }

    /// Read a JSON file.
    ///
    /// # Errors
    ///
    /// `ConfigLoad` if the file cannot be opened or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self, LatticeError> {
        read_json(path)
    }
}

/// Streams the file through `serde_json::from_reader`.
fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, LatticeError> {
    let file = std::fs::File::open(path)
        .map_err(|e| LatticeError::ConfigLoad(format!("{}: {e}", path.display())))?;
    serde_json::from_reader(std::io::BufReader::new(file))
        .map_err(|e| LatticeError::ConfigLoad(format!("{}: {e}", path.display())))
}
