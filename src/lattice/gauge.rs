// SPDX-License-Identifier: AGPL-3.0-only

//! SU(3) gauge field on a blocked 4-D lattice.
//!
//! Each site owns four links `U_μ(x)`, μ ∈ {0, 1, 2, 3}, with μ = 0 the time
//! direction. Links live in a [`SiteStore`] so they share the blocked
//! even/odd layout of the fermion-side data.
//!
//! Besides the links the field carries the normalization constants the
//! stencil divides by: tadpole factors `ut` (time) and `us` (space), and the
//! bare anisotropy `chi`.

use std::sync::Arc;

use log::debug;

use super::constants::N_DIM;
use super::indexer::Shape;
use super::layout::BlockLayout;
use super::site_store::SiteStore;
use super::rng::Lcg;
use super::su3::Su3Matrix;
use crate::config::LatticeConfig;
use crate::error::LatticeError;

/// Four SU(3) links per site plus stencil normalizations.
#[derive(Clone, Debug)]
pub struct GaugeField {
    layout: Arc<BlockLayout>,
    links: SiteStore<[Su3Matrix; N_DIM]>,
    ut: f64,
    us: f64,
    chi: f64,
}

impl GaugeField {
    /// Ordered configuration: every link is the identity.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the layout is not 4-dimensional.
    pub fn cold_start(layout: Arc<BlockLayout>) -> Result<Self, LatticeError> {
        check_rank(layout.shape())?;
        Ok(Self::with_identity_links(layout))
    }

    /// Disordered configuration: near-identity random links.
    ///
    /// Links are drawn in site order, direction-minor, from one LCG stream,
    /// so a seed reproduces the same field on any block shape.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the layout is not 4-dimensional.
    pub fn hot_start(layout: Arc<BlockLayout>, seed: u64, epsilon: f64) -> Result<Self, LatticeError> {
        check_rank(layout.shape())?;
        let mut rng = Lcg::new(seed);
        let mut field = Self::with_identity_links(layout);
        for site in 0..field.volume() {
            for mu in 0..N_DIM {
                field.links[site][mu] = Su3Matrix::random_near_identity(&mut rng, epsilon);
            }
        }
        debug!(
            "hot start: volume {}, seed {seed}, epsilon {epsilon}, <U> = {:.6}",
            field.volume(),
            field.average_link()
        );
        Ok(field)
    }

    /// Cold-start field with the geometry and normalizations of a config.
    ///
    /// # Errors
    ///
    /// Any validation failure of the config.
    pub fn from_config(config: &LatticeConfig) -> Result<Self, LatticeError> {
        let layout = Arc::new(config.layout()?);
        Self::cold_start(layout)?
            .with_tadpole(config.ut, config.us)?
            .with_anisotropy(config.chi)
    }

    fn with_identity_links(layout: Arc<BlockLayout>) -> Self {
        Self {
            links: SiteStore::new(Arc::clone(&layout)),
            layout,
            ut: 1.0,
            us: 1.0,
            chi: 1.0,
        }
    }

    /// Replace the tadpole factors.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` unless both are finite and positive.
    pub fn with_tadpole(mut self, ut: f64, us: f64) -> Result<Self, LatticeError> {
        self.ut = positive("ut", ut)?;
        self.us = positive("us", us)?;
        Ok(self)
    }

    /// Replace the bare anisotropy.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` unless `chi` is finite and positive.
    pub fn with_anisotropy(mut self, chi: f64) -> Result<Self, LatticeError> {
        self.chi = positive("chi", chi)?;
        Ok(self)
    }

    /// Link `U_μ(x)`.
    ///
    /// # Panics
    ///
    /// If `site >= volume` or `mu >= 4`.
    #[inline]
    pub fn link(&self, site: usize, mu: usize) -> &Su3Matrix {
        &self.links[site][mu]
    }

    /// Overwrite link `U_μ(x)`.
    ///
    /// # Errors
    ///
    /// `OutOfRange` for a bad site or direction.
    pub fn set_link(&mut self, site: usize, mu: usize, u: Su3Matrix) -> Result<(), LatticeError> {
        if mu >= N_DIM {
            return Err(LatticeError::OutOfRange {
                index: mu,
                bound: N_DIM,
            });
        }
        self.links.try_get_mut(site)?[mu] = u;
        Ok(())
    }

    /// Link storage.
    #[must_use]
    pub const fn links(&self) -> &SiteStore<[Su3Matrix; N_DIM]> {
        &self.links
    }

    /// Lattice shape.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        self.layout.shape()
    }

    /// Shared storage layout.
    #[must_use]
    pub const fn layout(&self) -> &Arc<BlockLayout> {
        &self.layout
    }

    /// Number of sites.
    #[must_use]
    pub fn volume(&self) -> usize {
        self.links.volume()
    }

    /// Temporal tadpole factor.
    #[must_use]
    pub const fn ut(&self) -> f64 {
        self.ut
    }

    /// Spatial tadpole factor.
    #[must_use]
    pub const fn us(&self) -> f64 {
        self.us
    }

    /// Bare anisotropy.
    #[must_use]
    pub const fn chi(&self) -> f64 {
        self.chi
    }

    /// Tadpole factor dividing hops along `mu`.
    #[inline]
    #[must_use]
    pub const fn tadpole(&self, mu: usize) -> f64 {
        if mu == 0 {
            self.ut
        } else {
            self.us
        }
    }

    /// Mean link: ⟨Re Tr U⟩ / 3 over all sites and directions.
    #[must_use]
    pub fn average_link(&self) -> f64 {
        let total: f64 = self
            .links
            .as_storage()
            .iter()
            .flat_map(|site| site.iter())
            .map(|u| u.re_trace())
            .sum();
        total / (3.0 * N_DIM as f64 * self.volume() as f64)
    }

    /// Largest departure of any link from SU(3).
    #[must_use]
    pub fn max_su3_deviation(&self) -> f64 {
        self.links
            .as_storage()
            .iter()
            .flat_map(|site| site.iter())
            .map(|u| u.su3_deviation())
            .fold(0.0, f64::max)
    }
}

fn check_rank(shape: &Shape) -> Result<(), LatticeError> {
    if shape.ndim() == N_DIM {
        Ok(())
    } else {
        Err(LatticeError::invalid(format!(
            "gauge field needs a {N_DIM}-dimensional lattice, got {}",
            shape.ndim()
        )))
    }
}

fn positive(name: &str, value: f64) -> Result<f64, LatticeError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(LatticeError::invalid(format!("{name} must be positive, got {value}")))
    }
}
