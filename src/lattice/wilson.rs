// SPDX-License-Identifier: AGPL-3.0-only

//! Wilson Dirac operator.
//!
//! Acts on a flat spinor ψ (12 components per site) over an SU(3) gauge
//! field:
//!
//!   (D ψ)(x) = (1 + 3/χ + m) ψ(x)
//!            - ½ Σ\_μ (1/u\_μ) [ φ\_μ⁻(x) (1 - γ\_μ) U\_μ†(x-μ) ψ(x-μ)
//!                             + φ\_μ⁺(x) (1 + γ\_μ) U\_μ(x) ψ(x+μ) ]
//!
//! with tadpole factors u\_0 = ut, u\_k = us, and φ± the boundary phases
//! picked up when a leg wraps around the lattice.
//!
//! Per output site the legs are accumulated in direction order 0..3,
//! backward before forward, so results are bitwise reproducible regardless
//! of how sites are distributed over threads.
//!
//! For real boundary phases D is γ5-Hermitian: `γ5 D γ5 = D†`, so
//! `H = γ5 D` is Hermitian and [`LinearOperator::apply_hermitian`] applies it.
//!
//! # References
//!
//! - Wilson, in "New Phenomena in Subnuclear Physics" (1977)
//! - Gattringer & Lang, "QCD on the Lattice" (2010), Ch. 5.2

use std::sync::Arc;

use log::debug;
use rayon::prelude::*;

use super::complex_f64::Complex64;
use super::constants::{
    HOPPING_WEIGHT, N_COLORS, N_DIM, N_SPINS, SPINOR_COMPONENTS, WILSON_COORDINATION,
};
use super::gamma::{gamma, multiply_gamma5, SpinMatrix};
use super::gauge::GaugeField;
use super::neighbours::NeighbourTable;
use super::operator::{mismatch_fallback, LinearOperator};
use super::su3::ColorVector;
use crate::error::LatticeError;

/// Spin-color block of one site after parallel transport.
type SiteSpinor = [ColorVector; N_SPINS];

/// Unpreconditioned Wilson Dirac operator on a borrowed gauge field.
#[derive(Clone, Debug)]
pub struct WilsonDirac<'a> {
    mass: f64,
    diagonal: f64,
    gauge: &'a GaugeField,
    neighbours: Arc<NeighbourTable>,
    /// `1 - γ_μ` for μ = 0..3, then `1 + γ_μ`.
    spin_structures: [SpinMatrix; 2 * N_DIM],
    /// `½ / u_μ`
    hop_weights: [f64; N_DIM],
    size: usize,
}

impl<'a> WilsonDirac<'a> {
    /// Operator with nearest-neighbour legs and the given boundary phases.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` for a non-finite mass or a boundary vector
    /// without one phase per dimension.
    pub fn new(
        mass: f64,
        boundary: &[Complex64],
        gauge: &'a GaugeField,
    ) -> Result<Self, LatticeError> {
        let table = NeighbourTable::new(gauge.shape(), boundary, 1)?;
        Self::with_neighbours(mass, Arc::new(table), gauge)
    }

    /// Operator reusing a prebuilt nearest-neighbour table.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if the table was built for another lattice,
    /// `InvalidConfiguration` for a non-finite mass or a table with hop ≠ 1.
    pub fn with_neighbours(
        mass: f64,
        neighbours: Arc<NeighbourTable>,
        gauge: &'a GaugeField,
    ) -> Result<Self, LatticeError> {
        if !mass.is_finite() {
            return Err(LatticeError::invalid(format!("mass must be finite, got {mass}")));
        }
        neighbours.check_store(gauge.links())?;
        if neighbours.hop() != 1 {
            return Err(LatticeError::invalid(format!(
                "Wilson stencil needs nearest neighbours, table has hop {}",
                neighbours.hop()
            )));
        }

        let spin_structures = std::array::from_fn(|dir| {
            let g = gamma(dir % N_DIM);
            if dir < N_DIM {
                SpinMatrix::IDENTITY - g
            } else {
                SpinMatrix::IDENTITY + g
            }
        });
        let hop_weights = std::array::from_fn(|mu| HOPPING_WEIGHT / gauge.tadpole(mu));
        let diagonal = 1.0 + WILSON_COORDINATION / gauge.chi() + mass;
        let size = SPINOR_COMPONENTS * gauge.volume();

        debug!(
            "Wilson operator: mass {mass}, diagonal {diagonal}, size {size}, boundary {:?}",
            neighbours.boundary()
        );

        Ok(Self {
            mass,
            diagonal,
            gauge,
            neighbours,
            spin_structures,
            hop_weights,
            size,
        })
    }

    /// Bare mass.
    #[must_use]
    pub const fn mass(&self) -> f64 {
        self.mass
    }

    /// Coefficient of the on-site term.
    #[must_use]
    pub const fn diagonal(&self) -> f64 {
        self.diagonal
    }

    /// Gauge field the operator reads.
    #[must_use]
    pub const fn gauge(&self) -> &'a GaugeField {
        self.gauge
    }

    /// Shared neighbour table.
    #[must_use]
    pub const fn neighbours(&self) -> &Arc<NeighbourTable> {
        &self.neighbours
    }

    /// Spin structure of leg `dir` (`0..4` backward, `4..8` forward).
    pub fn spin_structure(&self, dir: usize) -> SpinMatrix {
        self.spin_structures[dir]
    }

    /// `γ5 D γ5 ψ`, which is `D† ψ` for real boundary phases.
    #[must_use]
    pub fn apply_dagger(&self, psi: &[Complex64]) -> Vec<Complex64> {
        multiply_gamma5(&self.apply(&multiply_gamma5(psi)))
    }

    fn apply_site(&self, site: usize, psi: &[Complex64], out: &mut [Complex64]) {
        let base = SPINOR_COMPONENTS * site;
        for (o, p) in out.iter_mut().zip(&psi[base..base + SPINOR_COMPONENTS]) {
            *o = p.scale(self.diagonal);
        }

        for mu in 0..N_DIM {
            let behind = self.neighbours.behind(site, mu);
            let link = self.gauge.link(behind.site, mu);
            let chi = transport(psi, behind.site, |v| link.adjoint_mul_vec(v));
            let weight = behind.phase.scale(self.hop_weights[mu]);
            subtract_leg(out, &self.spin_structures[mu], weight, &chi);

            let ahead = self.neighbours.ahead(site, mu);
            let link = self.gauge.link(site, mu);
            let chi = transport(psi, ahead.site, |v| link.mul_vec(v));
            let weight = ahead.phase.scale(self.hop_weights[mu]);
            subtract_leg(out, &self.spin_structures[N_DIM + mu], weight, &chi);
        }
    }
}

impl LinearOperator for WilsonDirac<'_> {
    fn size(&self) -> usize {
        self.size
    }

    fn apply(&self, psi: &[Complex64]) -> Vec<Complex64> {
        if psi.len() != self.size {
            return mismatch_fallback("WilsonDirac::apply", self.size, psi.len());
        }
        let mut eta = vec![Complex64::ZERO; self.size];
        eta.par_chunks_mut(SPINOR_COMPONENTS)
            .enumerate()
            .for_each(|(site, out)| self.apply_site(site, psi, out));
        eta
    }

    fn undo_hermiticity(&self, psi: &[Complex64]) -> Vec<Complex64> {
        multiply_gamma5(psi)
    }
}

/// Color-rotate each spin component of `psi` at `site`.
#[inline]
fn transport(
    psi: &[Complex64],
    site: usize,
    rotate: impl Fn(&[Complex64]) -> ColorVector,
) -> SiteSpinor {
    let base = SPINOR_COMPONENTS * site;
    std::array::from_fn(|beta| {
        let start = base + N_COLORS * beta;
        rotate(&psi[start..start + N_COLORS])
    })
}

/// out\[α, a\] -= weight × Σ\_β S\[α\]\[β\] χ\[β\]\[a\]
#[inline]
fn subtract_leg(out: &mut [Complex64], spin: &SpinMatrix, weight: Complex64, chi: &SiteSpinor) {
    for alpha in 0..N_SPINS {
        for beta in 0..N_SPINS {
            let s = spin.m[alpha][beta];
            if s.is_zero() {
                continue;
            }
            let w = weight * s;
            for a in 0..N_COLORS {
                out[N_COLORS * alpha + a] -= w * chi[beta][a];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::indexer::Shape;
    use crate::lattice::layout::BlockLayout;
    use crate::lattice::neighbours::{antiperiodic_time, periodic_boundary};
    use crate::lattice::spinor::{self, spinor_index};
    use crate::tolerances::{FREE_FIELD_ABS, HERMITICITY_ABS};

    fn cold(extents: &[usize]) -> GaugeField {
        let shape = Shape::new(extents).unwrap();
        GaugeField::cold_start(Arc::new(BlockLayout::with_default_blocks(shape).unwrap())).unwrap()
    }

    fn hot(extents: &[usize], seed: u64) -> GaugeField {
        let shape = Shape::new(extents).unwrap();
        let layout = Arc::new(BlockLayout::with_default_blocks(shape).unwrap());
        GaugeField::hot_start(layout, seed, 0.8).unwrap()
    }

    fn constant_field(volume: usize) -> Vec<Complex64> {
        let site = spinor::random(SPINOR_COMPONENTS, 11);
        (0..volume).flat_map(|_| site.iter().copied()).collect()
    }

    #[test]
    fn size_is_twelve_per_site() {
        let g = cold(&[4, 4, 4, 4]);
        let d = WilsonDirac::new(0.1, &periodic_boundary(4), &g).unwrap();
        assert_eq!(d.size(), 3072);
    }

    #[test]
    fn constant_field_sees_only_the_mass() {
        let g = cold(&[4, 4, 4, 4]);
        let mass = 0.25;
        let d = WilsonDirac::new(mass, &periodic_boundary(4), &g).unwrap();
        let psi = constant_field(g.volume());
        let eta = d.apply(&psi);
        let expected = spinor::scaled(Complex64::real(mass), &psi);
        assert!(spinor::max_abs_diff(&eta, &expected) < FREE_FIELD_ABS);
    }

    #[test]
    fn tadpole_and_anisotropy_rescale_terms() {
        let g = cold(&[4, 4, 4, 4])
            .with_tadpole(0.8, 0.8)
            .unwrap()
            .with_anisotropy(2.0)
            .unwrap();
        let mass = 0.1;
        let d = WilsonDirac::new(mass, &periodic_boundary(4), &g).unwrap();
        assert!((d.diagonal() - (1.0 + 1.5 + mass)).abs() < FREE_FIELD_ABS);
        let psi = constant_field(g.volume());
        let eta = d.apply(&psi);
        let factor = d.diagonal() - 4.0 / 0.8;
        let expected = spinor::scaled(Complex64::real(factor), &psi);
        assert!(spinor::max_abs_diff(&eta, &expected) < FREE_FIELD_ABS);
    }

    #[test]
    fn point_source_diagonal_and_stencil() {
        let g = cold(&[4, 4, 4, 4]);
        let shape = g.shape().clone();
        let d = WilsonDirac::new(0.1, &periodic_boundary(4), &g).unwrap();
        let psi = spinor::point_source(&shape, &[0, 0, 0, 0], 0, 0).unwrap();
        let eta = d.apply(&psi);
        assert!((eta[0] - Complex64::real(4.1)).abs() < FREE_FIELD_ABS);
        assert_eq!(spinor::nonzero_sites(&eta).len(), 9);

        // (x-ê_0) reaches the source through its forward leg: -½ (1 + γ_t)[α][0]
        let below = shape.site_index(&[-1, 0, 0, 0]);
        assert!((eta[spinor_index(below, 0, 0)] - Complex64::real(-0.5)).abs() < FREE_FIELD_ABS);
        assert!((eta[spinor_index(below, 2, 0)] - Complex64::real(-0.5)).abs() < FREE_FIELD_ABS);
        assert!(eta[spinor_index(below, 1, 0)].is_zero());
        assert!(eta[spinor_index(below, 0, 1)].is_zero());
    }

    #[test]
    fn antiperiodic_time_flips_wrapped_leg() {
        let g = cold(&[4, 4, 4, 4]);
        let shape = g.shape().clone();
        let psi = spinor::point_source(&shape, &[0, 0, 0, 0], 1, 2).unwrap();
        let periodic = WilsonDirac::new(0.0, &periodic_boundary(4), &g)
            .unwrap()
            .apply(&psi);
        let anti = WilsonDirac::new(0.0, &antiperiodic_time(4), &g)
            .unwrap()
            .apply(&psi);

        let wrapped = shape.site_index(&[3, 0, 0, 0]);
        let interior = shape.site_index(&[1, 0, 0, 0]);
        for k in 0..SPINOR_COMPONENTS {
            let w = SPINOR_COMPONENTS * wrapped + k;
            assert_eq!(anti[w], -periodic[w]);
            let i = SPINOR_COMPONENTS * interior + k;
            assert_eq!(anti[i], periodic[i]);
        }
        assert!(periodic[SPINOR_COMPONENTS * wrapped + 3 + 2].abs() > 0.1);
    }

    #[test]
    fn gamma5_hermiticity_on_hot_field() {
        let g = hot(&[4, 4, 4, 4], 3);
        let d = WilsonDirac::new(-0.3, &antiperiodic_time(4), &g).unwrap();
        let x = spinor::random(d.size(), 1);
        let y = spinor::random(d.size(), 2);
        let lhs = spinor::dot(&x, &d.apply_hermitian(&y));
        let rhs = spinor::dot(&d.apply_hermitian(&x), &y);
        assert!((lhs - rhs).abs() < HERMITICITY_ABS, "{lhs} vs {rhs}");

        let dag = spinor::dot(&x, &d.apply(&y));
        let dag_rhs = spinor::dot(&d.apply_dagger(&x), &y);
        assert!((dag - dag_rhs).abs() < HERMITICITY_ABS);
    }

    #[test]
    fn size_mismatch_falls_back_to_zeros() {
        let g = cold(&[4, 4, 4, 4]);
        let d = WilsonDirac::new(0.1, &periodic_boundary(4), &g).unwrap();
        let short = vec![Complex64::ONE; 12];
        let eta = d.apply(&short);
        assert_eq!(eta.len(), d.size());
        assert!(eta.iter().all(|z| z.is_zero()));
        assert_eq!(
            d.try_apply(&short),
            Err(LatticeError::SizeMismatch {
                expected: 3072,
                found: 12
            })
        );
    }

    #[test]
    fn rejects_foreign_neighbour_table() {
        let g = cold(&[4, 4, 4, 4]);
        let other = Shape::new(&[4, 4, 4, 2]).unwrap();
        let table = Arc::new(NeighbourTable::new(&other, &periodic_boundary(4), 1).unwrap());
        assert!(matches!(
            WilsonDirac::with_neighbours(0.1, table, &g),
            Err(LatticeError::ShapeMismatch { .. })
        ));
        let hop2 = Arc::new(NeighbourTable::new(g.shape(), &periodic_boundary(4), 2).unwrap());
        assert!(WilsonDirac::with_neighbours(0.1, hop2, &g).is_err());
        assert!(WilsonDirac::new(f64::NAN, &periodic_boundary(4), &g).is_err());
    }
}
