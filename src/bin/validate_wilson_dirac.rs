// SPDX-License-Identifier: AGPL-3.0-only

//! Blocked storage + Wilson Dirac operator validation.
//!
//! Checks the addressing layer and the stencil operators against properties
//! that hold exactly (index bijections, parity placement, sign flips) or to
//! rounding (linearity, γ5-Hermiticity).
//!
//! # Validation targets
//!
//! | Property | Expected | Tolerance |
//! |----------|----------|-----------|
//! | index ↔ coords round trip | identity | exact |
//! | even sites in lower block half | all sites | exact |
//! | (A + B) - B = A, integer payload | identity | exact |
//! | free point source stencil | 9 sites | exact |
//! | antiperiodic wrap | sign flip | exact |
//! | D(a x + b y) = a Dx + b Dy | | `OPERATOR_LINEARITY_ABS` |
//! | γ5 γ5 x = x | | exact |
//! | ⟨x, γ5 D y⟩ = ⟨γ5 D x, y⟩ | | `HERMITICITY_ABS` |
//! | domain-wall γ5 R5 D Hermitian | | `HERMITICITY_ABS` |
//!
//! Usage: `validate_wilson_dirac [run.json]`. Without an argument the
//! default [`RunConfig`] (8×4³, antiperiodic time) is used.

use std::path::Path;
use std::process;
use std::sync::Arc;

use lattice_stencil::config::RunConfig;
use lattice_stencil::lattice::complex_f64::Complex64;
use lattice_stencil::lattice::domain_wall::DomainWall;
use lattice_stencil::lattice::gauge::GaugeField;
use lattice_stencil::lattice::indexer::{Parity, Shape};
use lattice_stencil::lattice::layout::BlockLayout;
use lattice_stencil::lattice::neighbours::{antiperiodic_time, periodic_boundary};
use lattice_stencil::lattice::operator::LinearOperator;
use lattice_stencil::lattice::site_store::SiteStore;
use lattice_stencil::lattice::spinor;
use lattice_stencil::lattice::wilson::WilsonDirac;
use lattice_stencil::tolerances;
use lattice_stencil::validation::ValidationHarness;
use lattice_stencil::LatticeError;

fn main() {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║  Blocked lattice storage + Wilson Dirac validation          ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let config = match std::env::args().nth(1) {
        Some(path) => RunConfig::from_json_file(Path::new(&path)),
        None => Ok(RunConfig::default()),
    };
    let config = match config.and_then(|c| c.lattice.validate().map(|()| c)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("configuration error: {e}");
            process::exit(1);
        }
    };

    let mut harness = ValidationHarness::new("wilson_dirac");
    if let Err(e) = run(&config, &mut harness) {
        eprintln!("setup failed: {e}");
        process::exit(1);
    }
    harness.finish();
}

fn run(config: &RunConfig, harness: &mut ValidationHarness) -> Result<(), LatticeError> {
    check_layout(harness)?;
    check_arithmetic(harness)?;
    check_free_stencil(harness)?;
    check_operator(config, harness)?;
    Ok(())
}

fn check_layout(harness: &mut ValidationHarness) -> Result<(), LatticeError> {
    println!("═══ Layout (4⁴, blocks 4×4×2×2) ═══");
    let shape = Shape::new(&[4, 4, 4, 4])?;
    let layout = BlockLayout::new(shape.clone(), &[4, 4, 2, 2])?;
    println!(
        "  blocks: {} × {} sites",
        layout.num_blocks(),
        layout.block_volume()
    );

    let round_trip = (0..shape.volume()).all(|i| shape.site_index(&shape.site_coords(i)) == i);
    harness.check_bool("index ↔ coords round trip", round_trip);

    let checkerboard = (0..shape.volume()).all(|i| {
        let even = shape.parity(i) == Parity::Even;
        (layout.entry(i).block < layout.num_blocks() / 2) == even
    });
    harness.check_bool("even sites ⇔ lower half of blocks", checkerboard);

    let origin = layout.entry(shape.site_index(&[0, 0, 0, 0]));
    let odd = layout.entry(shape.site_index(&[1, 0, 0, 0]));
    println!("  (0,0,0,0) → {origin:?}, (1,0,0,0) → {odd:?}");
    harness.check_bool("origin in block 0", origin.block == 0);
    harness.check_bool("(1,0,0,0) in odd half", odd.block >= 2);
    println!();
    Ok(())
}

fn check_arithmetic(harness: &mut ValidationHarness) -> Result<(), LatticeError> {
    println!("═══ Elementwise arithmetic ═══");
    let layout = Arc::new(BlockLayout::with_default_blocks(Shape::new(&[4, 4, 4, 4])?)?);

    let a = SiteStore::from_fn(Arc::clone(&layout), |s| s as i64 * 7 - 300);
    let b = SiteStore::from_fn(Arc::clone(&layout), |s| (s as i64 * 13) % 29);
    let restored = (&a + &b).try_sub(&b)?;
    harness.check_bool("(A + B) - B = A (integers)", restored == a);

    let za = SiteStore::from_fn(Arc::clone(&layout), |s| Complex64::new(s as f64 * 0.37, -1.25));
    let zb = SiteStore::from_fn(layout, |s| Complex64::from_polar(s as f64 * 0.1));
    let restored = (&za + &zb).try_sub(&zb)?;
    let dev = za
        .iter_sites()
        .map(|(s, z)| (*z - restored[s]).abs())
        .fold(0.0, f64::max);
    harness.check_upper("(A + B) - B = A (complex)", dev, tolerances::STORE_ROUND_TRIP_ABS);
    println!();
    Ok(())
}

fn check_free_stencil(harness: &mut ValidationHarness) -> Result<(), LatticeError> {
    println!("═══ Free-field stencil (4⁴, unit links) ═══");
    let shape = Shape::new(&[4, 4, 4, 4])?;
    let gauge = GaugeField::cold_start(Arc::new(BlockLayout::with_default_blocks(shape.clone())?))?;
    let psi = spinor::point_source(&shape, &[0, 0, 0, 0], 0, 0)?;

    let periodic = WilsonDirac::new(0.1, &periodic_boundary(4), &gauge)?.apply(&psi);
    let touched = spinor::nonzero_sites(&periodic).len();
    println!("  point source reaches {touched} sites");
    harness.check_bool("point source → site + 8 neighbours", touched == 9);

    let anti = WilsonDirac::new(0.1, &antiperiodic_time(4), &gauge)?.apply(&psi);
    let wrapped = shape.site_index(&[3, 0, 0, 0]);
    let flipped = (0..12).all(|k| {
        let i = 12 * wrapped + k;
        anti[i] == -periodic[i]
    });
    harness.check_bool("antiperiodic wrap flips sign", flipped);
    println!();
    Ok(())
}

fn check_operator(config: &RunConfig, harness: &mut ValidationHarness) -> Result<(), LatticeError> {
    let lat = &config.lattice;
    println!(
        "═══ Wilson operator on hot field {:?} (seed {}) ═══",
        lat.shape, config.gauge.seed
    );
    let layout = Arc::new(lat.layout()?);
    let gauge = GaugeField::hot_start(layout, config.gauge.seed, config.gauge.epsilon)?
        .with_tadpole(lat.ut, lat.us)?
        .with_anisotropy(lat.chi)?;
    println!("  <U> = {:.6}", gauge.average_link());
    harness.check_upper(
        "links in SU(3)",
        gauge.max_su3_deviation(),
        tolerances::SU3_UNITARITY,
    );

    let d = WilsonDirac::new(config.operator.mass, &lat.boundary, &gauge)?;
    let x = spinor::random(d.size(), 101);
    let y = spinor::random(d.size(), 202);
    let (a, b) = (Complex64::new(0.7, -0.2), Complex64::new(-1.1, 0.4));

    let mut combo = spinor::scaled(a, &x);
    spinor::axpy(b, &y, &mut combo);
    let lhs = d.apply(&combo);
    let mut rhs = spinor::scaled(a, &d.apply(&x));
    spinor::axpy(b, &d.apply(&y), &mut rhs);
    harness.check_vectors("linearity", &lhs, &rhs, tolerances::OPERATOR_LINEARITY_ABS);

    let twice = d.undo_hermiticity(&d.undo_hermiticity(&x));
    harness.check_bool("undo_hermiticity is an involution", twice == x);

    let herm = d.apply_hermitian(&x);
    let manual = d.undo_hermiticity(&d.apply(&x));
    harness.check_bool("apply_hermitian = undo_hermiticity ∘ apply", herm == manual);

    let real_phases = lat.boundary.iter().all(|z| z.im == 0.0);
    if real_phases {
        let left = spinor::dot(&x, &d.apply_hermitian(&y));
        let right = spinor::dot(&d.apply_hermitian(&x), &y);
        println!("  ⟨x, Hy⟩ = {left}, ⟨Hx, y⟩ = {right}");
        harness.check_complex("γ5 D Hermitian", left, right, tolerances::HERMITICITY_ABS);
    } else {
        println!("  complex boundary phases: γ5-Hermiticity check skipped");
    }

    let fallback = d.apply(&x[..12]);
    harness.check_bool(
        "size mismatch → zero vector",
        fallback.len() == d.size() && fallback.iter().all(|z| z.is_zero()),
    );
    harness.check_bool("try_apply reports size mismatch", d.try_apply(&x[..12]).is_err());

    if let Some(dw) = &config.operator.domain_wall {
        println!("  domain wall: M5 = {}, Ls = {}", dw.m5, dw.ls);
        let dwf = DomainWall::wilson(config.operator.mass, dw.m5, dw.ls, &lat.boundary, &gauge)?;
        let x5 = spinor::random(dwf.size(), 303);
        let y5 = spinor::random(dwf.size(), 404);
        let twice = dwf.undo_hermiticity(&dwf.undo_hermiticity(&x5));
        harness.check_bool("domain wall: γ5 R5 is an involution", twice == x5);
        if real_phases {
            let left = spinor::dot(&x5, &dwf.apply_hermitian(&y5));
            let right = spinor::dot(&dwf.apply_hermitian(&x5), &y5);
            harness.check_complex(
                "domain wall: γ5 R5 D Hermitian",
                left,
                right,
                tolerances::HERMITICITY_ABS,
            );
        }
    }
    println!();
    Ok(())
}
