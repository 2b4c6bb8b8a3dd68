// SPDX-License-Identifier: AGPL-3.0-only

//! Integration tests: coordinate indexing, blocked storage, store arithmetic.
//!
//! Exercises the addressing layer end to end through the public API: grid
//! shapes, block layouts, site stores, parity views, rolls and elementwise
//! operators.

use std::sync::Arc;

use lattice_stencil::lattice::complex_f64::Complex64;
use lattice_stencil::lattice::indexer::{Parity, Shape};
use lattice_stencil::lattice::layout::BlockLayout;
use lattice_stencil::lattice::site_store::SiteStore;
use lattice_stencil::tolerances;
use lattice_stencil::LatticeError;

fn layout(extents: &[usize], blocks: &[usize]) -> Arc<BlockLayout> {
    Arc::new(BlockLayout::new(Shape::new(extents).unwrap(), blocks).unwrap())
}

#[test]
fn index_coords_round_trip_on_odd_extents() {
    let shape = Shape::new(&[3, 5, 2, 7]).unwrap();
    for i in 0..shape.volume() {
        let c = shape.site_coords(i);
        assert_eq!(shape.site_index(&c), i, "site {i} → {c:?}");
    }
}

#[test]
fn last_coordinate_varies_fastest() {
    let shape = Shape::new(&[4, 4, 4, 4]).unwrap();
    assert_eq!(shape.site_index(&[0, 0, 0, 1]), 1);
    assert_eq!(shape.site_index(&[0, 0, 1, 0]), 4);
    assert_eq!(shape.site_index(&[1, 0, 0, 0]), 64);
    assert_eq!(shape.site_index(&[-1, 0, 0, 0]), 192, "negative coords wrap");
}

#[test]
fn blocked_layout_scenario() {
    let l = layout(&[4, 4, 4, 4], &[4, 4, 2, 2]);
    assert_eq!(l.num_blocks(), 4);
    assert_eq!(l.block_volume(), 64);

    let shape = l.shape();
    let origin = l.entry(shape.site_index(&[0, 0, 0, 0]));
    assert_eq!(origin.block, 0);
    let odd = l.entry(shape.site_index(&[1, 0, 0, 0]));
    assert!(odd.block >= 2, "odd site landed in block {}", odd.block);
}

#[test]
fn single_block_layout_is_rejected() {
    let shape = Shape::new(&[4, 4, 4, 4]).unwrap();
    let err = BlockLayout::new(shape, &[4, 4, 4, 4]).unwrap_err();
    assert!(matches!(err, LatticeError::InvalidConfiguration { .. }));
}

#[test]
fn indivisible_block_names_the_dimension() {
    let shape = Shape::new(&[4, 6, 4, 4]).unwrap();
    match BlockLayout::new(shape, &[2, 4, 2, 2]) {
        Err(LatticeError::InvalidConfiguration { dimension, .. }) => assert_eq!(dimension, Some(1)),
        other => panic!("expected InvalidConfiguration, got {other:?}"),
    }
}

#[test]
fn checkerboard_invariant_on_several_layouts() {
    for (extents, blocks) in [
        (vec![4, 4, 4, 4], vec![2, 2, 2, 2]),
        (vec![8, 4, 4, 4], vec![4, 2, 2, 2]),
        (vec![4, 4], vec![2, 2]),
        (vec![6, 4, 4], vec![3, 2, 2]),
    ] {
        let l = layout(&extents, &blocks);
        let half = l.num_blocks() / 2;
        let mut seen = vec![false; l.volume()];
        for site in 0..l.volume() {
            let e = l.entry(site);
            let even = l.shape().parity(site) == Parity::Even;
            assert_eq!(e.block < half, even, "{extents:?}/{blocks:?} site {site}");
            let slot = l.slot(site);
            assert!(!seen[slot], "slot {slot} used twice");
            seen[slot] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}

#[test]
fn default_blocks_follow_extent_parity() {
    assert_eq!(BlockLayout::default_block_shape(&[8, 4, 3, 6]), vec![2, 2, 3, 2]);
}

#[test]
fn integer_add_then_subtract_is_exact() {
    let l = layout(&[4, 4, 4, 4], &[2, 2, 2, 2]);
    let a = SiteStore::from_fn(Arc::clone(&l), |s| (s as i64) * 31 - 4000);
    let b = SiteStore::from_fn(l, |s| ((s * s) % 97) as i64);
    let restored = (&a + &b) - &b;
    assert_eq!(restored, a);
}

#[test]
fn complex_add_then_subtract_within_tolerance() {
    let l = layout(&[4, 4, 4, 4], &[4, 4, 2, 2]);
    let a = SiteStore::from_fn(Arc::clone(&l), |s| Complex64::new((s as f64).sqrt(), -0.3 * s as f64));
    let b = SiteStore::from_fn(l, |s| Complex64::from_polar(0.01 * s as f64).scale(1e3));
    let restored = a.try_add(&b).unwrap().try_sub(&b).unwrap();
    for (site, z) in a.iter_sites() {
        assert!(
            (*z - restored[site]).abs() < tolerances::STORE_ROUND_TRIP_ABS * 1e3,
            "site {site}"
        );
    }
}

#[test]
fn scalar_ops_apply_to_every_site() {
    let l = layout(&[4, 4], &[2, 2]);
    let a = SiteStore::filled(l, 3.0_f64);
    let b = (&a * 2.0) + 1.0;
    assert!(b.iter_sites().all(|(_, &v)| v == 7.0));
}

#[test]
fn mismatched_layouts_are_reported() {
    let a = SiteStore::<f64>::new(layout(&[4, 4, 4, 4], &[2, 2, 2, 2]));
    let b = SiteStore::<f64>::new(layout(&[4, 4, 4, 4], &[4, 4, 2, 2]));
    let c = SiteStore::<f64>::new(layout(&[8, 4, 4, 4], &[2, 2, 2, 2]));
    assert!(matches!(a.try_add(&b), Err(LatticeError::ShapeMismatch { .. })));
    match a.try_mul(&c) {
        Err(LatticeError::ShapeMismatch { expected, found }) => {
            assert_eq!(expected, vec![4, 4, 4, 4]);
            assert_eq!(found, vec![8, 4, 4, 4]);
        }
        other => panic!("expected ShapeMismatch, got {other:?}"),
    }
}

#[test]
fn parity_views_partition_the_store() {
    let l = layout(&[4, 4, 4, 4], &[2, 2, 2, 2]);
    let mut store = SiteStore::from_fn(Arc::clone(&l), |s| s);
    let even = store.even_sites();
    let odd = store.odd_sites();
    assert_eq!(even.len() + odd.len(), l.volume());
    assert!(even.iter().all(|(site, &v)| v == site && l.shape().parity(site) == Parity::Even));
    assert!(odd.iter().all(|(site, &v)| v == site && l.shape().parity(site) == Parity::Odd));

    store.parity_sites_mut(Parity::Odd).fill(usize::MAX);
    for (site, &v) in store.iter_sites() {
        let odd_site = l.shape().parity(site) == Parity::Odd;
        assert_eq!(v == usize::MAX, odd_site);
    }
}

#[test]
fn roll_reads_the_neighbour_ahead() {
    let l = layout(&[4, 4, 4, 4], &[2, 2, 2, 2]);
    let shape = l.shape().clone();
    let store = SiteStore::from_fn(l, |s| s);
    let rolled = store.roll(3, 1).unwrap();
    assert_eq!(*rolled.get(shape.site_index(&[0, 0, 0, 0])), shape.site_index(&[0, 0, 0, 1]));
    assert_eq!(*rolled.get(shape.site_index(&[0, 0, 0, 3])), shape.site_index(&[0, 0, 0, 0]));

    let back = store.roll(3, -1).unwrap().to_store();
    let there_and_back = back.roll(3, 1).unwrap().to_store();
    assert_eq!(there_and_back, store);
    assert!(store.roll(4, 1).is_err());
}

#[test]
fn site_values_survive_layout_reordering() {
    let l = layout(&[4, 4, 2], &[2, 2, 2]);
    let values: Vec<i64> = (0..l.volume() as i64).map(|v| v * v).collect();
    let store = SiteStore::from_site_values(Arc::clone(&l), &values).unwrap();
    assert_eq!(store.to_site_vec(), values);
    assert_eq!(*store.at(&[1, 2, 1]), values[l.shape().site_index(&[1, 2, 1])]);
    assert!(matches!(
        SiteStore::from_site_values(l, &values[1..]),
        Err(LatticeError::SizeMismatch { .. })
    ));
}

#[test]
fn empty_store_rejects_fill_and_lookup() {
    let mut empty = SiteStore::<f64>::default();
    assert!(empty.is_empty());
    assert!(matches!(empty.fill(1.0), Err(LatticeError::EmptyStore)));
    assert!(matches!(empty.try_get(0), Err(LatticeError::OutOfRange { .. })));
}
