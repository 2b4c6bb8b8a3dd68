// SPDX-License-Identifier: AGPL-3.0-only

//! Per-site storage in blocked even/odd order.
//!
//! [`SiteStore<T>`] owns one `T` per lattice site, held in the physical order
//! given by a shared [`BlockLayout`]. Logical access is always by
//! lexicographic site index (or coordinates); the layout indirection is
//! internal.
//!
//! Views:
//! - [`ParityView`] / [`ParityViewMut`]: the even or odd half of the storage,
//!   a contiguous slice with its site indices alongside.
//! - [`RollView`]: read-only periodic shift, `roll(d, s)[x] = store[x + s·ê_d]`.
//!
//! Arithmetic is eager and elementwise. Binary operators between stores
//! require the same grid and block shape and panic otherwise; the `try_*`
//! methods report [`LatticeError::ShapeMismatch`] instead.

use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Sub, SubAssign,
};
use std::sync::Arc;

use super::complex_f64::Complex64;
use super::indexer::Parity;
use super::layout::BlockLayout;
use crate::error::LatticeError;

/// One value of type `T` per lattice site.
///
/// A default-constructed store has no layout and no sites.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteStore<T> {
    layout: Option<Arc<BlockLayout>>,
    data: Vec<T>,
}

impl<T> Default for SiteStore<T> {
    fn default() -> Self {
        Self {
            layout: None,
            data: Vec::new(),
        }
    }
}

impl<T: Default> SiteStore<T> {
    /// Store with every site set to `T::default()`.
    #[must_use]
    pub fn new(layout: Arc<BlockLayout>) -> Self {
        let data = std::iter::repeat_with(T::default)
            .take(layout.volume())
            .collect();
        Self {
            layout: Some(layout),
            data,
        }
    }
}

impl<T: Clone> SiteStore<T> {
    /// Store with every site set to `value`.
    #[must_use]
    pub fn filled(layout: Arc<BlockLayout>, value: T) -> Self {
        let data = vec![value; layout.volume()];
        Self {
            layout: Some(layout),
            data,
        }
    }

    /// Store from values given in lexicographic site order.
    ///
    /// # Errors
    ///
    /// `SizeMismatch` if `values.len() != volume`.
    pub fn from_site_values(layout: Arc<BlockLayout>, values: &[T]) -> Result<Self, LatticeError> {
        if values.len() != layout.volume() {
            return Err(LatticeError::SizeMismatch {
                expected: layout.volume(),
                found: values.len(),
            });
        }
        let data = layout
            .sites_by_slot()
            .iter()
            .map(|&site| values[site].clone())
            .collect();
        Ok(Self {
            layout: Some(layout),
            data,
        })
    }

    /// Values in lexicographic site order.
    #[must_use]
    pub fn to_site_vec(&self) -> Vec<T> {
        self.iter_sites().map(|(_, v)| v.clone()).collect()
    }

    /// Set every site to `value`.
    ///
    /// # Errors
    ///
    /// `EmptyStore` if the store has no sites.
    pub fn fill(&mut self, value: T) -> Result<(), LatticeError> {
        if self.data.is_empty() {
            return Err(LatticeError::EmptyStore);
        }
        self.data.fill(value);
        Ok(())
    }
}

impl<T> SiteStore<T> {
    /// Store built from a closure of the site index.
    #[must_use]
    pub fn from_fn(layout: Arc<BlockLayout>, mut f: impl FnMut(usize) -> T) -> Self {
        let data = layout.sites_by_slot().iter().map(|&s| f(s)).collect();
        Self {
            layout: Some(layout),
            data,
        }
    }

    /// Shared layout, `None` for an empty store.
    #[must_use]
    pub fn layout(&self) -> Option<&Arc<BlockLayout>> {
        self.layout.as_ref()
    }

    /// Grid extents (empty for an empty store).
    #[must_use]
    pub fn extents(&self) -> &[usize] {
        match &self.layout {
            Some(l) => l.shape().extents(),
            None => &[],
        }
    }

    /// Number of sites.
    #[must_use]
    pub fn volume(&self) -> usize {
        self.data.len()
    }

    /// True for a store with no sites.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw storage in physical (block, offset) order.
    #[must_use]
    pub fn as_storage(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn slot(&self, site: usize) -> Option<usize> {
        match &self.layout {
            Some(l) if site < l.volume() => Some(l.slot(site)),
            _ => None,
        }
    }

    #[inline]
    fn slot_or_panic(&self, site: usize) -> usize {
        match self.slot(site) {
            Some(slot) => slot,
            None => panic!("site {site} out of range for volume {}", self.volume()),
        }
    }

    /// Checked access by site index.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if `site >= volume`.
    pub fn try_get(&self, site: usize) -> Result<&T, LatticeError> {
        let bound = self.volume();
        self.slot(site)
            .map(|slot| &self.data[slot])
            .ok_or(LatticeError::OutOfRange { index: site, bound })
    }

    /// Checked mutable access by site index.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if `site >= volume`.
    pub fn try_get_mut(&mut self, site: usize) -> Result<&mut T, LatticeError> {
        let bound = self.volume();
        match self.slot(site) {
            Some(slot) => Ok(&mut self.data[slot]),
            None => Err(LatticeError::OutOfRange { index: site, bound }),
        }
    }

    /// Access by coordinates (periodically reduced).
    ///
    /// # Panics
    ///
    /// On an empty store or a coordinate tuple of the wrong length.
    #[must_use]
    pub fn at(&self, coords: &[isize]) -> &T {
        &self[self.site_of(coords)]
    }

    /// Mutable access by coordinates (periodically reduced).
    ///
    /// # Panics
    ///
    /// On an empty store or a coordinate tuple of the wrong length.
    pub fn at_mut(&mut self, coords: &[isize]) -> &mut T {
        let site = self.site_of(coords);
        &mut self[site]
    }

    fn site_of(&self, coords: &[isize]) -> usize {
        match &self.layout {
            Some(l) => l.shape().site_index(coords),
            None => panic!("coordinate access on an empty site store"),
        }
    }

    /// `(site, value)` pairs in lexicographic site order.
    pub fn iter_sites(&self) -> impl Iterator<Item = (usize, &T)> + '_ {
        (0..self.volume()).map(move |site| (site, &self.data[self.slot_or_panic(site)]))
    }

    /// Elementwise transform into a store on the same layout.
    #[must_use]
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> SiteStore<U> {
        SiteStore {
            layout: self.layout.clone(),
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Elementwise combination of two stores on the same layout.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` if the layouts differ.
    pub fn zip_with<U, V>(
        &self,
        other: &SiteStore<U>,
        mut f: impl FnMut(&T, &U) -> V,
    ) -> Result<SiteStore<V>, LatticeError> {
        self.check_compatible(other)?;
        Ok(SiteStore {
            layout: self.layout.clone(),
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(a, b)| f(a, b))
                .collect(),
        })
    }

    /// Ok when `other` has the same grid and block shape.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` naming the differing extents (or block extents).
    pub fn check_compatible<U>(&self, other: &SiteStore<U>) -> Result<(), LatticeError> {
        match (&self.layout, &other.layout) {
            (None, None) => Ok(()),
            (Some(a), Some(b)) if Arc::ptr_eq(a, b) || a.compatible(b) => Ok(()),
            (Some(a), Some(b)) if a.shape() == b.shape() => Err(LatticeError::ShapeMismatch {
                expected: a.block_shape().to_vec(),
                found: b.block_shape().to_vec(),
            }),
            _ => Err(LatticeError::ShapeMismatch {
                expected: self.extents().to_vec(),
                found: other.extents().to_vec(),
            }),
        }
    }

    /// Sites of one parity.
    #[must_use]
    pub fn parity_sites(&self, parity: Parity) -> ParityView<'_, T> {
        let range = self.parity_range(parity);
        ParityView {
            parity,
            values: &self.data[range.clone()],
            sites: self.slot_sites(range),
        }
    }

    /// Mutable view of the sites of one parity.
    pub fn parity_sites_mut(&mut self, parity: Parity) -> ParityViewMut<'_, T> {
        let range = self.parity_range(parity);
        let sites: &[usize] = match &self.layout {
            Some(l) => &l.sites_by_slot()[range.clone()],
            None => &[],
        };
        ParityViewMut {
            parity,
            values: &mut self.data[range],
            sites,
        }
    }

    /// Even-parity sites.
    #[must_use]
    pub fn even_sites(&self) -> ParityView<'_, T> {
        self.parity_sites(Parity::Even)
    }

    /// Odd-parity sites.
    #[must_use]
    pub fn odd_sites(&self) -> ParityView<'_, T> {
        self.parity_sites(Parity::Odd)
    }

    fn parity_range(&self, parity: Parity) -> std::ops::Range<usize> {
        let half = self.volume() / 2;
        match parity {
            Parity::Even => 0..half,
            Parity::Odd => half..self.volume(),
        }
    }

    fn slot_sites(&self, range: std::ops::Range<usize>) -> &[usize] {
        match &self.layout {
            Some(l) => &l.sites_by_slot()[range],
            None => &[],
        }
    }

    /// Periodically shifted read view along `dim`.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `dim` is not a lattice dimension.
    pub fn roll(&self, dim: usize, shift: isize) -> Result<RollView<'_, T>, LatticeError> {
        let ndim = self.extents().len();
        if dim >= ndim {
            return Err(LatticeError::invalid_dim(
                dim,
                format!("roll dimension out of range for a {ndim}-dimensional lattice"),
            ));
        }
        Ok(RollView {
            store: self,
            dim,
            shift,
        })
    }
}

impl<T> Index<usize> for SiteStore<T> {
    type Output = T;

    fn index(&self, site: usize) -> &T {
        &self.data[self.slot_or_panic(site)]
    }
}

impl<T> IndexMut<usize> for SiteStore<T> {
    fn index_mut(&mut self, site: usize) -> &mut T {
        let slot = self.slot_or_panic(site);
        &mut self.data[slot]
    }
}

/// Read-only view of one parity.
#[derive(Debug)]
pub struct ParityView<'a, T> {
    parity: Parity,
    values: &'a [T],
    sites: &'a [usize],
}

impl<'a, T> ParityView<'a, T> {
    /// Which parity this view covers.
    #[must_use]
    pub const fn parity(&self) -> Parity {
        self.parity
    }

    /// Number of sites in the view.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the view is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in storage order.
    #[must_use]
    pub const fn values(&self) -> &'a [T] {
        self.values
    }

    /// Lattice site of the `k`-th entry.
    #[must_use]
    pub fn site(&self, k: usize) -> usize {
        self.sites[k]
    }

    /// `(site, value)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a T)> + 'a {
        self.sites.iter().copied().zip(self.values.iter())
    }
}

/// Mutable view of one parity.
#[derive(Debug)]
pub struct ParityViewMut<'a, T> {
    parity: Parity,
    values: &'a mut [T],
    sites: &'a [usize],
}

impl<T> ParityViewMut<'_, T> {
    /// Which parity this view covers.
    #[must_use]
    pub const fn parity(&self) -> Parity {
        self.parity
    }

    /// Number of sites in the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Lattice site of the `k`-th entry.
    #[must_use]
    pub fn site(&self, k: usize) -> usize {
        self.sites[k]
    }

    /// `(site, value)` pairs in storage order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> + '_ {
        self.sites.iter().copied().zip(self.values.iter_mut())
    }
}

impl<T: Clone> ParityViewMut<'_, T> {
    /// Set every site of this parity to `value`.
    pub fn fill(&mut self, value: T) {
        self.values.fill(value);
    }
}

/// Store seen through a periodic shift along one dimension.
#[derive(Debug)]
pub struct RollView<'a, T> {
    store: &'a SiteStore<T>,
    dim: usize,
    shift: isize,
}

impl<'a, T> RollView<'a, T> {
    /// Value that lands on `site`: the store's value `shift` steps along `dim`.
    ///
    /// # Panics
    ///
    /// If `site >= volume`.
    #[must_use]
    pub fn get(&self, site: usize) -> &'a T {
        let store = self.store;
        let source = match &store.layout {
            Some(l) => l.shape().step(site, self.dim, self.shift).0,
            None => panic!("roll of an empty site store"),
        };
        &store[source]
    }

    /// Values in lexicographic site order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a T)> + '_ {
        (0..self.store.volume()).map(move |site| (site, self.get(site)))
    }
}

impl<T: Clone> RollView<'_, T> {
    /// Materialize the shifted field as a new store.
    #[must_use]
    pub fn to_store(&self) -> SiteStore<T> {
        match &self.store.layout {
            Some(l) => SiteStore::from_fn(Arc::clone(l), |site| self.get(site).clone()),
            None => SiteStore::default(),
        }
    }
}

macro_rules! store_binary_op {
    ($op:ident, $method:ident, $op_assign:ident, $method_assign:ident, $try_method:ident, $doc:literal) => {
        impl<T: Clone + $op<Output = T>> SiteStore<T> {
            #[doc = $doc]
            ///
            /// # Errors
            ///
            /// `ShapeMismatch` if the layouts differ.
            pub fn $try_method(&self, rhs: &Self) -> Result<Self, LatticeError> {
                self.zip_with(rhs, |a, b| $op::$method(a.clone(), b.clone()))
            }
        }

        impl<T: Clone + $op<Output = T>> $op<&SiteStore<T>> for &SiteStore<T> {
            type Output = SiteStore<T>;

            fn $method(self, rhs: &SiteStore<T>) -> SiteStore<T> {
                match self.$try_method(rhs) {
                    Ok(out) => out,
                    Err(e) => panic!("{e}"),
                }
            }
        }

        impl<T: Clone + $op_assign> $op_assign<&SiteStore<T>> for SiteStore<T> {
            fn $method_assign(&mut self, rhs: &SiteStore<T>) {
                if let Err(e) = self.check_compatible(rhs) {
                    panic!("{e}");
                }
                for (a, b) in self.data.iter_mut().zip(&rhs.data) {
                    $op_assign::$method_assign(a, b.clone());
                }
            }
        }

        impl<T: Clone + $op_assign> $op<&SiteStore<T>> for SiteStore<T> {
            type Output = SiteStore<T>;

            fn $method(mut self, rhs: &SiteStore<T>) -> SiteStore<T> {
                $op_assign::$method_assign(&mut self, rhs);
                self
            }
        }
    };
}

store_binary_op!(Add, add, AddAssign, add_assign, try_add, "Elementwise sum.");
store_binary_op!(Sub, sub, SubAssign, sub_assign, try_sub, "Elementwise difference.");
store_binary_op!(Mul, mul, MulAssign, mul_assign, try_mul, "Elementwise product.");
store_binary_op!(Div, div, DivAssign, div_assign, try_div, "Elementwise quotient.");

macro_rules! store_scalar_op {
    ($scalar:ty; $($op:ident, $method:ident, $op_assign:ident, $method_assign:ident);+ $(;)?) => {
        $(
            impl<T: Clone + $op<$scalar, Output = T>> $op<$scalar> for &SiteStore<T> {
                type Output = SiteStore<T>;

                fn $method(self, rhs: $scalar) -> SiteStore<T> {
                    self.map(|a| $op::$method(a.clone(), rhs))
                }
            }

            impl<T: $op_assign<$scalar>> $op_assign<$scalar> for SiteStore<T> {
                fn $method_assign(&mut self, rhs: $scalar) {
                    for a in &mut self.data {
                        $op_assign::$method_assign(a, rhs);
                    }
                }
            }

            impl<T: $op_assign<$scalar>> $op<$scalar> for SiteStore<T> {
                type Output = SiteStore<T>;

                fn $method(mut self, rhs: $scalar) -> SiteStore<T> {
                    $op_assign::$method_assign(&mut self, rhs);
                    self
                }
            }
        )+
    };
}

store_scalar_op!(f64;
    Add, add, AddAssign, add_assign;
    Sub, sub, SubAssign, sub_assign;
    Mul, mul, MulAssign, mul_assign;
    Div, div, DivAssign, div_assign;
);
store_scalar_op!(i64;
    Add, add, AddAssign, add_assign;
    Sub, sub, SubAssign, sub_assign;
    Mul, mul, MulAssign, mul_assign;
    Div, div, DivAssign, div_assign;
);
store_scalar_op!(Complex64;
    Add, add, AddAssign, add_assign;
    Sub, sub, SubAssign, sub_assign;
    Mul, mul, MulAssign, mul_assign;
    Div, div, DivAssign, div_assign;
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::indexer::Shape;

    fn layout_4d() -> Arc<BlockLayout> {
        Arc::new(BlockLayout::new(Shape::new(&[4, 4, 4, 4]).unwrap(), &[2, 2, 2, 2]).unwrap())
    }

    fn site_numbered(layout: &Arc<BlockLayout>) -> SiteStore<i64> {
        SiteStore::from_fn(Arc::clone(layout), |s| s as i64)
    }

    #[test]
    fn index_resolves_through_layout() {
        let layout = layout_4d();
        let store = site_numbered(&layout);
        for site in 0..store.volume() {
            assert_eq!(store[site], site as i64);
            assert_eq!(store.as_storage()[layout.slot(site)], site as i64);
        }
        assert_eq!(*store.at(&[0, 0, 1, 3]), 7);
        assert_eq!(*store.at(&[-4, 4, 1, -1]), 7);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn index_past_volume_panics() {
        let store = site_numbered(&layout_4d());
        let _ = store[256];
    }

    #[test]
    fn try_get_reports_out_of_range() {
        let mut store = site_numbered(&layout_4d());
        assert_eq!(
            store.try_get(256),
            Err(LatticeError::OutOfRange {
                index: 256,
                bound: 256
            })
        );
        *store.try_get_mut(3).unwrap() = -1;
        assert_eq!(store[3], -1);
    }

    #[test]
    fn fill_on_empty_store_is_an_error() {
        let mut empty: SiteStore<f64> = SiteStore::default();
        assert_eq!(empty.fill(1.0), Err(LatticeError::EmptyStore));
        let mut store = SiteStore::<f64>::new(layout_4d());
        store.fill(2.5).unwrap();
        assert!(store.iter_sites().all(|(_, &v)| v == 2.5));
    }

    #[test]
    fn from_site_values_round_trips() {
        let layout = layout_4d();
        let values: Vec<i64> = (0..256).map(|s| 3 * s - 7).collect();
        let store = SiteStore::from_site_values(Arc::clone(&layout), &values).unwrap();
        assert_eq!(store.to_site_vec(), values);
        assert!(matches!(
            SiteStore::from_site_values(layout, &values[..10]),
            Err(LatticeError::SizeMismatch {
                expected: 256,
                found: 10
            })
        ));
    }

    #[test]
    fn parity_views_partition_the_sites() {
        let layout = layout_4d();
        let store = site_numbered(&layout);
        let even = store.even_sites();
        let odd = store.odd_sites();
        assert_eq!(even.len(), 128);
        assert_eq!(odd.len(), 128);
        for (site, &v) in even.iter() {
            assert_eq!(layout.shape().parity(site), Parity::Even);
            assert_eq!(v, site as i64);
        }
        for (site, &v) in odd.iter() {
            assert_eq!(layout.shape().parity(site), Parity::Odd);
            assert_eq!(v, site as i64);
        }
    }

    #[test]
    fn parity_view_mut_touches_only_its_color() {
        let layout = layout_4d();
        let mut store = SiteStore::filled(Arc::clone(&layout), 0i64);
        store.parity_sites_mut(Parity::Odd).fill(1);
        for (site, &v) in store.iter_sites() {
            let expected = i64::from(layout.shape().parity(site) == Parity::Odd);
            assert_eq!(v, expected);
        }
    }

    #[test]
    fn roll_reads_shifted_neighbour() {
        let layout = layout_4d();
        let store = site_numbered(&layout);
        let shape = layout.shape();
        let rolled = store.roll(1, 1).unwrap();
        let origin = shape.site_index(&[0, 0, 0, 0]);
        assert_eq!(*rolled.get(origin), shape.site_index(&[0, 1, 0, 0]) as i64);
        let edge = shape.site_index(&[2, 3, 1, 0]);
        assert_eq!(*rolled.get(edge), shape.site_index(&[2, 0, 1, 0]) as i64);

        let back = store.roll(1, -1).unwrap().to_store();
        let there_and_back = back.roll(1, 1).unwrap().to_store();
        assert_eq!(there_and_back, store);
        assert!(store.roll(4, 1).is_err());
    }

    #[test]
    fn add_then_sub_restores_integers() {
        let layout = layout_4d();
        let a = site_numbered(&layout);
        let b = SiteStore::from_fn(Arc::clone(&layout), |s| (s as i64 * 31) % 17 - 5);
        let restored = &(&a + &b) - &b;
        assert_eq!(restored, a);
    }

    #[test]
    fn scalar_ops_match_elementwise() {
        let layout = layout_4d();
        let a = SiteStore::from_fn(Arc::clone(&layout), |s| Complex64::new(s as f64, 1.0));
        let scaled = &a * 2.0;
        let shifted = a.clone() + Complex64::I;
        for site in 0..a.volume() {
            assert_eq!(scaled[site], a[site] * 2.0);
            assert_eq!(shifted[site], a[site] + Complex64::I);
        }
        let mut c = a.clone();
        c *= Complex64::new(0.0, 2.0);
        c /= Complex64::new(0.0, 2.0);
        for site in 0..a.volume() {
            assert!((c[site] - a[site]).abs() < 1e-14);
        }
    }

    #[test]
    fn mismatched_layouts_are_rejected() {
        let a = SiteStore::<i64>::new(layout_4d());
        let other = Arc::new(BlockLayout::new(Shape::new(&[4, 4, 4, 4]).unwrap(), &[4, 4, 2, 2]).unwrap());
        let b = SiteStore::<i64>::new(other);
        assert_eq!(
            a.try_add(&b),
            Err(LatticeError::ShapeMismatch {
                expected: vec![2, 2, 2, 2],
                found: vec![4, 4, 2, 2],
            })
        );
        let c = SiteStore::<i64>::new(Arc::new(
            BlockLayout::new(Shape::new(&[4, 4]).unwrap(), &[2, 2]).unwrap(),
        ));
        assert!(matches!(a.try_sub(&c), Err(LatticeError::ShapeMismatch { .. })));
    }

    #[test]
    #[should_panic(expected = "Shape mismatch")]
    fn operator_on_mismatched_layouts_panics() {
        let a = SiteStore::<i64>::new(layout_4d());
        let b = SiteStore::<i64>::new(Arc::new(
            BlockLayout::new(Shape::new(&[4, 4]).unwrap(), &[2, 2]).unwrap(),
        ));
        let _ = &a * &b;
    }
}
