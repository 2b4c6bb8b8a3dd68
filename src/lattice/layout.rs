// SPDX-License-Identifier: AGPL-3.0-only

//! Two-level (block, offset) storage layout with even/odd ordering.
//!
//! The lattice is tiled by equal cache blocks. Every site gets a block index
//! and an offset within its block, computed once at construction:
//!
//! 1. Encode the block coordinates (`coord / block_extent`) over the block
//!    counts and the intra-block coordinates (`coord % block_extent`) over
//!    the block extents, both most significant dimension first.
//! 2. Halve both indices. Sites that came from an odd-numbered block are
//!    shifted into the upper half of the merged block.
//! 3. Odd-parity sites move to the second half of the block range.
//!
//! Afterwards block `b < num_blocks / 2` holds only even sites and the rest
//! only odd sites, so a parity sweep is a contiguous slice of storage.
//!
//! The placement is a bijection only when both the number of blocks and the
//! block volume are even: intra-block offsets `2j` and `2j + 1` then always
//! differ in parity, whatever the innermost extent. Other block shapes are
//! rejected.

use log::debug;

use super::indexer::{mixed_radix, Parity, Shape};
use crate::error::LatticeError;

/// Physical location of one site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayoutEntry {
    /// Block index in `[0, num_blocks)`.
    pub block: usize,
    /// Offset inside the block in `[0, block_volume)`.
    pub offset: usize,
}

/// Site ↔ storage-slot mapping for one (grid shape, block shape) pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockLayout {
    shape: Shape,
    block_shape: Vec<usize>,
    num_blocks: usize,
    block_volume: usize,
    entries: Vec<LayoutEntry>,
    slot_to_site: Vec<usize>,
}

impl BlockLayout {
    /// Compute the layout.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if the block shape has the wrong rank, a block
    /// extent is zero or does not divide the grid extent, or the resulting
    /// block count or block volume is odd.
    pub fn new(shape: Shape, block_shape: &[usize]) -> Result<Self, LatticeError> {
        let ndim = shape.ndim();
        if block_shape.len() != ndim {
            return Err(LatticeError::invalid(format!(
                "block shape has {} dimensions, lattice has {ndim}",
                block_shape.len()
            )));
        }
        for (d, (&n, &b)) in shape.extents().iter().zip(block_shape).enumerate() {
            if b == 0 || n % b != 0 {
                return Err(LatticeError::invalid_dim(
                    d,
                    format!("extent {n} is not a multiple of block extent {b}"),
                ));
            }
        }

        let counts: Vec<usize> = shape
            .extents()
            .iter()
            .zip(block_shape)
            .map(|(&n, &b)| n / b)
            .collect();
        let block_volume: usize = block_shape.iter().product();
        let num_blocks = shape.volume() / block_volume;

        if num_blocks % 2 != 0 {
            return Err(LatticeError::invalid(format!(
                "{num_blocks} blocks cannot be split evenly between parities"
            )));
        }
        if block_volume % 2 != 0 {
            return Err(LatticeError::invalid(format!(
                "block {block_shape:?} holds {block_volume} sites, which cannot be split evenly between parities"
            )));
        }

        let volume = shape.volume();
        let mut entries = Vec::with_capacity(volume);
        let mut coords = vec![0isize; ndim];
        let mut outer = vec![0usize; ndim];
        let mut inner = vec![0usize; ndim];

        for site in 0..volume {
            shape.site_coords_into(site, &mut coords);
            for d in 0..ndim {
                let c = coords[d] as usize;
                outer[d] = c / block_shape[d];
                inner[d] = c % block_shape[d];
            }
            let lex_block = mixed_radix(&outer, &counts);
            let lex_offset = mixed_radix(&inner, block_shape);

            let shift = if lex_block % 2 == 1 { block_volume / 2 } else { 0 };
            let mut block = lex_block / 2;
            let offset = lex_offset / 2 + shift;
            if Parity::of_sum(coords.iter().sum()) == Parity::Odd {
                block += num_blocks / 2;
            }
            entries.push(LayoutEntry { block, offset });
        }

        let mut slot_to_site = vec![usize::MAX; volume];
        for (site, e) in entries.iter().enumerate() {
            slot_to_site[e.block * block_volume + e.offset] = site;
        }
        debug_assert!(slot_to_site.iter().all(|&s| s != usize::MAX));

        debug!(
            "block layout: shape {:?}, blocks {block_shape:?} → {num_blocks} × {block_volume}",
            shape.extents()
        );

        Ok(Self {
            shape,
            block_shape: block_shape.to_vec(),
            num_blocks,
            block_volume,
            entries,
            slot_to_site,
        })
    }

    /// Layout with [`BlockLayout::default_block_shape`].
    ///
    /// # Errors
    ///
    /// As [`BlockLayout::new`].
    pub fn with_default_blocks(shape: Shape) -> Result<Self, LatticeError> {
        let blocks = Self::default_block_shape(shape.extents());
        Self::new(shape, &blocks)
    }

    /// Block extent 2 along even axes, the full extent along odd ones.
    #[must_use]
    pub fn default_block_shape(extents: &[usize]) -> Vec<usize> {
        extents
            .iter()
            .map(|&n| if n % 2 == 0 { 2 } else { n })
            .collect()
    }

    /// Grid shape.
    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Block shape.
    #[must_use]
    pub fn block_shape(&self) -> &[usize] {
        &self.block_shape
    }

    /// Number of blocks.
    #[must_use]
    pub const fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    /// Sites per block.
    #[must_use]
    pub const fn block_volume(&self) -> usize {
        self.block_volume
    }

    /// Total number of sites.
    #[must_use]
    pub const fn volume(&self) -> usize {
        self.shape.volume()
    }

    /// Sites of one parity.
    #[must_use]
    pub const fn half_volume(&self) -> usize {
        self.shape.volume() / 2
    }

    /// Layout entry of a site.
    ///
    /// # Panics
    ///
    /// If `site >= volume`.
    #[must_use]
    pub fn entry(&self, site: usize) -> LayoutEntry {
        self.entries[site]
    }

    /// Flat storage slot of a site: `block * block_volume + offset`.
    #[inline]
    #[must_use]
    pub fn slot(&self, site: usize) -> usize {
        let e = self.entries[site];
        e.block * self.block_volume + e.offset
    }

    /// Site stored in a given slot.
    #[inline]
    #[must_use]
    pub fn site_at_slot(&self, slot: usize) -> usize {
        self.slot_to_site[slot]
    }

    /// Sites in storage order.
    #[must_use]
    pub fn sites_by_slot(&self) -> &[usize] {
        &self.slot_to_site
    }

    /// Parity of a site, read from its block index.
    #[inline]
    #[must_use]
    pub fn parity_of(&self, site: usize) -> Parity {
        if self.entries[site].block < self.num_blocks / 2 {
            Parity::Even
        } else {
            Parity::Odd
        }
    }

    /// Same grid and block shape.
    #[must_use]
    pub fn compatible(&self, other: &Self) -> bool {
        self.shape == other.shape && self.block_shape == other.block_shape
    }
}
