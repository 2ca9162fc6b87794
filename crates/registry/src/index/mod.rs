//! Selector-to-facet index.
//!
//! # Role
//!
//! Thin associative map from [`Selector`] to [`IndexEntry`]. It carries no ordering of its
//! own; the position fields mirror where the selector lives in the
//! [`SlotStore`](crate::slots::SlotStore) and are kept in sync by the cut processor.

mod packed;

use diamond_primitives::{FacetAddress, Selector};
use rustc_hash::FxHashMap;

pub use packed::PackedEntry;

use crate::slots::SLOT_CAPACITY;

/// Where a registered selector lives and which facet serves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
	pub facet: FacetAddress,
	pub slot_index: usize,
	/// Cell within the slot, `0..SLOT_CAPACITY`.
	pub position: u8,
}

impl IndexEntry {
	/// Builds an entry from a global selector ordinal.
	pub fn at(facet: FacetAddress, ordinal: usize) -> Self {
		Self {
			facet,
			slot_index: ordinal / SLOT_CAPACITY,
			position: (ordinal % SLOT_CAPACITY) as u8,
		}
	}

	/// Global ordinal of the selector across all slots.
	#[inline]
	pub fn ordinal(&self) -> usize {
		self.slot_index * SLOT_CAPACITY + self.position as usize
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorIndex {
	entries: FxHashMap<Selector, IndexEntry>,
}

impl SelectorIndex {
	pub fn new() -> Self {
		Self::default()
	}

	#[inline]
	pub fn lookup(&self, selector: Selector) -> Option<IndexEntry> {
		self.entries.get(&selector).copied()
	}

	#[inline]
	pub fn contains(&self, selector: Selector) -> bool {
		self.entries.contains_key(&selector)
	}

	pub fn set(&mut self, selector: Selector, entry: IndexEntry) {
		self.entries.insert(selector, entry);
	}

	/// Removes the entry for `selector`. Absent keys are a no-op.
	pub fn clear(&mut self, selector: Selector) -> Option<IndexEntry> {
		self.entries.remove(&selector)
	}

	/// Re-routes a registered selector without moving it. Returns the previous facet.
	pub fn overwrite_facet_only(
		&mut self,
		selector: Selector,
		facet: FacetAddress,
	) -> Option<FacetAddress> {
		let entry = self.entries.get_mut(&selector)?;
		Some(std::mem::replace(&mut entry.facet, facet))
	}

	/// Records that `selector` was moved to a new cell, keeping its facet.
	pub(crate) fn relocate(&mut self, selector: Selector, slot_index: usize, position: u8) {
		if let Some(entry) = self.entries.get_mut(&selector) {
			entry.slot_index = slot_index;
			entry.position = position;
		}
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates entries in unspecified order.
	pub fn iter(&self) -> impl Iterator<Item = (Selector, IndexEntry)> + '_ {
		self.entries.iter().map(|(s, e)| (*s, *e))
	}
}

impl FromIterator<(Selector, IndexEntry)> for SelectorIndex {
	fn from_iter<I: IntoIterator<Item = (Selector, IndexEntry)>>(iter: I) -> Self {
		Self {
			entries: iter.into_iter().collect(),
		}
	}
}

#[cfg(test)]
mod tests;
