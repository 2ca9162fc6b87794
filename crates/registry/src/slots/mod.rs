//! Packed selector slots.
//!
//! # Role
//!
//! [`SlotStore`] keeps every registered selector in an array of fixed-capacity [`Slot`]s, one
//! slot per storage word. Selectors are ordered by a global ordinal
//! (`slot_index * SLOT_CAPACITY + position`) and always occupy ordinals `0..len()`.
//!
//! # Invariants
//!
//! - Density: slots below `len() / SLOT_CAPACITY` are full, the active slot holds
//!   `len() % SLOT_CAPACITY` selectors, and no slot exists past the active one.
//!   - Enforced in: [`SlotStore::append`], [`SlotStore::swap_remove`].
//!   - Tested by: `slots::tests`, `state::tests::prop_density_and_consistency`.
//!   - Failure symptom: lookups resolve to the wrong cell, or a removed selector stays
//!     readable past the live count.

use diamond_primitives::Selector;
use serde::{Deserialize, Serialize};

/// Number of selectors packed into one slot.
pub const SLOT_CAPACITY: usize = 8;

/// Splits a global ordinal into `(slot_index, position)`.
#[inline]
pub fn locate(ordinal: usize) -> (usize, u8) {
	(ordinal / SLOT_CAPACITY, (ordinal % SLOT_CAPACITY) as u8)
}

/// One storage word worth of selector cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
	cells: [Option<Selector>; SLOT_CAPACITY],
}

impl Slot {
	#[inline]
	pub fn get(&self, position: u8) -> Option<Selector> {
		self.cells.get(position as usize).copied().flatten()
	}

	/// Number of occupied cells.
	pub fn occupancy(&self) -> usize {
		self.cells.iter().filter(|c| c.is_some()).count()
	}

	pub fn is_empty(&self) -> bool {
		self.cells.iter().all(Option::is_none)
	}

	pub fn is_full(&self) -> bool {
		self.cells.iter().all(Option::is_some)
	}

	/// Raw cells, including empty ones.
	pub fn cells(&self) -> &[Option<Selector>; SLOT_CAPACITY] {
		&self.cells
	}

	fn put(&mut self, position: u8, selector: Selector) {
		self.cells[position as usize] = Some(selector);
	}

	fn take(&mut self, position: u8) -> Option<Selector> {
		self.cells[position as usize].take()
	}
}

impl<const N: usize> From<[Selector; N]> for Slot {
	/// Fills the leading cells. Arrays longer than [`SLOT_CAPACITY`] fail to compile.
	fn from(selectors: [Selector; N]) -> Self {
		const { assert!(N <= SLOT_CAPACITY, "array does not fit in one slot") };
		let mut slot = Self::default();
		for (i, s) in selectors.into_iter().enumerate() {
			slot.cells[i] = Some(s);
		}
		slot
	}
}

/// Dense array of slots plus the live selector count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotStore {
	slots: Vec<Slot>,
	len: usize,
}

impl SlotStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Reassembles a store from persisted parts. The result is not validated; callers run
	/// [`crate::RegistryState::check_invariants`] before trusting it.
	pub(crate) fn from_parts(slots: Vec<Slot>, len: usize) -> Self {
		Self { slots, len }
	}

	/// Number of live selectors.
	#[inline]
	pub fn len(&self) -> usize {
		self.len
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Index of the only slot that may be partially filled.
	#[inline]
	pub fn active_slot(&self) -> usize {
		self.len / SLOT_CAPACITY
	}

	pub fn slots(&self) -> &[Slot] {
		&self.slots
	}

	pub fn slot(&self, slot_index: usize) -> Option<&Slot> {
		self.slots.get(slot_index)
	}

	pub fn selector_at(&self, slot_index: usize, position: u8) -> Option<Selector> {
		self.slot(slot_index)?.get(position)
	}

	/// Writes `selector` into the next free cell and returns where it landed.
	pub fn append(&mut self, selector: Selector) -> (usize, u8) {
		let (slot_index, position) = locate(self.len);
		if slot_index == self.slots.len() {
			self.slots.push(Slot::default());
		}
		self.slots[slot_index].put(position, selector);
		self.len += 1;
		(slot_index, position)
	}

	/// Removes the selector at `(slot_index, position)` and fills the hole with the last
	/// selector in ordinal order.
	///
	/// Returns the selector that was moved into the vacated cell, or `None` when the vacated
	/// cell was itself the last one. A trailing slot left empty is dropped.
	pub fn swap_remove(&mut self, slot_index: usize, position: u8) -> Option<Selector> {
		let target = slot_index * SLOT_CAPACITY + position as usize;
		debug_assert!(target < self.len, "swap_remove past live count");
		if target >= self.len {
			return None;
		}

		let last = self.len - 1;
		let (last_slot, last_pos) = locate(last);
		let tail = self.slots[last_slot].take(last_pos);
		self.len = last;

		let moved = match tail {
			Some(tail) if target != last => {
				self.slots[slot_index].put(position, tail);
				Some(tail)
			}
			_ => None,
		};

		if self.slots[last_slot].is_empty() {
			self.slots.truncate(last_slot);
		}
		moved
	}

	/// Iterates live selectors in ordinal order as `(slot_index, position, selector)`.
	pub fn iter(&self) -> impl Iterator<Item = (usize, u8, Selector)> + '_ {
		(0..self.len).filter_map(move |ordinal| {
			let (slot_index, position) = locate(ordinal);
			Some((slot_index, position, self.selector_at(slot_index, position)?))
		})
	}
}
