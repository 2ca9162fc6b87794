//! Density and index/store consistency checks.
//!
//! Run after decoding a persisted image, after every committed batch when
//! `check_invariants` is configured (or the `registry-contracts` feature is on), and from the
//! property tests.

use diamond_primitives::Selector;

use super::RegistryState;
use crate::slots::{SLOT_CAPACITY, locate};

/// First invariant violation found in a [`RegistryState`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
	#[error("expected {expected} slots for the selector count, found {found}")]
	SlotCount { expected: usize, found: usize },

	#[error("empty cell at ({slot}, {position}) below the selector count")]
	Hole { slot: usize, position: u8 },

	#[error("stale selector {selector} at ({slot}, {position}) past the selector count")]
	Stale {
		selector: Selector,
		slot: usize,
		position: u8,
	},

	#[error("index holds {index} entries but selector count is {selector_count}")]
	IndexSize { index: usize, selector_count: usize },

	#[error("selector {selector} at ({slot}, {position}) is not indexed")]
	Unindexed {
		selector: Selector,
		slot: usize,
		position: u8,
	},

	#[error("selector {selector} indexed at ordinal {indexed} but stored at {stored}")]
	Misplaced {
		selector: Selector,
		indexed: usize,
		stored: usize,
	},

	#[error("selector {selector} is routed to the removal sentinel")]
	RemovalFacet { selector: Selector },
}

impl RegistryState {
	/// Verifies the density invariant and that the index mirrors the slot contents exactly.
	pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
		let count = self.store.len();
		let slots = self.store.slots();

		let expected = count.div_ceil(SLOT_CAPACITY);
		if slots.len() != expected {
			return Err(InvariantViolation::SlotCount {
				expected,
				found: slots.len(),
			});
		}

		for (slot_index, slot) in slots.iter().enumerate() {
			for (cell, occupant) in slot.cells().iter().enumerate() {
				let ordinal = slot_index * SLOT_CAPACITY + cell;
				let (slot, position) = locate(ordinal);
				match (*occupant, ordinal < count) {
					(None, true) => return Err(InvariantViolation::Hole { slot, position }),
					(Some(selector), false) => {
						return Err(InvariantViolation::Stale {
							selector,
							slot,
							position,
						});
					}
					(Some(selector), true) => {
						let entry = self.index.lookup(selector).ok_or(
							InvariantViolation::Unindexed {
								selector,
								slot,
								position,
							},
						)?;
						if entry.ordinal() != ordinal {
							return Err(InvariantViolation::Misplaced {
								selector,
								indexed: entry.ordinal(),
								stored: ordinal,
							});
						}
						if entry.facet.is_removal() {
							return Err(InvariantViolation::RemovalFacet { selector });
						}
					}
					(None, false) => {}
				}
			}
		}

		// Every stored selector is indexed at its own cell, so equal sizes rule out
		// index entries that point nowhere.
		if self.index.len() != count {
			return Err(InvariantViolation::IndexSize {
				index: self.index.len(),
				selector_count: count,
			});
		}
		Ok(())
	}
}
