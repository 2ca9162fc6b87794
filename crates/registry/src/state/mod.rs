//! Owned registry state: slot store plus selector index.

mod invariants;

use diamond_primitives::{FacetAddress, FacetCut, Selector};

pub use invariants::InvariantViolation;

use crate::cut::{CutProcessor, CutReport};
use crate::error::CutError;
use crate::index::{IndexEntry, SelectorIndex};
use crate::slots::{Slot, SlotStore};

/// The registry triple: selector count, packed slots and index.
///
/// The selector count lives in the [`SlotStore`]. Mutation goes through cut batches only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryState {
	pub(crate) store: SlotStore,
	pub(crate) index: SelectorIndex,
}

impl RegistryState {
	pub fn new() -> Self {
		Self::default()
	}

	pub(crate) fn from_parts(store: SlotStore, index: SelectorIndex) -> Self {
		Self { store, index }
	}

	#[inline]
	pub fn selector_count(&self) -> usize {
		self.store.len()
	}

	pub fn is_empty(&self) -> bool {
		self.store.is_empty()
	}

	pub fn slots(&self) -> &[Slot] {
		self.store.slots()
	}

	pub fn store(&self) -> &SlotStore {
		&self.store
	}

	pub fn index(&self) -> &SelectorIndex {
		&self.index
	}

	#[inline]
	pub fn lookup(&self, selector: Selector) -> Option<IndexEntry> {
		self.index.lookup(selector)
	}

	/// Applies `cuts` in place. On error `self` is unchanged.
	pub fn apply(&mut self, cuts: &[FacetCut]) -> Result<CutReport, CutError> {
		self.apply_with(cuts, None)
	}

	/// Like [`Self::apply`], protecting selectors routed to `immutable_facet`.
	pub fn apply_with(
		&mut self,
		cuts: &[FacetCut],
		immutable_facet: Option<FacetAddress>,
	) -> Result<CutReport, CutError> {
		let (next, report) = CutProcessor::new(self.clone())
			.immutable_facet(immutable_facet)
			.process(cuts)?;
		*self = next;
		Ok(report)
	}
}
