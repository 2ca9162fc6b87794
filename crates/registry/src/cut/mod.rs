//! Batched facet-cut processing.
//!
//! # Role
//!
//! [`CutProcessor`] applies an ordered batch of [`FacetCut`]s to a working copy of the
//! registry. The working copy is only handed back once every cut has validated, so a failure
//! anywhere in the batch leaves the caller's state untouched.
//!
//! # Invariants
//!
//! - Batches are all-or-nothing.
//!   - Enforced in: [`CutProcessor::process`] (consumes the draft on error).
//!   - Tested by: `cut::tests::test_batch_atomicity`.
//!   - Failure symptom: a rejected batch leaves half its selectors routed.
//!
//! - A selector swapped into a vacated cell has its index entry moved with it.
//!   - Enforced in: `CutProcessor::remove`.
//!   - Tested by: `state::tests::prop_density_and_consistency`.
//!   - Failure symptom: dispatch resolves a selector to a cell holding another selector.

mod report;

use diamond_primitives::{FacetAddress, FacetCut, Selector};
use rustc_hash::FxHashSet;

pub use report::{CutReport, Replaced, Routed};

use crate::error::CutError;
use crate::index::IndexEntry;
use crate::slots::locate;
use crate::state::RegistryState;

/// Applies cut batches to an owned draft of the registry.
pub struct CutProcessor {
	draft: RegistryState,
	immutable_facet: Option<FacetAddress>,
	report: CutReport,
	touched: FxHashSet<usize>,
}

impl CutProcessor {
	/// Starts a batch on `draft`, usually a clone of the committed state.
	pub fn new(draft: RegistryState) -> Self {
		let report = CutReport {
			selector_count_before: draft.selector_count(),
			..CutReport::default()
		};
		Self {
			draft,
			immutable_facet: None,
			report,
			touched: FxHashSet::default(),
		}
	}

	/// Protects selectors routed to `facet` from replacement and removal.
	pub fn immutable_facet(mut self, facet: Option<FacetAddress>) -> Self {
		self.immutable_facet = facet.filter(|f| !f.is_removal());
		self
	}

	/// Runs every cut in order and returns the new state with its report.
	///
	/// On error the draft is dropped; nothing observable has changed.
	pub fn process(mut self, cuts: &[FacetCut]) -> Result<(RegistryState, CutReport), CutError> {
		for (ordinal, cut) in cuts.iter().enumerate() {
			if cut.selectors.is_empty() {
				return Err(CutError::MalformedCut { cut: ordinal });
			}
			tracing::debug!(
				cut = ordinal,
				facet = %cut.facet,
				selectors = cut.selectors.len(),
				removal = cut.is_removal(),
				"processing facet cut"
			);
			for &selector in &cut.selectors {
				if cut.is_removal() {
					self.remove(ordinal, selector)?;
				} else {
					self.route(ordinal, cut.facet, selector)?;
				}
			}
		}
		Ok(self.finish())
	}

	fn route(&mut self, cut: usize, facet: FacetAddress, selector: Selector) -> Result<(), CutError> {
		let Some(existing) = self.draft.index.lookup(selector) else {
			let (slot_index, position) = self.draft.store.append(selector);
			self.touched.insert(slot_index);
			self.draft.index.set(
				selector,
				IndexEntry {
					facet,
					slot_index,
					position,
				},
			);
			self.report.added.push(Routed { selector, facet });
			return Ok(());
		};

		if existing.facet == facet {
			return Err(CutError::NoOpReplace {
				cut,
				selector,
				facet,
			});
		}
		self.guard_immutable(cut, selector, existing.facet)?;
		self.draft.index.overwrite_facet_only(selector, facet);
		self.report.replaced.push(Replaced {
			selector,
			previous: existing.facet,
			facet,
		});
		Ok(())
	}

	fn remove(&mut self, cut: usize, selector: Selector) -> Result<(), CutError> {
		let entry = self
			.draft
			.index
			.lookup(selector)
			.ok_or(CutError::UnknownSelector { cut, selector })?;
		self.guard_immutable(cut, selector, entry.facet)?;

		let (last_slot, _) = locate(self.draft.store.len().saturating_sub(1));
		let moved = self.draft.store.swap_remove(entry.slot_index, entry.position);
		self.touched.insert(entry.slot_index);
		self.touched.insert(last_slot);

		if let Some(moved) = moved {
			self.draft
				.index
				.relocate(moved, entry.slot_index, entry.position);
		}
		self.draft.index.clear(selector);
		self.report.removed.push(Routed {
			selector,
			facet: entry.facet,
		});
		Ok(())
	}

	fn guard_immutable(
		&self,
		cut: usize,
		selector: Selector,
		current: FacetAddress,
	) -> Result<(), CutError> {
		if self.immutable_facet == Some(current) {
			return Err(CutError::ImmutableSelector { cut, selector });
		}
		Ok(())
	}

	fn finish(mut self) -> (RegistryState, CutReport) {
		self.report.selector_count = self.draft.selector_count();
		self.report.slots_touched = self.touched.len();
		(self.draft, self.report)
	}
}
