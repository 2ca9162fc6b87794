//! Read-only introspection over registered facets.
//!
//! Facets are reported in the order their first selector appears in the slots, and each
//! facet's selectors in slot order. Swap-removes can therefore reorder results between
//! batches.

use diamond_primitives::{FacetAddress, Selector};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::state::RegistryState;

/// A facet together with every selector routed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facet {
	pub address: FacetAddress,
	pub selectors: Vec<Selector>,
}

impl RegistryState {
	/// Facet serving `selector`, if registered.
	#[inline]
	pub fn facet_address(&self, selector: Selector) -> Option<FacetAddress> {
		self.index.lookup(selector).map(|e| e.facet)
	}

	/// All facets with their selectors.
	pub fn facets(&self) -> Vec<Facet> {
		let mut by_facet: FxHashMap<FacetAddress, usize> = FxHashMap::default();
		let mut facets: Vec<Facet> = Vec::new();
		for (selector, facet) in self.routed() {
			let i = *by_facet.entry(facet).or_insert_with(|| {
				facets.push(Facet {
					address: facet,
					selectors: Vec::new(),
				});
				facets.len() - 1
			});
			facets[i].selectors.push(selector);
		}
		facets
	}

	/// Selectors routed to `facet`.
	pub fn facet_selectors(&self, facet: FacetAddress) -> Vec<Selector> {
		self.routed()
			.filter(|&(_, f)| f == facet)
			.map(|(s, _)| s)
			.collect()
	}

	/// Distinct facet addresses in use.
	pub fn facet_addresses(&self) -> Vec<FacetAddress> {
		let mut seen = FxHashSet::default();
		self.routed()
			.filter_map(|(_, f)| seen.insert(f).then_some(f))
			.collect()
	}

	/// `(selector, facet)` pairs in slot order.
	fn routed(&self) -> impl Iterator<Item = (Selector, FacetAddress)> + '_ {
		self.store
			.iter()
			.filter_map(|(_, _, selector)| Some((selector, self.facet_address(selector)?)))
	}
}
