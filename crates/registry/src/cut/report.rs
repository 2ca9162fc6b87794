use diamond_primitives::{FacetAddress, Selector};

/// A selector and the facet it was routed to (for additions) or from (for removals).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Routed {
	pub selector: Selector,
	pub facet: FacetAddress,
}

/// A selector that kept its slot but changed facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replaced {
	pub selector: Selector,
	pub previous: FacetAddress,
	pub facet: FacetAddress,
}

/// Outcome of a committed cut batch, in processing order.
///
/// A selector added and then removed within one batch shows up in both `added` and `removed`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CutReport {
	pub selector_count_before: usize,
	pub selector_count: usize,
	pub added: Vec<Routed>,
	pub replaced: Vec<Replaced>,
	pub removed: Vec<Routed>,
	/// Distinct slot words written by the batch.
	pub slots_touched: usize,
}

impl CutReport {
	/// Net change in registered selectors.
	pub fn delta(&self) -> isize {
		self.selector_count as isize - self.selector_count_before as isize
	}

	/// Whether the selector count word needs to be rewritten.
	pub fn count_changed(&self) -> bool {
		self.selector_count != self.selector_count_before
	}
}
