use serde::{Deserialize, Serialize};

use crate::{FacetAddress, Selector};

/// One instruction of a cut batch.
///
/// A cut naming a real facet adds or replaces its selectors; a cut naming
/// [`FacetAddress::REMOVAL`] unregisters them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetCut {
	pub facet: FacetAddress,
	pub selectors: Vec<Selector>,
}

impl FacetCut {
	pub fn new(facet: FacetAddress, selectors: impl IntoIterator<Item = Selector>) -> Self {
		Self {
			facet,
			selectors: selectors.into_iter().collect(),
		}
	}

	/// Builds a removal cut for `selectors`.
	pub fn remove(selectors: impl IntoIterator<Item = Selector>) -> Self {
		Self::new(FacetAddress::REMOVAL, selectors)
	}

	#[inline]
	pub fn is_removal(&self) -> bool {
		self.facet.is_removal()
	}
}
