use std::path::PathBuf;

use diamond_primitives::{FacetAddress, Selector};

use crate::state::InvariantViolation;

/// Batch-fatal errors raised while processing a cut batch.
///
/// `cut` is the zero-based ordinal of the offending cut within the batch. Any of these aborts
/// the whole batch; the registry is left exactly as it was before the batch started.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CutError {
	/// The cut names no selectors.
	#[error("cut {cut}: no selectors in facet cut")]
	MalformedCut { cut: usize },

	/// A removal named a selector that is not registered.
	#[error("cut {cut}: cannot remove unknown selector {selector}")]
	UnknownSelector { cut: usize, selector: Selector },

	/// A replace would route a selector to the facet it already uses.
	#[error("cut {cut}: selector {selector} is already routed to {facet}")]
	NoOpReplace {
		cut: usize,
		selector: Selector,
		facet: FacetAddress,
	},

	/// The selector belongs to the immutable facet and cannot be replaced or removed.
	#[error("cut {cut}: selector {selector} is immutable")]
	ImmutableSelector { cut: usize, selector: Selector },
}

impl CutError {
	/// Ordinal of the offending cut.
	pub fn cut(&self) -> usize {
		match self {
			Self::MalformedCut { cut }
			| Self::UnknownSelector { cut, .. }
			| Self::NoOpReplace { cut, .. }
			| Self::ImmutableSelector { cut, .. } => *cut,
		}
	}

	/// Offending selector, when the failure is tied to one.
	pub fn selector(&self) -> Option<Selector> {
		match self {
			Self::MalformedCut { .. } => None,
			Self::UnknownSelector { selector, .. }
			| Self::NoOpReplace { selector, .. }
			| Self::ImmutableSelector { selector, .. } => Some(*selector),
		}
	}
}

/// Errors reading or writing a persisted registry image.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
	#[error("registry image i/o: {0}")]
	Io(#[from] std::io::Error),

	/// Magic bytes or schema version did not match.
	#[error("not a registry image (bad magic or schema version)")]
	Header,

	#[error("registry image codec: {0}")]
	Codec(#[from] postcard::Error),

	/// A packed index word had non-zero reserved bytes.
	#[error("malformed packed index entry for selector {selector}")]
	Entry { selector: Selector },

	/// The decoded image violates the density or consistency invariants.
	#[error("inconsistent registry image: {0}")]
	Inconsistent(#[from] InvariantViolation),
}

/// Errors loading a [`crate::RegistryConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read config {}: {source}", path.display())]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid registry config: {0}")]
	Parse(#[from] toml::de::Error),
}

/// Umbrella error for [`crate::DiamondRegistry`] operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
	#[error(transparent)]
	Cut(#[from] CutError),

	#[error(transparent)]
	Persist(#[from] PersistError),

	/// A committed batch would have produced an inconsistent state.
	#[error("registry contract violated: {0}")]
	Contract(#[from] InvariantViolation),

	#[error(transparent)]
	Config(#[from] ConfigError),
}
