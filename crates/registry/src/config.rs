//! Registry configuration.
//!
//! Loaded from TOML:
//!
//! ```toml
//! immutable_facet = "0x1111111111111111111111111111111111111111"
//! persist_path = "/var/lib/diamond/registry.bin"
//! check_invariants = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use diamond_primitives::FacetAddress;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
	/// Facet whose selectors may never be replaced or removed.
	pub immutable_facet: Option<FacetAddress>,
	/// Image written after every committed batch and read back by
	/// [`crate::DiamondRegistry::open`].
	pub persist_path: Option<PathBuf>,
	/// Re-verify density and index consistency before publishing each batch.
	pub check_invariants: bool,
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			immutable_facet: None,
			persist_path: None,
			check_invariants: cfg!(debug_assertions),
		}
	}
}

impl RegistryConfig {
	pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(text)?)
	}

	pub fn load(path: &Path) -> Result<Self, ConfigError> {
		let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&text)
	}
}
