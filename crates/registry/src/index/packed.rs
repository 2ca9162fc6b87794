//! Storage-word codec for index entries.
//!
//! Layout of the 32-byte word:
//!
//! | Bytes | Field |
//! |-------|-------|
//! | `0..20` | facet address |
//! | `20..24` | reserved, zero |
//! | `24..32` | global selector ordinal, big-endian `u64` |

use diamond_primitives::FacetAddress;
use serde::{Deserialize, Serialize};

use super::IndexEntry;

const FACET_END: usize = FacetAddress::LEN;
const ORDINAL_START: usize = 24;

/// One index entry packed into a single storage word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedEntry([u8; 32]);

impl PackedEntry {
	pub fn encode(entry: &IndexEntry) -> Self {
		let mut word = [0u8; 32];
		word[..FACET_END].copy_from_slice(entry.facet.as_bytes());
		word[ORDINAL_START..].copy_from_slice(&(entry.ordinal() as u64).to_be_bytes());
		Self(word)
	}

	/// Unpacks the word. Returns `None` if the reserved bytes are dirty or the ordinal does not
	/// fit the host's address space.
	pub fn decode(&self) -> Option<IndexEntry> {
		if self.0[FACET_END..ORDINAL_START].iter().any(|&b| b != 0) {
			return None;
		}
		let facet = FacetAddress::from_slice(&self.0[..FACET_END]).ok()?;
		let ordinal = u64::from_be_bytes(self.0[ORDINAL_START..].try_into().ok()?);
		Some(IndexEntry::at(facet, usize::try_from(ordinal).ok()?))
	}

	pub fn as_bytes(&self) -> &[u8; 32] {
		&self.0
	}

	pub fn from_bytes(word: [u8; 32]) -> Self {
		Self(word)
	}
}
