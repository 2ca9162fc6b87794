//! Durable registry images.
//!
//! An image is [`MAGIC`], the little-endian [`SCHEMA_VERSION`], then a postcard payload holding
//! the selector count, the slots, and one [`PackedEntry`] word per registered selector.
//! Decoding re-validates the invariants, so a truncated or hand-edited image is rejected
//! rather than loaded half-consistent.

use std::fs;
use std::io::Write;
use std::path::Path;

use diamond_primitives::Selector;
use serde::{Deserialize, Serialize};

use crate::error::PersistError;
use crate::index::{PackedEntry, SelectorIndex};
use crate::slots::{Slot, SlotStore};
use crate::state::RegistryState;

/// Magic bytes identifying a registry image.
pub const MAGIC: &[u8; 8] = b"DIAMSLOT";

/// Schema version for image compatibility.
pub const SCHEMA_VERSION: u32 = 1;

/// Total header size in bytes (magic + version).
pub const HEADER_SIZE: usize = MAGIC.len() + size_of::<u32>();

#[derive(Serialize, Deserialize)]
struct Image {
	selector_count: usize,
	slots: Vec<Slot>,
	index: Vec<(Selector, PackedEntry)>,
}

/// Validates the image header and returns the payload slice.
fn payload(data: &[u8]) -> Option<&[u8]> {
	if data.len() < HEADER_SIZE || &data[..MAGIC.len()] != MAGIC {
		return None;
	}
	let version = u32::from_le_bytes(data[MAGIC.len()..HEADER_SIZE].try_into().ok()?);
	if version != SCHEMA_VERSION {
		return None;
	}
	Some(&data[HEADER_SIZE..])
}

pub fn encode(state: &RegistryState) -> Result<Vec<u8>, PersistError> {
	let mut index: Vec<_> = state.index.iter().collect();
	index.sort_unstable_by_key(|(_, entry)| entry.ordinal());

	let image = Image {
		selector_count: state.selector_count(),
		slots: state.slots().to_vec(),
		index: index
			.into_iter()
			.map(|(selector, entry)| (selector, PackedEntry::encode(&entry)))
			.collect(),
	};

	let body = postcard::to_stdvec(&image)?;
	let mut out = Vec::with_capacity(HEADER_SIZE + body.len());
	out.extend_from_slice(MAGIC);
	out.extend_from_slice(&SCHEMA_VERSION.to_le_bytes());
	out.extend_from_slice(&body);
	Ok(out)
}

pub fn decode(data: &[u8]) -> Result<RegistryState, PersistError> {
	let payload = payload(data).ok_or(PersistError::Header)?;
	let image: Image = postcard::from_bytes(payload)?;

	let mut index = SelectorIndex::new();
	for (selector, word) in image.index {
		let entry = word.decode().ok_or(PersistError::Entry { selector })?;
		index.set(selector, entry);
	}

	let state = RegistryState::from_parts(
		SlotStore::from_parts(image.slots, image.selector_count),
		index,
	);
	state.check_invariants()?;
	Ok(state)
}

/// Writes `state` to `path`, replacing any previous image only once the new one is synced.
///
/// The image is staged in a uniquely named file beside `path`, flushed to disk, then renamed
/// over the target, so a crash leaves either the old image or the new one.
pub fn save(path: &Path, state: &RegistryState) -> Result<(), PersistError> {
	let bytes = encode(state)?;
	let dir = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};
	let mut staged = tempfile::NamedTempFile::new_in(dir)?;
	staged.write_all(&bytes)?;
	staged.as_file().sync_all()?;
	staged.persist(path).map_err(|e| e.error)?;
	tracing::debug!(path = %path.display(), bytes = bytes.len(), "registry image saved");
	Ok(())
}

pub fn load(path: &Path) -> Result<RegistryState, PersistError> {
	let state = decode(&fs::read(path)?)?;
	tracing::debug!(
		path = %path.display(),
		selectors = state.selector_count(),
		"registry image loaded"
	);
	Ok(state)
}
