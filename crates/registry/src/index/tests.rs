use diamond_primitives::{FacetAddress, Selector};

use super::{IndexEntry, PackedEntry, SelectorIndex};

fn sel(n: u32) -> Selector {
	Selector::from_u32(n)
}

#[test]
fn test_set_lookup_clear() {
	let mut index = SelectorIndex::new();
	let entry = IndexEntry::at(FacetAddress::repeat(0xaa), 9);
	index.set(sel(1), entry);

	assert_eq!(index.lookup(sel(1)), Some(entry));
	assert_eq!(entry.slot_index, 1);
	assert_eq!(entry.position, 1);
	assert_eq!(index.len(), 1);

	assert_eq!(index.clear(sel(1)), Some(entry));
	assert!(index.lookup(sel(1)).is_none());
	assert!(index.is_empty());
}

/// Clearing an absent key is a no-op rather than an error.
#[test]
fn test_clear_absent_is_noop() {
	let mut index = SelectorIndex::new();
	index.set(sel(1), IndexEntry::at(FacetAddress::repeat(1), 0));
	assert_eq!(index.clear(sel(2)), None);
	assert_eq!(index.len(), 1);
}

#[test]
fn test_overwrite_facet_keeps_position() {
	let mut index = SelectorIndex::new();
	index.set(sel(7), IndexEntry::at(FacetAddress::repeat(1), 13));

	let prev = index.overwrite_facet_only(sel(7), FacetAddress::repeat(2));
	assert_eq!(prev, Some(FacetAddress::repeat(1)));

	let entry = index.lookup(sel(7)).unwrap();
	assert_eq!(entry.facet, FacetAddress::repeat(2));
	assert_eq!(entry.ordinal(), 13);

	assert_eq!(index.overwrite_facet_only(sel(8), FacetAddress::repeat(2)), None);
}

#[test]
fn test_packed_entry_layout() {
	let entry = IndexEntry::at(FacetAddress::repeat(0xab), 0x0102);
	let word = PackedEntry::encode(&entry);
	let bytes = word.as_bytes();

	assert_eq!(&bytes[..20], &[0xab; 20]);
	assert_eq!(&bytes[20..24], &[0; 4]);
	assert_eq!(&bytes[24..], &[0, 0, 0, 0, 0, 0, 0x01, 0x02]);
	assert_eq!(word.decode(), Some(entry));
}

#[test]
fn test_packed_entry_rejects_dirty_reserved_bytes() {
	let mut raw = *PackedEntry::encode(&IndexEntry::at(FacetAddress::repeat(1), 3)).as_bytes();
	raw[21] = 0xff;
	assert_eq!(PackedEntry::from_bytes(raw).decode(), None);
}

/// Ordinals past `u32::MAX` use the full eight-byte field.
#[cfg(target_pointer_width = "64")]
#[test]
fn test_packed_entry_wide_ordinal() {
	let entry = IndexEntry::at(FacetAddress::repeat(0xcd), (1usize << 33) + 5);
	let word = PackedEntry::encode(&entry);

	assert_eq!(&word.as_bytes()[20..24], &[0; 4]);
	assert_eq!(&word.as_bytes()[24..], &[0, 0, 0, 0x02, 0, 0, 0, 0x05]);
	assert_eq!(word.decode(), Some(entry));
}
