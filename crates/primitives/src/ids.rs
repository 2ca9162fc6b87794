//! Fixed-width identifiers for selectors and facet addresses.
//!
//! Both types are plain byte arrays with identity semantics. They render as `0x`-prefixed
//! lowercase hex and parse from hex with or without the prefix. Human-readable serde formats
//! (TOML, JSON) see the hex string; binary formats (postcard) see the raw bytes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error produced when decoding an identifier from bytes or hex.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
	/// Input had the wrong number of bytes for the identifier.
	#[error("expected {expected} bytes, found {found}")]
	Length { expected: usize, found: usize },
	/// Input was not valid hex.
	#[error("invalid hex: {0}")]
	Hex(#[from] hex::FromHexError),
}

macro_rules! fixed_bytes {
	($(#[$meta:meta])* $name:ident, $len:expr) => {
		$(#[$meta])*
		#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
		pub struct $name([u8; $len]);

		impl $name {
			/// Width of the identifier in bytes.
			pub const LEN: usize = $len;

			pub const fn new(bytes: [u8; $len]) -> Self {
				Self(bytes)
			}

			pub const fn as_bytes(&self) -> &[u8; $len] {
				&self.0
			}

			/// Copies an identifier out of a slice of exactly [`Self::LEN`] bytes.
			pub fn from_slice(bytes: &[u8]) -> Result<Self, ParseError> {
				let arr: [u8; $len] = bytes.try_into().map_err(|_| ParseError::Length {
					expected: $len,
					found: bytes.len(),
				})?;
				Ok(Self(arr))
			}
		}

		impl From<[u8; $len]> for $name {
			fn from(bytes: [u8; $len]) -> Self {
				Self(bytes)
			}
		}

		impl FromStr for $name {
			type Err = ParseError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				let digits = s
					.strip_prefix("0x")
					.or_else(|| s.strip_prefix("0X"))
					.unwrap_or(s);
				Self::from_slice(&hex::decode(digits)?)
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "0x{}", hex::encode(self.0))
			}
		}

		impl fmt::Debug for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, concat!(stringify!($name), "({})"), self)
			}
		}

		impl Serialize for $name {
			fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
				if serializer.is_human_readable() {
					serializer.collect_str(self)
				} else {
					self.0.serialize(serializer)
				}
			}
		}

		impl<'de> Deserialize<'de> for $name {
			fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
				if deserializer.is_human_readable() {
					let s = String::deserialize(deserializer)?;
					s.parse().map_err(serde::de::Error::custom)
				} else {
					<[u8; $len]>::deserialize(deserializer).map(Self)
				}
			}
		}
	};
}

fixed_bytes!(
	/// Four-byte function identifier routed by the registry.
	Selector,
	4
);

fixed_bytes!(
	/// Twenty-byte address of a facet implementing one or more selectors.
	///
	/// The all-zero address is reserved as the removal sentinel, see [`FacetAddress::REMOVAL`].
	FacetAddress,
	20
);

impl Selector {
	/// Builds a selector from its big-endian integer form.
	pub const fn from_u32(value: u32) -> Self {
		Self(value.to_be_bytes())
	}

	pub const fn to_u32(self) -> u32 {
		u32::from_be_bytes(self.0)
	}
}

impl FacetAddress {
	/// Sentinel facet meaning "unregister the listed selectors".
	pub const REMOVAL: Self = Self([0; 20]);

	#[inline]
	pub fn is_removal(&self) -> bool {
		*self == Self::REMOVAL
	}

	/// Address with every byte set to `byte`. Handy for fixtures and docs.
	pub const fn repeat(byte: u8) -> Self {
		Self([byte; 20])
	}
}
