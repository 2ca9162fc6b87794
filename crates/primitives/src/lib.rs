//! Core value types for the diamond registry: selectors, facet addresses and cuts.

/// Facet cut instructions.
pub mod cut;
/// Fixed-width selector and facet address identifiers.
pub mod ids;

pub use cut::FacetCut;
pub use ids::{FacetAddress, ParseError, Selector};
