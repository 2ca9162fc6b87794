//! Packed selector-to-facet registry.
//!
//! # Purpose
//!
//! Maps four-byte function selectors to the facet address that implements them, the routing
//! table behind a multi-facet dispatch proxy. Mutations arrive as ordered batches of
//! [`FacetCut`]s and are applied all-or-nothing.
//!
//! # Mental Model
//!
//! 1. **Storage:** [`SlotStore`] packs selectors eight to a [`Slot`], densely from slot 0
//!    upward. Only the highest slot may be partially filled.
//! 2. **Index:** [`SelectorIndex`] maps each selector to its facet and `(slot, position)`.
//! 3. **Batches:** [`CutProcessor`] adds, replaces, and swap-removes selectors on a private
//!    draft and returns it with a [`CutReport`] only if the whole batch validates.
//! 4. **Publication:** [`DiamondRegistry`] swaps the validated draft in atomically; readers
//!    hold `Arc<RegistryState>` snapshots and never see a half-applied batch.
//!
//! # Invariants
//!
//! - Density: `selector_count = 8 * full_slots + occupancy(active slot)`, no holes below the
//!   count, nothing stored past it.
//!   - Enforced in: [`SlotStore::append`], [`SlotStore::swap_remove`].
//!   - Tested by: `state::tests::prop_density_and_consistency`.
//!   - Failure symptom: stale selectors remain routable after removal.
//!
//! - Index/store consistency: a selector is indexed iff it is stored, at exactly the indexed
//!   cell.
//!   - Enforced in: [`CutProcessor::process`].
//!   - Tested by: `state::tests::prop_density_and_consistency`.
//!   - Failure symptom: [`RegistryState::check_invariants`] reports `Misplaced`.
//!
//! - Batch atomicity: a failing batch changes nothing.
//!   - Enforced in: [`CutProcessor::process`], [`DiamondRegistry::apply`].
//!   - Tested by: `cut::tests::test_batch_atomicity`.
//!   - Failure symptom: partially routed facets after a rejected batch.

pub mod config;
pub mod cut;
pub mod error;
pub mod index;
pub mod loupe;
pub mod persist;
pub mod runtime;
pub mod slots;
pub mod state;

pub use config::RegistryConfig;
pub use cut::{CutProcessor, CutReport, Replaced, Routed};
pub use diamond_primitives::{FacetAddress, FacetCut, Selector};
pub use error::{ConfigError, CutError, PersistError, RegistryError};
pub use index::{IndexEntry, PackedEntry, SelectorIndex};
pub use loupe::Facet;
pub use runtime::DiamondRegistry;
pub use slots::{SLOT_CAPACITY, Slot, SlotStore};
pub use state::{InvariantViolation, RegistryState};
