//! Shared registry container with atomic publication.
//!
//! # Role
//!
//! [`DiamondRegistry`] owns the committed [`RegistryState`] behind an [`ArcSwap`]. Dispatch-side
//! readers load the current snapshot without locking. Writers are serialized by a mutex; each
//! batch runs on a private clone and is published with a single pointer swap, so no reader
//! ever observes a partially applied batch.
//!
//! # Invariants
//!
//! - Readers observe either the state before a batch or the state after it, never a mix.
//!   - Enforced in: [`DiamondRegistry::apply`] (publish after full validation and persistence).
//!   - Tested by: `runtime::tests::test_pinned_snapshot_survives_commit`.
//!   - Failure symptom: dispatch routes a selector whose slot was already reused.

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use diamond_primitives::{FacetAddress, FacetCut, Selector};
use parking_lot::Mutex;

use crate::config::RegistryConfig;
use crate::cut::{CutProcessor, CutReport};
use crate::error::RegistryError;
use crate::index::IndexEntry;
use crate::persist;
use crate::state::RegistryState;

pub struct DiamondRegistry {
	snap: ArcSwap<RegistryState>,
	writer: Mutex<()>,
	config: RegistryConfig,
}

impl DiamondRegistry {
	/// Creates an empty registry. Nothing is read from `persist_path`.
	pub fn new(config: RegistryConfig) -> Self {
		Self::with_state(config, RegistryState::new())
	}

	pub fn with_state(config: RegistryConfig, state: RegistryState) -> Self {
		Self {
			snap: ArcSwap::from_pointee(state),
			writer: Mutex::new(()),
			config,
		}
	}

	/// Creates a registry, restoring the image at `persist_path` when one exists.
	pub fn open(config: RegistryConfig) -> Result<Self, RegistryError> {
		let state = match &config.persist_path {
			Some(path) if path.exists() => persist::load(path)?,
			_ => RegistryState::new(),
		};
		tracing::info!(
			selectors = state.selector_count(),
			persisted = config.persist_path.is_some(),
			"registry opened"
		);
		Ok(Self::with_state(config, state))
	}

	/// Reads a TOML config from `config_path`, then [`Self::open`]s with it.
	pub fn open_path(config_path: &Path) -> Result<Self, RegistryError> {
		let config = RegistryConfig::load(config_path).inspect_err(|err| {
			tracing::warn!(path = %config_path.display(), error = %err, "failed to load registry config");
		})?;
		Self::open(config)
	}

	pub fn config(&self) -> &RegistryConfig {
		&self.config
	}

	/// Current committed state. The returned snapshot stays valid across later commits.
	pub fn snapshot(&self) -> Arc<RegistryState> {
		self.snap.load_full()
	}

	#[inline]
	pub fn facet_address(&self, selector: Selector) -> Option<FacetAddress> {
		self.snap.load().facet_address(selector)
	}

	#[inline]
	pub fn lookup(&self, selector: Selector) -> Option<IndexEntry> {
		self.snap.load().lookup(selector)
	}

	pub fn selector_count(&self) -> usize {
		self.snap.load().selector_count()
	}

	/// Applies a cut batch atomically.
	///
	/// The batch is validated in full, checked against the invariants when configured, and
	/// persisted when a `persist_path` is set, before it becomes visible. Any failure leaves
	/// the published state untouched.
	pub fn apply(&self, cuts: &[FacetCut]) -> Result<CutReport, RegistryError> {
		let _writer = self.writer.lock();
		let base = self.snap.load_full();

		let (next, report) = CutProcessor::new(RegistryState::clone(&base))
			.immutable_facet(self.config.immutable_facet)
			.process(cuts)
			.inspect_err(|err| {
				tracing::warn!(
					cut = err.cut(),
					selector = ?err.selector(),
					error = %err,
					"cut batch rejected"
				);
			})?;

		if self.config.check_invariants || cfg!(feature = "registry-contracts") {
			next.check_invariants()?;
		}

		if let Some(path) = &self.config.persist_path {
			persist::save(path, &next).inspect_err(|err| {
				tracing::warn!(path = %path.display(), error = %err, "failed to persist cut batch");
			})?;
		}

		self.snap.store(Arc::new(next));
		tracing::info!(
			cuts = cuts.len(),
			added = report.added.len(),
			replaced = report.replaced.len(),
			removed = report.removed.len(),
			selectors = report.selector_count,
			slots_touched = report.slots_touched,
			"cut batch committed"
		);
		Ok(report)
	}
}

impl Default for DiamondRegistry {
	fn default() -> Self {
		Self::new(RegistryConfig::default())
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use diamond_primitives::{FacetAddress, FacetCut, Selector};

	use super::*;
	use crate::error::{ConfigError, CutError, RegistryError};

	const A: FacetAddress = FacetAddress::repeat(0xaa);
	const B: FacetAddress = FacetAddress::repeat(0xbb);
	const SELF: FacetAddress = FacetAddress::repeat(0x11);

	fn sel(n: u32) -> Selector {
		Selector::from_u32(n)
	}

	fn checked() -> RegistryConfig {
		RegistryConfig {
			check_invariants: true,
			..RegistryConfig::default()
		}
	}

	#[test]
	fn test_apply_publishes_new_state() {
		let _ = tracing_subscriber::fmt::try_init();
		let registry = DiamondRegistry::new(checked());
		let report = registry.apply(&[FacetCut::new(A, [sel(1), sel(2)])]).unwrap();

		assert_eq!(report.delta(), 2);
		assert_eq!(registry.selector_count(), 2);
		assert_eq!(registry.facet_address(sel(2)), Some(A));
		assert_eq!(registry.lookup(sel(2)).map(|e| e.ordinal()), Some(1));
	}

	/// A reader holding a snapshot keeps seeing the old state after a commit.
	#[test]
	fn test_pinned_snapshot_survives_commit() {
		let registry = DiamondRegistry::new(checked());
		registry.apply(&[FacetCut::new(A, [sel(1)])]).unwrap();

		let before = registry.snapshot();
		registry.apply(&[FacetCut::new(B, [sel(1)])]).unwrap();

		assert_eq!(before.facet_address(sel(1)), Some(A));
		assert_eq!(registry.facet_address(sel(1)), Some(B));
		assert!(!Arc::ptr_eq(&before, &registry.snapshot()));
	}

	#[test]
	fn test_rejected_batch_keeps_snapshot() {
		let registry = DiamondRegistry::new(checked());
		registry.apply(&[FacetCut::new(A, [sel(1)])]).unwrap();
		let before = registry.snapshot();

		let err = registry
			.apply(&[FacetCut::new(B, [sel(2)]), FacetCut::remove([sel(9)])])
			.unwrap_err();
		assert!(matches!(
			err,
			RegistryError::Cut(CutError::UnknownSelector { cut: 1, .. })
		));
		assert!(Arc::ptr_eq(&before, &registry.snapshot()));
		assert_eq!(registry.facet_address(sel(2)), None);
	}

	#[test]
	fn test_immutable_facet_is_protected() {
		let registry = DiamondRegistry::new(RegistryConfig {
			immutable_facet: Some(SELF),
			..checked()
		});
		registry
			.apply(&[FacetCut::new(SELF, [sel(1)]), FacetCut::new(A, [sel(2)])])
			.unwrap();

		let replace = registry.apply(&[FacetCut::new(B, [sel(1)])]).unwrap_err();
		assert!(matches!(
			replace,
			RegistryError::Cut(CutError::ImmutableSelector { cut: 0, .. })
		));
		let remove = registry.apply(&[FacetCut::remove([sel(2), sel(1)])]).unwrap_err();
		assert!(matches!(
			remove,
			RegistryError::Cut(CutError::ImmutableSelector { cut: 0, selector }) if selector == sel(1)
		));
		assert_eq!(registry.selector_count(), 2);
	}

	#[test]
	fn test_open_restores_persisted_image() {
		let dir = tempfile::tempdir().unwrap();
		let config = RegistryConfig {
			persist_path: Some(dir.path().join("registry.bin")),
			..checked()
		};

		let registry = DiamondRegistry::open(config.clone()).unwrap();
		assert_eq!(registry.selector_count(), 0);
		registry
			.apply(&[FacetCut::new(A, (1..=9).map(sel)), FacetCut::remove([sel(4)])])
			.unwrap();
		let committed = registry.snapshot();
		drop(registry);

		let reopened = DiamondRegistry::open(config).unwrap();
		assert_eq!(*reopened.snapshot(), *committed);
		assert_eq!(reopened.lookup(sel(9)).map(|e| e.ordinal()), Some(3));
	}

	/// A persistence failure aborts the batch before publication.
	#[test]
	fn test_persist_failure_keeps_state() {
		let dir = tempfile::tempdir().unwrap();
		let registry = DiamondRegistry::new(RegistryConfig {
			persist_path: Some(dir.path().join("missing").join("registry.bin")),
			..checked()
		});
		let err = registry.apply(&[FacetCut::new(A, [sel(1)])]).unwrap_err();
		assert!(matches!(err, RegistryError::Persist(_)));
		assert_eq!(registry.selector_count(), 0);
	}

	#[test]
	fn test_open_path_reads_config_file() {
		let dir = tempfile::tempdir().unwrap();
		let image = dir.path().join("registry.bin");
		let config_path = dir.path().join("registry.toml");
		std::fs::write(
			&config_path,
			format!(
				"immutable_facet = \"{SELF}\"\npersist_path = {:?}\ncheck_invariants = true\n",
				image.display().to_string()
			),
		)
		.unwrap();

		let registry = DiamondRegistry::open_path(&config_path).unwrap();
		assert_eq!(registry.config().immutable_facet, Some(SELF));
		registry.apply(&[FacetCut::new(SELF, [sel(1)])]).unwrap();
		assert!(image.exists());

		let reopened = DiamondRegistry::open_path(&config_path).unwrap();
		assert_eq!(reopened.facet_address(sel(1)), Some(SELF));
	}

	#[test]
	fn test_open_path_missing_config_is_config_error() {
		let dir = tempfile::tempdir().unwrap();
		let err = DiamondRegistry::open_path(&dir.path().join("absent.toml"))
			.err()
			.unwrap();
		assert!(matches!(err, RegistryError::Config(ConfigError::Io { .. })));
	}

	#[test]
	fn test_open_path_malformed_config_is_config_error() {
		let dir = tempfile::tempdir().unwrap();
		let config_path = dir.path().join("registry.toml");
		std::fs::write(&config_path, "check_invariants = \"yes\"\n").unwrap();
		let err = DiamondRegistry::open_path(&config_path).err().unwrap();
		assert!(matches!(err, RegistryError::Config(ConfigError::Parse(_))));
	}
}
