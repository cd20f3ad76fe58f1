//! Configuration reload controller.
//!
//! Owns the served [`CatalogSnapshot`] and replaces it only with a candidate
//! that was built and validated in full. Readers load the current snapshot
//! lock-free; a swap publishes configuration, schemas, and dataset sources
//! in a single pointer store.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::{ArcSwap, ArcSwapOption};
use catalog_core::ConfigError;
use notify::RecommendedWatcher;
use notify_debouncer_mini::Debouncer;
use parking_lot::Mutex;
use tracing::{info, warn};

use super::snapshot::CatalogSnapshot;
use crate::config::load_config;

/// Lifecycle of a [`ReloadController`].
///
/// `Uninitialized -> Active -> (Reloading -> Active)* -> Shutdown`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Active,
    Reloading,
    Shutdown,
}

impl LifecycleState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Active => "active",
            LifecycleState::Reloading => "reloading",
            LifecycleState::Shutdown => "shutdown",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from driving the controller's lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("controller is {actual}, expected {expected}")]
    InvalidState {
        actual: LifecycleState,
        expected: LifecycleState,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to watch configuration: {0}")]
    Watch(#[from] notify::Error),
}

/// Loads the dataset configuration and keeps the last good version serving.
///
/// `initialize` fails hard on an invalid configuration. `reload` builds a
/// complete candidate with identical validation and swaps it in only on
/// success; on failure the previous snapshot keeps serving untouched.
/// Lifecycle transitions are serialized, so at most one candidate is being
/// built at any time.
pub struct ReloadController {
    config_path: PathBuf,
    base_dir: PathBuf,
    active: ArcSwapOption<CatalogSnapshot>,
    state: ArcSwap<LifecycleState>,
    transition: Mutex<()>,
    watcher: Mutex<Option<Debouncer<RecommendedWatcher>>>,
}

impl ReloadController {
    /// Creates an uninitialized controller for the configuration at `config_path`.
    #[must_use]
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        let config_path = config_path.into();
        let base_dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            config_path,
            base_dir,
            active: ArcSwapOption::empty(),
            state: ArcSwap::from_pointee(LifecycleState::Uninitialized),
            transition: Mutex::new(()),
            watcher: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    #[must_use]
    pub fn state(&self) -> LifecycleState {
        **self.state.load()
    }

    /// The snapshot currently being served, if any.
    ///
    /// Callers keep the returned `Arc` for the whole request; a concurrent
    /// reload does not affect it.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<CatalogSnapshot>> {
        self.active.load_full()
    }

    /// Generation of the served snapshot, if any.
    #[must_use]
    pub fn generation(&self) -> Option<u64> {
        (*self.active.load()).as_ref().map(|s| s.generation())
    }

    /// Loads and validates the configuration, then starts serving it.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidState`] unless uninitialized, and
    /// [`LifecycleError::Config`] if the configuration is invalid. The
    /// controller stays uninitialized on failure.
    pub fn initialize(&self) -> Result<u64, LifecycleError> {
        let _guard = self.transition.lock();
        self.expect_state(LifecycleState::Uninitialized)?;

        let snapshot = self.build_candidate(1)?;
        let datasets = snapshot.catalog().len();
        self.active.store(Some(Arc::new(snapshot)));
        self.set_state(LifecycleState::Active);

        info!(
            path = %self.config_path.display(),
            generation = 1,
            datasets,
            "configuration loaded"
        );
        Ok(1)
    }

    /// Builds a candidate from the configuration on disk and swaps it in.
    ///
    /// Returns the generation being served afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidState`] unless active, and
    /// [`LifecycleError::Config`] if the candidate is rejected. A rejected
    /// candidate is discarded; the served snapshot is unchanged.
    pub fn reload(&self) -> Result<u64, LifecycleError> {
        let _guard = self.transition.lock();
        self.expect_state(LifecycleState::Active)?;
        self.set_state(LifecycleState::Reloading);

        let current = self.generation().unwrap_or(0);
        let outcome = self.build_candidate(current + 1).map(|candidate| {
            let datasets = candidate.catalog().len();
            let generation = candidate.generation();
            self.active.store(Some(Arc::new(candidate)));
            (generation, datasets)
        });

        self.set_state(LifecycleState::Active);

        match outcome {
            Ok((generation, datasets)) => {
                info!(generation, datasets, "configuration reloaded");
                Ok(generation)
            }
            Err(error) => {
                warn!(
                    %error,
                    generation = current,
                    "configuration reload rejected, keeping current configuration"
                );
                Err(error.into())
            }
        }
    }

    /// Stops watching and rejects further reloads.
    ///
    /// The served snapshot stays available. Calling this more than once is a
    /// no-op.
    pub fn shutdown(&self) {
        let watcher = {
            let _guard = self.transition.lock();
            if self.state() == LifecycleState::Shutdown {
                return;
            }
            self.set_state(LifecycleState::Shutdown);
            self.watcher.lock().take()
        };
        // Dropped outside the transition lock: the watcher thread may be
        // waiting on it inside `reload`.
        drop(watcher);
        info!(generation = ?self.generation(), "configuration controller shut down");
    }

    pub(super) fn install_watcher(
        &self,
        debouncer: Debouncer<RecommendedWatcher>,
    ) -> Result<(), LifecycleError> {
        let _guard = self.transition.lock();
        self.expect_state(LifecycleState::Active)?;
        *self.watcher.lock() = Some(debouncer);
        Ok(())
    }

    #[must_use]
    pub fn is_watching(&self) -> bool {
        self.watcher.lock().is_some()
    }

    fn build_candidate(&self, generation: u64) -> Result<CatalogSnapshot, ConfigError> {
        let config = load_config(&self.config_path)?;
        CatalogSnapshot::build(generation, config, &self.base_dir)
    }

    fn expect_state(&self, expected: LifecycleState) -> Result<(), LifecycleError> {
        let actual = self.state();
        if actual == expected {
            Ok(())
        } else {
            Err(LifecycleError::InvalidState { actual, expected })
        }
    }

    fn set_state(&self, state: LifecycleState) {
        self.state.store(Arc::new(state));
    }
}

impl fmt::Debug for ReloadController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReloadController")
            .field("config_path", &self.config_path)
            .field("state", &self.state())
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}
