//! File-change notification driving configuration reloads.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use std::time::Duration;

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};
use tracing::{debug, info, warn};

use super::controller::{LifecycleError, ReloadController};

impl ReloadController {
    /// Watches the configuration file and reloads when it changes.
    ///
    /// The file's directory is watched so that editors which replace the
    /// file (write-then-rename) are still seen. Events are debounced by
    /// `debounce`. The watcher lives until [`ReloadController::shutdown`].
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidState`] unless active, and
    /// [`LifecycleError::Watch`] if the watcher cannot be set up.
    pub fn watch(self: &Arc<Self>, debounce: Duration) -> Result<(), LifecycleError> {
        let (dir, file_name) = watch_target(self.config_path());
        let controller = Arc::downgrade(self);

        let mut debouncer = new_debouncer(debounce, move |result: DebounceEventResult| {
            handle_events(&controller, file_name.as_deref(), result);
        })?;
        debouncer
            .watcher()
            .watch(&dir, RecursiveMode::NonRecursive)?;

        self.install_watcher(debouncer)?;
        info!(path = %self.config_path().display(), debounce_ms = debounce.as_millis(), "watching configuration");
        Ok(())
    }
}

fn watch_target(config_path: &Path) -> (PathBuf, Option<OsString>) {
    let dir = match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    (dir, config_path.file_name().map(ToOwned::to_owned))
}

fn handle_events(
    controller: &Weak<ReloadController>,
    file_name: Option<&std::ffi::OsStr>,
    result: DebounceEventResult,
) {
    let events = match result {
        Ok(events) => events,
        Err(error) => {
            warn!(%error, "configuration watch error");
            return;
        }
    };

    let touched = events
        .iter()
        .any(|event| event.path.file_name() == file_name);
    if !touched {
        return;
    }

    let Some(controller) = controller.upgrade() else {
        return;
    };
    debug!("configuration file changed");
    // Outcomes are logged by `reload`.
    if let Err(LifecycleError::InvalidState { actual, .. }) = controller.reload() {
        debug!(state = %actual, "change ignored");
    }
}
