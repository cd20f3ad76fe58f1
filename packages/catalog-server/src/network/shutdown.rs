//! Process signals that stop the server.

use tracing::{info, warn};

/// Resolves on SIGINT (Ctrl-C) or, on Unix, SIGTERM.
///
/// SIGTERM is registered by [`ShutdownSignal::install`], so a signal that
/// arrives before [`ShutdownSignal::wait`] is polled is not lost.
#[derive(Debug)]
pub struct ShutdownSignal {
    #[cfg(unix)]
    terminate: Option<tokio::signal::unix::Signal>,
}

impl ShutdownSignal {
    /// Registers the signal handlers. Must be called inside a Tokio runtime.
    #[must_use]
    pub fn install() -> Self {
        Self {
            #[cfg(unix)]
            terminate: match tokio::signal::unix::signal(
                tokio::signal::unix::SignalKind::terminate(),
            ) {
                Ok(signal) => Some(signal),
                Err(error) => {
                    warn!(%error, "failed to install SIGTERM handler");
                    None
                }
            },
        }
    }

    /// Waits for the first shutdown signal.
    pub async fn wait(self) {
        let ctrl_c = async {
            if let Err(error) = tokio::signal::ctrl_c().await {
                warn!(%error, "failed to install Ctrl-C handler");
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = async move {
            match self.terminate {
                Some(mut signal) => {
                    signal.recv().await;
                }
                None => std::future::pending::<()>().await,
            }
        };
        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => info!(signal = "SIGINT", "shutdown signal received"),
            () = terminate => info!(signal = "SIGTERM", "shutdown signal received"),
        }
    }
}
