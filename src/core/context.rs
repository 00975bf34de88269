// src/core/context.rs

use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::errors::ProbeError;

/// Cancellation and deadline state threaded through every probe call of a batch.
///
/// Cloning is cheap and all clones observe the same cancellation token.
#[derive(Debug, Clone)]
pub struct ScanContext {
    cancel: CancellationToken,
    probe_timeout: Option<Duration>,
}

impl Default for ScanContext {
    fn default() -> Self {
        Self::new(None)
    }
}

impl ScanContext {
    pub fn new(probe_timeout: Option<Duration>) -> Self {
        Self { cancel: CancellationToken::new(), probe_timeout }
    }

    /// Builds a context driven by an externally owned token (e.g. a Ctrl-C handler).
    pub fn with_token(cancel: CancellationToken, probe_timeout: Option<Duration>) -> Self {
        Self { cancel, probe_timeout }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn probe_timeout(&self) -> Option<Duration> {
        self.probe_timeout
    }

    /// Runs `fut` until it resolves, the batch is cancelled, or the per-probe
    /// deadline passes, whichever comes first.
    pub async fn guard<T, F>(&self, fut: F) -> Result<T, ProbeError>
    where
        F: Future<Output = Result<T, ProbeError>>,
    {
        if self.cancel.is_cancelled() {
            return Err(ProbeError::Cancelled);
        }

        let bounded = async {
            match self.probe_timeout {
                Some(limit) => match tokio::time::timeout(limit, fut).await {
                    Ok(result) => result,
                    Err(_) => {
                        debug!(timeout_ms = limit.as_millis() as u64, "Probe deadline expired.");
                        Err(ProbeError::TimedOut)
                    }
                },
                None => fut.await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ProbeError::Cancelled),
            result = bounded => result,
        }
    }
}
