//! Per-run execution context

use std::time::Duration;

use screenflow_core_types::{CaptureRegion, RunId};
use tokio_util::sync::CancellationToken;

/// Context shared by every component of one automation run: the watched
/// region, the run id for correlation, and the abort signal.
///
/// Abort is honored at suspension points only. In-flight actuator calls
/// always run to completion so the target interface is never left
/// half-submitted.
#[derive(Debug, Clone)]
pub struct RunCtx {
    pub run_id: RunId,
    pub region: CaptureRegion,
    cancel: CancellationToken,
}

impl RunCtx {
    pub fn new(region: CaptureRegion) -> Self {
        Self {
            region,
            run_id: RunId::new(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Sleep for `dur`, waking early on abort. Returns `false` when the
    /// sleep was interrupted by cancellation.
    pub async fn idle(&self, dur: Duration) -> bool {
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(dur) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_idle_completes_without_cancel() {
        let ctx = RunCtx::new(CaptureRegion::default());
        assert!(ctx.idle(Duration::from_secs(1)).await);
        assert!(!ctx.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_wakes_on_cancel() {
        let token = CancellationToken::new();
        let ctx = RunCtx::new(CaptureRegion::default()).with_cancel(token.clone());

        let waiter = tokio::spawn(async move { ctx.idle(Duration::from_secs(3600)).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        token.cancel();

        assert!(!waiter.await.unwrap());
    }
}
