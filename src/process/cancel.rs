//! Cooperative cancellation for running subprocesses

use tokio::sync::watch;

/// Observed by a runner; a running child is killed once it fires.
#[derive(Clone, Debug)]
pub struct CancellationToken {
    cancelled: watch::Receiver<bool>,
}

/// Kept by the caller to trigger cancellation.
#[derive(Debug)]
pub struct CancellationHandle {
    cancelled: watch::Sender<bool>,
}

impl CancellationToken {
    /// Creates a new token/handle pair.
    ///
    /// ```ignore
    /// let (token, handle) = CancellationToken::new();
    /// let runner = TokioProcessRunner::new().with_cancellation(token);
    ///
    /// // from another task
    /// handle.cancel();
    /// ```
    pub fn new() -> (Self, CancellationHandle) {
        let (tx, rx) = watch::channel(false);
        (Self { cancelled: rx }, CancellationHandle { cancelled: tx })
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    /// Resolves once cancellation is requested. Never resolves if the
    /// handle is dropped without cancelling.
    pub async fn cancelled(&self) {
        let mut rx = self.cancelled.clone();
        let fired = rx.wait_for(|cancelled| *cancelled).await.map(|_| ());
        if fired.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

impl CancellationHandle {
    pub fn cancel(&self) {
        self.cancelled.send_replace(true);
    }
}
