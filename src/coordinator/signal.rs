use std::sync::Mutex;

use tokio::sync::oneshot;

/// One-shot wait for an `enode:webhook:test` delivery
///
/// At most one waiter is registered. Preparing a new wait drops the previous
/// sender, which wakes any earlier receiver with a closed-channel error.
/// A waiter that timed out stays registered until the next `prepare` or
/// `resolve`, so a late test event still resolves it harmlessly.
#[derive(Default)]
pub struct TestWebhookSignal {
    pending: Mutex<Option<oneshot::Sender<bool>>>,
}

impl TestWebhookSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh waiter, cancelling any unresolved one
    pub fn prepare(&self) -> oneshot::Receiver<bool> {
        let (tx, rx) = oneshot::channel();
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        // Dropping the old sender cancels its receiver
        pending.replace(tx);
        rx
    }

    /// Resolve the registered waiter. Returns false when none was registered.
    pub fn resolve(&self) -> bool {
        let sender = self
            .pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        match sender {
            Some(tx) => {
                // The receiver may already be gone after a timeout
                let _ = tx.send(true);
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .map(|p| p.is_some())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn resolve_wakes_waiter_once() {
        let signal = TestWebhookSignal::new();
        let rx = signal.prepare();
        assert!(signal.is_pending());
        assert!(signal.resolve());
        assert_eq!(rx.await.ok(), Some(true));
        assert!(!signal.resolve());
        assert!(!signal.is_pending());
    }

    #[tokio::test]
    async fn prepare_cancels_previous_waiter() {
        let signal = TestWebhookSignal::new();
        let first = signal.prepare();
        let second = signal.prepare();
        assert!(first.await.is_err());
        assert!(signal.resolve());
        assert_eq!(second.await.ok(), Some(true));
    }
}
