//! Shutdown coordination.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// Hands out [`ShutdownSignal`]s that long-running tasks wait on. The
/// signal is one-shot from a waiter's point of view: it is observed at
/// most once, and triggering again after a waiter has exited its wait
/// loop has no effect on it.
#[derive(Debug)]
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    /// Create a new shutdown coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the shutdown signal.
    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Trigger the shutdown signal. Repeated triggers are harmless.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of active subscribers still waiting.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// One subscriber's view of the shutdown signal.
#[derive(Debug)]
pub struct ShutdownSignal {
    rx: broadcast::Receiver<()>,
}

impl ShutdownSignal {
    /// Wait until the signal fires.
    ///
    /// Also resolves when the [`Shutdown`] coordinator is dropped: with
    /// nobody left to trigger it, waiting would mean waiting forever.
    pub async fn cancelled(&mut self) {
        let _ = self.rx.recv().await;
    }
}
