//! Shutdown coordination.

use tokio::sync::broadcast;

use crate::lifecycle::signals;

/// Broadcasts a single shutdown notice to every subscribed task.
///
/// The HTTP server subscribes once; tests trigger it directly instead of
/// sending a signal to the process.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    /// Notify subscribers. Returns how many were still listening.
    pub fn trigger(&self) -> usize {
        self.tx.send(()).unwrap_or(0)
    }

    /// Trigger once SIGINT or SIGTERM arrives.
    pub fn trigger_on_signal(self) {
        tokio::spawn(async move {
            signals::wait_for_signal().await;
            let notified = self.trigger();
            tracing::debug!(subscribers = notified, "Shutdown broadcast sent");
        });
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
