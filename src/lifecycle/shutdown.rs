//! Stop signal shared by the HTTP server and whoever started it.

use tokio::sync::broadcast;

/// Fan-out stop signal.
///
/// `startup::run` fires it after SIGINT/SIGTERM; integration tests fire it to
/// stop a proxy spawned on an ephemeral port. `HttpServer::run` holds a
/// receiver and begins draining in-flight requests when it fires.
pub struct Shutdown {
    notify: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (notify, _) = broadcast::channel(1);
        Self { notify }
    }

    /// Receiver handed to a server before it starts serving.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.notify.subscribe()
    }

    /// Tell every server holding a receiver to stop accepting.
    pub fn trigger(&self) {
        // Err only means no server is running any more.
        let _ = self.notify.send(());
    }

    /// Servers that have not yet stopped listening for the signal.
    pub fn receiver_count(&self) -> usize {
        self.notify.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
