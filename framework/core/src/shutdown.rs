use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::broadcast::{Receiver, Sender};

/// Broadcasts a stop request to every VU and background thread of a run.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    sender: Sender<()>,
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self {
            sender: tokio::sync::broadcast::channel(1).0,
        }
    }

    pub fn shutdown(&self) {
        if let Err(e) = self.sender.send(()) {
            // Will fail if nobody is listening for a shutdown signal, in which case the log message
            // can be ignored.
            log::warn!("Failed to send shutdown signal: {e:?}");
        }
    }

    /// Listeners only observe signals sent after they were created.
    pub fn new_listener(&self) -> DelegatedShutdownListener {
        DelegatedShutdownListener::new(self.sender.subscribe())
    }
}

#[derive(Debug)]
pub struct DelegatedShutdownListener {
    receiver: Receiver<()>,
    triggered: bool,
}

impl DelegatedShutdownListener {
    pub(crate) fn new(receiver: Receiver<()>) -> Self {
        Self {
            receiver,
            triggered: false,
        }
    }

    /// Point in time check if the shutdown signal has been received. Once this has returned true
    /// it keeps returning true.
    pub fn should_shutdown(&mut self) -> bool {
        if !self.triggered {
            self.triggered = match self.receiver.try_recv() {
                Ok(_) => true,
                Err(TryRecvError::Closed) => true,
                // A lagged receiver has missed at least one signal.
                Err(TryRecvError::Lagged(_)) => true,
                Err(TryRecvError::Empty) => false,
            };
        }

        self.triggered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listener_latches_after_signal() {
        let handle = ShutdownHandle::new();
        let mut listener = handle.new_listener();
        assert!(!listener.should_shutdown());

        handle.shutdown();
        assert!(listener.should_shutdown());
        assert!(listener.should_shutdown());
    }

    #[test]
    fn every_listener_sees_the_signal() {
        let handle = ShutdownHandle::new();
        let mut first = handle.new_listener();
        let mut second = handle.new_listener();

        handle.shutdown();

        assert!(first.should_shutdown());
        assert!(second.should_shutdown());
    }

    #[test]
    fn dropping_all_handles_counts_as_shutdown() {
        let handle = ShutdownHandle::new();
        let mut listener = handle.new_listener();
        drop(handle);

        assert!(listener.should_shutdown());
    }
}
