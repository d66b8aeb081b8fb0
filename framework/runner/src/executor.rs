use anyhow::Context;
use std::future::Future;

/// Owns the async runtime that transports run on.
///
/// VUs run on their own threads and block on their requests through [Executor::execute_in_place],
/// so a slow request only ever holds up the VU that sent it.
#[derive(Debug)]
pub struct Executor {
    runtime: tokio::runtime::Runtime,
}

impl Executor {
    pub(crate) fn new() -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("seq-load-io")
            .build()
            .context("Failed to create Tokio runtime")?;

        Ok(Self { runtime })
    }

    /// Run async code in place, blocking until it completes.
    ///
    /// The future is never cancelled. Bound long running work with a timeout inside the future.
    pub fn execute_in_place<F: Future>(&self, fut: F) -> F::Output {
        self.runtime.block_on(fut)
    }

    /// Submit async code to be run in the background.
    ///
    /// It is not guaranteed that the runner will wait for the future to complete before shutting
    /// down.
    pub fn spawn(&self, fut: impl Future<Output = ()> + Send + 'static) {
        self.runtime.spawn(fut);
    }
}
