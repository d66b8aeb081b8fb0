use crate::executor::Executor;
use seq_load_core::prelude::ShutdownHandle;
use tokio::signal;

/// Stop the run early on Ctrl-C. VUs finish their in-flight request and pacing delay first.
pub(crate) fn start_shutdown_listener(executor: &Executor, handle: ShutdownHandle) {
    executor.spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            log::warn!("Failed to listen for Ctrl-C, the run can only end on its own: {e:?}");
            return;
        }
        handle.shutdown();
        println!("Received shutdown signal, shutting down...");
    });
}
