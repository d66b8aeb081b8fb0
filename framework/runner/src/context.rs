use crate::executor::Executor;
use seq_load_core::prelude::ShutdownHandle;

/// State shared by every VU of a run. Created before any VU starts and only read afterwards.
#[derive(Debug)]
pub struct RunnerContext {
    executor: Executor,
    shutdown_handle: ShutdownHandle,
}

impl RunnerContext {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            executor: Executor::new()?,
            shutdown_handle: ShutdownHandle::default(),
        })
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn shutdown_handle(&self) -> &ShutdownHandle {
        &self.shutdown_handle
    }

    /// Ask every VU to stop at the start of its next iteration.
    pub fn force_stop_scenario(&self) {
        self.shutdown_handle.shutdown();
    }
}

/// Identity and progress of a single VU. Owned by the VU's thread for the lifetime of the VU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VuContext {
    vu_index: usize,
    iteration_index: u64,
}

impl VuContext {
    pub fn new(vu_index: usize) -> Self {
        Self::at_iteration(vu_index, 0)
    }

    /// A context positioned at an arbitrary iteration, useful for previewing requests.
    pub fn at_iteration(vu_index: usize, iteration_index: u64) -> Self {
        Self {
            vu_index,
            iteration_index,
        }
    }

    pub fn vu_index(&self) -> usize {
        self.vu_index
    }

    /// Number of iterations this VU has completed, which is also the index of the next one.
    pub fn iteration_index(&self) -> u64 {
        self.iteration_index
    }

    pub(crate) fn advance(&mut self) {
        self.iteration_index += 1;
    }
}
