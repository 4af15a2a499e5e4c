use std::future::Future;

use tokio::task::JoinHandle;

use crate::error::Result;

/// Set of spawned aggregation workers joined as one barrier
///
/// Every worker runs as its own tokio task. [`WorkerGroup::join`] waits for all
/// of them and fails if any task panicked, so callers never observe a result
/// built from only some of the workers.
pub struct WorkerGroup<T> {
    handles: Vec<JoinHandle<T>>,
}

impl<T: Send + 'static> WorkerGroup<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            handles: Vec::with_capacity(capacity),
        }
    }

    pub fn spawn<F>(&mut self, worker: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        self.handles.push(tokio::spawn(worker));
    }

    /// Wait for every worker and collect their outputs in spawn order
    pub async fn join(self) -> Result<Vec<T>> {
        let mut outputs = Vec::with_capacity(self.handles.len());
        for joined in futures::future::join_all(self.handles).await {
            outputs.push(joined?);
        }
        Ok(outputs)
    }
}
