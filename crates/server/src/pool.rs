//! Bounded worker pool shared by every request.

use crate::error::FilterError;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

/// Caps how many entry evaluations run at once across the whole process.
///
/// Cloning is cheap and every clone shares the same permits, so the pool is
/// built once at startup and handed to each request.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Permits not currently held by a running task.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Spawn `task`; it starts running once a permit is free.
    ///
    /// The permit is released when the task finishes or is aborted.
    pub fn submit<F, T>(&self, task: F) -> JoinHandle<Result<T, FilterError>>
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let permits = self.permits.clone();
        tokio::spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|_| FilterError::PoolClosed)?;
            Ok(task.await)
        })
    }

    /// Stop handing out permits. Waiting and future tasks fail with
    /// [`FilterError::PoolClosed`].
    pub fn close(&self) {
        self.permits.close();
    }
}
