use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Fixed-size executor for independent I/O-bound units of work.
///
/// Every unit is spawned right away but at most `size` of them hold a permit
/// at once. Results are collected in completion order, not submission order.
pub struct WorkerPool {
    name: &'static str,
    size: usize,
    permits: Arc<Semaphore>,
}

impl WorkerPool {
    pub fn new(name: &'static str, size: usize) -> WorkerPool {
        let size = size.max(1);
        WorkerPool {
            name,
            size,
            permits: Arc::new(Semaphore::new(size)),
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Runs `work` over every unit and waits for all of them. A unit that
    /// returns `None` or panics contributes nothing.
    pub async fn run<U, T, F, Fut>(&self, units: Vec<U>, work: F) -> Vec<T>
    where
        U: Send + 'static,
        T: Send + 'static,
        F: Fn(U) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Option<T>> + Send + 'static,
    {
        let total = units.len();
        let work = Arc::new(work);
        let mut workers = JoinSet::new();

        for unit in units {
            let permits = self.permits.clone();
            let work = work.clone();
            workers.spawn(async move {
                let _permit = permits.acquire_owned().await.ok()?;
                (*work)(unit).await
            });
        }

        let mut results = Vec::with_capacity(total);
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(Some(result)) => results.push(result),
                Ok(None) => {}
                Err(e) => {
                    log::error!("{} worker crashed, error: {:#}", self.name, e);
                }
            }
        }
        log::info!(
            "{} pool finished: {}/{} units produced a result",
            self.name,
            results.len(),
            total
        );
        results
    }
}
