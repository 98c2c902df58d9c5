//! Dispatch engine: one worker per item, gated store access, all-or-abort.

use crate::barrier::CompletionBarrier;
use crate::error::{Error, Result};
use crate::gate::CapacityGate;
use crate::model::WorkItem;
use crate::store::{Store, StoreTx};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{error, info};

/// What a finished batch looked like.
#[derive(Debug, Clone, Copy)]
pub struct BatchReport {
    /// Items dispatched (all of them committed — a failed batch returns
    /// an error instead of a report).
    pub items: usize,
    /// Wall-clock time from first spawn to last completion.
    pub elapsed: Duration,
}

/// Dispatches a batch of work items through the capacity gate.
pub struct Engine<S: Store> {
    store: S,
    gate: Arc<CapacityGate<S>>,
}

impl<S: Store> Engine<S> {
    /// Build an engine over `store`, admitting workers while usage is
    /// within `max_in_flight`. Callers typically pass the store's own
    /// reported maximum (`store.current_usage().max`).
    pub fn new(store: S, max_in_flight: u32) -> Self {
        let gate = Arc::new(CapacityGate::new(store.clone(), max_in_flight));
        Self { store, gate }
    }

    /// Run the whole batch: spawn one worker per item and block until
    /// every worker is terminal or the first store error arrives.
    ///
    /// All concurrency is worker-side; spawning is unbounded and only the
    /// gate throttles actual store attempts. On error the batch is
    /// aborted as a whole: workers already admitted may still have
    /// committed their rows, but no new admissions are awaited.
    pub async fn run_batch(&self, items: Vec<WorkItem>) -> Result<BatchReport> {
        let started = Instant::now();
        let total = items.len();
        let barrier = CompletionBarrier::new(total);
        let (err_tx, mut err_rx) = mpsc::unbounded_channel::<Error>();

        for item in items {
            // Ticket taken before spawn; its Drop is the worker's
            // unconditional terminal-state signal.
            let ticket = barrier.ticket();
            let gate = Arc::clone(&self.gate);
            let store = self.store.clone();
            let err_tx = err_tx.clone();
            tokio::spawn(async move {
                let _ticket = ticket;
                while !gate.try_admit() {
                    tokio::task::yield_now().await;
                }
                if let Err(e) = write_item(&store, &item).await {
                    error!(id = item.id, "write failed: {e}");
                    let _ = err_tx.send(e);
                }
            });
        }
        drop(err_tx);

        // Biased so a batch whose final worker fails can never race the
        // barrier into the success arm.
        tokio::select! {
            biased;
            Some(e) = err_rx.recv() => Err(e),
            _ = barrier.wait() => {
                let elapsed = started.elapsed();
                info!(items = total, ?elapsed, "batch complete");
                Ok(BatchReport {
                    items: total,
                    elapsed,
                })
            }
        }
    }
}

/// One admitted worker's store interaction: begin, execute, commit.
/// Rollback on execute failure is best-effort; the execute error is what
/// gets reported.
async fn write_item<S: Store>(store: &S, item: &WorkItem) -> Result<()> {
    let mut tx = store.begin().await?;
    if let Err(e) = tx.execute(item).await {
        tx.rollback().await;
        return Err(e);
    }
    tx.commit().await
}
