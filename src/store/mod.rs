//! Transactional store seam.
//!
//! The dispatch engine drives begin -> execute -> commit through these
//! traits so it can run against a fake store in tests. The production
//! implementation lives in [`pg`].

pub mod pg;

pub use pg::PgStore;

use crate::error::Result;
use crate::model::WorkItem;

/// Live connection usage as reported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolUsage {
    /// Connections currently checked out of the pool.
    pub in_use: u32,
    /// Configured maximum pool size, constant for the store's lifetime.
    pub max: u32,
}

/// A capacity-limited store that hands out single-writer transactions.
///
/// Implementations must be cheap to clone; one clone travels into each
/// spawned worker.
pub trait Store: Clone + Send + Sync + 'static {
    type Tx: StoreTx;

    /// Open a transaction. Acquires a pool slot; the slot is held until
    /// the transaction commits or rolls back.
    fn begin(&self) -> impl Future<Output = Result<Self::Tx>> + Send;

    /// Snapshot of current pool usage. Advisory only: the value may be
    /// stale by the time the caller acts on it.
    fn current_usage(&self) -> PoolUsage;
}

/// One transaction, borrowed by exactly one worker for its duration.
pub trait StoreTx: Send {
    /// Perform the item's single write.
    fn execute(&mut self, item: &WorkItem) -> impl Future<Output = Result<()>> + Send;

    fn commit(self) -> impl Future<Output = Result<()>> + Send;

    /// Best-effort cleanup; its own failure is not reported.
    fn rollback(self) -> impl Future<Output = ()> + Send;
}
