//! Shared test double: an in-memory store with pool-usage accounting.
#![allow(dead_code)]

use rowgate::error::{Error, Result};
use rowgate::model::WorkItem;
use rowgate::store::{PoolUsage, Store, StoreTx};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

/// In-memory stand-in for the Postgres store. Tracks live and peak
/// usage, records committed ids, and can be told to fail every execute.
#[derive(Clone)]
pub struct FakeStore {
    inner: Arc<Inner>,
}

struct Inner {
    max: u32,
    in_use: AtomicU32,
    peak: AtomicU32,
    fail: Option<FailAt>,
    committed: Mutex<Vec<i32>>,
}

/// Which transaction step the store is rigged to fail at.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Begin,
    Execute,
    Commit,
}

impl FakeStore {
    pub fn new(max: u32) -> Self {
        Self::build(max, None)
    }

    /// A store whose every execute fails.
    pub fn failing(max: u32) -> Self {
        Self::build(max, Some(FailAt::Execute))
    }

    /// A store rigged to fail at the given transaction step.
    pub fn failing_at(max: u32, step: FailAt) -> Self {
        Self::build(max, Some(step))
    }

    fn build(max: u32, fail: Option<FailAt>) -> Self {
        Self {
            inner: Arc::new(Inner {
                max,
                in_use: AtomicU32::new(0),
                peak: AtomicU32::new(0),
                fail,
                committed: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Ids committed so far, in commit order.
    pub fn committed(&self) -> Vec<i32> {
        self.inner.committed.lock().unwrap().clone()
    }

    /// Highest concurrent usage observed across the store's lifetime.
    pub fn peak_in_use(&self) -> u32 {
        self.inner.peak.load(Ordering::SeqCst)
    }

    /// Force the reported usage, for gate boundary tests.
    pub fn set_in_use(&self, n: u32) {
        self.inner.in_use.store(n, Ordering::SeqCst);
    }
}

impl Store for FakeStore {
    type Tx = FakeTx;

    async fn begin(&self) -> Result<FakeTx> {
        if self.inner.fail == Some(FailAt::Begin) {
            // No slot is held when begin itself fails.
            return Err(Error::BeginTransaction("injected failure".to_string()));
        }
        let now = self.inner.in_use.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.peak.fetch_max(now, Ordering::SeqCst);
        Ok(FakeTx {
            inner: Arc::clone(&self.inner),
            pending: None,
        })
    }

    fn current_usage(&self) -> PoolUsage {
        PoolUsage {
            in_use: self.inner.in_use.load(Ordering::SeqCst),
            max: self.inner.max,
        }
    }
}

pub struct FakeTx {
    inner: Arc<Inner>,
    pending: Option<i32>,
}

impl StoreTx for FakeTx {
    async fn execute(&mut self, item: &WorkItem) -> Result<()> {
        // Simulate the store round trip so other workers get scheduled
        // while this transaction holds its slot.
        tokio::task::yield_now().await;
        if self.inner.fail == Some(FailAt::Execute) {
            return Err(Error::Execute {
                id: item.id,
                reason: "injected failure".to_string(),
            });
        }
        self.pending = Some(item.id);
        Ok(())
    }

    async fn commit(self) -> Result<()> {
        self.inner.in_use.fetch_sub(1, Ordering::SeqCst);
        if self.inner.fail == Some(FailAt::Commit) {
            return Err(Error::Commit("injected failure".to_string()));
        }
        if let Some(id) = self.pending {
            self.inner.committed.lock().unwrap().push(id);
        }
        Ok(())
    }

    async fn rollback(self) {
        self.inner.in_use.fetch_sub(1, Ordering::SeqCst);
    }
}
