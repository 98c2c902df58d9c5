//! Completion barrier: lets the engine wait for a fixed set of workers.
//!
//! The counter is initialised to the full batch size before any worker
//! spawns, so a waiter can never observe zero early. Each worker holds a
//! [`Ticket`]; the decrement happens in `Drop`, which makes release
//! unconditional across every exit path, panics included.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

struct Inner {
    outstanding: AtomicUsize,
    done: Notify,
}

/// Counts outstanding workers down to zero exactly once.
#[derive(Clone)]
pub struct CompletionBarrier {
    inner: Arc<Inner>,
}

impl CompletionBarrier {
    /// Barrier expecting exactly `count` tickets.
    pub fn new(count: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                outstanding: AtomicUsize::new(count),
                done: Notify::new(),
            }),
        }
    }

    /// Hand out one ticket. Callers must take exactly one per counted
    /// worker; the ticket decrements the barrier when dropped.
    pub fn ticket(&self) -> Ticket {
        Ticket {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Workers not yet terminal.
    pub fn outstanding(&self) -> usize {
        self.inner.outstanding.load(Ordering::Acquire)
    }

    /// Resolve once every ticket has been dropped. A zero-count barrier
    /// resolves immediately.
    pub async fn wait(&self) {
        loop {
            // Register interest before re-checking, so the final
            // decrement's notify cannot slip between check and sleep.
            let notified = self.inner.done.notified();
            if self.inner.outstanding.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// RAII handle for one worker's slot in the barrier.
pub struct Ticket {
    inner: Arc<Inner>,
}

impl Drop for Ticket {
    fn drop(&mut self) {
        if self.inner.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.inner.done.notify_waiters();
        }
    }
}
