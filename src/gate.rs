//! Capacity gate: advisory admission against live pool usage.

use crate::store::Store;
use std::sync::Mutex;

/// Advisory throttle over a store's connection usage.
///
/// `try_admit` serializes the read-and-decide step so concurrent callers
/// never admit off the same stale snapshot, but it does not reserve a
/// slot: the store's own pool arbitrates actual acquisition afterwards.
/// Between a positive answer and the worker's `begin`, usage can grow, so
/// the observed bound is `max_admitted + 1`, not a hard limit.
pub struct CapacityGate<S> {
    store: S,
    max_admitted: u32,
    snapshot: Mutex<()>,
}

impl<S: Store> CapacityGate<S> {
    /// Build a gate over `store` admitting while usage is within
    /// `max_admitted`. The limit is fixed for the gate's lifetime.
    pub fn new(store: S, max_admitted: u32) -> Self {
        Self {
            store,
            max_admitted,
            snapshot: Mutex::new(()),
        }
    }

    /// Ask for admission. Denial is not an error; callers retry after
    /// yielding. The lock covers only the usage read, never any I/O.
    pub fn try_admit(&self) -> bool {
        let _guard = self
            .snapshot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        self.store.current_usage().in_use <= self.max_admitted
    }

    pub fn max_admitted(&self) -> u32 {
        self.max_admitted
    }
}
