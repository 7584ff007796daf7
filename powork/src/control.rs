use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// Caller-side stop signal, checked once per attempt. Clones share the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Attempts left to a search, shared by every worker of the same search.
#[derive(Debug)]
pub(crate) struct AttemptBudget {
    limit: Option<u64>,
    spent: AtomicU64,
}

impl AttemptBudget {
    pub(crate) fn new(limit: Option<u64>) -> Self {
        AttemptBudget {
            limit,
            spent: AtomicU64::new(0),
        }
    }

    /// Reserves one attempt, `false` once the limit is reached.
    pub(crate) fn take(&self) -> bool {
        let spent = self.spent.fetch_add(1, Ordering::Relaxed);
        self.limit.map_or(true, |limit| spent < limit)
    }

    pub(crate) fn spent(&self) -> u64 {
        let spent = self.spent.load(Ordering::Relaxed);
        self.limit.map_or(spent, |limit| spent.min(limit))
    }
}

/// Everything that can end a search besides success.
#[derive(Debug)]
pub(crate) struct Control<'c> {
    pub(crate) budget: &'c AttemptBudget,
    cancel: Option<&'c CancellationToken>,
    found: Option<&'c AtomicBool>,
}

impl<'c> Control<'c> {
    pub(crate) fn new(budget: &'c AttemptBudget, cancel: Option<&'c CancellationToken>) -> Self {
        Control {
            budget,
            cancel,
            found: None,
        }
    }

    /// Stops this search as soon as another one sharing `found` succeeds.
    pub(crate) fn with_found(mut self, found: &'c AtomicBool) -> Self {
        self.found = Some(found);
        self
    }

    pub(crate) fn should_stop(&self) -> bool {
        self.cancel.map_or(false, CancellationToken::is_cancelled)
            || self.found.map_or(false, |found| found.load(Ordering::Relaxed))
    }

    pub(crate) fn mark_found(&self) {
        if let Some(found) = self.found {
            found.store(true, Ordering::Relaxed);
        }
    }
}
