//! Lightweight global metrics for rill.
//!
//! Потокобезопасные атомарные счётчики:
//! - Pairs (alloc/free/grow/push)
//! - Error slot (сколько раз писали ошибку)

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// ----- Pairs -----
static PAIRS_ALLOCATED: AtomicU64 = AtomicU64::new(0);
static PAIRS_FREED: AtomicU64 = AtomicU64::new(0);
static PAIRS_GROWN: AtomicU64 = AtomicU64::new(0);
static PAIRS_PUSHES: AtomicU64 = AtomicU64::new(0);

// ----- Errors -----
static ERRORS_RECORDED: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    pub pairs_allocated: u64,
    pub pairs_freed: u64,
    pub pairs_grown: u64,
    pub pairs_pushes: u64,

    pub errors_recorded: u64,
}

impl MetricsSnapshot {
    /// Buffers allocated and not yet dropped.
    pub fn pairs_live(&self) -> u64 {
        self.pairs_allocated.saturating_sub(self.pairs_freed)
    }
}

// ----- Recorders (Pairs) -----
pub fn record_pairs_alloc() {
    PAIRS_ALLOCATED.fetch_add(1, Ordering::Relaxed);
}
pub fn record_pairs_free() {
    PAIRS_FREED.fetch_add(1, Ordering::Relaxed);
}
pub fn record_pairs_grow() {
    PAIRS_GROWN.fetch_add(1, Ordering::Relaxed);
}
pub fn record_pairs_push() {
    PAIRS_PUSHES.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (Errors) -----
pub fn record_error() {
    ERRORS_RECORDED.fetch_add(1, Ordering::Relaxed);
}

// ----- Snapshot / Reset -----
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        pairs_allocated: PAIRS_ALLOCATED.load(Ordering::Relaxed),
        pairs_freed: PAIRS_FREED.load(Ordering::Relaxed),
        pairs_grown: PAIRS_GROWN.load(Ordering::Relaxed),
        pairs_pushes: PAIRS_PUSHES.load(Ordering::Relaxed),

        errors_recorded: ERRORS_RECORDED.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    PAIRS_ALLOCATED.store(0, Ordering::Relaxed);
    PAIRS_FREED.store(0, Ordering::Relaxed);
    PAIRS_GROWN.store(0, Ordering::Relaxed);
    PAIRS_PUSHES.store(0, Ordering::Relaxed);

    ERRORS_RECORDED.store(0, Ordering::Relaxed);
}
