// src/interception/correlation.rs
//! Correlation IDs tying a request's transcript line to its response line

use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static GLOBAL_COUNTER: Lazy<Arc<CorrelationCounter>> =
    Lazy::new(|| Arc::new(CorrelationCounter::new()));

/// Monotonic ID allocator. Starts at zero; the first allocated ID is 1.
#[derive(Debug, Default)]
pub struct CorrelationCounter {
    last: AtomicU64,
}

impl CorrelationCounter {
    pub fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Process-wide counter shared by every caller that asks for it
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL_COUNTER)
    }

    /// Allocate the next ID
    pub fn next(&self) -> u64 {
        self.last.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Most recently allocated ID (0 if none)
    pub fn last(&self) -> u64 {
        self.last.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_starts_at_one() {
        let counter = CorrelationCounter::new();
        assert_eq!(counter.last(), 0);
        assert_eq!(counter.next(), 1);
        assert_eq!(counter.next(), 2);
        assert_eq!(counter.last(), 2);
    }

    #[test]
    fn test_concurrent_allocation_has_no_gaps() {
        let counter = Arc::new(CorrelationCounter::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = Arc::clone(&counter);
                std::thread::spawn(move || (0..1000).map(|_| counter.next()).collect::<Vec<_>>())
            })
            .collect();

        let ids: HashSet<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();

        assert_eq!(ids.len(), 8000);
        assert_eq!(ids, (1..=8000).collect());
    }

    #[test]
    fn test_global_is_shared() {
        let a = CorrelationCounter::global();
        let b = CorrelationCounter::global();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
