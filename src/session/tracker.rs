//! Connection counting
//!
//! The counter is shared by every session but is independent of the cursor
//! lock. A [`ConnectionGuard`] holds one slot and releases it on drop, so a
//! session that ends by any path (close, error, panic) is always uncounted.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

/// Process-wide count of live sessions
#[derive(Debug, Clone, Default)]
pub struct ConnectionTracker {
    active: Arc<AtomicUsize>,
    total: Arc<AtomicU64>,
}

impl ConnectionTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions currently open
    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Number of sessions ever opened
    pub fn total(&self) -> u64 {
        self.total.load(Ordering::SeqCst)
    }

    /// Take a slot unconditionally
    pub fn acquire(&self) -> ConnectionGuard {
        self.active.fetch_add(1, Ordering::SeqCst);
        self.guard()
    }

    /// Take a slot if fewer than `limit` are in use (0 = unlimited)
    pub fn try_acquire(&self, limit: usize) -> Option<ConnectionGuard> {
        if limit == 0 {
            return Some(self.acquire());
        }

        self.active
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < limit).then_some(n + 1)
            })
            .ok()
            .map(|_| self.guard())
    }

    fn guard(&self) -> ConnectionGuard {
        let id = self.total.fetch_add(1, Ordering::SeqCst) + 1;
        ConnectionGuard {
            active: Arc::clone(&self.active),
            id,
        }
    }
}

/// One occupied connection slot
#[derive(Debug)]
pub struct ConnectionGuard {
    active: Arc<AtomicUsize>,
    id: u64,
}

impl ConnectionGuard {
    /// Sequential connection number, starting at 1
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guard_counts_and_releases() {
        let tracker = ConnectionTracker::new();
        let first = tracker.acquire();
        let second = tracker.acquire();
        assert_eq!(tracker.active(), 2);
        assert_eq!((first.id(), second.id()), (1, 2));

        drop(first);
        assert_eq!(tracker.active(), 1);
        drop(second);
        assert_eq!(tracker.active(), 0);
        assert_eq!(tracker.total(), 2);
    }

    #[test]
    fn test_limit_rejects_extra_connections() {
        let tracker = ConnectionTracker::new();
        let held = tracker.try_acquire(1);
        assert!(held.is_some());
        assert!(tracker.try_acquire(1).is_none());
        assert_eq!(tracker.active(), 1);

        drop(held);
        assert!(tracker.try_acquire(1).is_some());
    }

    #[test]
    fn test_zero_limit_is_unlimited() {
        let tracker = ConnectionTracker::new();
        let guards: Vec<_> = (0..10).filter_map(|_| tracker.try_acquire(0)).collect();
        assert_eq!(guards.len(), 10);
        assert_eq!(tracker.active(), 10);
    }

    #[test]
    fn test_concurrent_acquire_release() {
        let tracker = ConnectionTracker::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = tracker.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let _guard = tracker.acquire();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(tracker.active(), 0);
        assert_eq!(tracker.total(), 800);
    }
}
