//! Background Sweeper
//!
//! This module implements the background task that periodically runs a sweep
//! pass over a [`Cache`] and removes expired entries.
//!
//! ## Why Do We Need This?
//!
//! Reads never evict in tidycache: an entry past its deadline stays in the
//! map until something removes it. Without a sweeper, a key that expires and
//! is never deleted would occupy memory forever.
//!
//! The sweeper solves this by waking on a fixed interval and invoking
//! [`Cache::sweep`] until told to stop.
//!
//! ## Design
//!
//! The sweeper runs as a single tokio task that waits on two conditions at
//! once, via `tokio::select!`:
//!
//! 1. The sweep interval elapsed: run one sweep pass, resume waiting.
//! 2. The stop signal arrived on the watch channel: exit the loop for good.
//!
//! Neither branch is prioritized; if both fire together, either outcome is
//! acceptable. Cancellation is cooperative and the loop never restarts once
//! it has exited.
//!
//! The loop holds only a `Weak` reference to the cache, so a cache that owns
//! its sweeper handle is still freed once the last external handle goes
//! away; the loop notices the dead reference on its next tick and exits.

use std::sync::{Arc, Weak};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::store::cache::Cache;

/// Sweep interval used by [`start_sweeper`].
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// A handle to a running background sweeper.
///
/// Stopping is signalled through the handle; when the handle is dropped the
/// sweeper task is stopped automatically. A stopped sweeper never restarts.
///
/// # Example
///
/// ```ignore
/// use tidycache::{Cache, Sweeper};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let cache: Arc<Cache<String>> = Arc::new(Cache::new());
/// let sweeper = Sweeper::start(Arc::clone(&cache), Duration::from_secs(1));
///
/// // Sweeper runs in the background...
///
/// // Dropping the handle stops it.
/// drop(sweeper);
/// ```
#[derive(Debug)]
pub struct Sweeper {
    /// Sender to signal shutdown
    shutdown_tx: watch::Sender<bool>,
}

impl Sweeper {
    /// Starts a background sweeper that sweeps `cache` every `interval`.
    ///
    /// Must be called from within a tokio runtime. Each call spawns a fresh
    /// task; keeping at most one sweeper per cache is the caller's contract,
    /// enforced at the call site by [`Cache::start_sweeper`].
    ///
    /// # Returns
    ///
    /// Returns a handle that stops the sweeper when told to, or when dropped.
    pub fn start<V>(cache: Arc<Cache<V>>, interval: Duration) -> Self
    where
        V: Send + Sync + 'static,
    {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        tokio::spawn(sweeper_loop(Arc::downgrade(&cache), interval, shutdown_rx));

        info!(interval_ms = interval.as_millis() as u64, "background sweeper started");

        Self { shutdown_tx }
    }

    /// Signals the sweeper loop to stop.
    ///
    /// Safe to call more than once and safe to call after the loop has
    /// already exited; a signal with no one left to consume it is simply
    /// discarded. Called automatically on drop.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The main sweeper loop.
async fn sweeper_loop<V>(
    cache: Weak<Cache<V>>,
    interval: Duration,
    mut shutdown_rx: watch::Receiver<bool>,
) where
    V: Send + Sync + 'static,
{
    loop {
        // Wait for the interval or the stop signal, whichever comes first.
        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    debug!("sweeper received shutdown signal");
                    return;
                }
            }
        }

        // The loop deliberately holds no strong reference between ticks.
        let Some(cache) = cache.upgrade() else {
            debug!("cache dropped, sweeper exiting");
            return;
        };

        let swept = cache.sweep();
        if swept > 0 {
            debug!(swept, remaining = cache.len(), "expired entries removed");
        }
    }
}

/// Starts a background sweeper with the default interval.
///
/// This is a convenience function for simple use cases.
pub fn start_sweeper<V>(cache: Arc<Cache<V>>) -> Sweeper
where
    V: Send + Sync + 'static,
{
    Sweeper::start(cache, DEFAULT_SWEEP_INTERVAL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[tokio::test]
    async fn test_sweeper_evicts_expired_entries() {
        let cache = Arc::new(Cache::new());

        for i in 0..10 {
            cache.set(
                format!("key{}", i),
                Bytes::from("value"),
                Duration::from_millis(30),
            );
        }
        cache.set("long-lived", Bytes::from("value"), Duration::from_secs(60));

        assert_eq!(cache.len(), 11);

        let _sweeper = Sweeper::start(Arc::clone(&cache), Duration::from_millis(10));

        // Wait past both the TTL and a few sweep intervals; the short-lived
        // entries must be gone without any explicit delete.
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("long-lived"), Some(Bytes::from("value")));
    }

    #[tokio::test]
    async fn test_sweeper_stops_on_drop() {
        let cache = Arc::new(Cache::new());

        {
            let _sweeper = Sweeper::start(Arc::clone(&cache), Duration::from_millis(10));
            tokio::time::sleep(Duration::from_millis(50)).await;
            // Sweeper handle is dropped here
        }
        tokio::time::sleep(Duration::from_millis(30)).await;

        // With the loop gone nothing evicts anymore, and reads never do.
        cache.set("key", Bytes::from("value"), Duration::from_millis(10));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("key"), Some(Bytes::from("value")));
    }

    #[tokio::test]
    async fn test_stop_is_idempotent() {
        let cache: Arc<Cache<Bytes>> = Arc::new(Cache::new());
        let sweeper = Sweeper::start(Arc::clone(&cache), Duration::from_millis(10));

        sweeper.stop();
        sweeper.stop();
        tokio::time::sleep(Duration::from_millis(30)).await;

        // Dropping after an explicit stop must not panic or deadlock either.
        drop(sweeper);
    }

    #[tokio::test]
    async fn test_attached_sweeper_end_to_end() {
        let cache = Cache::with_sweeper(Duration::from_millis(10));

        cache.set("session", Bytes::from("token"), Duration::from_millis(30));
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(cache.is_empty());
        cache.shutdown();
    }

    #[tokio::test]
    async fn test_double_start_is_rejected() {
        use crate::store::cache::CacheError;

        let cache: Arc<Cache<Bytes>> = Arc::new(Cache::new());

        Cache::start_sweeper(&cache, Duration::from_millis(10)).unwrap();
        assert_eq!(
            Cache::start_sweeper(&cache, Duration::from_millis(10)),
            Err(CacheError::SweeperAlreadyRunning)
        );

        // After an explicit stop, attaching a fresh sweeper is allowed again.
        cache.stop_sweeper().unwrap();
        Cache::start_sweeper(&cache, Duration::from_millis(10)).unwrap();
        cache.shutdown();
    }

    #[tokio::test]
    async fn test_loop_exits_when_cache_is_dropped() {
        let cache: Arc<Cache<Bytes>> = Arc::new(Cache::new());
        let sweeper = Sweeper::start(Arc::clone(&cache), Duration::from_millis(10));

        let weak = Arc::downgrade(&cache);
        drop(cache);

        // The loop holds only a weak reference, so the cache is gone now and
        // the next tick makes the task exit on its own.
        assert!(weak.upgrade().is_none());
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(sweeper);
    }
}
