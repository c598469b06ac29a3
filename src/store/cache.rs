//! Thread-Safe TTL Cache
//!
//! This module implements the core key-value store for tidycache.
//! It provides a concurrency-safe HashMap where every entry carries an
//! absolute expiry deadline, computed once at write time.
//!
//! ## Design Decisions
//!
//! 1. **Single RwLock**: One lock guards the whole map. Multiple concurrent
//!    readers, exclusive writers and sweeps.
//! 2. **No sliding expiration**: `expires_at = now + ttl` is fixed at write
//!    time and never recomputed on read.
//! 3. **Sweep-only eviction**: Reads never evict. An expired entry stays
//!    visible to `get` and `delete` until a sweep pass (or an explicit
//!    delete) removes it.
//! 4. **Generic payload**: The cache stores any `V: Clone`; `get` hands back
//!    a clone, never a reference into the map. Cheap-to-clone payloads such
//!    as `bytes::Bytes` or `Arc<T>` are the expected common case.
//!
//! ## Concurrency Model
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                  Cache<V>                    │
//! │                                              │
//! │   RwLock<HashMap<String, Entry<V>>>          │
//! │      ▲            ▲             ▲            │
//! │      │ read       │ write       │ write      │
//! │   get()      set()/delete()   sweep()        │
//! └──────────────────────────────────────────────┘
//!                                   ▲
//!                                   │ fixed interval
//!                          ┌────────┴────────┐
//!                          │     Sweeper     │
//!                          │  (tokio task)   │
//!                          └─────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};

use crate::store::sweeper::Sweeper;

/// Errors for cache lifecycle misuse.
///
/// The data-path operations (`get`, `set`, `delete`, `sweep`) cannot fail;
/// absence is reported through `Option`, never through an error. The only
/// fallible operations are attaching and detaching the background sweeper,
/// which reject contract violations explicitly instead of racing silently.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// A sweeper is already attached to this cache.
    #[error("a sweeper is already running for this cache")]
    SweeperAlreadyRunning,

    /// No sweeper is attached to this cache.
    #[error("no sweeper is running for this cache")]
    SweeperNotRunning,
}

/// A stored value together with its expiry deadline.
#[derive(Debug, Clone)]
pub struct Entry<V> {
    /// The actual value stored
    pub value: V,
    /// When this entry becomes eligible for eviction
    pub expires_at: Instant,
}

impl<V> Entry<V> {
    /// Creates an entry expiring `ttl` from now.
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    /// Checks whether this entry is expired relative to `now`.
    ///
    /// The caller captures `now` once per sweep pass so that a single pass
    /// uses one consistent notion of "current time" for every entry.
    #[inline]
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}

/// A concurrency-safe, in-memory key-value cache with per-entry TTL.
///
/// Every operation is safe to call from any number of threads or tasks; the
/// internal `RwLock` serializes writers and sweeps while allowing concurrent
/// readers. The cache can run standalone (evict via explicit [`sweep`]) or
/// with an attached background [`Sweeper`] that sweeps on a fixed interval.
///
/// [`sweep`]: Cache::sweep
///
/// # Example
///
/// ```
/// use tidycache::Cache;
/// use std::time::Duration;
///
/// let cache: Cache<String> = Cache::new();
///
/// cache.set("session", "token123".to_string(), Duration::from_secs(60));
/// assert_eq!(cache.get("session"), Some("token123".to_string()));
/// assert_eq!(cache.get("missing"), None);
/// ```
pub struct Cache<V> {
    /// All entries, behind the single reader-writer lock
    entries: RwLock<HashMap<String, Entry<V>>>,

    /// The attached background sweeper, if one is running
    sweeper: Mutex<Option<Sweeper>>,

    /// Statistics: total GET operations
    get_count: AtomicU64,

    /// Statistics: total SET operations
    set_count: AtomicU64,

    /// Statistics: total DELETE operations
    del_count: AtomicU64,

    /// Statistics: total entries removed by sweep passes
    swept_count: AtomicU64,
}

impl<V> std::fmt::Debug for Cache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("entries", &self.len())
            .field("get_count", &self.get_count.load(Ordering::Relaxed))
            .field("set_count", &self.set_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl<V> Default for Cache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Cache<V> {
    /// Creates a new, empty cache with no sweeper attached.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            sweeper: Mutex::new(None),
            get_count: AtomicU64::new(0),
            set_count: AtomicU64::new(0),
            del_count: AtomicU64::new(0),
            swept_count: AtomicU64::new(0),
        }
    }

    /// Creates a cache and immediately starts a background sweeper that
    /// sweeps every `interval`.
    ///
    /// Must be called from within a tokio runtime, since the sweeper is
    /// spawned as a tokio task. The returned cache is wrapped in an `Arc`
    /// so it can be shared with the sweeper task and with other callers.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidycache::Cache;
    /// use std::time::Duration;
    ///
    /// #[tokio::main]
    /// async fn main() {
    ///     let cache = Cache::<String>::with_sweeper(Duration::from_secs(2));
    ///     cache.set("key", "value".to_string(), Duration::from_secs(60));
    ///     // ... expired entries are now evicted automatically ...
    ///     cache.shutdown();
    /// }
    /// ```
    pub fn with_sweeper(interval: Duration) -> Arc<Self>
    where
        V: Send + Sync + 'static,
    {
        let cache = Arc::new(Self::new());
        let sweeper = Sweeper::start(Arc::clone(&cache), interval);
        *cache.sweeper.lock().unwrap() = Some(sweeper);
        cache
    }

    /// Gets a clone of the value stored under `key`.
    ///
    /// Returns `None` if the key was never set or has been removed. No
    /// expiry check is performed here: an entry past its deadline that no
    /// sweep has evicted yet is still returned. Eviction is solely the
    /// responsibility of [`sweep`](Cache::sweep) and
    /// [`delete`](Cache::delete).
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        self.get_count.fetch_add(1, Ordering::Relaxed);

        let entries = self.entries.read().unwrap();
        entries.get(key).map(|entry| entry.value.clone())
    }

    /// Inserts or overwrites the entry for `key`, expiring `ttl` from now.
    ///
    /// Always succeeds. A prior value and its TTL are silently replaced;
    /// the new deadline is computed from the time of this call, so
    /// overwriting also resets the expiry clock.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.set_count.fetch_add(1, Ordering::Relaxed);

        let mut entries = self.entries.write().unwrap();
        entries.insert(key.into(), Entry::new(value, ttl));
    }

    /// Removes `key` from the cache.
    ///
    /// Removing an absent key is a no-op, not an error.
    ///
    /// # Returns
    ///
    /// Returns `true` if the key was present and removed, `false` otherwise.
    pub fn delete(&self, key: &str) -> bool {
        self.del_count.fetch_add(1, Ordering::Relaxed);

        let mut entries = self.entries.write().unwrap();
        entries.remove(key).is_some()
    }

    /// Runs one sweep pass: removes every entry whose deadline has passed.
    ///
    /// Takes the write lock once, captures the current time once, and
    /// removes every entry with `expires_at <= now`. Safe to call
    /// concurrently with any other operation; the lock is the consistency
    /// boundary. This is what the background sweeper invokes on each tick,
    /// and callers without a sweeper can invoke it directly.
    ///
    /// # Returns
    ///
    /// Returns the number of entries removed.
    pub fn sweep(&self) -> u64 {
        let now = Instant::now();

        let mut entries = self.entries.write().unwrap();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));
        let swept = (before - entries.len()) as u64;
        drop(entries);

        if swept > 0 {
            self.swept_count.fetch_add(swept, Ordering::Relaxed);
        }

        swept
    }

    /// Returns the number of entries currently in the cache, including any
    /// expired entries that have not been swept yet.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes all entries.
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap();
        entries.clear();
    }

    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len() as u64,
            get_ops: self.get_count.load(Ordering::Relaxed),
            set_ops: self.set_count.load(Ordering::Relaxed),
            del_ops: self.del_count.load(Ordering::Relaxed),
            swept: self.swept_count.load(Ordering::Relaxed),
        }
    }

    /// Attaches a background sweeper that sweeps every `interval`.
    ///
    /// At most one sweeper may be attached at a time. Starting a second one
    /// while the first is still running is a contract violation and is
    /// rejected here rather than left to race.
    ///
    /// Takes the cache by `&Arc` because the spawned task needs its own
    /// (weak) handle to the cache. Must be called from within a tokio
    /// runtime.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::SweeperAlreadyRunning`] if a sweeper is
    /// already attached.
    pub fn start_sweeper(cache: &Arc<Self>, interval: Duration) -> Result<(), CacheError>
    where
        V: Send + Sync + 'static,
    {
        let mut slot = cache.sweeper.lock().unwrap();
        if slot.is_some() {
            return Err(CacheError::SweeperAlreadyRunning);
        }
        *slot = Some(Sweeper::start(Arc::clone(cache), interval));
        Ok(())
    }

    /// Stops and detaches the attached background sweeper.
    ///
    /// The stopped sweeper is gone for good; attaching a fresh one later
    /// with [`start_sweeper`](Cache::start_sweeper) is allowed.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::SweeperNotRunning`] if no sweeper is attached.
    pub fn stop_sweeper(&self) -> Result<(), CacheError> {
        let sweeper = self
            .sweeper
            .lock()
            .unwrap()
            .take()
            .ok_or(CacheError::SweeperNotRunning)?;
        sweeper.stop();
        Ok(())
    }

    /// Tears the cache down: stops the attached sweeper if one is running,
    /// then removes all entries.
    ///
    /// Idempotent; calling it on an already shut down cache is harmless.
    pub fn shutdown(&self) {
        let _ = self.stop_sweeper();
        self.clear();
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy)]
pub struct CacheStats {
    /// Number of entries currently stored (swept or not)
    pub entries: u64,
    /// Total GET operations
    pub get_ops: u64,
    /// Total SET operations
    pub set_ops: u64,
    /// Total DELETE operations
    pub del_ops: u64,
    /// Total entries removed by sweep passes
    pub swept: u64,
}
