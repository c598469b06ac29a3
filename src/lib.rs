//! # tidycache - A Concurrency-Safe In-Memory TTL Cache
//!
//! tidycache is a process-local key-value cache where every entry carries a
//! time-to-live, paired with an asynchronous background sweeper that evicts
//! stale entries without blocking readers or writers.
//!
//! ## Features
//!
//! - **Concurrency-Safe**: a single `RwLock` serializes writers and sweeps
//!   while allowing any number of concurrent readers
//! - **Per-Entry TTL**: deadlines are absolute, computed once at write time
//! - **Background Sweeper**: a tokio task sweeps on a fixed interval and
//!   stops cooperatively via a cancellation signal
//! - **Sweeper Optional**: a cache without a sweeper works fine; evict with
//!   explicit deletes or manual [`Cache::sweep`] calls
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         tidycache                           │
//! │                                                             │
//! │   callers ──── get / set / delete ────┐                     │
//! │                                       ▼                     │
//! │                    ┌──────────────────────────────┐         │
//! │                    │           Cache<V>           │         │
//! │                    │ RwLock<HashMap<String,Entry>>│         │
//! │                    └──────────────────────────────┘         │
//! │                                       ▲                     │
//! │                                       │ sweep()             │
//! │                    ┌──────────────────┴───────────┐         │
//! │                    │           Sweeper            │         │
//! │                    │    (Background Tokio Task)   │         │
//! │                    └──────────────────────────────┘         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use tidycache::Cache;
//! use bytes::Bytes;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Create a cache with a sweeper that runs every 2 seconds
//!     let cache = Cache::with_sweeper(Duration::from_secs(2));
//!
//!     // Entries expire 5 minutes after being written
//!     cache.set("session", Bytes::from("token123"), Duration::from_secs(300));
//!
//!     if let Some(token) = cache.get("session") {
//!         println!("session token: {:?}", token);
//!     }
//!
//!     // Stop the sweeper and drop all entries on the way out
//!     cache.shutdown();
//! }
//! ```
//!
//! ## Expiration Model
//!
//! Expiration is *lazy with eventual eviction*. An entry past its deadline
//! is not removed on the clock tick alone: it stays visible to `get` and
//! `delete` until a sweep pass (or an explicit delete) removes it. A plain
//! read never evicts and never checks the deadline. This keeps the read
//! path to a single shared-lock map lookup; the trade-off is that eviction
//! timing is only as fine-grained as the sweep interval.
//!
//! ## Module Overview
//!
//! - [`store`]: the cache, its entries, and the background sweeper

pub mod store;

// Re-export commonly used types for convenience
pub use store::{
    start_sweeper, Cache, CacheError, CacheStats, Entry, Sweeper, DEFAULT_SWEEP_INTERVAL,
};

/// Version of tidycache
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
