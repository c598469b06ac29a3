//! Store Module
//!
//! This module provides the core storage functionality for tidycache:
//! a concurrency-safe key-value cache with per-entry TTL and a background
//! sweeper that evicts expired entries.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 Cache<V>                    │
//! │   RwLock<HashMap<String, Entry<V>>>         │
//! └─────────────────────────────────────────────┘
//!                       ▲
//!                       │ sweep() on a fixed interval
//!           ┌───────────┴───────────┐
//!           │        Sweeper        │
//!           │ (Background Tokio Task)│
//!           └───────────────────────┘
//! ```
//!
//! ## Features
//!
//! - **Single RwLock**: multiple concurrent readers, exclusive writers
//! - **Fixed TTL**: deadlines are computed once at write time, no sliding
//! - **Sweep-only eviction**: reads never evict; the sweeper (or an
//!   explicit delete) removes expired entries
//! - **Generic payload**: store any `V: Clone`; callers own typing concerns
//!
//! ## Example
//!
//! ```
//! use tidycache::store::Cache;
//! use bytes::Bytes;
//! use std::time::Duration;
//!
//! let cache = Cache::new();
//!
//! cache.set("name", Bytes::from("tidy"), Duration::from_secs(60));
//! assert_eq!(cache.get("name"), Some(Bytes::from("tidy")));
//!
//! // Evict expired entries manually when no sweeper is attached.
//! let swept = cache.sweep();
//! assert_eq!(swept, 0);
//! ```

pub mod cache;
pub mod sweeper;

// Re-export commonly used types
pub use cache::{Cache, CacheError, CacheStats, Entry};
pub use sweeper::{start_sweeper, Sweeper, DEFAULT_SWEEP_INTERVAL};
