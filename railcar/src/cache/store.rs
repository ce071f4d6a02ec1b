//! The storage port behind [`ResultCache`](super::ResultCache) and its
//! in-process implementation.
//!
//! The port's capability set is deliberately small: single-flight
//! get-or-create, and removal. Absolute expiration and the revocable
//! generation trigger arrive as per-population [`EntryOptions`], so the
//! store never needs to know who owns which generation.

use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use thiserror::Error;
use tokio::sync::OnceCell;
use tokio::time::Instant;
use tracing::debug;

use super::{CacheKey, GenerationToken};

/// Type-erased stored value, shared across caches of different value types.
pub type StoredValue = Arc<dyn Any + Send + Sync>;

/// A pending load handed to [`CacheStore::get_or_create`]; polled at most
/// once, and only when the key has no live entry.
pub type LoadFuture = BoxFuture<'static, Result<StoredValue, StoreError>>;

/// Relative importance of a populated entry; metadata for stores that evict
/// under pressure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EntryPriority {
    /// First to go under pressure.
    Low,
    /// The default.
    #[default]
    Normal,
    /// Evicted last.
    High,
}

/// Per-population settings: absolute TTL, the generation token entries are
/// tagged with, and entry priority.
#[derive(Debug, Clone)]
pub struct EntryOptions {
    ttl: Duration,
    token: GenerationToken,
    priority: EntryPriority,
}

impl EntryOptions {
    /// Options with the given TTL and token, at normal priority.
    pub fn new(ttl: Duration, token: GenerationToken) -> Self {
        Self {
            ttl,
            token,
            priority: EntryPriority::Normal,
        }
    }

    /// Override the entry priority.
    pub fn with_priority(mut self, priority: EntryPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Absolute time-to-live measured from population.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Token the populated entry will be tagged with.
    pub fn token(&self) -> &GenerationToken {
        &self.token
    }

    /// Entry priority.
    pub fn priority(&self) -> EntryPriority {
        self.priority
    }
}

/// Failures surfaced by a cache store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The load handed to `get_or_create` resolved to a failure; nothing was
    /// stored.
    #[error("cache load failed: {message}")]
    LoadFailed {
        /// Message carried by the failed load's fault.
        message: String,
    },
}

impl StoreError {
    /// A [`StoreError::LoadFailed`] with the given message.
    pub fn load_failed(message: impl Into<String>) -> Self {
        Self::LoadFailed {
            message: message.into(),
        }
    }
}

/// Storage port consumed by [`ResultCache`](super::ResultCache).
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Return the live entry for `key`, or populate it by resolving `load`.
    ///
    /// Concurrent callers for the same unpopulated key must be coalesced so
    /// that one load services all of them; a failed load must leave the key
    /// unpopulated. An entry whose TTL elapsed or whose token was revoked
    /// counts as absent.
    async fn get_or_create(
        &self,
        key: &CacheKey,
        options: EntryOptions,
        load: LoadFuture,
    ) -> Result<StoredValue, StoreError>;

    /// Drop any entry stored under `key`.
    fn remove(&self, key: &CacheKey);
}

struct PopulatedEntry {
    value: StoredValue,
    deadline: Instant,
    token: GenerationToken,
    priority: EntryPriority,
}

impl PopulatedEntry {
    fn is_live(&self, now: Instant) -> bool {
        !self.token.is_revoked() && now < self.deadline
    }
}

#[derive(Default)]
struct Slot {
    cell: OnceCell<PopulatedEntry>,
}

/// In-process [`CacheStore`] backed by a keyed map of single-flight slots.
///
/// Each key owns a slot holding a `tokio` once-cell: the first caller runs
/// the load while later arrivals wait on the cell and observe its value. A
/// failed load populates nothing, so the next call retries. Deadlines use
/// the `tokio` clock, which lets tests drive expiry with a paused runtime.
/// No lock is held across a load await.
///
/// Expiry is lazy: a stale slot is dropped when its key is next read or
/// passed to [`CacheStore::remove`], so a key that is never touched again
/// retains its slot. Workloads with unbounded key churn should remove keys
/// they are done with.
#[derive(Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, Arc<Slot>>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_for(&self, key: &CacheKey) -> Arc<Slot> {
        let mut slots = self.lock_slots();
        Arc::clone(slots.entry(key.as_str().to_owned()).or_default())
    }

    /// Drop `stale`'s map entry unless a newer slot already replaced it.
    fn evict_if_current(&self, key: &CacheKey, stale: &Arc<Slot>) {
        let mut slots = self.lock_slots();
        let replaced = slots
            .get(key.as_str())
            .is_some_and(|current| Arc::ptr_eq(current, stale));
        if replaced {
            if let Some(entry) = stale.cell.get() {
                debug!(key = %key, priority = ?entry.priority, "evicted stale cache entry");
            }
            slots.remove(key.as_str());
        }
    }

    fn lock_slots(&self) -> MutexGuard<'_, HashMap<String, Arc<Slot>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get_or_create(
        &self,
        key: &CacheKey,
        options: EntryOptions,
        load: LoadFuture,
    ) -> Result<StoredValue, StoreError> {
        let mut load = Some(load);
        loop {
            let slot = self.slot_for(key);
            if let Some(entry) = slot.cell.get() {
                if entry.is_live(Instant::now()) {
                    return Ok(Arc::clone(&entry.value));
                }
                self.evict_if_current(key, &slot);
                continue;
            }

            let ran_load = AtomicBool::new(false);
            let init = slot
                .cell
                .get_or_try_init(|| {
                    ran_load.store(true, Ordering::SeqCst);
                    let pending = load.take();
                    let ttl = options.ttl;
                    let token = options.token.clone();
                    let priority = options.priority;
                    async move {
                        let Some(pending) = pending else {
                            // Unreachable: the load is only consumed on the
                            // iteration that returns.
                            return Err(StoreError::load_failed("load already consumed"));
                        };
                        let value = pending.await?;
                        Ok(PopulatedEntry {
                            value,
                            deadline: Instant::now() + ttl,
                            token,
                            priority,
                        })
                    }
                })
                .await;

            match init {
                // Our own load's value is returned even if its generation
                // was superseded mid-flight; only later readers miss it.
                Ok(entry) if ran_load.load(Ordering::SeqCst) || entry.is_live(Instant::now()) => {
                    return Ok(Arc::clone(&entry.value));
                }
                Ok(_) => self.evict_if_current(key, &slot),
                Err(err) => return Err(err),
            }
        }
    }

    fn remove(&self, key: &CacheKey) {
        self.lock_slots().remove(key.as_str());
    }
}
