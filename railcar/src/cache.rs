//! Keyed, TTL-bounded, poisonable caching of successfully-loaded values.
//!
//! [`ResultCache`] wraps an asynchronous loader returning an
//! [`Outcome`] and hands callers a plain value: loader failures are never
//! cached and never raised, they collapse into the type's default. The
//! underlying [`CacheStore`](store::CacheStore) port provides the
//! single-flight get-or-create primitive; entry invalidation happens by
//! revoking the [`GenerationToken`] an entry was populated under, not by
//! deleting it.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures_util::future::BoxFuture;
use thiserror::Error;
use tracing::{debug, warn};

use crate::outcome::Outcome;

pub mod store;
#[cfg(test)]
mod tests;

use store::{CacheStore, EntryOptions, StoreError, StoredValue};

/// Absolute time-to-live applied to populated entries unless overridden.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// Key addressing one logical entry in a [`CacheStore`](store::CacheStore).
///
/// Validated once at construction so every later use can trust the text:
/// a key must contain visible characters and carry no leading or trailing
/// whitespace. Two instances built over the same store with equal keys
/// address the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Validate `value` as a cache key.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCacheKey`] when the text is blank or padded with
    /// whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, InvalidCacheKey> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Err(InvalidCacheKey::Empty)
        } else if trimmed.len() != raw.len() {
            Err(InvalidCacheKey::SurroundingWhitespace)
        } else {
            Ok(Self(raw))
        }
    }

    /// The key text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Constructor-time contract violations for [`CacheKey`] and
/// [`ResultCache::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidCacheKey {
    /// Key is empty after trimming whitespace.
    #[error("cache key must not be empty")]
    Empty,
    /// Key carries leading or trailing whitespace.
    #[error("cache key must not contain surrounding whitespace")]
    SurroundingWhitespace,
}

/// Opaque, revocable token identifying one generation of cache validity.
///
/// Every populated entry records the token that was current at population
/// time; revoking it makes those entries unreachable without touching the
/// store. Clones share revocation state.
#[derive(Debug, Clone, Default)]
pub struct GenerationToken(Arc<AtomicBool>);

impl GenerationToken {
    /// A fresh, unrevoked token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Revoke this generation; entries tagged with it become unreachable.
    pub fn revoke(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// True once [`GenerationToken::revoke`] has been called on any clone.
    pub fn is_revoked(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Loader signature: zero-argument, asynchronously resolving to an outcome.
///
/// Ordinary failures travel through [`Outcome::Failure`]; the loader must
/// not panic for expected conditions.
type Loader<T> = dyn Fn() -> BoxFuture<'static, Outcome<T>> + Send + Sync;

/// Keyed cache of successfully-loaded values with single-flight population,
/// an absolute TTL, and explicit poisoning.
///
/// Two instances constructed over the same store with the same key share
/// storage: a value populated by one is visible to the other. This is
/// intentional; each instance's [`ResultCache::poison`] only revokes entries
/// populated under its own generation token.
pub struct ResultCache<T> {
    key: CacheKey,
    loader: Arc<Loader<T>>,
    store: Arc<dyn CacheStore>,
    ttl: Duration,
    token: Mutex<GenerationToken>,
}

impl<T> ResultCache<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    /// Build a cache over `store` for `key`, with the default five-minute
    /// TTL.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCacheKey`] when the key is blank or padded; the
    /// loader and store are required arguments and need no runtime check.
    pub fn new<F, Fut>(
        key: impl Into<String>,
        loader: F,
        store: Arc<dyn CacheStore>,
    ) -> Result<Self, InvalidCacheKey>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Outcome<T>> + Send + 'static,
    {
        let key = CacheKey::new(key)?;
        Ok(Self {
            key,
            loader: Arc::new(move || Box::pin(loader())),
            store,
            ttl: DEFAULT_TTL,
            token: Mutex::new(GenerationToken::new()),
        })
    }

    /// Replace the absolute TTL applied to future populations.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// The key this instance owns.
    pub fn key(&self) -> &CacheKey {
        &self.key
    }

    /// Fetch the cached value, loading it at most once per key per
    /// generation.
    ///
    /// Never fails: a failed or misbehaving load yields `T::default()` and
    /// is not memoised; the next call retries the loader. A successful load
    /// is returned and stored for the current generation and TTL window.
    ///
    /// Loader panics are not caught and propagate to the caller. Expected
    /// failure travels through [`Outcome::Failure`], never through a panic.
    pub async fn get(&self) -> T {
        let token = self.current_token();
        let loader = Arc::clone(&self.loader);
        let key = self.key.clone();
        let load: BoxFuture<'static, Result<StoredValue, StoreError>> = Box::pin(async move {
            match loader().await {
                Outcome::Success(value) => Ok(Arc::new(value) as StoredValue),
                Outcome::Failure(fault) => {
                    debug!(key = %key, fault = %fault, "cache load failed");
                    Err(StoreError::load_failed(fault.message()))
                }
            }
        });

        let options = EntryOptions::new(self.ttl, token);
        match self.store.get_or_create(&self.key, options, load).await {
            Ok(stored) => match stored.downcast::<T>() {
                Ok(value) => T::clone(&value),
                Err(_) => {
                    warn!(key = %self.key, "cached value has an unexpected type");
                    T::default()
                }
            },
            Err(err) => {
                debug!(key = %self.key, error = %err, "cache read fell back to default");
                T::default()
            }
        }
    }

    /// Invalidate every entry populated under the current generation.
    ///
    /// The old token is revoked and a fresh one installed atomically with
    /// respect to other `poison` and `get` calls; an in-flight load is not
    /// aborted, its population simply lands in a superseded generation.
    /// Safe to call repeatedly.
    pub fn poison(&self) {
        let mut current = self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        current.revoke();
        *current = GenerationToken::new();
    }

    fn current_token(&self) -> GenerationToken {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
