//! Railway-oriented error handling paired with a single-flight result cache.
//!
//! The crate has two tightly-coupled halves. [`Outcome`] and its combinators
//! make failure handling explicit and composable: a chain short-circuits at
//! the first [`Fault`] and carries it forward untouched. [`ResultCache`]
//! builds on that contract to wrap an expensive asynchronous loader: it
//! caches only successful loads, applies an absolute TTL, coalesces
//! concurrent first accesses into one load, and supports explicit
//! invalidation by poisoning a generation token rather than deleting
//! entries.
//!
//! ```
//! use railcar::Outcome;
//!
//! let outcome = Outcome::ok(21)
//!     .map(|n| n * 2)
//!     .ensure(|n| *n > 0, "expected a positive value");
//! assert_eq!(outcome.value(), Some(&42));
//! ```

pub mod cache;
pub mod fault;
pub mod http;
pub mod option_ext;
pub mod outcome;

mod future;

pub use cache::store::{
    CacheStore, EntryOptions, EntryPriority, LoadFuture, MemoryStore, StoreError, StoredValue,
};
pub use cache::{CacheKey, DEFAULT_TTL, GenerationToken, InvalidCacheKey, ResultCache};
pub use fault::{Fault, FaultKind, ValidationErrors};
pub use future::{OptionOutcomeFuture, OutcomeFuture};
pub use option_ext::OptionExt;
pub use outcome::{Outcome, UnitOutcome};
