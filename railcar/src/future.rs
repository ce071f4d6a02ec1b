//! Composition operators over still-pending outcomes.
//!
//! Blanket-implemented for every `Future` resolving to an
//! [`Outcome`], so railway chains read the same whether the antecedent is
//! immediate or asynchronous: the antecedent is awaited first, then the
//! branch rules from the combinators module apply unchanged.

use std::future::Future;

use crate::outcome::Outcome;

/// Railway combinators over a pending [`Outcome`].
pub trait OutcomeFuture<T>: Future<Output = Outcome<T>> + Sized {
    /// Await, then transform the value on success.
    fn map<K, F>(self, f: F) -> impl Future<Output = Outcome<K>>
    where
        F: FnOnce(T) -> K,
    {
        async move { self.await.map(f) }
    }

    /// Await, then transform on success; a failure is rebuilt with
    /// `message_override`, keeping kind and validation detail.
    fn map_or_message<K, F>(
        self,
        f: F,
        message_override: impl Into<String>,
    ) -> impl Future<Output = Outcome<K>>
    where
        F: FnOnce(T) -> K,
    {
        async move { self.await.map_or_message(f, message_override) }
    }

    /// Await, then chain an asynchronous fallible continuation.
    fn and_then<K, F, Fut>(self, f: F) -> impl Future<Output = Outcome<K>>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Outcome<K>>,
    {
        async move { self.await.and_then_async(f).await }
    }

    /// Await, then observe the value on success.
    fn on_success<F>(self, f: F) -> impl Future<Output = Outcome<T>>
    where
        F: FnOnce(&T),
    {
        async move { self.await.on_success(f) }
    }

    /// Await, then demand a business rule of the value.
    fn ensure<P>(self, predicate: P, message: impl Into<String>) -> impl Future<Output = Outcome<T>>
    where
        P: FnOnce(&T) -> bool,
    {
        async move { self.await.ensure(predicate, message) }
    }

    /// Await, then demand an asynchronously-evaluated business rule.
    fn ensure_async<P, Fut>(
        self,
        predicate: P,
        message: impl Into<String>,
    ) -> impl Future<Output = Outcome<T>>
    where
        P: FnOnce(&T) -> Fut,
        Fut: Future<Output = bool>,
    {
        async move { self.await.ensure_async(predicate, message).await }
    }

    /// Await, then run a result-replacing branch when the predicate holds.
    fn on_condition<P, F, Fut>(self, predicate: P, f: F) -> impl Future<Output = Outcome<T>>
    where
        P: FnOnce(&T) -> bool,
        F: FnOnce(Outcome<T>) -> Fut,
        Fut: Future<Output = Outcome<T>>,
    {
        async move { self.await.on_condition_async(predicate, f).await }
    }

    /// Await, then rebuild a failure with a new message.
    fn override_error_message(
        self,
        message: impl Into<String>,
    ) -> impl Future<Output = Outcome<T>> {
        async move { self.await.override_error_message(message) }
    }
}

impl<T, Fut> OutcomeFuture<T> for Fut where Fut: Future<Output = Outcome<T>> {}

/// Combinators specific to pending outcomes whose payload is optional.
pub trait OptionOutcomeFuture<T>: Future<Output = Outcome<Option<T>>> + Sized {
    /// Await, then convert a success-of-absent into a failure.
    fn fail_if_no_value(self, message: impl Into<String>) -> impl Future<Output = Outcome<T>> {
        async move { self.await.fail_if_no_value(message) }
    }
}

impl<T, Fut> OptionOutcomeFuture<T> for Fut where Fut: Future<Output = Outcome<Option<T>>> {}
