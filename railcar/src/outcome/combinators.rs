//! Composition operators over immediate outcomes.
//!
//! Failure always short-circuits: no mapping, predicate, or branch function
//! runs on a failed antecedent, and the original fault travels forward
//! untouched unless a message override is asked for explicitly.

use std::future::Future;

use tracing::{debug, info};

use super::Outcome;
use crate::fault::{Fault, FaultKind};

impl<T> Outcome<T> {
    /// Transform the value on success; pass the fault through on failure.
    pub fn map<K>(self, f: impl FnOnce(T) -> K) -> Outcome<K> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failure(fault) => {
                debug!(fault = %fault, "failure propagated through map");
                Outcome::Failure(fault)
            }
        }
    }

    /// As [`Outcome::map`], but a failure is rebuilt with `message_override`,
    /// keeping its kind and validation detail.
    pub fn map_or_message<K>(
        self,
        f: impl FnOnce(T) -> K,
        message_override: impl Into<String>,
    ) -> Outcome<K> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::Failure(fault) => Outcome::Failure(fault.with_message(message_override)),
        }
    }

    /// Observe the value on success; pass-through either way.
    pub fn on_success(self, f: impl FnOnce(&T)) -> Self {
        if let Self::Success(value) = &self {
            f(value);
        }
        self
    }

    /// Chain a fallible continuation, flattening its outcome.
    pub fn and_then<K>(self, f: impl FnOnce(T) -> Outcome<K>) -> Outcome<K> {
        match self {
            Self::Success(value) => f(value),
            Self::Failure(fault) => {
                debug!(fault = %fault, "failure propagated through and_then");
                Outcome::Failure(fault)
            }
        }
    }

    /// Chain an asynchronous fallible continuation.
    pub async fn and_then_async<K, Fut>(self, f: impl FnOnce(T) -> Fut) -> Outcome<K>
    where
        Fut: Future<Output = Outcome<K>>,
    {
        match self {
            Self::Success(value) => f(value).await,
            Self::Failure(fault) => {
                debug!(fault = %fault, "failure propagated through and_then");
                Outcome::Failure(fault)
            }
        }
    }

    /// Demand a business rule of the value.
    ///
    /// A false predicate converts success into a bad-request failure, logged
    /// at info level: a rejected precondition is an expected outcome, not a
    /// system fault.
    pub fn ensure(self, predicate: impl FnOnce(&T) -> bool, message: impl Into<String>) -> Self {
        match self {
            Self::Success(value) if !predicate(&value) => {
                let message = message.into();
                info!("{message}");
                Self::Failure(Fault::with_kind(message, FaultKind::BadRequest))
            }
            other => other,
        }
    }

    /// As [`Outcome::ensure`], with the message computed from the value.
    pub fn ensure_with(
        self,
        predicate: impl FnOnce(&T) -> bool,
        message: impl FnOnce(&T) -> String,
    ) -> Self {
        match self {
            Self::Success(value) if !predicate(&value) => {
                let message = message(&value);
                info!("{message}");
                Self::Failure(Fault::with_kind(message, FaultKind::BadRequest))
            }
            other => other,
        }
    }

    /// As [`Outcome::ensure`], with an asynchronous predicate.
    pub async fn ensure_async<Fut>(
        self,
        predicate: impl FnOnce(&T) -> Fut,
        message: impl Into<String>,
    ) -> Self
    where
        Fut: Future<Output = bool>,
    {
        match self {
            Self::Success(value) => {
                if predicate(&value).await {
                    Self::Success(value)
                } else {
                    let message = message.into();
                    info!("{message}");
                    Self::Failure(Fault::with_kind(message, FaultKind::BadRequest))
                }
            }
            other => other,
        }
    }

    /// Run a result-replacing branch only on success and only when the
    /// predicate holds; everything else passes through unchanged.
    pub fn on_condition(
        self,
        predicate: impl FnOnce(&T) -> bool,
        f: impl FnOnce(Self) -> Self,
    ) -> Self {
        match self {
            Self::Success(value) if predicate(&value) => f(Self::Success(value)),
            other => other,
        }
    }

    /// As [`Outcome::on_condition`], with an asynchronous branch.
    pub async fn on_condition_async<Fut>(
        self,
        predicate: impl FnOnce(&T) -> bool,
        f: impl FnOnce(Self) -> Fut,
    ) -> Self
    where
        Fut: Future<Output = Self>,
    {
        match self {
            Self::Success(value) if predicate(&value) => f(Self::Success(value)).await,
            other => other,
        }
    }

    /// Observe the value only on success and only when the predicate holds.
    pub fn inspect_when(self, predicate: impl FnOnce(&T) -> bool, f: impl FnOnce(&T)) -> Self {
        if let Self::Success(value) = &self {
            if predicate(value) {
                f(value);
            }
        }
        self
    }

    /// Rebuild a failure with a new message, keeping kind and validation
    /// detail; success is untouched.
    pub fn override_error_message(self, message: impl Into<String>) -> Self {
        match self {
            Self::Failure(fault) => Self::Failure(fault.with_message(message)),
            success => success,
        }
    }
}

impl<T> Outcome<Option<T>> {
    /// Convert a success whose payload is absent into a failure.
    ///
    /// Transport-level success and a usable value are distinct conditions;
    /// this is where the distinction is enforced.
    pub fn fail_if_no_value(self, message: impl Into<String>) -> Outcome<T> {
        match self {
            Self::Success(Some(value)) => Outcome::Success(value),
            Self::Success(None) => Outcome::fail(message),
            Self::Failure(fault) => Outcome::Failure(fault),
        }
    }
}

impl<T> Outcome<Vec<T>> {
    /// Concatenate two sequence outcomes; the first failure wins, left side
    /// checked first.
    pub fn concat(self, other: Self) -> Self {
        match (self, other) {
            (Self::Failure(fault), _) => Self::Failure(fault),
            (_, Self::Failure(fault)) => Self::Failure(fault),
            (Self::Success(mut left), Self::Success(right)) => {
                left.extend(right);
                Self::Success(left)
            }
        }
    }

    /// Reorder the sequence on success.
    pub fn apply_sorting(self, f: impl FnOnce(Vec<T>) -> Vec<T>) -> Self {
        match self {
            Self::Success(values) => Self::Success(f(values)),
            failure => failure,
        }
    }

    /// Element-wise projection of the sequence on success.
    pub fn select<K>(self, f: impl FnMut(T) -> K) -> Outcome<Vec<K>> {
        match self {
            Self::Success(values) => Outcome::Success(values.into_iter().map(f).collect()),
            Self::Failure(fault) => Outcome::Failure(fault),
        }
    }
}
