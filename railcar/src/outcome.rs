//! The railway success/failure union.
//!
//! [`Outcome`] carries a value or a [`Fault`], never both. Being an enum, the
//! "exactly one of success or failure" invariant is unrepresentable to
//! violate rather than checked at construction. Composition operators live in
//! the sibling combinators module and on [`OutcomeFuture`](crate::OutcomeFuture)
//! for still-pending outcomes; all of them share one rule: once failed, a
//! chain stays failed.

use std::error::Error;

use tracing::{error, info};

use crate::fault::{Fault, FaultKind, ValidationErrors};

mod combinators;

/// Success carrying a value, or failure carrying a [`Fault`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The operation produced a usable value.
    Success(T),
    /// The operation failed; the fault describes how.
    Failure(Fault),
}

/// An outcome with no payload beyond success itself.
pub type UnitOutcome = Outcome<()>;

impl<T> Outcome<T> {
    /// A successful outcome wrapping `value`.
    pub fn ok(value: T) -> Self {
        Self::Success(value)
    }

    /// A failed outcome with [`FaultKind::Unknown`].
    pub fn fail(message: impl Into<String>) -> Self {
        Self::Failure(Fault::new(message))
    }

    /// A failed outcome with an explicit classification.
    pub fn fail_with(message: impl Into<String>, kind: FaultKind) -> Self {
        Self::Failure(Fault::with_kind(message, kind))
    }

    /// A failed outcome carrying validation detail.
    pub fn fail_with_validation(
        message: impl Into<String>,
        kind: FaultKind,
        validation: ValidationErrors,
    ) -> Self {
        Self::Failure(Fault::with_validation(message, kind, validation))
    }

    /// A failed outcome from an existing fault.
    pub fn from_fault(fault: Fault) -> Self {
        Self::Failure(fault)
    }

    /// True when this outcome holds a value.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// True when this outcome holds a fault.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    /// Borrow the value, when successful.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Consume into the value, when successful.
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Failure(_) => None,
        }
    }

    /// Consume into the value, collapsing failure into the type's default.
    ///
    /// Callers that need to distinguish failure must inspect the outcome
    /// before collapsing; the default is contextually meaningless on failure.
    pub fn value_or_default(self) -> T
    where
        T: Default,
    {
        self.into_value().unwrap_or_default()
    }

    /// Borrow the fault, when failed.
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Self::Success(_) => None,
            Self::Failure(fault) => Some(fault),
        }
    }

    /// Consume into the fault, when failed.
    pub fn into_fault(self) -> Option<Fault> {
        match self {
            Self::Success(_) => None,
            Self::Failure(fault) => Some(fault),
        }
    }

    /// Drop the payload, keeping only success or failure.
    pub fn discard(self) -> UnitOutcome {
        match self {
            Self::Success(_) => Outcome::Success(()),
            Self::Failure(fault) => Outcome::Failure(fault),
        }
    }

    /// Observe the fault on failure; pass-through either way.
    pub fn on_failure(self, f: impl FnOnce(&Fault)) -> Self {
        if let Self::Failure(fault) = &self {
            f(fault);
        }
        self
    }

    /// Emit this outcome to the log: info on success, error on failure.
    ///
    /// On failure the fault message is prefixed to `message`. Logging never
    /// alters the outcome; every hook returns it unchanged.
    pub fn log(self, message: &str) -> Self {
        match &self {
            Self::Success(_) => info!("{message}"),
            Self::Failure(fault) => {
                let line = compose_failure_line(fault, message);
                error!("{line}");
            }
        }
        self
    }

    /// Emit at info level regardless of state.
    pub fn log_as_info(self, message: &str) -> Self {
        match &self {
            Self::Success(_) => info!("{message}"),
            Self::Failure(fault) => {
                let line = compose_failure_line(fault, message);
                info!("{line}");
            }
        }
        self
    }

    /// Emit `message` at info level, only on success.
    pub fn log_on_success(self, message: &str) -> Self {
        if self.is_success() {
            info!("{message}");
        }
        self
    }

    /// Emit at error level, only on failure; the fault message is prefixed.
    pub fn log_on_failure(self, message: &str) -> Self {
        if let Self::Failure(fault) = &self {
            let line = compose_failure_line(fault, message);
            error!("{line}");
        }
        self
    }

    /// Emit at error level with an attached source error.
    pub fn log_with_error(self, message: &str, source: &(dyn Error + 'static)) -> Self {
        match &self {
            Self::Success(_) => error!(error = %source, "{message}"),
            Self::Failure(fault) => {
                let line = compose_failure_line(fault, message);
                error!(error = %source, "{line}");
            }
        }
        self
    }
}

impl UnitOutcome {
    /// A successful outcome with no payload.
    pub fn done() -> Self {
        Self::Success(())
    }

    /// Short-circuit to the first failure in order; unit success when all
    /// succeed.
    pub fn combine<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = Self>,
    {
        for outcome in outcomes {
            if outcome.is_failure() {
                return outcome;
            }
        }
        Self::done()
    }
}

impl<T> From<Fault> for Outcome<T> {
    fn from(fault: Fault) -> Self {
        Self::Failure(fault)
    }
}

fn compose_failure_line(fault: &Fault, message: &str) -> String {
    if message.is_empty() {
        fault.message().to_owned()
    } else {
        format!("{}-{}", fault.message(), message)
    }
}
