//! The on-ramp from optional values into the railway.
//!
//! `std::option::Option` already carries the semantics this crate needs:
//! total presence predicates, structural equality on the contained value,
//! and never-failing unwrapping with a supplied or default fallback. The one
//! operation std lacks is the conversion into an [`Outcome`], provided here
//! as an extension trait.

use tracing::error;

use crate::outcome::Outcome;

/// Conversion from an optional value into the railway.
pub trait OptionExt<T> {
    /// Presence becomes success; absence becomes an unknown-kind failure
    /// carrying `message`, logged at error level.
    fn to_outcome(self, message: impl Into<String>) -> Outcome<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn to_outcome(self, message: impl Into<String>) -> Outcome<T> {
        match self {
            Some(value) => Outcome::Success(value),
            None => {
                let message = message.into();
                error!("{message}");
                Outcome::fail(message)
            }
        }
    }
}
