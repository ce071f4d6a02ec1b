//! Failure payloads carried along the railway.
//!
//! A [`Fault`] classifies what went wrong ([`FaultKind`]), carries a
//! human-readable message, and optionally attaches structured
//! [`ValidationErrors`] decoded from a bad-request body. Faults travel as
//! data inside [`Outcome`](crate::Outcome) chains; they are never raised.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

#[cfg(test)]
mod tests;

/// Closed classification of failure causes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FaultKind {
    /// Anything without a more specific classification.
    #[default]
    Unknown,
    /// The upstream rejected the caller's credentials.
    AuthorizationFailed,
    /// The upstream resource is missing or unreachable.
    NotFound,
    /// The request was rejected as malformed; may carry validation detail.
    BadRequest,
}

/// Structured validation detail decoded from a bad-request body.
///
/// Wire shape: `{ "message": string, "errors": { field: [violation, ...] } }`.
/// Only fields with at least one violation are retained; the map is ordered
/// by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default)]
    errors: BTreeMap<String, Vec<String>>,
}

/// Loosely-typed wire form; `errors` may be absent entirely, which means the
/// body carried no validation detail at all.
#[derive(Deserialize)]
struct ValidationBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ValidationErrors {
    /// Build validation detail from an explicit field map.
    pub fn new(message: Option<String>, errors: BTreeMap<String, Vec<String>>) -> Self {
        Self { message, errors }
    }

    /// Best-effort decode of an error body.
    ///
    /// Returns `None` when the body is not the expected shape or carries no
    /// `errors` map. A decode failure is logged and suppressed: validation
    /// detail is diagnostic enrichment, never a correctness-critical path.
    pub fn parse(body: &str) -> Option<Self> {
        let decoded: ValidationBody = match serde_json::from_str(body) {
            Ok(decoded) => decoded,
            Err(err) => {
                error!(error = %err, "failed to decode error body as validation detail");
                return None;
            }
        };
        let errors: BTreeMap<String, Vec<String>> = decoded
            .errors?
            .into_iter()
            .filter(|(_, violations)| !violations.is_empty())
            .collect();
        Some(Self {
            message: decoded.message,
            errors,
        })
    }

    /// Top-level message decoded from the body, if any.
    ///
    /// Informational only; a [`Fault`] derived from a response always keeps
    /// the caller-supplied message (see [`Fault::from_status`]).
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Field name to ordered violation messages.
    pub fn violations(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    /// True when no field retained any violation.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Immutable failure payload: classification, message, optional validation
/// detail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Fault {
    kind: FaultKind,
    message: String,
    validation: Option<ValidationErrors>,
}

impl Fault {
    /// A fault with [`FaultKind::Unknown`].
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_kind(message, FaultKind::Unknown)
    }

    /// A fault with an explicit classification.
    pub fn with_kind(message: impl Into<String>, kind: FaultKind) -> Self {
        Self {
            kind,
            message: message.into(),
            validation: None,
        }
    }

    /// A fault carrying structured validation detail.
    pub fn with_validation(
        message: impl Into<String>,
        kind: FaultKind,
        validation: ValidationErrors,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            validation: Some(validation),
        }
    }

    /// Derive a fault from a transport status code and error body.
    ///
    /// Classification: 401 maps to authorization failure; 404, 503 and 504 to
    /// not-found; 400 to bad-request, which is the only kind that attempts to
    /// decode `body` as [`ValidationErrors`]; everything else is unknown.
    ///
    /// The returned message is always `fallback`. The body's own `message`
    /// field, when decoded, travels only inside the validation detail. This
    /// asymmetry is long-standing consumer-visible behaviour; keep it.
    pub fn from_status(status: u16, body: &str, fallback: impl Into<String>) -> Self {
        let (kind, validation) = match status {
            401 => (FaultKind::AuthorizationFailed, None),
            404 | 503 | 504 => (FaultKind::NotFound, None),
            400 => (FaultKind::BadRequest, ValidationErrors::parse(body)),
            _ => (FaultKind::Unknown, None),
        };
        Self {
            kind,
            message: fallback.into(),
            validation,
        }
    }

    /// Rebuild this fault with a different message, preserving the
    /// classification and any validation detail.
    pub fn with_message(self, message: impl Into<String>) -> Self {
        Self {
            kind: self.kind,
            message: message.into(),
            validation: self.validation,
        }
    }

    /// Failure classification.
    pub fn kind(&self) -> FaultKind {
        self.kind
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Structured validation detail, present only on decoded bad requests.
    pub fn validation(&self) -> Option<&ValidationErrors> {
        self.validation.as_ref()
    }
}
