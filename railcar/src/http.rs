//! Deriving outcomes at the HTTP boundary.
//!
//! This adapter owns transport details only: status classification via
//! [`Fault::from_status`], body decoding, and failure logging. Everything
//! downstream of it composes through [`Outcome`] combinators.

use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::{error, warn};

use crate::fault::Fault;
use crate::outcome::{Outcome, UnitOutcome};

/// Derive a typed outcome from a JSON response.
///
/// A non-success status becomes a failure classified by
/// [`Fault::from_status`]; when `use_body_message` is set and the body is
/// non-blank, the raw body text replaces `fallback` as the message. A
/// success status has its body decoded as JSON: a `null`, empty, or
/// undecodable body is itself a failure carrying `fallback`, since a 200
/// with no usable payload is not a success.
pub async fn from_json_response<T: DeserializeOwned>(
    response: Response,
    fallback: &str,
    use_body_message: bool,
) -> Outcome<T> {
    let status = response.status();
    let url = response.url().clone();
    let body = read_body(response).await;

    if !status.is_success() {
        error!(%url, status = status.as_u16(), "service call failed");
        let message = if use_body_message && !body.trim().is_empty() {
            body.as_str()
        } else {
            fallback
        };
        return Outcome::from_fault(Fault::from_status(status.as_u16(), &body, message));
    }

    match serde_json::from_str::<Option<T>>(&body) {
        Ok(Some(value)) => Outcome::ok(value),
        Ok(None) => Outcome::fail(fallback),
        Err(err) => {
            error!(%url, error = %err, "failed to decode response body");
            Outcome::fail(fallback)
        }
    }
}

/// Derive a payload-free outcome from a response's status alone.
pub async fn from_response(response: Response, fallback: &str) -> UnitOutcome {
    let status = response.status();
    if status.is_success() {
        return Outcome::done();
    }
    let url = response.url().clone();
    error!(%url, status = status.as_u16(), "service call failed");
    let body = read_body(response).await;
    Outcome::from_fault(Fault::from_status(status.as_u16(), &body, fallback))
}

async fn read_body(response: Response) -> String {
    match response.text().await {
        Ok(body) => body,
        Err(err) => {
            warn!(error = %err, "failed to read response body");
            String::new()
        }
    }
}
