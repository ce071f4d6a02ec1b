//! Covers status classification, validation-body decoding, and the
//! fallback-message contract.
use std::collections::BTreeMap;

use rstest::rstest;

use super::{Fault, FaultKind, ValidationErrors};

#[rstest]
#[case(401, FaultKind::AuthorizationFailed)]
#[case(404, FaultKind::NotFound)]
#[case(503, FaultKind::NotFound)]
#[case(504, FaultKind::NotFound)]
#[case(400, FaultKind::BadRequest)]
#[case(500, FaultKind::Unknown)]
#[case(418, FaultKind::Unknown)]
fn status_codes_classify_per_fixed_table(#[case] status: u16, #[case] expected: FaultKind) {
    let fault = Fault::from_status(status, "", "call failed");
    assert_eq!(fault.kind(), expected);
    assert_eq!(fault.message(), "call failed");
}

#[rstest]
fn bad_request_retains_only_fields_with_violations() {
    let body = r#"{"message":"invalid","errors":{"A":[],"B":["X"]}}"#;
    let fault = Fault::from_status(400, body, "call failed");

    let validation = fault.validation().expect("validation detail decoded");
    assert_eq!(validation.message(), Some("invalid"));
    assert_eq!(
        validation.violations(),
        &BTreeMap::from([("B".to_owned(), vec!["X".to_owned()])])
    );
}

#[rstest]
fn fallback_message_wins_over_decoded_body_message() {
    let body = r#"{"message":"body says otherwise","errors":{"field":["bad"]}}"#;
    let fault = Fault::from_status(400, body, "caller fallback");

    assert_eq!(fault.message(), "caller fallback");
    let validation = fault.validation().expect("validation detail decoded");
    assert_eq!(validation.message(), Some("body says otherwise"));
}

#[rstest]
#[case("not json at all")]
#[case("")]
#[case("[1,2,3]")]
fn undecodable_body_is_swallowed(#[case] body: &str) {
    let fault = Fault::from_status(400, body, "call failed");
    assert_eq!(fault.kind(), FaultKind::BadRequest);
    assert!(fault.validation().is_none());
}

#[rstest]
fn body_without_errors_map_yields_no_detail() {
    let fault = Fault::from_status(400, r#"{"message":"just a message"}"#, "call failed");
    assert!(fault.validation().is_none());
}

#[rstest]
fn non_bad_request_never_decodes_the_body() {
    let body = r#"{"message":"ignored","errors":{"field":["bad"]}}"#;
    let fault = Fault::from_status(404, body, "call failed");
    assert!(fault.validation().is_none());
}

#[rstest]
fn with_message_preserves_kind_and_validation() {
    let body = r#"{"errors":{"field":["bad"]}}"#;
    let original = Fault::from_status(400, body, "first message");
    let validation = original.validation().cloned();

    let renamed = original.with_message("second message");
    assert_eq!(renamed.message(), "second message");
    assert_eq!(renamed.kind(), FaultKind::BadRequest);
    assert_eq!(renamed.validation().cloned(), validation);
}

#[rstest]
fn all_empty_violation_lists_leave_an_empty_map() {
    let fault = Fault::from_status(400, r#"{"errors":{"A":[],"B":[]}}"#, "call failed");
    let validation = fault.validation().expect("errors map was present");
    assert!(validation.is_empty());
}

#[rstest]
fn display_uses_the_message() {
    let fault = Fault::with_kind("something broke", FaultKind::NotFound);
    assert_eq!(fault.to_string(), "something broke");
}

#[rstest]
fn validation_errors_round_trip_through_serde() {
    let detail = ValidationErrors::new(
        Some("invalid".to_owned()),
        BTreeMap::from([("name".to_owned(), vec!["required".to_owned()])]),
    );
    let json = serde_json::to_string(&detail).expect("serialises");
    let back: ValidationErrors = serde_json::from_str(&json).expect("deserialises");
    assert_eq!(back, detail);
}
