//! Tests for the domain error payload and its serialised form.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("bad")
}

#[rstest]
fn invalid_request_constructor_sets_code(base_error: Error) {
    assert_eq!(base_error.code(), ErrorCode::InvalidRequest);
    assert_eq!(base_error.message(), "bad");
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
#[case(Error::forbidden("x"), "forbidden")]
#[case(Error::not_found("x"), "not_found")]
#[case(Error::invalid_state("x"), "invalid_state")]
#[case(Error::window_expired("x"), "window_expired")]
#[case(Error::payment_failed("x"), "payment_failed")]
#[case(Error::conflict("x"), "conflict")]
fn codes_serialise_as_stable_snake_case(#[case] error: Error, #[case] expected: &str) {
    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(value.get("code").and_then(Value::as_str), Some(expected));
}

#[rstest]
fn details_are_omitted_when_absent(base_error: Error) {
    let value = serde_json::to_value(&base_error).expect("serialise error");
    assert!(value.get("details").is_none());
}

#[rstest]
fn deserialising_rejects_blank_messages() {
    let payload = json!({ "code": "not_found", "message": "  " });
    let result = serde_json::from_value::<Error>(payload);
    assert!(result.is_err());
}

#[rstest]
fn details_survive_serialisation(base_error: Error) {
    let error = base_error.with_details(json!({ "field": "price" }));
    let value = serde_json::to_value(&error).expect("serialise error");
    let restored: Error = serde_json::from_value(value).expect("deserialise error");
    assert_eq!(restored, error);
}
