//! Tests for domain error construction and serialisation.

use std::error::Error as _;

use rstest::rstest;
use serde_json::{Value, json};

use super::*;

#[derive(Debug, thiserror::Error)]
#[error("unique violation on users_email_key")]
struct FakeStoreError;

#[rstest]
#[case(ErrorCode::InvalidRequest, "BAD_USER_INPUT", true)]
#[case(ErrorCode::Unauthenticated, "UNAUTHENTICATED", true)]
#[case(ErrorCode::InvalidCredentials, "INVALID_CREDENTIALS", true)]
#[case(ErrorCode::ServiceUnavailable, "SERVICE_UNAVAILABLE", false)]
#[case(ErrorCode::InternalError, "INTERNAL_SERVER_ERROR", false)]
fn graphql_codes_and_visibility(
    #[case] code: ErrorCode,
    #[case] graphql: &str,
    #[case] client_facing: bool,
) {
    assert_eq!(code.graphql_code(), graphql);
    assert_eq!(code.is_client_facing(), client_facing);
}

#[test]
fn credential_failures_share_one_message() {
    let unknown_user = Error::invalid_credentials();
    let wrong_password = Error::invalid_credentials();
    assert_eq!(unknown_user.message(), wrong_password.message());
    assert_eq!(unknown_user.message(), "Incorrect username or password.");
}

#[test]
fn cause_is_exposed_as_source_but_not_serialised() {
    let err = Error::invalid_request(DUPLICATE_EMAIL_MESSAGE).with_cause(FakeStoreError);
    let source = err.source().expect("cause recorded");
    assert_eq!(source.to_string(), "unique violation on users_email_key");

    let value = serde_json::to_value(&err).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "code": "invalid_request",
            "message": "A user with that email address is already registered."
        })
    );
}

#[tokio::test]
async fn new_captures_trace_id_in_scope() {
    let trace_id: TraceId = "00000000-0000-0000-0000-000000000000"
        .parse()
        .expect("valid UUID");
    let err = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
    assert_eq!(err.trace_id(), Some("00000000-0000-0000-0000-000000000000"));
}

#[test]
fn new_without_scope_has_no_trace_id() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[test]
fn redaction_hides_internal_details() {
    let err = Error::internal("pool exhausted on db-3")
        .with_details(json!({ "host": "db-3" }))
        .with_trace_id("abc");
    let redacted = err.redacted();
    assert_eq!(redacted.code(), ErrorCode::InternalError);
    assert_eq!(redacted.message(), "Internal server error");
    assert!(redacted.details().is_none());
    assert_eq!(redacted.trace_id(), Some("abc"));
}

#[test]
fn redaction_keeps_client_facing_errors() {
    let err = Error::invalid_request("email must not be empty")
        .with_details(json!({ "field": "email" }));
    let redacted = err.redacted();
    assert_eq!(redacted.message(), "email must not be empty");
    assert_eq!(
        redacted.details().and_then(|d| d.get("field")).and_then(Value::as_str),
        Some("email")
    );
}

#[test]
fn serialises_camel_case_trace_id() {
    let err = Error::unauthenticated().with_trace_id("trace-1");
    insta::assert_json_snapshot!(err, @r#"
    {
      "code": "unauthenticated",
      "message": "User not authenticated.",
      "traceId": "trace-1"
    }
    "#);
}
