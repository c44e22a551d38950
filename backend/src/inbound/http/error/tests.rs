//! Tests for HTTP error mapping.

use super::*;
use crate::domain::Error;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthenticated(), StatusCode::UNAUTHORIZED)]
#[case(Error::invalid_credentials(), StatusCode::UNAUTHORIZED)]
#[case(Error::service_unavailable("redis down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn error_body(error: Error, expected_trace_id: Option<&str>) -> Value {
    let response = ResponseError::error_response(&error);
    let header = response.headers().get(TRACE_ID_HEADER);
    match expected_trace_id {
        Some(expected) => {
            let trace_id = header
                .expect("trace-id header is set by error_response")
                .to_str()
                .expect("trace-id not valid UTF-8");
            assert_eq!(trace_id, expected);
        }
        None => assert!(header.is_none(), "trace-id header should not be present"),
    }

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error JSON deserialisation succeeds")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("db-3 exploded")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "secret": "x" }));

    let body = error_body(error, Some(expected_trace_id.as_str())).await;
    insta::assert_json_snapshot!(body, @r#"
    {
      "code": "internal_error",
      "message": "Internal server error",
      "traceId": "00000000-0000-0000-0000-000000000000"
    }
    "#);
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details(expected_trace_id: String) {
    let error = Error::invalid_request("bad")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "field": "email" }));

    let body = error_body(error, Some(expected_trace_id.as_str())).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["message"], "bad");
    assert_eq!(body["details"], json!({ "field": "email" }));
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_trace_header() {
    let body = error_body(Error::service_unavailable("redis down"), None).await;
    assert_eq!(body["message"], "Service temporarily unavailable");
    assert!(body.get("traceId").is_none());
}
