//! Mapping from domain errors to GraphQL errors.
//!
//! Every error leaves with `extensions.code` set from [`ErrorCode`]. Internal
//! failures are logged here and redacted before they reach the client.

use async_graphql::{ErrorExtensions, Value};
use serde_json::json;
use tracing::error;

use crate::domain::{Error, LoginValidationError, RegistrationValidationError};

impl ErrorExtensions for Error {
    fn extend(&self) -> async_graphql::Error {
        if !self.code().is_client_facing() {
            error!(
                code = ?self.code(),
                trace_id = self.trace_id(),
                error = %self,
                cause = ?std::error::Error::source(self).map(ToString::to_string),
                "internal error returned to client"
            );
        }
        let public = self.redacted();
        async_graphql::Error::new(public.message()).extend_with(|_, extensions| {
            extensions.set("code", public.code().graphql_code());
            if let Some(trace_id) = public.trace_id() {
                extensions.set("traceId", trace_id);
            }
            if let Some(details) = public.details() {
                if let Ok(value) = Value::from_json(details.clone()) {
                    extensions.set("details", value);
                }
            }
        })
    }
}

/// Convert a domain error into the resolver error type.
pub(super) fn to_graphql(err: Error) -> async_graphql::Error {
    err.extend()
}

pub(super) fn map_registration_error(err: RegistrationValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": err.code() }))
}

pub(super) fn map_login_error(err: LoginValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": err.code() }))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn extension(err: &async_graphql::Error, key: &str) -> Option<Value> {
        err.extensions.as_ref().and_then(|ext| ext.get(key)).cloned()
    }

    #[rstest]
    #[case(Error::unauthenticated(), "UNAUTHENTICATED", "User not authenticated.")]
    #[case(
        Error::invalid_credentials(),
        "INVALID_CREDENTIALS",
        "Incorrect username or password."
    )]
    #[case(Error::internal("db-3 exploded"), "INTERNAL_SERVER_ERROR", "Internal server error")]
    #[case(
        Error::service_unavailable("redis down"),
        "SERVICE_UNAVAILABLE",
        "Service temporarily unavailable"
    )]
    fn sets_code_and_public_message(
        #[case] err: Error,
        #[case] code: &str,
        #[case] message: &str,
    ) {
        let gql = err.extend();
        assert_eq!(gql.message, message);
        assert_eq!(extension(&gql, "code"), Some(Value::from(code)));
    }

    #[rstest]
    fn carries_trace_id_and_details() {
        let err = map_registration_error(RegistrationValidationError::EmptyPassword)
            .with_trace_id("trace-7");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let gql = err.extend();
        assert_eq!(extension(&gql, "traceId"), Some(Value::from("trace-7")));
        let details = extension(&gql, "details")
            .expect("details present")
            .into_json()
            .expect("json details");
        assert_eq!(details, json!({ "field": "password", "code": "empty_password" }));
    }

    #[rstest]
    fn login_validation_names_the_argument() {
        let err = map_login_error(LoginValidationError::EmptyUsername);
        assert_eq!(err.message(), "username must not be empty");
        assert_eq!(
            err.details(),
            Some(&json!({ "field": "username", "code": "empty_username" }))
        );
    }
}
