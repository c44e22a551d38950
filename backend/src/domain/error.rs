//! Domain-level error types.
//!
//! These errors are transport agnostic. The GraphQL adapter turns them into
//! error extensions and the HTTP adapter into status codes; both read the
//! stable [`ErrorCode`] rather than inspecting messages.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use super::TraceId;

/// Message returned for both unknown users and wrong passwords.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Incorrect username or password.";
/// Message returned when a guarded operation runs without a session.
pub const UNAUTHENTICATED_MESSAGE: &str = "User not authenticated.";
/// Message returned when registration hits the email uniqueness constraint.
pub const DUPLICATE_EMAIL_MESSAGE: &str = "A user with that email address is already registered.";

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed, fails shape validation, or collides with
    /// existing data the client supplied (duplicate email).
    InvalidRequest,
    /// The operation requires a session and none is present.
    Unauthenticated,
    /// Login failed; deliberately silent about which factor was wrong.
    InvalidCredentials,
    /// A backing store could not be reached.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain or an adapter.
    InternalError,
}

impl ErrorCode {
    /// Code published in GraphQL `extensions.code`.
    #[must_use]
    pub const fn graphql_code(self) -> &'static str {
        match self {
            Self::InvalidRequest => "BAD_USER_INPUT",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::InternalError => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Whether clients may see the original message and details.
    #[must_use]
    pub const fn is_client_facing(self) -> bool {
        !matches!(self, Self::ServiceUnavailable | Self::InternalError)
    }
}

type Cause = Arc<dyn StdError + Send + Sync>;

/// Domain error payload.
///
/// ## Invariants
/// - `trace_id` is captured from the enclosing [`TraceId`] scope at
///   construction time.
/// - `cause` is never serialised; it only feeds [`StdError::source`] and logs.
///
/// # Examples
/// ```
/// use accounts::domain::{Error, ErrorCode};
///
/// let err = Error::invalid_credentials();
/// assert_eq!(err.code(), ErrorCode::InvalidCredentials);
/// assert_eq!(err.message(), "Incorrect username or password.");
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
    details: Option<Value>,
    trace_id: Option<String>,
    cause: Option<Cause>,
}

impl Error {
    /// Create a new error tagged with the current trace id.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            trace_id: TraceId::current().map(|id| id.to_string()),
            cause: None,
        }
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Supplementary structured details.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Correlation identifier captured at construction.
    #[must_use]
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Attach structured details to the error.
    ///
    /// # Examples
    /// ```
    /// use accounts::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("bad").with_details(json!({ "field": "email" }));
    /// assert!(err.details().is_some());
    /// ```
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Override the captured trace identifier.
    #[must_use]
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Wrap the lower-level failure that produced this error.
    #[must_use]
    pub fn with_cause(mut self, cause: impl StdError + Send + Sync + 'static) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Guard rejection for operations that require a session.
    #[must_use]
    pub fn unauthenticated() -> Self {
        Self::new(ErrorCode::Unauthenticated, UNAUTHENTICATED_MESSAGE)
    }

    /// Login rejection shared by the unknown-user and wrong-password paths.
    #[must_use]
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials, INVALID_CREDENTIALS_MESSAGE)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Copy suitable for clients: internal messages and details are replaced
    /// while the code and trace id survive.
    #[must_use]
    pub fn redacted(&self) -> Self {
        if self.code.is_client_facing() {
            return self.clone();
        }
        let message = match self.code {
            ErrorCode::ServiceUnavailable => "Service temporarily unavailable",
            _ => "Internal server error",
        };
        Self {
            code: self.code,
            message: message.to_owned(),
            details: None,
            trace_id: self.trace_id.clone(),
            cause: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        let Error {
            code,
            message,
            details,
            trace_id,
            cause: _,
        } = value;
        Self {
            code,
            message,
            details,
            trace_id,
        }
    }
}

#[cfg(test)]
mod tests;
