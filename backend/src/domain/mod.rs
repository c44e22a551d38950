//! Domain primitives, ports and the account service.
//!
//! Purpose: define strongly typed entities used by the GraphQL and
//! persistence layers and keep business rules free of transport and storage
//! concerns.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, UserSnapshot, NewUser: registered users and their copies.
//! - Session, SessionHandle, RequestContext: per-request session state and
//!   the authorization guard.
//! - AccountService: registration, login, logout and user lookup.

pub mod account_service;
pub mod auth;
pub mod error;
pub mod password;
pub mod ports;
pub mod session;
pub mod trace_id;
pub mod user;

pub use self::account_service::{AccountService, DEFAULT_SESSION_TTL_SECS, DynAccountService};
pub use self::auth::{
    AuthResult, LoginCredentials, LoginValidationError, MutationOutcome, Registration,
    RegistrationValidationError,
};
pub use self::error::{
    DUPLICATE_EMAIL_MESSAGE, Error, ErrorCode, INVALID_CREDENTIALS_MESSAGE,
    UNAUTHENTICATED_MESSAGE,
};
pub use self::password::{EmptyPassword, Password, PasswordHash};
pub use self::session::{
    Authenticated, InvalidSessionId, RequestContext, Session, SessionChange, SessionHandle,
    SessionId, SessionView,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, NewUser, PersonName, User, UserId, UserSnapshot, UserValidationError,
};
