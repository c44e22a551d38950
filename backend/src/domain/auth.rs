//! Authentication and registration primitives.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before an adapter talks to the account
//! service.

use std::fmt;

use super::{EmailAddress, Password, PersonName, UserSnapshot, UserValidationError};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl LoginValidationError {
    /// Argument the failure refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername => "username",
            Self::EmptyPassword => "password",
        }
    }

    /// Machine-readable reason.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyUsername => "empty_username",
            Self::EmptyPassword => "empty_password",
        }
    }
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use accounts::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" ada@example.com ", "pw").unwrap();
/// assert_eq!(creds.username(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        let password =
            Password::new(password).map_err(|_| LoginValidationError::EmptyPassword)?;

        Ok(Self {
            username: normalized.to_owned(),
            password,
        })
    }

    /// Username, matched against stored email addresses.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Domain error returned when registration input is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// A user field failed its shape check.
    User(UserValidationError),
    /// Password was blank.
    EmptyPassword,
}

impl RegistrationValidationError {
    /// Input field the failure refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::User(err) => err.field(),
            Self::EmptyPassword => "password",
        }
    }

    /// Machine-readable reason.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::User(UserValidationError::EmptyEmail) => "empty_email",
            Self::User(UserValidationError::EmptyFirstName) => "empty_first_name",
            Self::User(UserValidationError::EmptyLastName) => "empty_last_name",
            Self::User(UserValidationError::EmptyId | UserValidationError::InvalidId) => {
                "invalid_id"
            }
            Self::EmptyPassword => "empty_password",
        }
    }
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(err) => err.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

impl From<UserValidationError> for RegistrationValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::User(value)
    }
}

/// Validated `createUser` input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    email: EmailAddress,
    name: PersonName,
    password: Password,
}

impl Registration {
    /// Validate raw registration fields.
    pub fn try_from_parts(
        email: &str,
        first_name: &str,
        last_name: &str,
        password: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let email = EmailAddress::new(email)?;
        let name = PersonName::new(first_name, last_name)?;
        let password =
            Password::new(password).map_err(|_| RegistrationValidationError::EmptyPassword)?;
        Ok(Self {
            email,
            name,
            password,
        })
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn name(&self) -> &PersonName {
        &self.name
    }

    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Outcome of a successful `authenticate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    pub ok: bool,
    pub user: Option<UserSnapshot>,
}

impl AuthResult {
    /// Successful login carrying the snapshot written into the session.
    #[must_use]
    pub fn authenticated(user: UserSnapshot) -> Self {
        Self {
            ok: true,
            user: Some(user),
        }
    }
}

/// Acknowledgement returned by mutations without a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationOutcome {
    pub ok: bool,
}

impl MutationOutcome {
    #[must_use]
    pub const fn ok() -> Self {
        Self { ok: true }
    }
}
