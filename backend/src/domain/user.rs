//! User data model.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PasswordHash;

/// Validation errors returned by user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyEmail,
    EmptyFirstName,
    EmptyLastName,
}

impl UserValidationError {
    /// Input field the failure refers to, in GraphQL casing.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyId | Self::InvalidId => "id",
            Self::EmptyEmail => "email",
            Self::EmptyFirstName => "firstName",
            Self::EmptyLastName => "lastName",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyFirstName => write!(f, "first name must not be empty"),
            Self::EmptyLastName => write!(f, "last name must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier assigned by the user store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap a UUID produced by a store.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Login identifier.
///
/// Only shape is checked: the value is trimmed and must not be empty.
/// Uniqueness belongs to the user store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Trim and validate an email address.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = email.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Personal name parts as supplied at registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    first_name: String,
    last_name: String,
}

impl PersonName {
    /// Validate that both parts are present once trimmed.
    pub fn new(
        first_name: impl AsRef<str>,
        last_name: impl AsRef<str>,
    ) -> Result<Self, UserValidationError> {
        let first_name = first_name.as_ref().trim();
        if first_name.is_empty() {
            return Err(UserValidationError::EmptyFirstName);
        }
        let last_name = last_name.as_ref().trim();
        if last_name.is_empty() {
            return Err(UserValidationError::EmptyLastName);
        }
        Ok(Self {
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
        })
    }

    /// Given name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Family name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }
}

/// Registered user as held by the user store.
///
/// ## Invariants
/// - `password_hash` is a digest produced by the hashing service, never the
///   plaintext password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    name: PersonName,
    password_hash: PasswordHash,
}

impl User {
    /// Build a user from validated components.
    #[must_use]
    pub fn new(
        id: UserId,
        email: EmailAddress,
        name: PersonName,
        password_hash: PasswordHash,
    ) -> Self {
        Self {
            id,
            email,
            name,
            password_hash,
        }
    }

    /// Store-assigned identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Login identifier.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Given name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.name.first_name()
    }

    /// Family name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        self.name.last_name()
    }

    /// Stored password digest.
    #[must_use]
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Plain copy of the stored fields for placing in a session.
    #[must_use]
    pub fn snapshot(&self) -> UserSnapshot {
        UserSnapshot {
            id: self.id,
            email: self.email.clone(),
            first_name: self.name.first_name().to_owned(),
            last_name: self.name.last_name().to_owned(),
            password_hash: self.password_hash.clone(),
        }
    }
}

/// Insert payload for the user store; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: EmailAddress,
    pub name: PersonName,
    pub password_hash: PasswordHash,
}

/// Copy of a user's fields taken when a session is established.
///
/// Later changes to the stored user are not reflected here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSnapshot {
    pub id: UserId,
    pub email: EmailAddress,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: PasswordHash,
}

#[cfg(test)]
mod tests;
