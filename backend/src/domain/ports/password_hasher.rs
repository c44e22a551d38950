//! Port for the password hashing service.
use async_trait::async_trait;

use crate::domain::{Password, PasswordHash};

use super::define_port_error;

define_port_error! {
    /// Failures raised while deriving a password digest.
    pub enum PasswordHashError {
        /// The hashing task could not run to completion.
        Worker { message: String } => "password hashing task failed: {message}",
    }
}

/// Derives digests from plaintext passwords.
///
/// Implementations must be deterministic: hashing the same password twice
/// yields equal digests, which is what login verification compares.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError>;
}
