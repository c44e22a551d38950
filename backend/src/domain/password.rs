//! Plaintext password and password digest primitives.
//!
//! Plaintext is held in [`Zeroizing`] storage and never printed. Digests
//! compare in constant time so a rejected login reveals nothing about how
//! much of a digest matched.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// Error returned when a plaintext password is blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyPassword;

impl fmt::Display for EmptyPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("password must not be empty")
    }
}

impl std::error::Error for EmptyPassword {}

/// Caller-supplied plaintext password.
///
/// Whitespace is preserved; only an empty string is rejected.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Wrap a plaintext password.
    pub fn new(password: impl Into<String>) -> Result<Self, EmptyPassword> {
        let password = Zeroizing::new(password.into());
        if password.is_empty() {
            return Err(EmptyPassword);
        }
        Ok(Self(password))
    }

    /// Raw bytes for feeding a hash function.
    #[must_use]
    pub fn expose_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Digest produced by the hashing service, stored hex encoded.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded digest read from a store or produced by a hasher.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded digest.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Compare two digests without short-circuiting on the first mismatch.
    ///
    /// Digests of different length never match; length is a property of the
    /// hash algorithm and not secret.
    ///
    /// # Examples
    /// ```
    /// use accounts::domain::PasswordHash;
    ///
    /// let stored = PasswordHash::new("9f86d081");
    /// assert!(stored.matches(&PasswordHash::new("9f86d081")));
    /// assert!(!stored.matches(&PasswordHash::new("9f86d082")));
    /// ```
    #[must_use]
    pub fn matches(&self, candidate: &Self) -> bool {
        constant_time_eq(self.0.as_bytes(), candidate.0.as_bytes())
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

fn constant_time_eq(left: &[u8], right: &[u8]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let diff = left
        .iter()
        .zip(right)
        .fold(0_u8, |acc, (a, b)| acc | (a ^ b));
    std::hint::black_box(diff) == 0
}
