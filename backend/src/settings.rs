//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `ACCOUNTS_*` environment variables or a
//! configuration file. Secrets (the password pepper and the cookie key) are
//! validated against the [`BuildMode`]: debug builds warn and fall back,
//! release builds refuse to start.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::Key;
use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use zeroize::{Zeroize, Zeroizing};

use crate::domain::DEFAULT_SESSION_TTL_SECS;
use crate::outbound::crypto::DEFAULT_HASH_ROUNDS;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
// `Key::derive_from` rejects shorter master keys.
const SESSION_KEY_DERIVE_MIN_LEN: usize = 32;
const DEV_PASSWORD_PEPPER: &str = "accounts-dev-pepper";

/// Build mode for secret validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Debug builds tolerate missing secrets and emit warnings.
    Debug,
    /// Release builds require every secret to be provided.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use accounts::settings::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while validating settings.
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// The listen address does not parse.
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// Session lifetime must be positive.
    #[error("session_ttl_secs must be positive, got {value}")]
    InvalidSessionTtl { value: i64 },
    /// Release builds must configure a password pepper.
    #[error("password_pepper must be set in release builds")]
    MissingPepper,
    /// Reading the session key file failed.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The session key file exists but is too short.
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
}

/// Configuration values for the accounts server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ACCOUNTS")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory user store is used when unset.
    pub database_url: Option<String>,
    /// Redis URL; the in-memory session store is used when unset.
    pub redis_url: Option<String>,
    /// Secret mixed into every password digest.
    pub password_pepper: Option<String>,
    /// PBKDF2 iterations.
    pub hash_rounds: Option<u32>,
    /// Lifetime of an authenticated session in seconds.
    pub session_ttl_secs: Option<i64>,
    /// File holding the cookie encryption key material.
    pub session_key_file: Option<PathBuf>,
    /// Mark the session cookie `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// Permit a generated cookie key when the key file cannot be read.
    #[ortho_config(default = false)]
    pub allow_ephemeral_key: bool,
}

impl AppSettings {
    /// Parsed listen address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                source,
            })
    }

    #[must_use]
    pub fn hash_rounds(&self) -> u32 {
        self.hash_rounds.unwrap_or(DEFAULT_HASH_ROUNDS)
    }

    /// Configured session lifetime.
    pub fn session_ttl(&self) -> Result<TimeDelta, SettingsError> {
        let value = self.session_ttl_secs.unwrap_or(DEFAULT_SESSION_TTL_SECS);
        if value <= 0 {
            return Err(SettingsError::InvalidSessionTtl { value });
        }
        TimeDelta::try_seconds(value).ok_or(SettingsError::InvalidSessionTtl { value })
    }

    #[must_use]
    pub fn session_key_path(&self) -> PathBuf {
        self.session_key_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(SESSION_KEY_DEFAULT_PATH))
    }

    /// Password pepper; debug builds fall back to a fixed development value.
    pub fn password_pepper(&self, mode: BuildMode) -> Result<Zeroizing<String>, SettingsError> {
        match self.password_pepper.as_deref() {
            Some(pepper) if !pepper.is_empty() => Ok(Zeroizing::new(pepper.to_owned())),
            _ if mode.is_debug() => {
                warn!("password_pepper not set; using development pepper");
                Ok(Zeroizing::new(DEV_PASSWORD_PEPPER.to_owned()))
            }
            _ => Err(SettingsError::MissingPepper),
        }
    }

    /// Cookie encryption key read from [`Self::session_key_path`].
    ///
    /// A missing file yields a generated key in debug builds or when
    /// `allow_ephemeral_key` is set. Release builds require at least 64
    /// bytes of key material.
    pub fn session_key(&self, mode: BuildMode) -> Result<Key, SettingsError> {
        let path = self.session_key_path();
        match std::fs::read(&path) {
            Ok(mut bytes) => {
                let length = bytes.len();
                let min_len = if mode.is_debug() {
                    SESSION_KEY_DERIVE_MIN_LEN
                } else {
                    SESSION_KEY_MIN_LEN
                };
                if length < min_len {
                    bytes.zeroize();
                    return Err(SettingsError::KeyTooShort {
                        path,
                        length,
                        min_len,
                    });
                }
                let key = Key::derive_from(&bytes);
                bytes.zeroize();
                Ok(key)
            }
            Err(error) => {
                if mode.is_debug() || self.allow_ephemeral_key {
                    warn!(
                        path = %path.display(),
                        error = %error,
                        "using temporary session key (dev only)"
                    );
                    Ok(Key::generate())
                } else {
                    Err(SettingsError::KeyRead {
                        path,
                        source: error,
                    })
                }
            }
        }
    }
}
