//! HTTP server configuration object.

use std::net::SocketAddr;

use accounts::settings::{AppSettings, BuildMode};
use actix_web::cookie::Key;
use chrono::TimeDelta;

/// Validated values needed to start the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) session_ttl: TimeDelta,
}

impl ServerConfig {
    /// Validate cookie and listener settings for the given build mode.
    pub fn from_settings(settings: &AppSettings, mode: BuildMode) -> std::io::Result<Self> {
        let key = settings.session_key(mode).map_err(std::io::Error::other)?;
        let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
        let session_ttl = settings.session_ttl().map_err(std::io::Error::other)?;
        Ok(Self {
            key,
            cookie_secure: settings.cookie_secure,
            bind_addr,
            session_ttl,
        })
    }

    /// Socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
