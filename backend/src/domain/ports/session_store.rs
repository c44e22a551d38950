//! Port for server-side session storage.
use async_trait::async_trait;

use crate::domain::{Session, SessionId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by session store adapters.
    pub enum SessionStoreError {
        /// The backing store could not be reached.
        Connection { message: String } => "session store connection failed: {message}",
        /// A record could not be encoded or decoded.
        Codec { message: String } => "session record codec failed: {message}",
        /// The store rejected a command.
        Command { message: String } => "session store command failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch a live session; expired records read as `None`.
    async fn load(&self, id: &SessionId) -> Result<Option<Session>, SessionStoreError>;

    /// Insert or replace a session record.
    async fn save(&self, session: &Session) -> Result<(), SessionStoreError>;

    /// Remove a session record. Destroying an unknown id succeeds.
    async fn destroy(&self, id: &SessionId) -> Result<(), SessionStoreError>;
}
