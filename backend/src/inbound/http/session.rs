//! Session cookie helpers to keep HTTP handlers free of framework-specific
//! logic.
//!
//! The cookie only carries the opaque [`SessionId`]; the record itself lives
//! in the session store. After GraphQL execution the handler hands the
//! observed [`SessionChange`] back here so the cookie follows the store.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, SessionChange, SessionId};

pub(crate) const SESSION_ID_KEY: &str = "session_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Session id stored in the cookie, if present and well formed.
    pub fn session_id(&self) -> Result<Option<SessionId>, Error> {
        let raw = self
            .0
            .get::<String>(SESSION_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match raw {
            Some(raw) => match SessionId::parse(&raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    warn!("invalid session id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Point the cookie at a freshly saved session under a new cookie key.
    pub fn persist(&self, id: &SessionId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(SESSION_ID_KEY, id.as_str())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Remove the cookie.
    pub fn forget(&self) {
        self.0.purge();
    }

    /// Bring the cookie in line with what happened during execution.
    ///
    /// `stale` marks a cookie whose id no longer resolved to a record; it is
    /// removed unless a new session replaced it.
    pub fn apply(&self, change: &SessionChange, stale: bool) -> Result<(), Error> {
        match change {
            SessionChange::Established(id) => self.persist(id),
            SessionChange::Cleared => {
                self.forget();
                Ok(())
            }
            SessionChange::Unchanged => {
                if stale {
                    self.forget();
                }
                Ok(())
            }
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(Self::new) })
    }
}
