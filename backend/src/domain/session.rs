//! Session model shared by the account service and the HTTP adapter.
//!
//! A request starts with whatever session record its cookie pointed at. The
//! account service mutates that record through a [`SessionHandle`]; the HTTP
//! adapter inspects [`SessionHandle::change`] afterwards to decide whether
//! the cookie must be written or removed.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Error, UserSnapshot};

const SESSION_ID_LEN: usize = 64;

/// Error returned when a cookie value is not a well-formed session id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidSessionId;

impl fmt::Display for InvalidSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("session id must be 64 lowercase hex characters")
    }
}

impl std::error::Error for InvalidSessionId {}

/// Opaque session key carried in the session cookie.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh unguessable identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!(
            "{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        ))
    }

    /// Validate an identifier read back from a cookie.
    pub fn parse(raw: &str) -> Result<Self, InvalidSessionId> {
        let well_formed = raw.len() == SESSION_ID_LEN
            && raw
                .bytes()
                .all(|byte| byte.is_ascii_digit() || (b'a'..=b'f').contains(&byte));
        if well_formed {
            Ok(Self(raw.to_owned()))
        } else {
            Err(InvalidSessionId)
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only a prefix; the full value is a bearer credential.
        write!(f, "SessionId({}..)", &self.0[..8.min(self.0.len())])
    }
}

impl From<SessionId> for String {
    fn from(value: SessionId) -> Self {
        value.0
    }
}

impl TryFrom<String> for SessionId {
    type Error = InvalidSessionId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Server-side session record owned by the session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: SessionId,
    pub user: Option<UserSnapshot>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Session holding `user`, expiring at `expires_at`.
    #[must_use]
    pub fn for_user(user: UserSnapshot, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: SessionId::generate(),
            user: Some(user),
            expires_at,
        }
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// What the `session` query reports for the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionView {
    pub user: Option<UserSnapshot>,
}

impl SessionView {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

/// How the session changed while the request ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionChange {
    Unchanged,
    /// A new record was saved; the cookie must point at this id.
    Established(SessionId),
    /// The record was destroyed; the cookie must be removed.
    Cleared,
}

#[derive(Debug)]
struct SessionState {
    current: Option<Session>,
    change: SessionChange,
}

/// Per-request handle on the loaded session.
///
/// Clones share state, so the GraphQL resolvers and the HTTP adapter observe
/// the same record. The lock is never held across an await point.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    state: Arc<Mutex<SessionState>>,
}

impl SessionHandle {
    /// Handle over the record the request's cookie resolved to, if any.
    #[must_use]
    pub fn new(loaded: Option<Session>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState {
                current: loaded,
                change: SessionChange::Unchanged,
            })),
        }
    }

    /// Handle for a request that carried no session.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(None)
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current record.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.lock().current.clone()
    }

    /// Identifier of the current record.
    #[must_use]
    pub fn id(&self) -> Option<SessionId> {
        self.lock().current.as_ref().map(|session| session.id.clone())
    }

    /// User stored in the current record.
    #[must_use]
    pub fn user(&self) -> Option<UserSnapshot> {
        self.lock()
            .current
            .as_ref()
            .and_then(|session| session.user.clone())
    }

    /// Anonymous-or-authenticated view of the current record.
    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView { user: self.user() }
    }

    /// Whether the request holds a session record at all.
    #[must_use]
    pub fn exists(&self) -> bool {
        self.lock().current.is_some()
    }

    /// Record change for the HTTP adapter.
    #[must_use]
    pub fn change(&self) -> SessionChange {
        self.lock().change.clone()
    }

    /// Replace the current record with one that has been saved.
    pub(crate) fn establish(&self, session: Session) {
        let mut state = self.lock();
        state.change = SessionChange::Established(session.id.clone());
        state.current = Some(session);
    }

    /// Drop the current record after it has been destroyed.
    pub(crate) fn clear(&self) {
        let mut state = self.lock();
        state.current = None;
        state.change = SessionChange::Cleared;
    }
}

impl Default for SessionHandle {
    fn default() -> Self {
        Self::empty()
    }
}

/// Per-request context handed to every resolver.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    session: SessionHandle,
    current_user: Option<UserSnapshot>,
}

impl RequestContext {
    /// Build a context; the current user is read from the loaded session.
    #[must_use]
    pub fn new(session: SessionHandle) -> Self {
        let current_user = session.user();
        Self {
            session,
            current_user,
        }
    }

    #[must_use]
    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// User the request started with.
    #[must_use]
    pub fn current_user(&self) -> Option<&UserSnapshot> {
        self.current_user.as_ref()
    }

    /// Authorization guard for operations that need a signed-in user.
    ///
    /// Reads the live session, so a `logout` earlier in the same document
    /// revokes access for the fields that follow it.
    ///
    /// # Examples
    /// ```
    /// use accounts::domain::{ErrorCode, RequestContext};
    ///
    /// let ctx = RequestContext::default();
    /// let err = ctx.require_session().unwrap_err();
    /// assert_eq!(err.code(), ErrorCode::Unauthenticated);
    /// ```
    pub fn require_session(&self) -> Result<Authenticated, Error> {
        self.session
            .user()
            .map(|user| Authenticated { user })
            .ok_or_else(Error::unauthenticated)
    }
}

/// Proof that the guard passed; only [`RequestContext::require_session`]
/// constructs it.
#[derive(Debug, Clone)]
pub struct Authenticated {
    user: UserSnapshot,
}

impl Authenticated {
    #[must_use]
    pub fn user(&self) -> &UserSnapshot {
        &self.user
    }
}
