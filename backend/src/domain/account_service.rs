//! Account use-cases backing the GraphQL resolvers.
//!
//! The service owns the rules for registration, login, logout and user
//! lookup. Stores and the hashing service are reached through ports so the
//! same logic runs against PostgreSQL, Redis or in-memory adapters.

use std::sync::Arc;

use chrono::TimeDelta;
use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    PasswordHashError, PasswordHasher, SessionStore, SessionStoreError, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    AuthResult, Authenticated, DUPLICATE_EMAIL_MESSAGE, EmailAddress, Error, LoginCredentials,
    MutationOutcome, NewUser, Registration, RequestContext, Session, SessionHandle, SessionId,
    SessionView, User, UserId,
};

/// Session lifetime in seconds used when none is configured.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 7_200;

/// Resolver-facing account service.
///
/// Generic over its ports; `AccountService<dyn UserRepository, dyn
/// PasswordHasher, dyn SessionStore>` is the shape wired into the schema.
pub struct AccountService<U: ?Sized, H: ?Sized, S: ?Sized> {
    users: Arc<U>,
    hasher: Arc<H>,
    sessions: Arc<S>,
    clock: Arc<dyn Clock>,
    session_ttl: TimeDelta,
}

/// Service over boxed ports, as shared with the GraphQL schema.
pub type DynAccountService = AccountService<dyn UserRepository, dyn PasswordHasher, dyn SessionStore>;

impl<U: ?Sized, H: ?Sized, S: ?Sized> Clone for AccountService<U, H, S> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            hasher: Arc::clone(&self.hasher),
            sessions: Arc::clone(&self.sessions),
            clock: Arc::clone(&self.clock),
            session_ttl: self.session_ttl,
        }
    }
}

impl<U: ?Sized, H: ?Sized, S: ?Sized> AccountService<U, H, S> {
    /// Create a service with the default session lifetime.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use accounts::domain::AccountService;
    /// use accounts::outbound::crypto::Pbkdf2PasswordHasher;
    /// use accounts::outbound::memory::{MemorySessionStore, MemoryUserRepository};
    /// use mockable::DefaultClock;
    ///
    /// let service = AccountService::new(
    ///     Arc::new(MemoryUserRepository::default()),
    ///     Arc::new(Pbkdf2PasswordHasher::new("pepper", 1)),
    ///     Arc::new(MemorySessionStore::new(Arc::new(DefaultClock))),
    ///     Arc::new(DefaultClock),
    /// );
    /// let _ = service.clone();
    /// ```
    pub fn new(users: Arc<U>, hasher: Arc<H>, sessions: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            hasher,
            sessions,
            clock,
            session_ttl: TimeDelta::seconds(DEFAULT_SESSION_TTL_SECS),
        }
    }

    /// Override how long an authenticated session lives.
    #[must_use]
    pub fn with_session_ttl(mut self, session_ttl: TimeDelta) -> Self {
        self.session_ttl = session_ttl;
        self
    }
}

impl<U, H, S> AccountService<U, H, S>
where
    U: UserRepository + ?Sized,
    H: PasswordHasher + ?Sized,
    S: SessionStore + ?Sized,
{
    fn map_user_error(error: UserPersistenceError) -> Error {
        match &error {
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user store unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user store error: {message}"))
            }
            UserPersistenceError::DuplicateEmail { message } => {
                Error::internal(format!("unexpected uniqueness violation: {message}"))
            }
        }
        .with_cause(error)
    }

    fn map_hash_error(error: PasswordHashError) -> Error {
        Error::internal("password hashing failed").with_cause(error)
    }

    fn map_session_error(error: SessionStoreError) -> Error {
        match &error {
            SessionStoreError::Connection { message } => {
                Error::service_unavailable(format!("session store unavailable: {message}"))
            }
            SessionStoreError::Codec { message } | SessionStoreError::Command { message } => {
                Error::internal(format!("session store error: {message}"))
            }
        }
        .with_cause(error)
    }

    /// Resume the session a request's cookie points at.
    ///
    /// Missing and expired records both yield an empty handle.
    pub async fn resume(&self, id: Option<&SessionId>) -> Result<SessionHandle, Error> {
        let Some(id) = id else {
            return Ok(SessionHandle::empty());
        };
        let loaded = self
            .sessions
            .load(id)
            .await
            .map_err(Self::map_session_error)?;
        let now = self.clock.utc();
        Ok(SessionHandle::new(
            loaded.filter(|session| !session.is_expired(now)),
        ))
    }

    /// Current session as-is; anonymous when nobody is signed in.
    pub fn session(&self, ctx: &RequestContext) -> SessionView {
        ctx.session().view()
    }

    /// Every registered user in store order.
    pub async fn users(&self, _auth: &Authenticated) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(Self::map_user_error)
    }

    /// Look a user up by id; unknown and malformed ids both read as `None`.
    pub async fn user(&self, _auth: &Authenticated, id: &str) -> Result<Option<User>, Error> {
        let Ok(id) = UserId::new(id) else {
            return Ok(None);
        };
        self.users
            .find_by_id(&id)
            .await
            .map_err(Self::map_user_error)
    }

    /// Register a new user.
    ///
    /// The email uniqueness check is left to the store; a violation becomes a
    /// user-input error that keeps the store failure as its cause.
    pub async fn create_user(&self, registration: Registration) -> Result<MutationOutcome, Error> {
        let password_hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(Self::map_hash_error)?;
        let new_user = NewUser {
            email: registration.email().clone(),
            name: registration.name().clone(),
            password_hash,
        };
        let user = self.users.create(&new_user).await.map_err(|error| match error {
            UserPersistenceError::DuplicateEmail { .. } => {
                Error::invalid_request(DUPLICATE_EMAIL_MESSAGE)
                    .with_details(json!({ "field": "email", "code": "duplicate_email" }))
                    .with_cause(error)
            }
            other => Self::map_user_error(other),
        })?;
        info!(user_id = %user.id(), "user registered");
        Ok(MutationOutcome::ok())
    }

    /// Verify credentials and sign the user in.
    ///
    /// Unknown users and wrong passwords fail with the same error. The
    /// supplied password is hashed on both paths so response time does not
    /// reveal whether the email is registered.
    pub async fn authenticate(
        &self,
        ctx: &RequestContext,
        credentials: &LoginCredentials,
    ) -> Result<AuthResult, Error> {
        let user = match EmailAddress::new(credentials.username()) {
            Ok(email) => self
                .users
                .find_by_email(&email)
                .await
                .map_err(Self::map_user_error)?,
            Err(_) => None,
        };
        let candidate = self
            .hasher
            .hash(credentials.password())
            .await
            .map_err(Self::map_hash_error)?;

        let Some(user) = user.filter(|user| user.password_hash().matches(&candidate)) else {
            return Err(Error::invalid_credentials());
        };

        let snapshot = user.snapshot();
        let session = Session::for_user(snapshot.clone(), self.clock.utc() + self.session_ttl);
        self.sessions
            .save(&session)
            .await
            .map_err(Self::map_session_error)?;

        let previous = ctx.session().id();
        ctx.session().establish(session);
        if let Some(previous) = previous {
            if let Err(error) = self.sessions.destroy(&previous).await {
                warn!(%error, "failed to destroy rotated session");
            }
        }

        info!(user_id = %snapshot.id, "user authenticated");
        Ok(AuthResult::authenticated(snapshot))
    }

    /// Destroy the request's session.
    ///
    /// Resolves only after the store confirms teardown. Returns `None` when
    /// the request carried no session.
    pub async fn logout(&self, ctx: &RequestContext) -> Result<Option<MutationOutcome>, Error> {
        let Some(id) = ctx.session().id() else {
            return Ok(None);
        };
        self.sessions
            .destroy(&id)
            .await
            .map_err(Self::map_session_error)?;
        let user_id = ctx.session().user().map(|user| user.id);
        ctx.session().clear();
        match user_id {
            Some(user_id) => info!(%user_id, "user logged out"),
            None => info!("anonymous session destroyed"),
        }
        Ok(Some(MutationOutcome::ok()))
    }
}
