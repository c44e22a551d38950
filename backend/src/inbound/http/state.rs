//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on the account service and the schema built around it.

use crate::domain::DynAccountService;
use crate::inbound::graphql::{AccountsSchema, build_schema};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Service used to resume sessions before execution.
    pub accounts: DynAccountService,
    /// Executable schema holding a clone of the same service.
    pub schema: AccountsSchema,
}

impl HttpState {
    /// Construct state and the schema from a wired service.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use accounts::domain::ports::{PasswordHasher, SessionStore, UserRepository};
    /// use accounts::domain::AccountService;
    /// use accounts::inbound::http::state::HttpState;
    /// use accounts::outbound::crypto::Pbkdf2PasswordHasher;
    /// use accounts::outbound::memory::{MemorySessionStore, MemoryUserRepository};
    /// use mockable::DefaultClock;
    ///
    /// let users: Arc<dyn UserRepository> = Arc::new(MemoryUserRepository::default());
    /// let hasher: Arc<dyn PasswordHasher> = Arc::new(Pbkdf2PasswordHasher::new("pepper", 1));
    /// let sessions: Arc<dyn SessionStore> =
    ///     Arc::new(MemorySessionStore::new(Arc::new(DefaultClock)));
    /// let state = HttpState::new(AccountService::new(
    ///     users,
    ///     hasher,
    ///     sessions,
    ///     Arc::new(DefaultClock),
    /// ));
    /// assert!(state.schema.sdl().contains("type Query"));
    /// ```
    pub fn new(accounts: DynAccountService) -> Self {
        let schema = build_schema(accounts.clone());
        Self { accounts, schema }
    }
}
