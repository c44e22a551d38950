//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{PasswordHasher, SessionStore, UserRepository};
use crate::domain::{AccountService, DynAccountService};
use crate::outbound::crypto::Pbkdf2PasswordHasher;
use crate::outbound::memory::{MemorySessionStore, MemoryUserRepository};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Account service over fresh in-memory adapters and a single hash round.
pub fn memory_service() -> DynAccountService {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let users: Arc<dyn UserRepository> = Arc::new(MemoryUserRepository::default());
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Pbkdf2PasswordHasher::new("test-pepper", 1));
    let sessions: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new(Arc::clone(&clock)));
    AccountService::new(users, hasher, sessions, clock)
}
