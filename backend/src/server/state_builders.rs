//! Builders wiring the account service to its adapters.
//!
//! Each port picks the external adapter when its URL is configured and the
//! in-memory adapter otherwise.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use accounts::domain::ports::{PasswordHasher, SessionStore, UserRepository};
use accounts::domain::{AccountService, DynAccountService};
use accounts::outbound::cache::RedisSessionStore;
use accounts::outbound::crypto::Pbkdf2PasswordHasher;
use accounts::outbound::memory::{MemorySessionStore, MemoryUserRepository};
use accounts::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig, run_migrations};
use accounts::settings::{AppSettings, BuildMode};

async fn build_user_repository(settings: &AppSettings) -> std::io::Result<Arc<dyn UserRepository>> {
    let Some(database_url) = settings.database_url.as_deref() else {
        warn!("database_url not set; users are kept in memory");
        return Ok(Arc::new(MemoryUserRepository::default()));
    };
    run_migrations(database_url)
        .await
        .map_err(|err| std::io::Error::other(format!("database migrations failed: {err}")))?;
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|err| std::io::Error::other(format!("database pool init failed: {err}")))?;
    info!("using PostgreSQL user store");
    Ok(Arc::new(DieselUserRepository::new(pool)))
}

async fn build_session_store(
    settings: &AppSettings,
    clock: &Arc<dyn Clock>,
) -> std::io::Result<Arc<dyn SessionStore>> {
    let Some(redis_url) = settings.redis_url.as_deref() else {
        warn!("redis_url not set; sessions are kept in memory");
        return Ok(Arc::new(MemorySessionStore::new(Arc::clone(clock))));
    };
    let store = RedisSessionStore::connect(redis_url, Arc::clone(clock))
        .await
        .map_err(|err| std::io::Error::other(format!("session store init failed: {err}")))?;
    info!("using Redis session store");
    Ok(Arc::new(store))
}

fn build_hasher(settings: &AppSettings, mode: BuildMode) -> std::io::Result<Arc<dyn PasswordHasher>> {
    let pepper = settings
        .password_pepper(mode)
        .map_err(std::io::Error::other)?;
    Ok(Arc::new(Pbkdf2PasswordHasher::new(
        pepper.as_bytes(),
        settings.hash_rounds(),
    )))
}

/// Build the account service from settings.
pub(crate) async fn build_account_service(
    settings: &AppSettings,
    mode: BuildMode,
) -> std::io::Result<DynAccountService> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let hasher = build_hasher(settings, mode)?;
    let users = build_user_repository(settings).await?;
    let sessions = build_session_store(settings, &clock).await?;
    let session_ttl = settings.session_ttl().map_err(std::io::Error::other)?;
    Ok(AccountService::new(users, hasher, sessions, clock).with_session_ttl(session_ttl))
}
