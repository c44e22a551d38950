//! Embedded schema migrations for the user store.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::domain::ports::UserPersistenceError;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply pending migrations on a dedicated synchronous connection.
///
/// Runs on the blocking pool so start-up does not stall the runtime.
///
/// # Errors
///
/// Returns [`UserPersistenceError::Connection`] when the database cannot be
/// reached and [`UserPersistenceError::Query`] when a migration fails.
pub async fn run_migrations(database_url: &str) -> Result<(), UserPersistenceError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&url)
            .map_err(|err| UserPersistenceError::connection(err.to_string()))?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| UserPersistenceError::query(format!("migration: {err}")))?;
        info!(count = applied.len(), "database migrations applied");
        Ok(())
    })
    .await
    .map_err(|err| UserPersistenceError::query(format!("migration task failed: {err}")))?
}
