//! `SessionStore` backed by Redis through a `bb8` pool.
//!
//! Records are JSON encoded under namespaced keys (`session:v1:<id>`) so a
//! change of encoding can ship under a new prefix. Redis enforces expiry via
//! `SET EX`; `load` additionally rejects records whose `expiresAt` has
//! passed in case the TTL and the record disagree.

use std::sync::Arc;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, PooledConnection, RunError};
use bb8_redis::redis::{AsyncCommands, RedisError};
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{SessionStore, SessionStoreError};
use crate::domain::{Session, SessionId};

const KEY_PREFIX: &str = "session:v1:";

/// Redis key holding the record for `id`.
///
/// # Examples
/// ```
/// use accounts::domain::SessionId;
/// use accounts::outbound::cache::session_key;
///
/// let id = SessionId::generate();
/// assert!(session_key(&id).starts_with("session:v1:"));
/// ```
#[must_use]
pub fn session_key(id: &SessionId) -> String {
    format!("{KEY_PREFIX}{}", id.as_str())
}

/// Redis session store.
#[derive(Clone)]
pub struct RedisSessionStore {
    pool: Pool<RedisConnectionManager>,
    clock: Arc<dyn Clock>,
}

impl RedisSessionStore {
    /// Connect a pool to `redis_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionStoreError::Connection`] when the URL is invalid or
    /// the initial connection fails.
    pub async fn connect(redis_url: &str, clock: Arc<dyn Clock>) -> Result<Self, SessionStoreError> {
        let manager = RedisConnectionManager::new(redis_url)
            .map_err(|err| SessionStoreError::connection(err.to_string()))?;
        let pool = Pool::builder()
            .build(manager)
            .await
            .map_err(|err| SessionStoreError::connection(err.to_string()))?;
        Ok(Self { pool, clock })
    }

    async fn conn(
        &self,
    ) -> Result<PooledConnection<'_, RedisConnectionManager>, SessionStoreError> {
        self.pool.get().await.map_err(map_run_error)
    }
}

fn map_run_error(error: RunError<RedisError>) -> SessionStoreError {
    match error {
        RunError::User(err) => map_redis_error(err),
        RunError::TimedOut => SessionStoreError::connection("timed out waiting for connection"),
    }
}

fn map_redis_error(error: RedisError) -> SessionStoreError {
    debug!(kind = ?error.kind(), "redis operation failed");
    if error.is_io_error() || error.is_connection_dropped() || error.is_connection_refusal() {
        SessionStoreError::connection(error.to_string())
    } else {
        SessionStoreError::command(error.to_string())
    }
}

fn encode(session: &Session) -> Result<String, SessionStoreError> {
    serde_json::to_string(session).map_err(|err| SessionStoreError::codec(err.to_string()))
}

fn decode(raw: &str) -> Result<Session, SessionStoreError> {
    serde_json::from_str(raw).map_err(|err| SessionStoreError::codec(err.to_string()))
}

/// Whole seconds until expiry, or `None` when already expired.
fn ttl_secs(session: &Session, clock: &dyn Clock) -> Option<u64> {
    let remaining = (session.expires_at - clock.utc()).num_seconds();
    u64::try_from(remaining).ok().filter(|secs| *secs > 0)
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, id: &SessionId) -> Result<Option<Session>, SessionStoreError> {
        let mut conn = self.conn().await?;
        let raw: Option<String> = conn
            .get(session_key(id))
            .await
            .map_err(map_redis_error)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let session = decode(&raw)?;
        if session.is_expired(self.clock.utc()) {
            return Ok(None);
        }
        Ok(Some(session))
    }

    async fn save(&self, session: &Session) -> Result<(), SessionStoreError> {
        let Some(ttl) = ttl_secs(session, self.clock.as_ref()) else {
            return self.destroy(&session.id).await;
        };
        let payload = encode(session)?;
        let mut conn = self.conn().await?;
        conn.set_ex::<_, _, ()>(session_key(&session.id), payload, ttl)
            .await
            .map_err(map_redis_error)
    }

    async fn destroy(&self, id: &SessionId) -> Result<(), SessionStoreError> {
        let mut conn = self.conn().await?;
        conn.del::<_, ()>(session_key(id))
            .await
            .map_err(map_redis_error)
    }
}

#[cfg(test)]
mod tests {
    //! Encoding and TTL coverage; Redis I/O needs a live server.
    use super::*;
    use crate::domain::{EmailAddress, PasswordHash, UserId, UserSnapshot};
    use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
    use rstest::rstest;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 7, 4, 8, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn session(expires_in: TimeDelta) -> Session {
        Session::for_user(
            UserSnapshot {
                id: UserId::random(),
                email: EmailAddress::new("ada@example.com").expect("valid email"),
                first_name: "Ada".to_owned(),
                last_name: "Lovelace".to_owned(),
                password_hash: PasswordHash::new("digest"),
            },
            now() + expires_in,
        )
    }

    #[rstest]
    fn key_is_namespaced() {
        let id = SessionId::generate();
        assert_eq!(session_key(&id), format!("session:v1:{}", id.as_str()));
    }

    #[rstest]
    fn records_survive_encoding() {
        let record = session(TimeDelta::hours(2));
        let decoded = decode(&encode(&record).expect("encode")).expect("decode");
        assert_eq!(decoded, record);
    }

    #[rstest]
    fn garbage_is_a_codec_error() {
        let err = decode("{not json").expect_err("invalid payload");
        assert!(matches!(err, SessionStoreError::Codec { .. }));
    }

    #[rstest]
    #[case(TimeDelta::hours(2), Some(7_200))]
    #[case(TimeDelta::milliseconds(500), None)]
    #[case(TimeDelta::seconds(-5), None)]
    fn ttl_counts_whole_seconds(#[case] expires_in: TimeDelta, #[case] expected: Option<u64>) {
        let clock = FixedClock(now());
        assert_eq!(ttl_secs(&session(expires_in), &clock), expected);
    }

    #[rstest]
    fn timeouts_are_connection_errors() {
        let err = map_run_error(RunError::TimedOut);
        assert!(matches!(err, SessionStoreError::Connection { .. }));
    }
}
