//! PBKDF2-HMAC-SHA256 password hasher.
//!
//! The server pepper is the PBKDF2 salt, so a digest is deterministic for a
//! given pepper and round count. Login verification relies on that: it
//! re-hashes the supplied password and compares digests. Derivation runs on
//! the blocking pool.

use std::sync::Arc;

use async_trait::async_trait;
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{Password, PasswordHash};

/// PBKDF2 iterations used when none are configured.
pub const DEFAULT_HASH_ROUNDS: u32 = 600_000;

const DIGEST_LEN: usize = 32;

/// PBKDF2 implementation of the `PasswordHasher` port.
#[derive(Clone)]
pub struct Pbkdf2PasswordHasher {
    pepper: Arc<Zeroizing<Vec<u8>>>,
    rounds: u32,
}

impl Pbkdf2PasswordHasher {
    /// Build a hasher; a round count of zero is treated as one.
    pub fn new(pepper: impl AsRef<[u8]>, rounds: u32) -> Self {
        Self {
            pepper: Arc::new(Zeroizing::new(pepper.as_ref().to_vec())),
            rounds: rounds.max(1),
        }
    }
}

impl std::fmt::Debug for Pbkdf2PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pbkdf2PasswordHasher")
            .field("rounds", &self.rounds)
            .finish_non_exhaustive()
    }
}

fn derive(pepper: &[u8], password: &[u8], rounds: u32) -> String {
    let mut out = Zeroizing::new([0_u8; DIGEST_LEN]);
    pbkdf2_hmac::<Sha256>(password, pepper, rounds, out.as_mut_slice());
    hex::encode(out.as_slice())
}

#[async_trait]
impl PasswordHasher for Pbkdf2PasswordHasher {
    async fn hash(&self, password: &Password) -> Result<PasswordHash, PasswordHashError> {
        let pepper = Arc::clone(&self.pepper);
        let rounds = self.rounds;
        let password = Zeroizing::new(password.expose_bytes().to_vec());
        let encoded = tokio::task::spawn_blocking(move || derive(&pepper, &password, rounds))
            .await
            .map_err(|err| PasswordHashError::worker(err.to_string()))?;
        Ok(PasswordHash::new(encoded))
    }
}
