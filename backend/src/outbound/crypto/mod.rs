//! Password hashing adapters.

mod pbkdf2_password_hasher;

pub use pbkdf2_password_hasher::{DEFAULT_HASH_ROUNDS, Pbkdf2PasswordHasher};
