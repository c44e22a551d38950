//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! The user store is backed by PostgreSQL via Diesel with async support
//! through `diesel-async` and `bb8` connection pooling. Row structs and the
//! table definition stay private to this module; only domain types cross
//! the port.
//!
//! # Example
//!
//! ```no_run
//! use accounts::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/accounts")).await?;
//! let _repo = DieselUserRepository::new(pool);
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use migrations::run_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
