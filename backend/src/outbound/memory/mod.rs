//! In-process adapters used when no external store is configured and in
//! tests.

mod session_store;
mod user_repository;

pub use session_store::MemorySessionStore;
pub use user_repository::MemoryUserRepository;
