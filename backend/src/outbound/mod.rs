//! Outbound adapters implementing the domain ports.
//!
//! - `persistence`: Diesel/PostgreSQL user store.
//! - `cache`: Redis session store.
//! - `memory`: in-process user and session stores.
//! - `crypto`: password hashing.

pub mod cache;
pub mod crypto;
pub mod memory;
pub mod persistence;
