//! HTTP inbound adapter exposing the GraphQL endpoint and health probes.

pub mod error;
pub mod graphql;
pub mod health;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
