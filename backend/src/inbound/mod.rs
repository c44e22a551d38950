//! Inbound adapters that translate external requests into account service
//! calls while keeping framework details at the edge.
//!
//! [`graphql`] holds the schema and resolvers; [`http`] carries them over
//! actix-web and owns the session cookie.

pub mod graphql;
pub mod http;
