//! GraphQL adapter over the account service.

mod error;
mod schema;
mod types;

pub use schema::{AccountsSchema, MutationRoot, QueryRoot, build_schema, schema_sdl};
pub use types::{
    AuthResultObject, CreateUserInput, MutationResultObject, SessionObject, UserObject,
};
