//! Query and mutation roots.
//!
//! Resolvers stay thin: they read the [`RequestContext`] the HTTP adapter
//! attached to the request, validate argument shape and delegate to the
//! [`DynAccountService`] held in schema data.

use async_graphql::{Context, EmptySubscription, ID, Object, Result, Schema};

use crate::domain::{DynAccountService, LoginCredentials, Registration, RequestContext};

use super::error::{map_login_error, map_registration_error, to_graphql};
use super::types::{
    AuthResultObject, CreateUserInput, MutationResultObject, SessionObject, UserObject,
};

/// Executable accounts schema.
pub type AccountsSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema around a wired account service.
///
/// Each request must carry a [`RequestContext`] in its request data.
pub fn build_schema(service: DynAccountService) -> AccountsSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(service)
        .finish()
}

/// Schema definition language for the accounts schema.
///
/// # Examples
/// ```
/// let sdl = accounts::inbound::graphql::schema_sdl();
/// assert!(sdl.contains("authenticate(username: String!, password: String!): AuthResult!"));
/// ```
#[must_use]
pub fn schema_sdl() -> String {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .finish()
        .sdl()
}

fn parts<'a>(ctx: &'a Context<'_>) -> Result<(&'a DynAccountService, &'a RequestContext)> {
    Ok((
        ctx.data::<DynAccountService>()?,
        ctx.data::<RequestContext>()?,
    ))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Current session; anonymous when nobody is signed in.
    async fn session(&self, ctx: &Context<'_>) -> Result<SessionObject> {
        let (service, request) = parts(ctx)?;
        Ok(service.session(request).into())
    }

    /// Every registered user. Requires a session.
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<UserObject>> {
        let (service, request) = parts(ctx)?;
        let auth = request.require_session().map_err(to_graphql)?;
        let users = service.users(&auth).await.map_err(to_graphql)?;
        Ok(users.into_iter().map(UserObject::from).collect())
    }

    /// A single user, or null when the id matches nobody. Requires a session.
    async fn user(&self, ctx: &Context<'_>, id: ID) -> Result<Option<UserObject>> {
        let (service, request) = parts(ctx)?;
        let auth = request.require_session().map_err(to_graphql)?;
        let user = service.user(&auth, id.as_str()).await.map_err(to_graphql)?;
        Ok(user.map(UserObject::from))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Register a new user.
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        input: CreateUserInput,
    ) -> Result<MutationResultObject> {
        let (service, _) = parts(ctx)?;
        let registration = Registration::try_from_parts(
            &input.email,
            &input.first_name,
            &input.last_name,
            &input.password,
        )
        .map_err(|err| to_graphql(map_registration_error(err)))?;
        let outcome = service
            .create_user(registration)
            .await
            .map_err(to_graphql)?;
        Ok(outcome.into())
    }

    /// Sign in with an email address and password.
    async fn authenticate(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
    ) -> Result<AuthResultObject> {
        let (service, request) = parts(ctx)?;
        let credentials = LoginCredentials::try_from_parts(&username, &password)
            .map_err(|err| to_graphql(map_login_error(err)))?;
        let result = service
            .authenticate(request, &credentials)
            .await
            .map_err(to_graphql)?;
        Ok(result.into())
    }

    /// End the current session; null when there was none.
    async fn logout(&self, ctx: &Context<'_>) -> Result<Option<MutationResultObject>> {
        let (service, request) = parts(ctx)?;
        let outcome = service.logout(request).await.map_err(to_graphql)?;
        Ok(outcome.map(MutationResultObject::from))
    }
}
