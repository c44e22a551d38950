//! GraphQL object and input types.
//!
//! Domain values are converted at the edge so the password digest held by
//! [`UserSnapshot`] and [`User`] never becomes a schema field.

use async_graphql::{ID, InputObject, SimpleObject};

use crate::domain::{AuthResult, MutationOutcome, SessionView, User, UserSnapshot};

/// Public view of a registered user.
#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
#[graphql(name = "User")]
pub struct UserObject {
    pub id: ID,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for UserObject {
    fn from(user: &User) -> Self {
        Self {
            id: ID(user.id().to_string()),
            email: user.email().to_string(),
            first_name: user.first_name().to_owned(),
            last_name: user.last_name().to_owned(),
        }
    }
}

impl From<User> for UserObject {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

impl From<UserSnapshot> for UserObject {
    fn from(user: UserSnapshot) -> Self {
        Self {
            id: ID(user.id.to_string()),
            email: user.email.into(),
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

/// Current session as reported by the `session` query.
#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
#[graphql(name = "Session")]
pub struct SessionObject {
    pub authenticated: bool,
    pub user: Option<UserObject>,
}

impl From<SessionView> for SessionObject {
    fn from(view: SessionView) -> Self {
        Self {
            authenticated: view.is_authenticated(),
            user: view.user.map(UserObject::from),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, SimpleObject)]
#[graphql(name = "MutationResult")]
pub struct MutationResultObject {
    pub ok: bool,
}

impl From<MutationOutcome> for MutationResultObject {
    fn from(outcome: MutationOutcome) -> Self {
        Self { ok: outcome.ok }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
#[graphql(name = "AuthResult")]
pub struct AuthResultObject {
    pub ok: bool,
    pub user: Option<UserObject>,
}

impl From<AuthResult> for AuthResultObject {
    fn from(result: AuthResult) -> Self {
        Self {
            ok: result.ok,
            user: result.user.map(UserObject::from),
        }
    }
}

/// Arguments of `createUser`.
#[derive(Debug, Clone, InputObject)]
pub struct CreateUserInput {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}
