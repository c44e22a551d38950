//! Shared harness driving the accounts schema over in-memory adapters.

use std::sync::Arc;

use accounts::domain::ports::{PasswordHasher, SessionStore, UserRepository};
use accounts::domain::{AccountService, RequestContext, SessionChange, SessionId};
use accounts::inbound::graphql::{AccountsSchema, build_schema};
use accounts::outbound::crypto::Pbkdf2PasswordHasher;
use accounts::outbound::memory::{MemorySessionStore, MemoryUserRepository};
use async_graphql::{Request, Response};
use mockable::{Clock, DefaultClock};

/// Schema plus handles on the stores behind it.
pub struct Harness {
    pub users: Arc<MemoryUserRepository>,
    pub sessions: Arc<MemorySessionStore>,
    service: accounts::domain::DynAccountService,
    schema: AccountsSchema,
}

impl Harness {
    pub fn new() -> Self {
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let users = Arc::new(MemoryUserRepository::default());
        let sessions = Arc::new(MemorySessionStore::new(Arc::clone(&clock)));
        let hasher: Arc<dyn PasswordHasher> =
            Arc::new(Pbkdf2PasswordHasher::new("integration-pepper", 16));
        let service = AccountService::new(
            Arc::clone(&users) as Arc<dyn UserRepository>,
            hasher,
            Arc::clone(&sessions) as Arc<dyn SessionStore>,
            clock,
        );
        let schema = build_schema(service.clone());
        Self {
            users,
            sessions,
            service,
            schema,
        }
    }

    /// A client with an empty cookie jar.
    pub fn client(&self) -> Client<'_> {
        Client {
            harness: self,
            cookie: None,
        }
    }
}

/// Client that remembers the session id the way a browser keeps a cookie.
pub struct Client<'a> {
    harness: &'a Harness,
    pub cookie: Option<SessionId>,
}

impl Client<'_> {
    pub async fn send(&mut self, query: &str) -> Response {
        let handle = self
            .harness
            .service
            .resume(self.cookie.as_ref())
            .await
            .expect("session store reachable");
        let ctx = RequestContext::new(handle.clone());
        let response = self
            .harness
            .schema
            .execute(Request::new(query).data(ctx))
            .await;
        match handle.change() {
            SessionChange::Established(id) => self.cookie = Some(id),
            SessionChange::Cleared => self.cookie = None,
            SessionChange::Unchanged => {}
        }
        response
    }
}

pub fn create_user(email: &str, first: &str, last: &str, password: &str) -> String {
    format!(
        r#"mutation {{
            createUser(input: {{
                email: "{email}", firstName: "{first}", lastName: "{last}", password: "{password}"
            }}) {{ ok }}
        }}"#
    )
}

pub fn authenticate(username: &str, password: &str) -> String {
    format!(
        r#"mutation {{
            authenticate(username: "{username}", password: "{password}") {{
                ok user {{ id email firstName lastName }}
            }}
        }}"#
    )
}
