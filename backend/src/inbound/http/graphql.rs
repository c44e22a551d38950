//! GraphQL endpoints.
//!
//! ```text
//! POST /graphql          JSON GraphQL request -> JSON GraphQL response
//! GET  /graphql/schema   SDL text
//! ```
//!
//! The handler resolves the session cookie into a [`RequestContext`], runs
//! the schema, then writes the cookie back according to the session change
//! the resolvers produced. Resolver failures travel inside the GraphQL
//! envelope; only failures before execution become HTTP errors.

use actix_web::{HttpResponse, get, post, web};
use tracing::debug;

use crate::domain::RequestContext;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Execute a GraphQL request against the accounts schema.
#[post("/graphql")]
pub async fn graphql(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: web::Json<async_graphql::Request>,
) -> ApiResult<HttpResponse> {
    let cookie_id = session.session_id()?;
    let handle = state.accounts.resume(cookie_id.as_ref()).await?;
    let stale = cookie_id.is_some() && !handle.exists();
    if stale {
        debug!("session cookie no longer resolves to a record");
    }

    let ctx = RequestContext::new(handle.clone());
    let response = state
        .schema
        .execute(request.into_inner().data(ctx))
        .await;

    session.apply(&handle.change(), stale)?;
    Ok(HttpResponse::Ok().json(response))
}

/// Serve the schema definition language.
#[get("/graphql/schema")]
pub async fn schema_sdl(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(state.schema.sdl())
}

#[cfg(test)]
mod tests {
    //! Cookie flow through the endpoint with in-memory adapters.

    use super::*;
    use actix_web::cookie::Cookie;
    use actix_web::dev::ServiceResponse;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};

    use crate::inbound::http::test_utils::{memory_service, test_session_middleware};

    fn gql(query: &str) -> Value {
        json!({ "query": query })
    }

    fn session_cookie(res: &ServiceResponse) -> Option<Cookie<'static>> {
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .map(|cookie| cookie.into_owned())
    }

    #[actix_web::test]
    async fn login_session_logout_round_trip() {
        let state = web::Data::new(HttpState::new(memory_service()));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .wrap(test_session_middleware())
                .service(graphql)
                .service(schema_sdl),
        )
        .await;

        let create = test::TestRequest::post()
            .uri("/graphql")
            .set_json(gql(r#"mutation {
                createUser(input: {
                    email: "ada@example.com", firstName: "Ada", lastName: "Lovelace",
                    password: "engine"
                }) { ok }
            }"#))
            .to_request();
        let res = test::call_service(&app, create).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(session_cookie(&res).is_none(), "registration must not sign in");

        let login = test::TestRequest::post()
            .uri("/graphql")
            .set_json(gql(r#"mutation {
                authenticate(username: "ada@example.com", password: "engine") { ok }
            }"#))
            .to_request();
        let res = test::call_service(&app, login).await;
        let cookie = session_cookie(&res).expect("login sets session cookie");
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["data"]["authenticate"]["ok"], true);

        let session = test::TestRequest::post()
            .uri("/graphql")
            .cookie(cookie.clone())
            .set_json(gql("{ session { authenticated user { email } } }"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, session).await;
        assert_eq!(
            body["data"]["session"],
            json!({ "authenticated": true, "user": { "email": "ada@example.com" } })
        );

        let logout = test::TestRequest::post()
            .uri("/graphql")
            .cookie(cookie.clone())
            .set_json(gql("mutation { logout { ok } }"))
            .to_request();
        let res = test::call_service(&app, logout).await;
        let removal = session_cookie(&res).expect("logout removes cookie");
        assert_eq!(removal.value(), "");
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["data"]["logout"], json!({ "ok": true }));

        // Replaying the old cookie finds no record.
        let replay = test::TestRequest::post()
            .uri("/graphql")
            .cookie(cookie)
            .set_json(gql("{ session { authenticated } users { id } }"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, replay).await;
        assert_eq!(body["errors"][0]["extensions"]["code"], "UNAUTHENTICATED");
    }

    #[actix_web::test]
    async fn serves_sdl() {
        let state = web::Data::new(HttpState::new(memory_service()));
        let app = test::init_service(
            App::new()
                .app_data(state)
                .wrap(test_session_middleware())
                .service(schema_sdl),
        )
        .await;
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/graphql/schema").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        let sdl = std::str::from_utf8(&body).expect("utf8 sdl");
        assert!(sdl.contains("type AuthResult"));
    }
}
