use axum::Router;

use crate::state::SharedState;

/// Admin-only contest commands under `/admin`.
pub mod admin;
/// Swagger UI and the raw OpenAPI document.
pub mod docs;
/// Liveness endpoint.
pub mod health;
/// Middleware resolving the caller from request headers.
pub mod identity;
/// Participant-facing endpoints under `/contest`.
pub mod public;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(public::router(state.clone()))
        .merge(admin::router(state.clone()));

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::test_support::{ADMIN_TOKEN, TestContext};

    async fn send(
        ctx: &TestContext,
        method: &str,
        uri: &str,
        headers: &[(&str, &str)],
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = router(ctx.state.clone())
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, payload)
    }

    const ADMIN: &[(&str, &str)] = &[
        ("x-user-id", "1"),
        ("x-admin-token", ADMIN_TOKEN),
        ("x-channel-id", "500"),
    ];

    #[tokio::test]
    async fn entries_require_a_caller() {
        let ctx = TestContext::new(&["Tama"]);
        let (status, body) = send(
            &ctx,
            "POST",
            "/contest/entries",
            &[],
            Some(json!({ "system": "Tama" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["reason"], "unauthorized");

        let (status, _) = send(&ctx, "GET", "/contest/entries/me", &[("x-user-id", "abc")], None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn entry_flow_maps_errors_to_statuses() {
        let ctx = TestContext::new(&["Tama", "Vey"]);
        let alice = &[("x-user-id", "11")];
        let bob = &[("x-user-id", "12")];

        let (status, body) = send(
            &ctx,
            "POST",
            "/contest/entries",
            alice,
            Some(json!({ "system": " tama" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["system_name"], "Tama");
        assert_eq!(body["user_id"], "11");

        let (status, body) = send(
            &ctx,
            "POST",
            "/contest/entries",
            bob,
            Some(json!({ "system": "Tama" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["reason"], "system_taken");

        let (status, body) = send(
            &ctx,
            "POST",
            "/contest/entries",
            bob,
            Some(json!({ "system": "Jita" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["reason"], "invalid_system");

        let (status, body) = send(&ctx, "GET", "/contest/entries/me", alice, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["system_name"], "Tama");

        let (status, _) = send(&ctx, "GET", "/contest/entries/me", bob, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn admin_routes_check_the_token() {
        let ctx = TestContext::new(&["Tama"]);

        let (status, body) = send(&ctx, "GET", "/admin/entries", &[("x-user-id", "11")], None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["reason"], "permission_denied");

        let (status, _) = send(
            &ctx,
            "GET",
            "/admin/entries",
            &[("x-user-id", "11"), ("x-admin-token", "guess")],
            None,
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(&ctx, "GET", "/admin/entries", ADMIN, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["entries"], json!([]));
    }

    #[tokio::test]
    async fn contest_round_trip_over_http() {
        let ctx = TestContext::new(&["Tama", "Vey"]);
        send(
            &ctx,
            "POST",
            "/contest/entries",
            &[("x-user-id", "11")],
            Some(json!({ "system": "Tama" })),
        )
        .await;

        let (status, body) = send(
            &ctx,
            "POST",
            "/admin/contest/end",
            ADMIN,
            Some(json!({ "fob_system": "tama" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["winner_user_id"], "11");
        assert_eq!(body["phase"], "winner_picked");

        let (status, body) = send(&ctx, "POST", "/admin/contest/open", ADMIN, None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["reason"], "already_has_winner");

        let (_, status_body) = send(&ctx, "GET", "/contest/status", &[], None).await;
        assert_eq!(status_body["winner_user_id"], "11");
        assert_eq!(status_body["entry_count"], 1);

        let (_, winners) = send(&ctx, "GET", "/contest/winners", &[], None).await;
        assert_eq!(winners.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn prize_list_is_validated() {
        let ctx = TestContext::new(&["Tama"]);
        let (status, body) = send(
            &ctx,
            "PUT",
            "/admin/prizes",
            ADMIN,
            Some(json!({ "prizes": [] })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["reason"], "malformed_input");

        let (status, _) = send(
            &ctx,
            "PUT",
            "/admin/prizes",
            ADMIN,
            Some(json!({ "prizes": ["1B ISK", "Titan BPC"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&ctx, "GET", "/contest/prizes", &[], None).await;
        assert_eq!(body["prizes"], json!(["1B ISK", "Titan BPC"]));
    }

    #[tokio::test]
    async fn public_reads_need_no_headers() {
        let ctx = TestContext::new(&["Tama", "Vey"]);

        let (status, body) = send(&ctx, "GET", "/contest/systems/suggest?q=ve", &[], None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["systems"], json!(["Vey"]));

        let (status, body) = send(&ctx, "GET", "/healthcheck", &[], None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, _) = send(&ctx, "GET", "/contest/rules", &[], None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&ctx, "GET", "/contest/help", &[], None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "FOB Contest Bot Commands");
        assert_eq!(body["admin_commands"][0]["command"], "/backupdb");
    }
}
