use std::sync::atomic::Ordering;

use axum::http::Method;
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::access::AccessLevel;
use crate::database::models::{InviteStatus, UserInvite};
use crate::services::invite_service::hash_token;
use crate::testing::TestApp;

fn invite_for(user_id: Uuid, token: &str, status: InviteStatus, expires_in: Duration) -> UserInvite {
    UserInvite {
        id: Uuid::new_v4(),
        user_id,
        email: "invitee@acme.test".to_string(),
        token_hash: hash_token(token),
        status: status.as_str().to_string(),
        invited_by: None,
        expires_at: Utc::now() + expires_in,
        sent_at: None,
        accepted_at: None,
        created_at: Utc::now(),
    }
}

async fn accept(app: &TestApp, body: serde_json::Value) -> (axum::http::StatusCode, serde_json::Value) {
    app.request(Method::POST, "/api/invites/accept", None, Some(body)).await
}

#[tokio::test]
async fn root_lists_endpoints() {
    let app = TestApp::new();
    let (status, body) = app.request(Method::GET, "/", None, None).await;
    assert_eq!(status, 200);
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["endpoints"]["clients"].is_string());
}

#[tokio::test]
async fn health_reflects_store() {
    let app = TestApp::new();
    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ok");

    app.store.unavailable.store(true, Ordering::SeqCst);
    let (status, body) = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(status, 503);
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn accept_sets_password_and_closes_invite() {
    let app = TestApp::new();
    let user = app.seed_profile("invitee@acme.test", AccessLevel::Member, None);
    app.store.put_invite(invite_for(user.id, "tok-1", InviteStatus::Pending, Duration::hours(1)));

    let (status, body) = accept(&app, json!({ "token": "tok-1", "password": "s3cret-pass" })).await;
    assert_eq!(status, 200);
    assert_eq!(body["invite"]["status"], "accepted");
    assert!(body["invite"]["accepted_at"].is_string());
    assert_eq!(app.identity.password_of(user.id).as_deref(), Some("s3cret-pass"));

    let (status, body) = accept(&app, json!({ "token": "tok-1", "password": "s3cret-pass" })).await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "Invite has already been used");
}

#[tokio::test]
async fn accept_rejects_unknown_and_expired_tokens() {
    let app = TestApp::new();
    let user = app.seed_profile("invitee@acme.test", AccessLevel::Member, None);
    app.store.put_invite(invite_for(user.id, "old", InviteStatus::Pending, Duration::hours(-1)));
    app.store.put_invite(invite_for(user.id, "gone", InviteStatus::Revoked, Duration::hours(1)));

    let (status, body) = accept(&app, json!({ "token": "nope", "password": "long-enough" })).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Invite not found");

    let (status, body) = accept(&app, json!({ "token": "old", "password": "long-enough" })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Invite has expired");

    let (status, _) = accept(&app, json!({ "token": "gone", "password": "long-enough" })).await;
    assert_eq!(status, 409);
}

#[tokio::test]
async fn accept_requires_token_and_strong_password() {
    let app = TestApp::new();
    let user = app.seed_profile("invitee@acme.test", AccessLevel::Member, None);
    app.store.put_invite(invite_for(user.id, "tok", InviteStatus::Pending, Duration::hours(1)));

    let (status, body) = accept(&app, json!({ "password": "long-enough" })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "token is required");

    let (status, body) = accept(&app, json!({ "token": "tok", "password": "short" })).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Password must be at least 8 characters");
    assert_eq!(app.store.invites()[0].status(), Some(InviteStatus::Pending));
}

#[tokio::test]
async fn invite_round_trip_through_email_link() {
    let app = TestApp::new();
    let client = app.seed_client("Acme");
    let admin = app.seed_profile("a@acme.test", AccessLevel::ClientAdmin, Some(client.id));
    let user = app.seed_profile("new@acme.test", AccessLevel::Member, Some(client.id));

    let (status, _) = app
        .request(
            Method::POST,
            &format!("/api/users/{}/invite", user.id),
            Some(&app.token_for(&admin)),
            None,
        )
        .await;
    assert_eq!(status, 201);

    let email = app.sent_emails().pop().unwrap();
    let token = email
        .text
        .split("token=")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .unwrap()
        .to_string();

    let (status, _) = accept(&app, json!({ "token": token, "password": "brand-new-pass" })).await;
    assert_eq!(status, 200);
    assert_eq!(app.identity.password_of(user.id).as_deref(), Some("brand-new-pass"));
}

#[tokio::test]
async fn accept_keeps_password_whitespace() {
    let app = TestApp::new();
    let user = app.seed_profile("invitee@acme.test", AccessLevel::Member, None);
    app.store.put_invite(invite_for(user.id, "tok-ws", InviteStatus::Pending, Duration::hours(1)));

    let (status, _) = accept(&app, json!({ "token": "tok-ws", "password": " padded pass " })).await;
    assert_eq!(status, 200);
    assert_eq!(app.identity.password_of(user.id).as_deref(), Some(" padded pass "));
}

#[tokio::test]
async fn store_outage_is_an_internal_error() {
    let app = TestApp::new();
    app.store.unavailable.store(true, Ordering::SeqCst);

    let (status, body) = accept(&app, json!({ "token": "t", "password": "longenough" })).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Database error occurred");
    assert_eq!(body["code"], "INTERNAL_SERVER_ERROR");
}
