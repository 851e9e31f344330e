mod common;

use axum::http::{Method, StatusCode, header};
use chrono::Utc;
use common::{JWT_SECRET, PASSWORD, TestApp};
use givebridge_api::models::Role;
use givebridge_api::services::auth::{SessionClaims, SessionService};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn register_then_duplicate_is_409() {
    let app = TestApp::new();
    let body = json!({"name": "A", "email": "a@x.com", "password": "pw123456", "role": "donor"});

    let res = app.post("/api/auth/register", body.clone(), None).await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["user"]["email"], "a@x.com");
    assert_eq!(res.body["user"]["role"], "donor");
    assert!(res.body["user"].get("passwordHash").is_none());

    let cookie = res.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(cookie.contains("Max-Age=604800"));

    let res = app.post("/api/auth/register", body, None).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.message(), "User already exists");
}

#[tokio::test]
async fn duplicate_check_ignores_email_case() {
    let app = TestApp::new();
    app.register("A", "a@x.com", "donor").await;

    let res = app
        .post(
            "/api/auth/register",
            json!({"name": "B", "email": "A@X.COM", "password": PASSWORD, "role": "ngo"}),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn register_validation_messages() {
    let app = TestApp::new();

    let res = app
        .post("/api/auth/register", json!({"email": "a@x.com"}), None)
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "Name, email, password and role are required");

    let res = app
        .post(
            "/api/auth/register",
            json!({"name": "A", "email": "a@x.com", "password": PASSWORD, "role": "admin"}),
            None,
        )
        .await;
    assert_eq!(res.message(), "Role must be either donor or ngo");
}

#[tokio::test]
async fn login_and_profile() {
    let app = TestApp::new();
    let (id, _) = app.register("Ada", "ada@example.org", "donor").await;

    let res = app
        .post(
            "/api/auth/login",
            json!({"email": "ada@example.org", "password": "wrong-password"}),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.message(), "Invalid email or password");

    let res = app
        .post(
            "/api/auth/login",
            json!({"email": "ada@example.org", "password": PASSWORD}),
            None,
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let cookie = res.session_cookie();

    let res = app.get("/api/auth/profile", Some(&cookie)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["user"]["id"], id.as_str());
    assert_eq!(res.body["user"]["name"], "Ada");
}

#[tokio::test]
async fn guarded_route_without_cookie_is_401() {
    let app = TestApp::new();

    for (method, uri) in [
        (Method::GET, "/api/auth/profile"),
        (Method::GET, "/api/campaigns"),
        (Method::GET, "/api/donations/my"),
        (Method::GET, "/api/recurring"),
        (Method::PUT, "/api/ngo"),
    ] {
        let res = app.call(method, uri, None, None).await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(res.message(), "No token provided", "{uri}");
    }
}

#[tokio::test]
async fn tampered_or_expired_cookie_is_401_invalid() {
    let app = TestApp::new();
    let (_, cookie) = app.register("Ada", "ada@example.org", "donor").await;

    // flip a character inside the payload segment
    let mut tampered: Vec<char> = cookie.chars().collect();
    let dot = cookie.find('.').unwrap();
    tampered[dot + 2] = if tampered[dot + 2] == 'a' { 'b' } else { 'a' };
    let tampered: String = tampered.into_iter().collect();

    let res = app.get("/api/auth/profile", Some(&tampered)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.message(), "Invalid or expired token");

    let sessions = SessionService::new(JWT_SECRET.as_bytes(), 3600, 0);
    let now = Utc::now().timestamp() as u64;
    let expired = sessions
        .sign(&SessionClaims {
            sub: Uuid::new_v4().to_string(),
            name: "Ada".into(),
            email: "ada@example.org".into(),
            role: Role::Donor,
            iat: now - 7200,
            exp: now - 3600,
        })
        .unwrap();

    let res = app
        .get("/api/auth/profile", Some(&format!("token={expired}")))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.message(), "Invalid or expired token");
}

#[tokio::test]
async fn valid_token_for_deleted_user_is_404() {
    let app = TestApp::new();
    let sessions = SessionService::new(JWT_SECRET.as_bytes(), 3600, 0);
    let now = Utc::now().timestamp() as u64;
    let token = sessions
        .sign(&SessionClaims {
            sub: Uuid::new_v4().to_string(),
            name: "Ghost".into(),
            email: "ghost@example.org".into(),
            role: Role::Donor,
            iat: now,
            exp: now + 600,
        })
        .unwrap();

    let res = app
        .get("/api/auth/profile", Some(&format!("token={token}")))
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.message(), "User not found");
}

#[tokio::test]
async fn logout_expires_cookie() {
    let app = TestApp::new();

    let res = app.post("/api/auth/logout", json!({}), None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.message(), "Logged out successfully");

    let cookie = res.headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("token=;"));
    assert!(cookie.contains("Max-Age=0"));
}
