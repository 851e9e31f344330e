mod common;

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use axum::response::IntoResponse;
use common::{ALLOWED_ORIGIN, TestApp, test_config};
use givebridge_api::api::Dispatcher;
use givebridge_api::api::context::RequestContext;
use givebridge_api::api::routing::{Outcome, RouteModule};
use givebridge_api::error::AppError;
use givebridge_api::state::AppState;
use serde_json::json;

/// Module whose routes fail on purpose.
struct Faulty;

#[async_trait]
impl RouteModule for Faulty {
    fn name(&self) -> &'static str {
        "faulty"
    }

    async fn handle(&self, _state: &AppState, ctx: &mut RequestContext) -> Outcome {
        match ctx.path.as_str() {
            "/api/boom" => panic!("pool poisoned at 10.0.0.3"),
            "/api/fail" => Outcome::from_result(Err(AppError::internal(
                "connection refused at 10.0.0.3",
            ))),
            "/api/slow" => {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Outcome::Handled(StatusCode::OK.into_response())
            }
            _ => Outcome::NotHandled,
        }
    }
}

fn faulty_app(timeout: Duration) -> TestApp {
    let mut config = test_config();
    config.request_timeout = timeout;
    TestApp::with_dispatcher(config, Dispatcher::with_modules(vec![Box::new(Faulty)]))
}

#[tokio::test]
async fn unknown_route_is_404_json() {
    let app = TestApp::new();

    let res = app.get("/api/nothing-here", None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.message(), "Route not found");

    // known path, unknown method
    let res = app.call(Method::DELETE, "/api/auth/login", None, None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn preflight_is_204_without_body_and_without_auth() {
    let app = TestApp::new();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/campaigns")
        .header(header::ORIGIN, ALLOWED_ORIGIN)
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();
    let res = app.send(request).await;

    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert!(res.body.is_null());
    assert_eq!(res.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ALLOWED_ORIGIN);
    assert_eq!(res.headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    assert!(res.headers.contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn preflight_from_unlisted_origin_gets_no_cors_headers() {
    let app = TestApp::new();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/auth/profile")
        .header(header::ORIGIN, "https://evil.example")
        .body(Body::empty())
        .unwrap();
    let res = app.send(request).await;

    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert!(!res.headers.contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
}

#[tokio::test]
async fn regular_responses_reflect_allowed_origin() {
    let app = TestApp::new();

    let request = Request::builder()
        .uri("/api/ngo")
        .header(header::ORIGIN, ALLOWED_ORIGIN)
        .body(Body::empty())
        .unwrap();
    let res = app.send(request).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ALLOWED_ORIGIN);
    assert_eq!(res.headers[header::VARY], "Origin");
    // request id is generated and propagated
    assert!(res.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn malformed_json_reaches_handler_as_empty_body() {
    let app = TestApp::new();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\": "))
        .unwrap();
    let res = app.send(request).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "Email and password are required");
}

#[tokio::test]
async fn body_without_json_content_type_is_ignored() {
    let app = TestApp::new();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(json!({"email": "a@x.com", "password": "pw123456"}).to_string()))
        .unwrap();
    let res = app.send(request).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.message(), "Email and password are required");
}

#[tokio::test]
async fn oversized_body_is_413() {
    let mut config = test_config();
    config.max_body_bytes = 32;
    let app = TestApp::with_config(config);

    let res = app
        .post(
            "/api/auth/register",
            json!({"name": "A".repeat(100), "email": "a@x.com", "password": "pw123456", "role": "donor"}),
            None,
        )
        .await;

    assert_eq!(res.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(res.message(), "Request body too large");
}

#[tokio::test]
async fn trailing_slash_routes_the_same() {
    let app = TestApp::new();

    let a = app.get("/api/ngo", None).await;
    let b = app.get("/api/ngo/", None).await;
    assert_eq!(a.status, StatusCode::OK);
    assert_eq!(b.status, StatusCode::OK);
    assert_eq!(a.body, b.body);
}

#[tokio::test]
async fn preflight_is_answered_on_static_uploads_too() {
    let app = TestApp::new();

    for uri in ["/uploads/banners/x.png", "/uploads", "/anything/else"] {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri(uri)
            .header(header::ORIGIN, ALLOWED_ORIGIN)
            .body(Body::empty())
            .unwrap();
        let res = app.send(request).await;

        assert_eq!(res.status, StatusCode::NO_CONTENT, "{uri}");
        assert!(res.body.is_null(), "{uri}");
        assert_eq!(res.headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], ALLOWED_ORIGIN, "{uri}");
    }

    // other methods still reach the file server
    let res = app.get("/uploads/banners/missing.png", None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn panicking_module_yields_opaque_500() {
    let app = faulty_app(Duration::from_secs(10));

    let res = app.get("/api/boom", None).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body, json!({"message": "Internal server error"}));
    assert!(res.headers.contains_key("x-request-id"));

    // the server keeps serving after a panic
    let res = app.get("/api/nowhere", None).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.message(), "Route not found");
}

#[tokio::test]
async fn internal_error_detail_is_not_leaked() {
    let app = faulty_app(Duration::from_secs(10));

    let res = app.get("/api/fail", None).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(res.body, json!({"message": "Internal server error"}));
    assert!(res.headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn slow_module_times_out_with_408() {
    let app = faulty_app(Duration::from_millis(50));

    let res = app.get("/api/slow", None).await;
    assert_eq!(res.status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(res.body, json!({"message": "Request timed out"}));
}
