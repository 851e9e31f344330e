//! Shared harness: the real router over in-memory repositories, with a
//! mailer and image store that record instead of delivering.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use givebridge_api::api::Dispatcher;
use givebridge_api::app::build_router_with;
use givebridge_api::config::{AppEnv, Config};
use givebridge_api::repos::Repos;
use givebridge_api::services::images::{ImageError, ImageStore, ImageUpload};
use givebridge_api::services::mailer::{MailError, Mailer, Receipt};
use givebridge_api::state::AppState;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;

pub const ALLOWED_ORIGIN: &str = "http://localhost:5173";
pub const JWT_SECRET: &str = "integration-secret-integration-secret";
pub const PASSWORD: &str = "pw123456";

pub fn test_config() -> Config {
    Config {
        addr: "127.0.0.1:0".parse().unwrap(),
        app_env: AppEnv::Development,
        database_url: None,
        database_max_connections: 1,
        cors_allowed_origins: vec![ALLOWED_ORIGIN.to_string()],
        jwt_secret: JWT_SECRET.to_string(),
        session_ttl_seconds: 604_800,
        jwt_leeway_seconds: 0,
        secure_cookies: false,
        max_body_bytes: 64 * 1024,
        request_timeout: Duration::from_secs(10),
        bcrypt_cost: 4,
        upload_dir: std::env::temp_dir().join("givebridge-api-tests"),
        public_base_url: Url::parse("http://localhost:3000").unwrap(),
        max_image_bytes: 1024,
    }
}

#[derive(Debug, Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<Receipt>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_receipt(&self, receipt: &Receipt) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(receipt.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryImageStore {
    pub stored: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl ImageStore for MemoryImageStore {
    async fn put(&self, folder: &str, image: &ImageUpload) -> Result<String, ImageError> {
        let url = format!("https://cdn.test/{}/{}", folder, image.file_name());
        self.stored
            .lock()
            .unwrap()
            .push((folder.to_string(), url.clone()));
        Ok(url)
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub mailer: Arc<RecordingMailer>,
    pub images: Arc<MemoryImageStore>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }

    /// `token=<jwt>` from Set-Cookie, ready to be sent back as a Cookie header.
    pub fn session_cookie(&self) -> String {
        let raw = self.headers[header::SET_COOKIE].to_str().unwrap();
        raw.split(';').next().unwrap().to_string()
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_dispatcher(config, Dispatcher::standard())
    }

    /// Full middleware stack around a hand-built set of route modules.
    pub fn with_dispatcher(config: Config, dispatcher: Dispatcher) -> Self {
        let mailer = Arc::new(RecordingMailer::default());
        let images = Arc::new(MemoryImageStore::default());
        let state = AppState::new(config, Repos::memory(), mailer.clone(), images.clone());
        Self {
            router: build_router_with(state.clone(), dispatcher),
            state,
            mailer,
            images,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.call(Method::GET, uri, None, cookie).await
    }

    pub async fn post(&self, uri: &str, body: Value, cookie: Option<&str>) -> TestResponse {
        self.call(Method::POST, uri, Some(body), cookie).await
    }

    /// Registers an account and returns (user id, session cookie).
    pub async fn register(&self, name: &str, email: &str, role: &str) -> (String, String) {
        let res = self
            .post(
                "/api/auth/register",
                json!({"name": name, "email": email, "password": PASSWORD, "role": role}),
                None,
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "register failed: {:?}", res.body);
        let id = res.body["user"]["id"].as_str().unwrap().to_string();
        (id, res.session_cookie())
    }

    /// NGO account with one open campaign; returns (ngo cookie, campaign id).
    pub async fn ngo_with_campaign(&self, email: &str, goal: f64) -> (String, String) {
        let (_, cookie) = self.register("Clean Water Trust", email, "ngo").await;
        let res = self
            .post(
                "/api/campaigns",
                json!({"title": "Wells", "description": "Dig village wells", "goalAmount": goal}),
                Some(&cookie),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "campaign failed: {:?}", res.body);
        let id = res.body["campaign"]["id"].as_str().unwrap().to_string();
        (cookie, id)
    }
}
