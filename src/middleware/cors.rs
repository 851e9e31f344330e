//! CORS policy for the browser frontend.
//!
//! Note:
//! - The session travels in a cookie, so responses must carry
//!   `Access-Control-Allow-Credentials: true`, which in turn forbids a wildcard
//!   origin. The request `Origin` is reflected only when it is on the allow-list.
//! - The allow-list comes from `CORS_ALLOWED_ORIGINS` (normalized in `Config`).
//!
//! Responsibility:
//! - Answer every `OPTIONS` request with 204 and an empty body (preflight carries
//!   no credentials and never reaches a route module).
//! - Decorate every other response with the CORS headers when the origin is allowed.
//!
//! `answer_preflight` runs around the whole router so `OPTIONS` gets its 204
//! on every path, static `/uploads` included. The dispatcher decorates the
//! API responses itself.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::Response;

use crate::config::Config;
use crate::state::AppState;

const ALLOW_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";
const ALLOW_HEADERS: &str = "Content-Type, Authorization, X-Request-Id";
const MAX_AGE_SECONDS: &str = "600";

#[derive(Debug, Clone, Default)]
pub struct CorsPolicy {
    allowed: Vec<HeaderValue>,
}

impl CorsPolicy {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = origins
            .into_iter()
            .filter_map(|s| HeaderValue::from_str(s.as_ref()).ok())
            .collect();
        Self { allowed }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.cors_allowed_origins)
    }

    /// The request origin, if it is exactly one of the allowed origins.
    pub fn allowed_origin(&self, headers: &HeaderMap) -> Option<HeaderValue> {
        let origin = headers.get(header::ORIGIN)?;
        self.allowed.iter().any(|v| v == origin).then(|| origin.clone())
    }

    /// 204, no body; CORS headers only for an allowed origin.
    pub fn preflight(&self, origin: Option<&HeaderValue>) -> Response {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::NO_CONTENT;
        self.decorate(origin, &mut response);
        response
    }

    pub fn decorate(&self, origin: Option<&HeaderValue>, response: &mut Response) {
        let headers = response.headers_mut();
        // Responses differ per Origin whether or not this one was allowed
        headers.append(header::VARY, HeaderValue::from_static("Origin"));

        let Some(origin) = origin else {
            return;
        };
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        );
        headers.insert(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(MAX_AGE_SECONDS),
        );
    }
}

/// Router-wide preflight: every `OPTIONS` ends here, before any route or
/// static service sees it.
pub async fn answer_preflight(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::OPTIONS {
        return next.run(request).await;
    }
    let origin = state.cors.allowed_origin(request.headers());
    state.cors.preflight(origin.as_ref())
}
