/*
 * Responsibility
 * - Response Writer: status + JSON body, optional session cookie
 * - Every body is a JSON object; errors go through AppError instead
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::{AppError, MessageBody};
use crate::middleware::auth::guard::SESSION_COOKIE;

pub fn json<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, Json(body)).into_response()
}

pub fn ok<T: Serialize>(body: T) -> Response {
    json(StatusCode::OK, body)
}

pub fn created<T: Serialize>(body: T) -> Response {
    json(StatusCode::CREATED, body)
}

pub fn message(status: StatusCode, text: &str) -> Response {
    json(
        status,
        MessageBody {
            message: text.to_string(),
        },
    )
}

/// `token=<jwt>; HttpOnly; Path=/; SameSite=Strict; Max-Age=<ttl>[; Secure]`
pub fn session_cookie(token: &str, max_age: u64, secure: bool) -> Result<HeaderValue, AppError> {
    let mut cookie = format!(
        "{}={}; HttpOnly; Path=/; SameSite=Strict; Max-Age={}",
        SESSION_COOKIE, token, max_age
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).map_err(|e| AppError::internal(format!("session cookie: {e}")))
}

/// Overwrites the session cookie with an empty, already-expired one.
pub fn cleared_session_cookie(secure: bool) -> HeaderValue {
    if secure {
        HeaderValue::from_static("token=; HttpOnly; Path=/; SameSite=Strict; Max-Age=0; Secure")
    } else {
        HeaderValue::from_static("token=; HttpOnly; Path=/; SameSite=Strict; Max-Age=0")
    }
}

pub fn with_cookie(mut response: Response, cookie: HeaderValue) -> Response {
    response.headers_mut().append(header::SET_COOKIE, cookie);
    response
}
